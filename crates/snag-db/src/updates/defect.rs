//! Defect update builder.

use chrono::NaiveDate;
use serde::Serialize;
use snag_core::enums::{DefectPriority, DefectStatus};

/// Partial update of a defect. `None` leaves a field alone; the
/// doubly-optional fields use `Some(None)` to clear the column to NULL.
#[derive(Debug, Clone, Default, Serialize)]
pub struct DefectUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<DefectStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<DefectPriority>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assignee_id: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deadline: Option<Option<NaiveDate>>,
}

impl DefectUpdate {
    /// Whether the update would change nothing.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.status.is_none()
            && self.priority.is_none()
            && self.assignee_id.is_none()
            && self.deadline.is_none()
    }
}

pub struct DefectUpdateBuilder(DefectUpdate);

impl DefectUpdateBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self(DefectUpdate::default())
    }

    #[must_use]
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.0.title = Some(title.into());
        self
    }

    #[must_use]
    pub fn description(mut self, description: Option<String>) -> Self {
        self.0.description = Some(description);
        self
    }

    #[must_use]
    pub fn status(mut self, status: DefectStatus) -> Self {
        self.0.status = Some(status);
        self
    }

    #[must_use]
    pub fn priority(mut self, priority: DefectPriority) -> Self {
        self.0.priority = Some(priority);
        self
    }

    #[must_use]
    pub fn assignee_id(mut self, assignee_id: Option<String>) -> Self {
        self.0.assignee_id = Some(assignee_id);
        self
    }

    #[must_use]
    pub fn deadline(mut self, deadline: Option<NaiveDate>) -> Self {
        self.0.deadline = Some(deadline);
        self
    }

    #[must_use]
    pub fn build(self) -> DefectUpdate {
        self.0
    }
}

impl Default for DefectUpdateBuilder {
    fn default() -> Self {
        Self::new()
    }
}

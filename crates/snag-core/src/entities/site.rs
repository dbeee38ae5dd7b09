use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A construction site belonging to exactly one project.
///
/// Deletion is rejected (not cascaded) while any defect references it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Site {
    pub id: String,
    pub project_id: String,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

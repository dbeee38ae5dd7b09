use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::enums::{DefectPriority, DefectStatus};

/// A tracked defect on a construction site.
///
/// Always has exactly one creator and at most one assignee. Status starts at
/// `NEW`; no transition graph constrains later changes.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Defect {
    pub id: String,
    pub site_id: String,
    pub title: String,
    pub description: Option<String>,
    pub status: DefectStatus,
    pub priority: DefectPriority,
    pub creator_id: String,
    pub assignee_id: Option<String>,
    pub deadline: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A comment on a defect.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    pub id: String,
    pub defect_id: String,
    pub author_id: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

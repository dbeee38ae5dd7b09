use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A file attached to a defect. Upload handling is out of scope; rows exist
/// for listing alongside the defect detail.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Attachment {
    pub id: String,
    pub defect_id: String,
    pub file_name: String,
    pub created_at: DateTime<Utc>,
}

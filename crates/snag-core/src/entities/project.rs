use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A construction project, the top-level grouping of sites.
///
/// Deletion is rejected (not cascaded) while any site references it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: String,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

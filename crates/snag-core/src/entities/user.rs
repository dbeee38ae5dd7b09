use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::enums::Role;

/// A user account. Created via the one-time bootstrap endpoint (or seeded in
/// tests); immutable afterwards.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub email: String,
    pub name: Option<String>,
    /// argon2id hash. Never serialized into responses.
    #[serde(skip_serializing, default)]
    pub password_hash: String,
    pub role: Role,
    pub created_at: DateTime<Utc>,
}

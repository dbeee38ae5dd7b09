use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A server-issued login session. The row ID doubles as the bearer token
/// carried in the `snag_session` cookie or `Authorization` header.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct AuthSession {
    pub id: String,
    pub user_id: String,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

//! Request-scoped authenticated identity.

use serde::{Deserialize, Serialize};

use crate::enums::Role;

/// Lightweight authenticated user identity, resolved once per request from
/// the session token and passed explicitly into handlers and policy checks.
///
/// Contains only data fields, no session lookup or password logic.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Identity {
    pub user_id: String,
    pub email: String,
    pub role: Role,
}

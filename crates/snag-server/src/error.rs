//! HTTP error mapping.
//!
//! Storage errors stay `DatabaseError` inside snag-db; this type owns the
//! translation to status codes and the uniform `{"error": ...}` JSON body.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use thiserror::Error;

use snag_db::error::DatabaseError;

#[derive(Debug, Error)]
pub enum ApiError {
    /// Missing, unknown, or expired session.
    #[error("Authentication required")]
    Unauthorized,

    /// Authenticated but the role/assignee check failed.
    #[error("Insufficient permissions")]
    Forbidden,

    /// A referenced entity does not exist.
    #[error("{0} not found")]
    NotFound(&'static str),

    /// Bad request body or a rejected child-bearing delete.
    #[error("{0}")]
    Validation(String),

    /// Anything unexpected. Logged at the boundary, opaque on the wire.
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl ApiError {
    /// Map a storage error for a handler working on `entity`.
    ///
    /// `NoResult` means the entity was absent (404); `HasDependents` is a
    /// rejected delete (400); everything else is a 500.
    pub fn from_db(err: DatabaseError, entity: &'static str) -> Self {
        match err {
            DatabaseError::NoResult => Self::NotFound(entity),
            DatabaseError::HasDependents { .. } => Self::Validation(err.to_string()),
            other => Self::Internal(other.into()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            Self::Unauthorized => (StatusCode::UNAUTHORIZED, self.to_string()),
            Self::Forbidden => (StatusCode::FORBIDDEN, self.to_string()),
            Self::NotFound(_) => (StatusCode::NOT_FOUND, self.to_string()),
            Self::Validation(_) => (StatusCode::BAD_REQUEST, self.to_string()),
            Self::Internal(err) => {
                tracing::error!(error = %err, "internal server error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
        };
        (status, Json(json!({ "error": message }))).into_response()
    }
}

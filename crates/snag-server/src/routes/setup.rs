//! One-time bootstrap endpoint.

use axum::Json;
use axum::extract::State;
use serde_json::{Value, json};

use snag_core::enums::Role;

use crate::auth::hash_password;
use crate::error::ApiError;
use crate::state::AppState;

/// `GET /setup`. When the database has zero users, create the default
/// manager account from config. Safe to call repeatedly; once any user
/// exists it only reports that setup already happened.
pub async fn setup(State(state): State<AppState>) -> Result<Json<Value>, ApiError> {
    let count = state
        .service
        .count_users()
        .await
        .map_err(|e| ApiError::Internal(e.into()))?;
    if count > 0 {
        return Ok(Json(json!({
            "created": false,
            "message": "Already configured"
        })));
    }

    let auth = &state.config.auth;
    let hash = hash_password(&auth.bootstrap_password)?;
    let user = state
        .service
        .create_user(&auth.bootstrap_email, Some("Administrator"), &hash, Role::Manager)
        .await
        .map_err(|e| ApiError::Internal(e.into()))?;

    tracing::info!(email = %user.email, "created bootstrap manager account");

    Ok(Json(json!({
        "created": true,
        "email": user.email
    })))
}

//! User listing, for assignee pickers.

use axum::Json;
use axum::extract::State;

use snag_core::responses::UserPublic;

use crate::auth::CurrentUser;
use crate::error::ApiError;
use crate::state::AppState;

/// `GET /users`. Any authenticated user.
pub async fn list(
    State(state): State<AppState>,
    CurrentUser(_): CurrentUser,
) -> Result<Json<Vec<UserPublic>>, ApiError> {
    let users = state
        .service
        .list_users()
        .await
        .map_err(|e| ApiError::Internal(e.into()))?;
    Ok(Json(users))
}

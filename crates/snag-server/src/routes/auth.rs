//! Login and logout.

use axum::Json;
use axum::extract::State;
use axum::http::HeaderMap;
use axum_extra::extract::CookieJar;
use axum_extra::extract::cookie::Cookie;
use serde::{Deserialize, Serialize};
use serde_json::json;

use snag_core::responses::UserPublic;

use crate::auth::{SESSION_COOKIE, verify_password};
use crate::error::ApiError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct LoginBody {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub token: String,
    pub user: UserPublic,
}

/// `POST /auth/login`. Verifies credentials, mints a session, sets the
/// cookie, and returns the token for header-based clients.
pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(body): Json<LoginBody>,
) -> Result<(CookieJar, Json<LoginResponse>), ApiError> {
    let user = state
        .service
        .get_user_by_email(&body.email)
        .await
        .map_err(|e| ApiError::Internal(e.into()))?
        .ok_or(ApiError::Unauthorized)?;

    if !verify_password(&body.password, &user.password_hash) {
        return Err(ApiError::Unauthorized);
    }

    let session = state
        .service
        .create_session(&user.id, state.config.auth.session_ttl_hours)
        .await
        .map_err(|e| ApiError::Internal(e.into()))?;

    tracing::info!(user = %user.email, "login");

    let cookie = Cookie::build((SESSION_COOKIE, session.id.clone()))
        .path("/")
        .http_only(true)
        .build();

    Ok((
        jar.add(cookie),
        Json(LoginResponse {
            token: session.id,
            user: UserPublic {
                id: user.id,
                email: user.email,
                name: user.name,
                role: user.role,
                created_at: user.created_at,
            },
        }),
    ))
}

/// `POST /auth/logout`. Deletes the session row and clears the cookie.
pub async fn logout(
    State(state): State<AppState>,
    jar: CookieJar,
    headers: HeaderMap,
) -> Result<(CookieJar, Json<serde_json::Value>), ApiError> {
    let token = crate::auth::session_token(&headers).ok_or(ApiError::Unauthorized)?;

    state
        .service
        .delete_session(&token)
        .await
        .map_err(|e| ApiError::Internal(e.into()))?;

    Ok((
        jar.remove(Cookie::build((SESSION_COOKIE, "")).path("/").build()),
        Json(json!({ "ok": true })),
    ))
}

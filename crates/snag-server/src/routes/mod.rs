//! HTTP route handlers, one module per resource.

pub mod auth;
pub mod defects;
pub mod projects;
pub mod reports;
pub mod setup;
pub mod sites;
pub mod users;

use axum::Router;
use axum::routing::{get, post};

use snag_core::identity::Identity;
use snag_core::policy::{self, Action};

use crate::error::ApiError;
use crate::state::AppState;

/// Build the full application router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/setup", get(setup::setup))
        .route("/auth/login", post(auth::login))
        .route("/auth/logout", post(auth::logout))
        .route("/users", get(users::list))
        .route("/projects", get(projects::list).post(projects::create))
        .route(
            "/projects/{id}",
            get(projects::show)
                .patch(projects::update)
                .delete(projects::remove),
        )
        .route(
            "/projects/{id}/sites",
            get(sites::list_for_project).post(sites::create),
        )
        .route("/sites", get(sites::list))
        .route(
            "/sites/{id}",
            get(sites::show).patch(sites::update).delete(sites::remove),
        )
        .route("/defects", get(defects::list).post(defects::create))
        .route(
            "/defects/{id}",
            get(defects::show)
                .patch(defects::update)
                .delete(defects::remove),
        )
        .route(
            "/defects/{id}/comments",
            get(defects::list_comments).post(defects::create_comment),
        )
        .route("/defects/{id}/attachments", get(defects::list_attachments))
        .route("/reports", get(reports::build))
        .with_state(state)
}

async fn health() -> &'static str {
    "ok"
}

/// Reject with 403 unless the policy allows `action` for this caller.
pub(crate) fn require(identity: &Identity, action: Action) -> Result<(), ApiError> {
    if policy::allows(identity.role, action) {
        Ok(())
    } else {
        Err(ApiError::Forbidden)
    }
}

/// Trim a required name-like field, rejecting empty or missing values.
pub(crate) fn required_trimmed(
    value: Option<&str>,
    field: &str,
) -> Result<String, ApiError> {
    match value.map(str::trim) {
        Some(v) if !v.is_empty() => Ok(v.to_string()),
        _ => Err(ApiError::Validation(format!("{field} is required"))),
    }
}

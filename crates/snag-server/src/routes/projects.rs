//! Project CRUD. All mutations are manager-only.

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use serde::Deserialize;
use serde_json::{Value, json};

use snag_core::entities::Project;
use snag_core::policy::Action;
use snag_core::responses::ProjectSummary;

use crate::auth::CurrentUser;
use crate::error::ApiError;
use crate::routes::{require, required_trimmed};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ProjectBody {
    pub name: Option<String>,
}

/// `GET /projects`. Newest first, each with its sites.
pub async fn list(
    State(state): State<AppState>,
    CurrentUser(_): CurrentUser,
) -> Result<Json<Vec<ProjectSummary>>, ApiError> {
    let projects = state
        .service
        .list_projects()
        .await
        .map_err(|e| ApiError::Internal(e.into()))?;
    Ok(Json(projects))
}

/// `POST /projects`. Manager only.
pub async fn create(
    State(state): State<AppState>,
    CurrentUser(identity): CurrentUser,
    Json(body): Json<ProjectBody>,
) -> Result<(StatusCode, Json<Project>), ApiError> {
    require(&identity, Action::CreateProject)?;
    let name = required_trimmed(body.name.as_deref(), "name")?;

    let project = state
        .service
        .create_project(&name)
        .await
        .map_err(|e| ApiError::Internal(e.into()))?;
    Ok((StatusCode::CREATED, Json(project)))
}

/// `GET /projects/{id}`.
pub async fn show(
    State(state): State<AppState>,
    CurrentUser(_): CurrentUser,
    Path(id): Path<String>,
) -> Result<Json<ProjectSummary>, ApiError> {
    let project = state
        .service
        .get_project_summary(&id)
        .await
        .map_err(|e| ApiError::from_db(e, "Project"))?;
    Ok(Json(project))
}

/// `PATCH /projects/{id}`. Manager only.
pub async fn update(
    State(state): State<AppState>,
    CurrentUser(identity): CurrentUser,
    Path(id): Path<String>,
    Json(body): Json<ProjectBody>,
) -> Result<Json<Project>, ApiError> {
    require(&identity, Action::UpdateProject)?;
    let name = required_trimmed(body.name.as_deref(), "name")?;

    let project = state
        .service
        .update_project(&id, &name)
        .await
        .map_err(|e| ApiError::from_db(e, "Project"))?;
    Ok(Json(project))
}

/// `DELETE /projects/{id}`. Manager only; rejected while sites exist.
pub async fn remove(
    State(state): State<AppState>,
    CurrentUser(identity): CurrentUser,
    Path(id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    require(&identity, Action::DeleteProject)?;

    state
        .service
        .delete_project(&id)
        .await
        .map_err(|e| ApiError::from_db(e, "Project"))?;
    Ok(Json(json!({ "ok": true })))
}

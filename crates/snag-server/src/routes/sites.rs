//! Site CRUD. Create/update take manager or engineer; delete is
//! manager-only, mirroring project deletion.

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use serde::Deserialize;
use serde_json::{Value, json};

use snag_core::entities::Site;
use snag_core::policy::Action;
use snag_core::responses::{SiteDetail, SiteSummary};

use crate::auth::CurrentUser;
use crate::error::ApiError;
use crate::routes::{require, required_trimmed};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct SiteBody {
    pub name: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SiteListQuery {
    pub project_id: Option<String>,
}

/// `GET /sites`. Name order, optional `?projectId=` filter.
pub async fn list(
    State(state): State<AppState>,
    CurrentUser(_): CurrentUser,
    Query(query): Query<SiteListQuery>,
) -> Result<Json<Vec<SiteSummary>>, ApiError> {
    let sites = state
        .service
        .list_sites(query.project_id.as_deref())
        .await
        .map_err(|e| ApiError::Internal(e.into()))?;
    Ok(Json(sites))
}

/// `GET /projects/{id}/sites`.
pub async fn list_for_project(
    State(state): State<AppState>,
    CurrentUser(_): CurrentUser,
    Path(project_id): Path<String>,
) -> Result<Json<Vec<SiteSummary>>, ApiError> {
    // 404 before listing so a bad project ID is distinguishable from an
    // empty project.
    state
        .service
        .get_project(&project_id)
        .await
        .map_err(|e| ApiError::from_db(e, "Project"))?;

    let sites = state
        .service
        .list_sites(Some(&project_id))
        .await
        .map_err(|e| ApiError::Internal(e.into()))?;
    Ok(Json(sites))
}

/// `POST /projects/{id}/sites`. Manager or engineer.
pub async fn create(
    State(state): State<AppState>,
    CurrentUser(identity): CurrentUser,
    Path(project_id): Path<String>,
    Json(body): Json<SiteBody>,
) -> Result<(StatusCode, Json<Site>), ApiError> {
    require(&identity, Action::CreateSite)?;
    let name = required_trimmed(body.name.as_deref(), "name")?;

    let site = state
        .service
        .create_site(&project_id, &name)
        .await
        .map_err(|e| ApiError::from_db(e, "Project"))?;
    Ok((StatusCode::CREATED, Json(site)))
}

/// `GET /sites/{id}`. Site with project and defects.
pub async fn show(
    State(state): State<AppState>,
    CurrentUser(_): CurrentUser,
    Path(id): Path<String>,
) -> Result<Json<SiteDetail>, ApiError> {
    let detail = state
        .service
        .get_site_detail(&id)
        .await
        .map_err(|e| ApiError::from_db(e, "Site"))?;
    Ok(Json(detail))
}

/// `PATCH /sites/{id}`. Manager or engineer.
pub async fn update(
    State(state): State<AppState>,
    CurrentUser(identity): CurrentUser,
    Path(id): Path<String>,
    Json(body): Json<SiteBody>,
) -> Result<Json<Site>, ApiError> {
    require(&identity, Action::UpdateSite)?;
    let name = required_trimmed(body.name.as_deref(), "name")?;

    let site = state
        .service
        .update_site(&id, &name)
        .await
        .map_err(|e| ApiError::from_db(e, "Site"))?;
    Ok(Json(site))
}

/// `DELETE /sites/{id}`. Manager only; rejected while defects exist.
pub async fn remove(
    State(state): State<AppState>,
    CurrentUser(identity): CurrentUser,
    Path(id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    require(&identity, Action::DeleteSite)?;

    state
        .service
        .delete_site(&id)
        .await
        .map_err(|e| ApiError::from_db(e, "Site"))?;
    Ok(Json(json!({ "ok": true })))
}

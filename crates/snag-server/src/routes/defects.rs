//! Defect CRUD plus nested comments and attachments.

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use chrono::NaiveDate;
use serde::{Deserialize, Deserializer};
use serde_json::{Value, json};

use snag_core::entities::{Attachment, Comment, Defect};
use snag_core::enums::{DefectPriority, DefectStatus};
use snag_core::policy::{self, Action};
use snag_core::responses::{CommentRow, DefectDetail, DefectRow};

use snag_db::repos::defect::{DefectFilter, NewDefect};
use snag_db::updates::defect::DefectUpdate;

use crate::auth::CurrentUser;
use crate::error::ApiError;
use crate::routes::{require, required_trimmed};
use crate::state::AppState;

/// Distinguishes an absent field from an explicit `null` in PATCH bodies:
/// absent leaves the column alone, `null` clears it.
fn double_option<'de, T, D>(de: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Deserialize::deserialize(de).map(Some)
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DefectListQuery {
    pub site_id: Option<String>,
    pub status: Option<DefectStatus>,
    pub priority: Option<DefectPriority>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateDefectBody {
    pub title: Option<String>,
    pub description: Option<String>,
    pub priority: Option<DefectPriority>,
    pub site_id: Option<String>,
    pub assignee_id: Option<String>,
    pub deadline: Option<NaiveDate>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UpdateDefectBody {
    pub title: Option<String>,
    pub status: Option<DefectStatus>,
    pub priority: Option<DefectPriority>,
    #[serde(deserialize_with = "double_option")]
    pub description: Option<Option<String>>,
    #[serde(deserialize_with = "double_option")]
    pub assignee_id: Option<Option<String>>,
    #[serde(deserialize_with = "double_option")]
    pub deadline: Option<Option<NaiveDate>>,
}

#[derive(Debug, Deserialize)]
pub struct CommentBody {
    pub content: Option<String>,
}

/// `GET /defects?siteId=&status=&priority=`. Newest first.
pub async fn list(
    State(state): State<AppState>,
    CurrentUser(_): CurrentUser,
    Query(query): Query<DefectListQuery>,
) -> Result<Json<Vec<DefectRow>>, ApiError> {
    let filter = DefectFilter {
        site_id: query.site_id,
        status: query.status,
        priority: query.priority,
    };
    let defects = state
        .service
        .list_defects(&filter)
        .await
        .map_err(|e| ApiError::Internal(e.into()))?;
    Ok(Json(defects))
}

/// `POST /defects`. Manager or engineer.
pub async fn create(
    State(state): State<AppState>,
    CurrentUser(identity): CurrentUser,
    Json(body): Json<CreateDefectBody>,
) -> Result<(StatusCode, Json<Defect>), ApiError> {
    require(&identity, Action::CreateDefect)?;
    let title = required_trimmed(body.title.as_deref(), "title")?;
    let site_id = body
        .site_id
        .filter(|s| !s.is_empty())
        .ok_or_else(|| ApiError::Validation("siteId is required".to_string()))?;

    let defect = state
        .service
        .create_defect(NewDefect {
            site_id,
            title,
            description: body.description,
            priority: body.priority,
            assignee_id: body.assignee_id,
            deadline: body.deadline,
            creator_id: identity.user_id,
        })
        .await
        .map_err(|e| ApiError::from_db(e, "Site"))?;
    Ok((StatusCode::CREATED, Json(defect)))
}

/// `GET /defects/{id}`. Full detail with comments and attachments.
pub async fn show(
    State(state): State<AppState>,
    CurrentUser(_): CurrentUser,
    Path(id): Path<String>,
) -> Result<Json<DefectDetail>, ApiError> {
    let detail = state
        .service
        .get_defect_detail(&id)
        .await
        .map_err(|e| ApiError::from_db(e, "Defect"))?;
    Ok(Json(detail))
}

/// `PATCH /defects/{id}`. Manager, engineer, or the current assignee.
///
/// Existence is checked before authorization so a non-privileged caller
/// probing a missing defect sees 404, not 403.
pub async fn update(
    State(state): State<AppState>,
    CurrentUser(identity): CurrentUser,
    Path(id): Path<String>,
    Json(body): Json<UpdateDefectBody>,
) -> Result<Json<DefectRow>, ApiError> {
    let existing = state
        .service
        .get_defect(&id)
        .await
        .map_err(|e| ApiError::from_db(e, "Defect"))?;

    if !policy::can_update_defect(&identity, existing.assignee_id.as_deref()) {
        return Err(ApiError::Forbidden);
    }

    let mut update = DefectUpdate::default();
    // Empty-string title means "not provided", matching the create rule.
    if let Some(title) = body.title.map(|t| t.trim().to_string()) {
        if !title.is_empty() {
            update.title = Some(title);
        }
    }
    update.status = body.status;
    update.priority = body.priority;
    update.description = body.description;
    update.assignee_id = body.assignee_id.map(|a| a.filter(|s| !s.is_empty()));
    update.deadline = body.deadline;

    state
        .service
        .update_defect(&id, update)
        .await
        .map_err(|e| ApiError::from_db(e, "Defect"))?;

    let row = state
        .service
        .get_defect_row(&id)
        .await
        .map_err(|e| ApiError::from_db(e, "Defect"))?;
    Ok(Json(row))
}

/// `DELETE /defects/{id}`. Manager or engineer.
pub async fn remove(
    State(state): State<AppState>,
    CurrentUser(identity): CurrentUser,
    Path(id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    require(&identity, Action::DeleteDefect)?;

    state
        .service
        .delete_defect(&id)
        .await
        .map_err(|e| ApiError::from_db(e, "Defect"))?;
    Ok(Json(json!({ "ok": true })))
}

/// `GET /defects/{id}/comments`. Oldest first.
pub async fn list_comments(
    State(state): State<AppState>,
    CurrentUser(_): CurrentUser,
    Path(id): Path<String>,
) -> Result<Json<Vec<CommentRow>>, ApiError> {
    // 404 for a missing defect rather than an empty list.
    state
        .service
        .get_defect(&id)
        .await
        .map_err(|e| ApiError::from_db(e, "Defect"))?;

    let comments = state
        .service
        .list_comments(&id)
        .await
        .map_err(|e| ApiError::Internal(e.into()))?;
    Ok(Json(comments))
}

/// `POST /defects/{id}/comments`. Any authenticated user.
pub async fn create_comment(
    State(state): State<AppState>,
    CurrentUser(identity): CurrentUser,
    Path(id): Path<String>,
    Json(body): Json<CommentBody>,
) -> Result<(StatusCode, Json<Comment>), ApiError> {
    require(&identity, Action::CreateComment)?;
    let content = required_trimmed(body.content.as_deref(), "content")?;

    let comment = state
        .service
        .create_comment(&id, &identity.user_id, &content)
        .await
        .map_err(|e| ApiError::from_db(e, "Defect"))?;
    Ok((StatusCode::CREATED, Json(comment)))
}

/// `GET /defects/{id}/attachments`. Oldest first.
pub async fn list_attachments(
    State(state): State<AppState>,
    CurrentUser(_): CurrentUser,
    Path(id): Path<String>,
) -> Result<Json<Vec<Attachment>>, ApiError> {
    state
        .service
        .get_defect(&id)
        .await
        .map_err(|e| ApiError::from_db(e, "Defect"))?;

    let attachments = state
        .service
        .list_attachments(&id)
        .await
        .map_err(|e| ApiError::Internal(e.into()))?;
    Ok(Json(attachments))
}

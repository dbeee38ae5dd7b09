//! Defect report endpoint.

use axum::Json;
use axum::extract::{Query, State};
use chrono::NaiveDate;
use serde::Deserialize;

use snag_core::responses::Report;
use snag_db::repos::report::ReportFilter;

use crate::auth::CurrentUser;
use crate::error::ApiError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportQuery {
    pub project_id: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

/// `GET /reports?projectId=&startDate=&endDate=`. Read-only aggregation.
pub async fn build(
    State(state): State<AppState>,
    CurrentUser(_): CurrentUser,
    Query(query): Query<ReportQuery>,
) -> Result<Json<Report>, ApiError> {
    let filter = ReportFilter {
        project_id: query.project_id,
        start_date: query.start_date,
        end_date: query.end_date,
    };
    let report = state
        .service
        .build_report(&filter)
        .await
        .map_err(|e| ApiError::Internal(e.into()))?;
    Ok(Json(report))
}

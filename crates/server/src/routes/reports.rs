use axum::extract::{Query, State};
use axum::Json;
use serde::Deserialize;

use models::report::{ReportResponse, SummaryData};

use crate::errors::ApiError;
use crate::state::ServerState;

#[derive(Debug, Deserialize)]
pub struct ReportQuery {
    #[serde(default = "default_report_type")]
    pub report_type: String,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

fn default_report_type() -> String {
    "daily".to_string()
}

pub async fn get_summary_data(
    State(state): State<ServerState>,
) -> Result<Json<SummaryData>, ApiError> {
    Ok(Json(state.reports.summary().await?))
}

pub async fn get_daily_report(
    State(state): State<ServerState>,
) -> Result<Json<ReportResponse>, ApiError> {
    Ok(Json(state.reports.daily_report().await?))
}

pub async fn get_report(
    State(state): State<ServerState>,
    Query(query): Query<ReportQuery>,
) -> Result<Json<ReportResponse>, ApiError> {
    let report = state
        .reports
        .report(
            &query.report_type,
            query.start_date.as_deref(),
            query.end_date.as_deref(),
        )
        .await?;
    Ok(Json(report))
}

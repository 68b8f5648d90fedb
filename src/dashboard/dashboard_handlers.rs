use axum::{extract::State, Json};
use serde::Serialize;
use utoipa::ToSchema;

use crate::{error::Result, middleware::CurrentUser, state::AppState, task::Requester};

use super::aggregator::DashboardSummary;

#[derive(Debug, Serialize, ToSchema)]
pub struct DashboardResponse {
    pub status: bool,
    pub message: String,
    #[serde(flatten)]
    pub summary: DashboardSummary,
}

/// Task statistics for the caller's dashboard
#[utoipa::path(
    get,
    path = "/api/task/dashboard",
    responses(
        (status = 200, description = "Dashboard statistics", body = DashboardResponse),
        (status = 401, description = "Unauthorized")
    ),
    tag = "tasks",
    security(("cookie_auth" = []))
)]
pub async fn dashboard_statistics(
    State(state): State<AppState>,
    current: CurrentUser,
) -> Result<Json<DashboardResponse>> {
    let summary = state
        .dashboard_service
        .summary(Requester::from(&current))
        .await?;

    Ok(Json(DashboardResponse {
        status: true,
        message: "Successfully".to_string(),
        summary,
    }))
}

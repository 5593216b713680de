use std::sync::Arc;

use axum::{extract::State, routing::get, Json, Router};
use chrono::Utc;

use super::require_session;
use crate::{error::ApiResult, main_lib::AppState};
use gigledger_core::dashboard::DashboardSummary;
use gigledger_core::insights::Insights;

async fn get_dashboard(State(state): State<Arc<AppState>>) -> ApiResult<Json<DashboardSummary>> {
    require_session(&state).await?;
    Ok(Json(state.ctx.dashboard_at(Utc::now().date_naive())))
}

async fn get_insights(State(state): State<Arc<AppState>>) -> ApiResult<Json<Insights>> {
    require_session(&state).await?;
    Ok(Json(state.ctx.insights_at(Utc::now().date_naive())))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/dashboard", get(get_dashboard))
        .route("/insights", get(get_insights))
}

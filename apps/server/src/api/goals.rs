use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, patch, post},
    Json, Router,
};
use rust_decimal::Decimal;
use serde::Deserialize;

use super::require_session;
use crate::{error::ApiResult, main_lib::AppState};
use gigledger_core::goals::{NewSavingsGoal, SavingsGoal, SavingsGoalUpdate, SavingsOverview};

async fn get_goals(State(state): State<Arc<AppState>>) -> ApiResult<Json<Vec<SavingsGoal>>> {
    require_session(&state).await?;
    Ok(Json(state.ctx.goal_service().get_goals()))
}

async fn create_goal(
    State(state): State<Arc<AppState>>,
    Json(goal): Json<NewSavingsGoal>,
) -> ApiResult<(StatusCode, Json<SavingsGoal>)> {
    require_session(&state).await?;
    let g = state.ctx.goal_service().create_goal(goal).await?;
    Ok((StatusCode::CREATED, Json(g)))
}

async fn update_goal(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
    Json(update): Json<SavingsGoalUpdate>,
) -> ApiResult<Json<SavingsGoal>> {
    require_session(&state).await?;
    let g = state.ctx.goal_service().update_goal(&id, update).await?;
    Ok(Json(g))
}

async fn delete_goal(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<StatusCode> {
    require_session(&state).await?;
    state.ctx.goal_service().delete_goal(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[derive(Deserialize)]
struct Contribution {
    amount: Decimal,
}

async fn contribute(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
    Json(body): Json<Contribution>,
) -> ApiResult<Json<SavingsGoal>> {
    require_session(&state).await?;
    let g = state.ctx.goal_service().contribute(&id, body.amount).await?;
    Ok(Json(g))
}

async fn overview(State(state): State<Arc<AppState>>) -> ApiResult<Json<SavingsOverview>> {
    require_session(&state).await?;
    Ok(Json(state.ctx.savings_overview()))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/goals", get(get_goals).post(create_goal))
        .route("/goals/overview", get(overview))
        .route("/goals/{id}", patch(update_goal).delete(delete_goal))
        .route("/goals/{id}/contributions", post(contribute))
}

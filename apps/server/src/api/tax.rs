use std::sync::Arc;

use axum::{
    extract::{Query, State},
    routing::{get, post},
    Json, Router,
};
use chrono::{Datelike, Utc};
use serde::Deserialize;

use super::require_session;
use crate::{error::ApiResult, main_lib::AppState};
use gigledger_core::tax::{NewTaxPayment, TaxEstimate, TaxPayment, TaxProfile, TaxProfileUpdate};

async fn get_profile(State(state): State<Arc<AppState>>) -> ApiResult<Json<TaxProfile>> {
    require_session(&state).await?;
    Ok(Json(state.ctx.tax_service().get_profile()))
}

async fn save_profile(
    State(state): State<Arc<AppState>>,
    Json(update): Json<TaxProfileUpdate>,
) -> ApiResult<Json<TaxProfile>> {
    require_session(&state).await?;
    let profile = state.ctx.tax_service().save_profile(update).await?;
    Ok(Json(profile))
}

async fn get_payments(State(state): State<Arc<AppState>>) -> ApiResult<Json<Vec<TaxPayment>>> {
    require_session(&state).await?;
    Ok(Json(state.ctx.tax_service().get_payments()))
}

async fn record_payment(
    State(state): State<Arc<AppState>>,
    Json(payment): Json<NewTaxPayment>,
) -> ApiResult<Json<TaxPayment>> {
    require_session(&state).await?;
    let p = state.ctx.tax_service().record_payment(payment).await?;
    Ok(Json(p))
}

#[derive(Deserialize)]
struct EstimateQuery {
    year: Option<i32>,
}

async fn estimate(
    State(state): State<Arc<AppState>>,
    Query(query): Query<EstimateQuery>,
) -> ApiResult<Json<TaxEstimate>> {
    require_session(&state).await?;
    let today = Utc::now().date_naive();
    let year = query.year.unwrap_or_else(|| today.year());
    Ok(Json(state.ctx.tax_estimate_at(year, today)))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/tax/profile", get(get_profile).put(save_profile))
        .route("/tax/payments", get(get_payments).post(record_payment))
        .route("/tax/estimate", get(estimate))
}

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, patch},
    Json, Router,
};
use serde::Deserialize;

use super::require_session;
use crate::{error::ApiResult, main_lib::AppState};
use gigledger_core::transactions::{
    NewTransaction, Transaction, TransactionType, TransactionUpdate,
};

#[derive(Deserialize)]
struct TransactionFilter {
    #[serde(rename = "type")]
    transaction_type: Option<TransactionType>,
}

async fn get_transactions(
    State(state): State<Arc<AppState>>,
    Query(filter): Query<TransactionFilter>,
) -> ApiResult<Json<Vec<Transaction>>> {
    require_session(&state).await?;
    let transactions = state.ctx.transaction_service().get_transactions();
    let transactions = match filter.transaction_type {
        Some(kind) => transactions
            .into_iter()
            .filter(|t| t.transaction_type == kind)
            .collect(),
        None => transactions,
    };
    Ok(Json(transactions))
}

async fn create_transaction(
    State(state): State<Arc<AppState>>,
    Json(new_transaction): Json<NewTransaction>,
) -> ApiResult<(StatusCode, Json<Transaction>)> {
    require_session(&state).await?;
    let t = state
        .ctx
        .transaction_service()
        .add_transaction(new_transaction)
        .await?;
    Ok((StatusCode::CREATED, Json(t)))
}

async fn update_transaction(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
    Json(update): Json<TransactionUpdate>,
) -> ApiResult<Json<Transaction>> {
    require_session(&state).await?;
    let t = state
        .ctx
        .transaction_service()
        .update_transaction(&id, update)
        .await?;
    Ok(Json(t))
}

async fn delete_transaction(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<StatusCode> {
    require_session(&state).await?;
    state
        .ctx
        .transaction_service()
        .delete_transaction(&id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route(
            "/transactions",
            get(get_transactions).post(create_transaction),
        )
        .route(
            "/transactions/{id}",
            patch(update_transaction).delete(delete_transaction),
        )
}

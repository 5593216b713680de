use std::sync::Arc;

use axum::{http::HeaderValue, Router};
use tower_http::{
    cors::{Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::{config::Config, error::ApiError, main_lib::AppState};

mod auth;
mod dashboard;
mod goals;
mod health;
mod navigation;
mod settings;
mod tax;
mod transactions;

pub fn app_router(state: Arc<AppState>, config: &Config) -> Router {
    let api = Router::new()
        .merge(health::router())
        .merge(auth::router())
        .merge(transactions::router())
        .merge(goals::router())
        .merge(tax::router())
        .merge(dashboard::router())
        .merge(navigation::router())
        .merge(settings::router());

    Router::new()
        .nest("/api/v1", api)
        .layer(cors_layer(&config.cors_allow_origins))
        .layer(TimeoutLayer::new(config.request_timeout))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let layer = CorsLayer::new().allow_methods(Any).allow_headers(Any);
    if origins.is_empty() || origins.iter().any(|o| o == "*") {
        return layer.allow_origin(Any);
    }
    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|o| match HeaderValue::from_str(o) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin: {}", o);
                None
            }
        })
        .collect();
    layer.allow_origin(origins)
}

/// Fails with 401 unless a session is active.
pub(crate) async fn require_session(state: &AppState) -> Result<(), ApiError> {
    if state.is_signed_in().await {
        Ok(())
    } else {
        Err(ApiError::Unauthorized)
    }
}

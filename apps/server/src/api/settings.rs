use std::sync::Arc;

use axum::{extract::State, routing::get, Json, Router};

use crate::main_lib::AppState;
use gigledger_core::formatters::DisplaySettings;

async fn get_display(State(state): State<Arc<AppState>>) -> Json<DisplaySettings> {
    Json(state.ctx.display())
}

async fn update_display(
    State(state): State<Arc<AppState>>,
    Json(display): Json<DisplaySettings>,
) -> Json<DisplaySettings> {
    state.ctx.update_display(display);
    Json(display)
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/settings/display", get(get_display).put(update_display))
}

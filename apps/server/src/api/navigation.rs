use std::sync::Arc;

use axum::{
    extract::{Path, State},
    routing::get,
    Json, Router,
};
use serde::Serialize;

use crate::{
    error::{ApiError, ApiResult},
    main_lib::AppState,
};
use gigledger_core::navigation::{get_started_target, resolve_page, Page};

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct NavigationView {
    page: Page,
    title: &'static str,
    shows_header: bool,
    get_started: Page,
    /// Header links, empty on public pages.
    links: Vec<Page>,
}

async fn navigate(
    Path(page): Path<String>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<NavigationView>> {
    let requested: Page = page.parse().map_err(ApiError::BadRequest)?;
    let signed_in = state.is_signed_in().await;
    let page = resolve_page(requested, signed_in);
    let links = if page.shows_header() {
        Page::APP_PAGES.to_vec()
    } else {
        Vec::new()
    };
    Ok(Json(NavigationView {
        page,
        title: page.title(),
        shows_header: page.shows_header(),
        get_started: get_started_target(signed_in),
        links,
    }))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/navigation/{page}", get(navigate))
}

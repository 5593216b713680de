use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};

use crate::{
    error::{ApiError, ApiResult},
    main_lib::AppState,
};
use gigledger_core::auth::{
    password_strength, PasswordStrength, SignInForm, SignUpForm, SignUpProfile, User,
};

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SessionUser {
    user: User,
    greeting_name: String,
    avatar_letter: char,
}

impl From<&User> for SessionUser {
    fn from(user: &User) -> Self {
        SessionUser {
            user: user.clone(),
            greeting_name: user.first_name().to_string(),
            avatar_letter: user.avatar_letter(),
        }
    }
}

async fn sign_in(
    State(state): State<Arc<AppState>>,
    Json(form): Json<SignInForm>,
) -> ApiResult<Json<SessionUser>> {
    form.validate()?;
    let mut session = state.session.lock().await;
    // A new sign-in replaces the current session.
    session.take();
    let guard = state.ctx.sign_in(form.email.trim(), &form.password).await?;
    let body = SessionUser::from(guard.user());
    *session = Some(guard);
    Ok(Json(body))
}

async fn sign_up(
    State(state): State<Arc<AppState>>,
    Json(form): Json<SignUpForm>,
) -> ApiResult<(StatusCode, Json<SessionUser>)> {
    form.validate()?;
    let profile = SignUpProfile {
        full_name: Some(form.name.trim().to_string()),
    };
    let mut session = state.session.lock().await;
    session.take();
    let guard = state
        .ctx
        .sign_up(form.email.trim(), &form.password, profile)
        .await?;
    let body = SessionUser::from(guard.user());
    *session = Some(guard);
    Ok((StatusCode::CREATED, Json(body)))
}

async fn sign_out(State(state): State<Arc<AppState>>) -> ApiResult<StatusCode> {
    let previous = state.session.lock().await.take();
    state.ctx.sign_out(previous).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn me(State(state): State<Arc<AppState>>) -> ApiResult<Json<SessionUser>> {
    let session = state.session.lock().await;
    let guard = session.as_ref().ok_or(ApiError::Unauthorized)?;
    Ok(Json(SessionUser::from(guard.user())))
}

#[derive(Deserialize)]
struct StrengthRequest {
    password: String,
}

async fn strength(Json(body): Json<StrengthRequest>) -> Json<PasswordStrength> {
    Json(password_strength(&body.password))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/auth/sign-in", post(sign_in))
        .route("/auth/sign-up", post(sign_up))
        .route("/auth/sign-out", post(sign_out))
        .route("/auth/me", get(me))
        .route("/auth/password-strength", post(strength))
}

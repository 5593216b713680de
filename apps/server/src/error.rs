use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use gigledger_core::auth::FormErrors;
use gigledger_core::errors::{AuthError, Error as CoreError, StoreError};
use serde::Serialize;
use thiserror::Error;

pub type ApiResult<T> = Result<T, ApiError>;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error("Please fix the highlighted fields")]
    Form(FormErrors),

    #[error("{0}")]
    BadRequest(String),

    #[error("You must be signed in to do that")]
    Unauthorized,

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl From<FormErrors> for ApiError {
    fn from(errors: FormErrors) -> Self {
        ApiError::Form(errors)
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ErrorBody {
    code: &'static str,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    fields: Option<FormErrors>,
}

impl ApiError {
    fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            ApiError::Core(CoreError::Validation(_)) => {
                (StatusCode::BAD_REQUEST, "validation_error")
            }
            ApiError::Core(CoreError::Auth(AuthError::NotSignedIn)) | ApiError::Unauthorized => {
                (StatusCode::UNAUTHORIZED, "not_signed_in")
            }
            ApiError::Core(CoreError::Auth(AuthError::InvalidCredentials)) => {
                (StatusCode::UNAUTHORIZED, "invalid_credentials")
            }
            ApiError::Core(CoreError::Auth(AuthError::AlreadyRegistered)) => {
                (StatusCode::CONFLICT, "already_registered")
            }
            ApiError::Core(CoreError::Auth(AuthError::Provider(_))) => {
                (StatusCode::BAD_REQUEST, "auth_error")
            }
            ApiError::Core(CoreError::Store(StoreError::NotFound(_))) => {
                (StatusCode::NOT_FOUND, "not_found")
            }
            ApiError::Core(CoreError::Store(StoreError::Internal(_))) | ApiError::Internal(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "internal_error")
            }
            ApiError::Core(CoreError::Store(_)) => (StatusCode::BAD_GATEWAY, "store_error"),
            ApiError::Form(_) | ApiError::BadRequest(_) => {
                (StatusCode::BAD_REQUEST, "validation_error")
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();
        if status.is_server_error() {
            tracing::error!("{}: {}", code, self);
        } else {
            tracing::debug!("{}: {}", code, self);
        }

        let body = match self {
            ApiError::Core(e) => ErrorBody {
                code,
                message: e.user_message(),
                fields: None,
            },
            ApiError::Form(fields) => ErrorBody {
                code,
                message: "Please fix the highlighted fields".to_string(),
                fields: Some(fields),
            },
            ApiError::Internal(_) => ErrorBody {
                code,
                message: "Something went wrong".to_string(),
                fields: None,
            },
            other => ErrorBody {
                code,
                message: other.to_string(),
                fields: None,
            },
        };
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_core_errors_to_statuses() {
        let cases = [
            (CoreError::invalid_input("bad"), StatusCode::BAD_REQUEST),
            (AuthError::NotSignedIn.into(), StatusCode::UNAUTHORIZED),
            (AuthError::InvalidCredentials.into(), StatusCode::UNAUTHORIZED),
            (StoreError::NotFound("x".into()).into(), StatusCode::NOT_FOUND),
            (StoreError::Network("down".into()).into(), StatusCode::BAD_GATEWAY),
        ];
        for (err, status) in cases {
            assert_eq!(ApiError::from(err).status_and_code().0, status);
        }
    }
}

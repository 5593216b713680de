//! Error types for the remote store crate.

use gigledger_core::errors::{AuthError, Error as CoreError, StoreError, ValidationError};
use thiserror::Error;

/// Result type alias for remote store operations.
pub type Result<T> = std::result::Result<T, RemoteStoreError>;

#[derive(Debug, Error)]
pub enum RemoteStoreError {
    /// Transport failure (DNS, TLS, timeout, connection reset)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Non-success response from the backend
    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Missing or rejected credentials
    #[error("Authentication error: {0}")]
    Auth(String),
}

impl RemoteStoreError {
    pub fn api(status: u16, message: impl Into<String>) -> Self {
        Self::Api {
            status,
            message: message.into(),
        }
    }

    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::InvalidRequest(message.into())
    }

    pub fn auth(message: impl Into<String>) -> Self {
        Self::Auth(message.into())
    }
}

impl From<RemoteStoreError> for CoreError {
    fn from(err: RemoteStoreError) -> Self {
        match err {
            RemoteStoreError::Http(e) => StoreError::Network(e.to_string()).into(),
            RemoteStoreError::Json(e) => StoreError::Serialization(e.to_string()).into(),
            RemoteStoreError::Api { status: 404, message } => StoreError::NotFound(message).into(),
            RemoteStoreError::Api {
                status: 401 | 403,
                ..
            } => AuthError::NotSignedIn.into(),
            RemoteStoreError::Api { status, message } => {
                StoreError::Rejected { status, message }.into()
            }
            RemoteStoreError::InvalidRequest(message) => {
                ValidationError::InvalidInput(message).into()
            }
            RemoteStoreError::Auth(message) => AuthError::Provider(message).into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_onto_core_taxonomy() {
        let err: CoreError = RemoteStoreError::api(404, "no rows").into();
        assert!(matches!(err, CoreError::Store(StoreError::NotFound(_))));

        let err: CoreError = RemoteStoreError::api(401, "JWT expired").into();
        assert!(err.is_not_signed_in());

        let err: CoreError = RemoteStoreError::api(409, "duplicate key").into();
        assert_eq!(err.user_message(), "duplicate key");

        let err: CoreError = RemoteStoreError::auth("Email not confirmed").into();
        assert_eq!(err.user_message(), "Email not confirmed");
    }
}

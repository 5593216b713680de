use thiserror::Error;

// Create a type alias for Result using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Root error type for the ledger
#[derive(Error, Debug)]
pub enum Error {
    #[error("Input validation failed: {0}")]
    Validation(#[from] ValidationError),

    #[error("Store operation failed: {0}")]
    Store(#[from] StoreError),

    #[error("Authentication failed: {0}")]
    Auth(#[from] AuthError),
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Required field '{0}' is missing")]
    MissingField(String),

    #[error("Amount for '{0}' cannot be negative")]
    NegativeAmount(String),

    #[error("Failed to parse decimal number: {0}")]
    DecimalParse(#[from] rust_decimal::Error),

    #[error("Failed to parse date: {0}")]
    DateParse(#[from] chrono::ParseError),
}

/// Failures reported by a [`DataStore`](crate::store::DataStore) implementation.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum StoreError {
    #[error("Record not found: {0}")]
    NotFound(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Request rejected ({status}): {message}")]
    Rejected { status: u16, message: String },

    #[error("Malformed record: {0}")]
    Serialization(String),

    #[error("Internal store error: {0}")]
    Internal(String),
}

/// Failures reported by an [`AuthProvider`](crate::auth::AuthProvider).
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AuthError {
    #[error("Invalid login credentials")]
    InvalidCredentials,

    #[error("User already registered")]
    AlreadyRegistered,

    #[error("You must be signed in to do that")]
    NotSignedIn,

    #[error("{0}")]
    Provider(String),
}

impl Error {
    /// The single human-readable message shown next to a form or logged.
    pub fn user_message(&self) -> String {
        match self {
            Error::Validation(e) => e.to_string(),
            Error::Auth(e) => e.to_string(),
            Error::Store(StoreError::NotFound(_)) => "That record no longer exists".to_string(),
            Error::Store(StoreError::Network(_)) => {
                "Could not reach the server. Check your connection and try again".to_string()
            }
            Error::Store(StoreError::Rejected { message, .. }) => message.clone(),
            Error::Store(e) => e.to_string(),
        }
    }

    pub fn invalid_input(message: impl Into<String>) -> Self {
        Error::Validation(ValidationError::InvalidInput(message.into()))
    }

    pub fn is_not_signed_in(&self) -> bool {
        matches!(self, Error::Auth(AuthError::NotSignedIn))
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Store(StoreError::Serialization(err.to_string()))
    }
}

impl From<rust_decimal::Error> for Error {
    fn from(err: rust_decimal::Error) -> Self {
        Error::Validation(ValidationError::DecimalParse(err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_message_hides_transport_details() {
        let err = Error::Store(StoreError::Network("dns lookup failed for db.local".into()));
        assert!(!err.user_message().contains("dns"));

        let err = Error::Store(StoreError::Rejected {
            status: 409,
            message: "duplicate key value".into(),
        });
        assert_eq!(err.user_message(), "duplicate key value");
    }

    #[test]
    fn auth_messages_are_readable() {
        let err: Error = AuthError::InvalidCredentials.into();
        assert_eq!(err.user_message(), "Invalid login credentials");
        assert!(Error::from(AuthError::NotSignedIn).is_not_signed_in());
    }
}

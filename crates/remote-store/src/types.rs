//! Request and response bodies of the auth API.

use chrono::{DateTime, Utc};
use gigledger_core::auth::{AuthSession, User};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize)]
pub struct PasswordGrantRequest<'a> {
    pub email: &'a str,
    pub password: &'a str,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UserMetadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SignUpRequest<'a> {
    pub email: &'a str,
    pub password: &'a str,
    pub data: UserMetadata,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RemoteUser {
    pub id: String,
    #[serde(default)]
    pub email: Option<String>,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub user_metadata: UserMetadata,
}

impl From<RemoteUser> for User {
    fn from(user: RemoteUser) -> Self {
        User {
            id: user.id,
            email: user.email.unwrap_or_default(),
            full_name: user.user_metadata.full_name,
            created_at: user.created_at,
        }
    }
}

/// Token response of sign-in, and of sign-up when no confirmation is required.
#[derive(Debug, Clone, Deserialize)]
pub struct SessionResponse {
    pub access_token: String,
    pub user: RemoteUser,
}

impl From<SessionResponse> for AuthSession {
    fn from(session: SessionResponse) -> Self {
        AuthSession {
            access_token: session.access_token,
            user: session.user.into(),
        }
    }
}

/// Error body; the auth and data APIs use different field names.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ApiErrorResponse {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub msg: Option<String>,
    #[serde(default)]
    pub error_description: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

impl ApiErrorResponse {
    pub fn into_message(self) -> Option<String> {
        self.error_description
            .or(self.msg)
            .or(self.message)
            .or(self.error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn session_maps_to_domain_user() {
        let session: SessionResponse = serde_json::from_value(json!({
            "access_token": "jwt",
            "token_type": "bearer",
            "user": {
                "id": "8d3c",
                "email": "alex@example.com",
                "created_at": "2024-11-01T10:00:00Z",
                "user_metadata": {"full_name": "Alex Rivera"}
            }
        }))
        .unwrap();
        let session: AuthSession = session.into();
        assert_eq!(session.access_token, "jwt");
        assert_eq!(session.user.first_name(), "Alex");
    }

    #[test]
    fn error_message_precedence() {
        let body: ApiErrorResponse = serde_json::from_value(json!({
            "error": "invalid_grant",
            "error_description": "Invalid login credentials"
        }))
        .unwrap();
        assert_eq!(body.into_message().as_deref(), Some("Invalid login credentials"));

        let body: ApiErrorResponse =
            serde_json::from_value(json!({"code": 400, "msg": "User already registered"})).unwrap();
        assert_eq!(body.into_message().as_deref(), Some("User already registered"));
    }
}

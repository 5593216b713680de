use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub email: String,
    #[serde(default)]
    pub full_name: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl User {
    /// Name used in greetings: first word of the full name, else "User".
    pub fn first_name(&self) -> &str {
        self.full_name
            .as_deref()
            .and_then(|name| name.split_whitespace().next())
            .unwrap_or("User")
    }

    /// Single avatar letter: first letter of the name, else of the email.
    pub fn avatar_letter(&self) -> char {
        self.full_name
            .as_deref()
            .and_then(|name| name.trim().chars().next())
            .or_else(|| self.email.chars().next().map(|c| c.to_ascii_uppercase()))
            .unwrap_or('U')
    }
}

/// Signed-in session handed out by an auth provider
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthSession {
    pub access_token: String,
    pub user: User,
}

/// Extra profile data collected at sign-up
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignUpProfile {
    #[serde(default)]
    pub full_name: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(full_name: Option<&str>) -> User {
        User {
            id: "u".into(),
            email: "alex.rivera@email.com".into(),
            full_name: full_name.map(str::to_string),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn greeting_name() {
        assert_eq!(user(Some("Alex Rivera")).first_name(), "Alex");
        assert_eq!(user(Some("   ")).first_name(), "User");
        assert_eq!(user(None).first_name(), "User");
    }

    #[test]
    fn avatar_letter_prefers_name() {
        assert_eq!(user(Some("alex")).avatar_letter(), 'a');
        assert_eq!(user(None).avatar_letter(), 'A');
    }
}

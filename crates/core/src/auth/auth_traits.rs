use async_trait::async_trait;

use super::auth_model::{SignUpProfile, User};
use crate::errors::{AuthError, Result};

/// Authentication collaborator.
///
/// Holds at most one signed-in user at a time. Failures carry a
/// human-readable message (see [`AuthError`]).
#[async_trait]
pub trait AuthProvider: Send + Sync {
    fn current_user(&self) -> Option<User>;
    async fn sign_in(&self, email: &str, password: &str) -> Result<User>;
    async fn sign_up(&self, email: &str, password: &str, profile: SignUpProfile) -> Result<User>;
    async fn sign_out(&self) -> Result<()>;
}

/// The signed-in user, or [`AuthError::NotSignedIn`].
pub fn require_user(auth: &dyn AuthProvider) -> Result<User> {
    auth.current_user().ok_or_else(|| AuthError::NotSignedIn.into())
}

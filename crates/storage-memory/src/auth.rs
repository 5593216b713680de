use argon2::{
    password_hash::{Error as PasswordHashError, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use async_trait::async_trait;
use chrono::Utc;
use log::{debug, info};
use rand::rngs::OsRng;
use std::collections::HashMap;
use std::sync::RwLock;
use uuid::Uuid;

use gigledger_core::auth::{AuthProvider, SignUpProfile, User};
use gigledger_core::errors::{AuthError, Result};

struct Account {
    user: User,
    password_hash: String,
}

/// Accounts keyed by lowercased email; one signed-in user at a time.
#[derive(Default)]
pub struct MemoryAuth {
    accounts: RwLock<HashMap<String, Account>>,
    current: RwLock<Option<User>>,
}

impl MemoryAuth {
    pub fn new() -> Self {
        Self::default()
    }

    fn set_current(&self, user: Option<User>) {
        *self
            .current
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = user;
    }
}

fn hash_password(password: &str) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| AuthError::Provider(format!("Password hashing failed: {e}")).into())
}

fn verify_password(candidate: &str, password_hash: &str) -> Result<()> {
    let parsed = PasswordHash::new(password_hash)
        .map_err(|e| AuthError::Provider(format!("Invalid stored password hash: {e}")))?;
    Argon2::default()
        .verify_password(candidate.as_bytes(), &parsed)
        .map_err(|err| match err {
            PasswordHashError::Password => AuthError::InvalidCredentials.into(),
            other => AuthError::Provider(format!("Password verification failed: {other}")).into(),
        })
}

fn email_key(email: &str) -> String {
    email.trim().to_lowercase()
}

#[async_trait]
impl AuthProvider for MemoryAuth {
    fn current_user(&self) -> Option<User> {
        self.current
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    async fn sign_in(&self, email: &str, password: &str) -> Result<User> {
        let user = {
            let accounts = self
                .accounts
                .read()
                .unwrap_or_else(|poisoned| poisoned.into_inner());
            let account = accounts
                .get(&email_key(email))
                .ok_or(AuthError::InvalidCredentials)?;
            verify_password(password, &account.password_hash)?;
            account.user.clone()
        };
        info!("User {} signed in", user.id);
        self.set_current(Some(user.clone()));
        Ok(user)
    }

    async fn sign_up(&self, email: &str, password: &str, profile: SignUpProfile) -> Result<User> {
        let key = email_key(email);
        let password_hash = hash_password(password)?;
        let user = User {
            id: Uuid::new_v4().to_string(),
            email: key.clone(),
            full_name: profile
                .full_name
                .map(|name| name.trim().to_string())
                .filter(|name| !name.is_empty()),
            created_at: Utc::now(),
        };

        {
            let mut accounts = self
                .accounts
                .write()
                .unwrap_or_else(|poisoned| poisoned.into_inner());
            if accounts.contains_key(&key) {
                return Err(AuthError::AlreadyRegistered.into());
            }
            accounts.insert(
                key,
                Account {
                    user: user.clone(),
                    password_hash,
                },
            );
        }
        debug!("Registered user {}", user.id);
        self.set_current(Some(user.clone()));
        Ok(user)
    }

    async fn sign_out(&self) -> Result<()> {
        self.set_current(None);
        Ok(())
    }
}

//! HTTP client for the hosted backend.

use async_trait::async_trait;
use log::{debug, error, warn};
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use serde_json::Value;
use std::sync::RwLock;
use std::time::Duration;

use gigledger_core::auth::{AuthProvider, AuthSession, SignUpProfile, User};
use gigledger_core::errors::{AuthError, Error as CoreError, Result as CoreResult};
use gigledger_core::store::{Collection, DataStore, ListQuery};

use crate::error::{RemoteStoreError, Result};
use crate::types::{
    ApiErrorResponse, PasswordGrantRequest, SessionResponse, SignUpRequest, UserMetadata,
};
use crate::wire::{from_wire, list_url, row_url, table_url, to_wire};

/// Default timeout for API requests.
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Client for the data and auth APIs of one project.
///
/// Holds the signed-in session; data requests carry its access token, or the
/// anonymous API key when nobody is signed in.
pub struct RemoteClient {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
    session: RwLock<Option<AuthSession>>,
}

impl RemoteClient {
    /// # Arguments
    ///
    /// * `base_url` - Project URL, e.g. "https://abc.example.co"
    /// * `api_key` - Public (anon) API key of the project
    pub fn new(base_url: &str, api_key: &str) -> Result<Self> {
        Self::with_timeout(base_url, api_key, Duration::from_secs(DEFAULT_TIMEOUT_SECS))
    }

    pub fn with_timeout(base_url: &str, api_key: &str, timeout: Duration) -> Result<Self> {
        if api_key.trim().is_empty() {
            return Err(RemoteStoreError::invalid_request("API key must not be empty"));
        }
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
            session: RwLock::new(None),
        })
    }

    fn access_token(&self) -> Option<String> {
        self.session
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .as_ref()
            .map(|s| s.access_token.clone())
    }

    fn set_session(&self, session: Option<AuthSession>) {
        *self
            .session
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = session;
    }

    /// Create headers for an API request.
    fn headers(&self) -> Result<HeaderMap> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let api_key = HeaderValue::from_str(&self.api_key)
            .map_err(|_| RemoteStoreError::auth("Invalid API key format"))?;
        headers.insert("apikey", api_key);

        let token = self.access_token().unwrap_or_else(|| self.api_key.clone());
        let auth_value = HeaderValue::from_str(&format!("Bearer {}", token))
            .map_err(|_| RemoteStoreError::auth("Invalid access token format"))?;
        headers.insert(AUTHORIZATION, auth_value);
        Ok(headers)
    }

    /// Headers for writes that should echo the stored rows back.
    fn representation_headers(&self) -> Result<HeaderMap> {
        let mut headers = self.headers()?;
        headers.insert("Prefer", HeaderValue::from_static("return=representation"));
        Ok(headers)
    }

    /// Parse a JSON response body.
    async fn parse_response<T: serde::de::DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T> {
        let status = response.status();
        let body = response.text().await?;
        debug!("API response ({}): {}", status, body);

        if !status.is_success() {
            let message = serde_json::from_str::<ApiErrorResponse>(&body)
                .ok()
                .and_then(ApiErrorResponse::into_message)
                .unwrap_or_else(|| format!("Request failed: {}", body));
            return Err(RemoteStoreError::api(status.as_u16(), message));
        }

        serde_json::from_str(&body).map_err(|e| {
            error!("Failed to deserialize response. Body: {}, Error: {}", body, e);
            RemoteStoreError::api(status.as_u16(), format!("Failed to parse response: {}", e))
        })
    }

    /// First row of a representation response; none means no row matched.
    fn single_row(rows: Vec<Value>, collection: Collection, id: &str) -> Result<Value> {
        rows.into_iter()
            .next()
            .map(from_wire)
            .ok_or_else(|| RemoteStoreError::api(404, format!("{} {} not found", collection, id)))
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Data API
    // ─────────────────────────────────────────────────────────────────────────

    /// GET /rest/v1/{table}?select=*&...
    pub async fn select(&self, collection: Collection, query: &ListQuery) -> Result<Vec<Value>> {
        let url = list_url(&self.base_url, collection, query);
        debug!("select URL: {}", url);

        let response = self.client.get(&url).headers(self.headers()?).send().await?;
        let rows: Vec<Value> = Self::parse_response(response).await?;
        Ok(rows.into_iter().map(from_wire).collect())
    }

    /// POST /rest/v1/{table}
    pub async fn insert(&self, collection: Collection, record: Value) -> Result<Value> {
        let url = table_url(&self.base_url, collection);
        let mut row = to_wire(record);
        // The backend generates ids; an empty one would be stored verbatim.
        if let Some(map) = row.as_object_mut() {
            if map.get("id").and_then(Value::as_str).is_some_and(str::is_empty) {
                map.remove("id");
            }
        }

        let response = self
            .client
            .post(&url)
            .headers(self.representation_headers()?)
            .json(&row)
            .send()
            .await?;
        let rows: Vec<Value> = Self::parse_response(response).await?;
        Self::single_row(rows, collection, "new")
    }

    /// PATCH /rest/v1/{table}?id=eq.{id}
    pub async fn patch(&self, collection: Collection, id: &str, patch: Value) -> Result<Value> {
        let url = row_url(&self.base_url, collection, id);
        let response = self
            .client
            .patch(&url)
            .headers(self.representation_headers()?)
            .json(&to_wire(patch))
            .send()
            .await?;
        let rows: Vec<Value> = Self::parse_response(response).await?;
        Self::single_row(rows, collection, id)
    }

    /// DELETE /rest/v1/{table}?id=eq.{id}
    pub async fn remove(&self, collection: Collection, id: &str) -> Result<()> {
        let url = row_url(&self.base_url, collection, id);
        let response = self
            .client
            .delete(&url)
            .headers(self.representation_headers()?)
            .send()
            .await?;
        let rows: Vec<Value> = Self::parse_response(response).await?;
        Self::single_row(rows, collection, id).map(|_| ())
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Auth API
    // ─────────────────────────────────────────────────────────────────────────

    /// POST /auth/v1/token?grant_type=password
    pub async fn password_grant(&self, email: &str, password: &str) -> Result<AuthSession> {
        let url = format!("{}/auth/v1/token?grant_type=password", self.base_url);
        let response = self
            .client
            .post(&url)
            .headers(self.headers()?)
            .json(&PasswordGrantRequest { email, password })
            .send()
            .await?;
        let session: SessionResponse = Self::parse_response(response).await?;
        Ok(session.into())
    }

    /// POST /auth/v1/signup
    pub async fn register(
        &self,
        email: &str,
        password: &str,
        profile: SignUpProfile,
    ) -> Result<AuthSession> {
        let url = format!("{}/auth/v1/signup", self.base_url);
        let body = SignUpRequest {
            email,
            password,
            data: UserMetadata {
                full_name: profile.full_name,
            },
        };
        let response = self
            .client
            .post(&url)
            .headers(self.headers()?)
            .json(&body)
            .send()
            .await?;
        let value: Value = Self::parse_response(response).await?;
        if value.get("access_token").is_none() {
            return Err(RemoteStoreError::auth(
                "Check your email to confirm your account, then sign in",
            ));
        }
        let session: SessionResponse = serde_json::from_value(value)?;
        Ok(session.into())
    }

    /// POST /auth/v1/logout
    pub async fn logout(&self) -> Result<()> {
        if self.access_token().is_none() {
            return Ok(());
        }
        let url = format!("{}/auth/v1/logout", self.base_url);
        let response = self.client.post(&url).headers(self.headers()?).send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(RemoteStoreError::api(status.as_u16(), body));
        }
        Ok(())
    }
}

/// Auth API failures carry the backend's message; a few are well known.
fn auth_error(err: RemoteStoreError) -> CoreError {
    match err {
        RemoteStoreError::Api { status, message } if (400..500).contains(&status) => {
            let lower = message.to_lowercase();
            if lower.contains("invalid login credentials") {
                AuthError::InvalidCredentials.into()
            } else if lower.contains("already registered") {
                AuthError::AlreadyRegistered.into()
            } else {
                AuthError::Provider(message).into()
            }
        }
        other => other.into(),
    }
}

#[async_trait]
impl DataStore for RemoteClient {
    async fn list(&self, collection: Collection, query: ListQuery) -> CoreResult<Vec<Value>> {
        Ok(self.select(collection, &query).await?)
    }

    async fn create(&self, collection: Collection, record: Value) -> CoreResult<Value> {
        if !record.is_object() {
            return Err(RemoteStoreError::invalid_request("records must be JSON objects").into());
        }
        Ok(self.insert(collection, record).await?)
    }

    async fn update(&self, collection: Collection, id: &str, patch: Value) -> CoreResult<Value> {
        Ok(self.patch(collection, id, patch).await?)
    }

    async fn delete(&self, collection: Collection, id: &str) -> CoreResult<()> {
        Ok(self.remove(collection, id).await?)
    }
}

#[async_trait]
impl AuthProvider for RemoteClient {
    fn current_user(&self) -> Option<User> {
        self.session
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .as_ref()
            .map(|s| s.user.clone())
    }

    async fn sign_in(&self, email: &str, password: &str) -> CoreResult<User> {
        let session = self.password_grant(email, password).await.map_err(auth_error)?;
        let user = session.user.clone();
        self.set_session(Some(session));
        Ok(user)
    }

    async fn sign_up(&self, email: &str, password: &str, profile: SignUpProfile) -> CoreResult<User> {
        let session = self
            .register(email, password, profile)
            .await
            .map_err(auth_error)?;
        let user = session.user.clone();
        self.set_session(Some(session));
        Ok(user)
    }

    async fn sign_out(&self) -> CoreResult<()> {
        let result = self.logout().await;
        // The local session ends even when the backend call fails.
        self.set_session(None);
        if let Err(e) = result {
            warn!("Remote sign out failed: {}", e);
            return Err(auth_error(e));
        }
        Ok(())
    }
}

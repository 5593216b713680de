use std::sync::Arc;

use tokio::sync::Mutex;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

use gigledger_core::auth::AuthProvider;
use gigledger_core::store::DataStore;
use gigledger_core::{AppContext, SessionGuard};
use gigledger_remote_store::RemoteClient;
use gigledger_storage_memory::{MemoryAuth, MemoryStore};

use crate::config::Config;

pub struct AppState {
    pub ctx: AppContext,
    /// The signed-in session. One user at a time per server process.
    pub session: Mutex<Option<SessionGuard>>,
}

impl AppState {
    pub fn new(ctx: AppContext) -> Self {
        Self {
            ctx,
            session: Mutex::new(None),
        }
    }

    pub async fn is_signed_in(&self) -> bool {
        self.session.lock().await.is_some()
    }
}

pub fn init_tracing() {
    let log_format = std::env::var("GL_LOG_FORMAT").unwrap_or_else(|_| "json".to_string());
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(filter);

    if log_format.eq_ignore_ascii_case("json") {
        registry
            .with(fmt::layer().json().with_current_span(false))
            .init();
    } else {
        registry
            .with(fmt::layer().with_target(true).with_line_number(true))
            .init();
    }
}

pub async fn build_state(config: &Config) -> anyhow::Result<Arc<AppState>> {
    let (store, auth): (Arc<dyn DataStore>, Arc<dyn AuthProvider>) = match &config.remote_store
    {
        Some(remote) => {
            tracing::info!("Using remote store at {}", remote.url);
            let client = Arc::new(RemoteClient::new(&remote.url, &remote.api_key)?);
            let store: Arc<dyn DataStore> = client.clone();
            let auth: Arc<dyn AuthProvider> = client;
            (store, auth)
        }
        None => {
            tracing::info!("Using in-memory store; records are lost on restart");
            let store: Arc<dyn DataStore> = Arc::new(MemoryStore::new());
            let auth: Arc<dyn AuthProvider> = Arc::new(MemoryAuth::new());
            (store, auth)
        }
    };

    let ctx = AppContext::new(store, auth, config.display);
    Ok(Arc::new(AppState::new(ctx)))
}

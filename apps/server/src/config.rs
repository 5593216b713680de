use std::net::SocketAddr;
use std::str::FromStr;
use std::time::Duration;

use gigledger_core::formatters::{Currency, DisplaySettings, Locale};

/// Connection details of the hosted backend.
#[derive(Debug, Clone)]
pub struct RemoteStoreConfig {
    pub url: String,
    pub api_key: String,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub listen_addr: SocketAddr,
    pub cors_allow_origins: Vec<String>,
    pub request_timeout: Duration,
    pub static_dir: String,
    /// `None` keeps every record in memory for the life of the process.
    pub remote_store: Option<RemoteStoreConfig>,
    pub display: DisplaySettings,
}

impl Config {
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let listen_addr = std::env::var("GL_LISTEN_ADDR")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or_else(|| SocketAddr::from(([0, 0, 0, 0], 8080)));

        let cors_allow_origins = std::env::var("GL_CORS_ALLOW_ORIGINS")
            .unwrap_or_else(|_| "*".to_string())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout = std::env::var("GL_REQUEST_TIMEOUT_MS")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .map(Duration::from_millis)
            .unwrap_or_else(|| Duration::from_secs(30));

        let static_dir = std::env::var("GL_STATIC_DIR").unwrap_or_else(|_| "dist".to_string());

        let remote_store = match (
            non_empty_var("GL_STORE_URL"),
            non_empty_var("GL_STORE_API_KEY"),
        ) {
            (Some(url), Some(api_key)) => Some(RemoteStoreConfig { url, api_key }),
            (Some(_), None) | (None, Some(_)) => {
                tracing::warn!(
                    "GL_STORE_URL and GL_STORE_API_KEY must both be set; using the in-memory store"
                );
                None
            }
            (None, None) => None,
        };

        let display = DisplaySettings {
            locale: parse_or_default::<Locale>("GL_LOCALE"),
            currency: parse_or_default::<Currency>("GL_CURRENCY"),
        };

        Self {
            listen_addr,
            cors_allow_origins,
            request_timeout,
            static_dir,
            remote_store,
            display,
        }
    }
}

fn non_empty_var(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn parse_or_default<T: FromStr + Default>(key: &str) -> T {
    match non_empty_var(key) {
        Some(raw) => T::from_str(&raw).unwrap_or_else(|_| {
            tracing::warn!("Ignoring unsupported {}={}", key, raw);
            T::default()
        }),
        None => T::default(),
    }
}

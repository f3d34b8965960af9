//! Environment Configuration
//!
//! Read once at startup. The service-role key is the only optional
//! credential: without it the server runs, but invites answer 500 until it
//! is configured.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::Context;

#[derive(Debug, Clone)]
pub struct Config {
    pub bind_addr: String,
    pub db_path: PathBuf,
    pub provider_url: String,
    pub anon_key: String,
    pub service_role_key: Option<String>,
    pub provider_timeout: Duration,
    /// Upper bound on the privileged email lookup (single-page scan)
    pub lookup_page_size: u32,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        let provider_url =
            std::env::var("IDENTITY_PROVIDER_URL").context("IDENTITY_PROVIDER_URL is required")?;
        let anon_key =
            std::env::var("IDENTITY_ANON_KEY").context("IDENTITY_ANON_KEY is required")?;
        let service_role_key = std::env::var("IDENTITY_SERVICE_ROLE_KEY")
            .ok()
            .filter(|key| !key.is_empty());

        let timeout_secs = std::env::var("IDENTITY_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(10);
        let lookup_page_size = std::env::var("IDENTITY_LOOKUP_PAGE_SIZE")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(100);

        Ok(Self {
            bind_addr: std::env::var("LISTSHARE_BIND")
                .unwrap_or_else(|_| "127.0.0.1:8080".to_string()),
            db_path: std::env::var("LISTSHARE_DB")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("listshare.db")),
            provider_url,
            anon_key,
            service_role_key,
            provider_timeout: Duration::from_secs(timeout_secs),
            lookup_page_size,
        })
    }
}

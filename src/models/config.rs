//! Configuration model loaded from external sources.

use std::time::Duration;

use serde::Deserialize;

use crate::fallback::FallbackMode;

/// Backend used when neither the config files nor `BACKEND_URL` name one.
pub const DEFAULT_BACKEND_URL: &str = "http://localhost:8000";

#[derive(Clone, Debug, Deserialize)]
/// Settings of the gateway proxy.
pub struct ServerConfig {
    pub address: String,
    pub port: u16,
    /// Origin of the complaints backend, without the `/api/v1` prefix.
    #[serde(default = "default_backend_url")]
    pub backend_url: String,
    /// Upper bound for a single proxied request.
    #[serde(default = "default_request_timeout_ms")]
    pub request_timeout_ms: u64,
    /// Upper bound for the `/api/backend-status` health check.
    #[serde(default = "default_status_timeout_ms")]
    pub status_timeout_ms: u64,
    #[serde(default)]
    pub fallback: FallbackMode,
}

impl ServerConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }

    pub fn status_timeout(&self) -> Duration {
        Duration::from_millis(self.status_timeout_ms)
    }
}

fn default_backend_url() -> String {
    DEFAULT_BACKEND_URL.to_string()
}

fn default_request_timeout_ms() -> u64 {
    10_000
}

fn default_status_timeout_ms() -> u64 {
    3_000
}

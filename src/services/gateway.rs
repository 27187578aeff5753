//! Forwarding of local `/api/*` calls to the complaints backend.
//!
//! Successful answers are relayed verbatim with their status. Failures are
//! reshaped into [`ServiceError`] so every route answers a `{detail}` body.

use std::sync::Arc;
use std::time::{Duration, Instant};

use reqwest::{Client, Method};
use serde::Serialize;
use serde_json::Value;

use crate::client::{ApiError, paths};
use crate::domain::job::{BackendStatus, StatusSource};
use crate::domain::statistics::StatisticsSnapshot;
use crate::dto::errors::extract_detail;
use crate::fallback::FallbackSource;
use crate::models::config::ServerConfig;
use crate::services::{ServiceError, ServiceResult};

/// Backend answer passed through to the caller.
#[derive(Clone, Debug, PartialEq)]
pub struct Relayed {
    pub status: u16,
    pub body: Value,
}

/// Payload of `/api/backend-status`.
#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct StatusReport {
    #[serde(flatten)]
    pub status: BackendStatus,
    /// Placeholder statistics, only when offline with a configured fallback.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub statistiques: Option<StatisticsSnapshot>,
}

pub struct Gateway {
    http: Client,
    backend_url: String,
    status_timeout: Duration,
    fallback: Arc<dyn FallbackSource>,
}

impl Gateway {
    pub fn new(config: &ServerConfig) -> ServiceResult<Self> {
        let http = Client::builder()
            .timeout(config.request_timeout())
            .build()
            .map_err(ApiError::from)?;
        Ok(Self {
            http,
            backend_url: config.backend_url.trim_end_matches('/').to_string(),
            status_timeout: config.status_timeout(),
            fallback: config.fallback.source(),
        })
    }

    /// Absolute backend URL for a resource path and a raw query string.
    pub fn backend_url(&self, path: &str, raw_query: &str) -> String {
        let mut url = format!("{}{}{}", self.backend_url, paths::BACKEND_PREFIX, path);
        if !raw_query.is_empty() {
            url.push('?');
            url.push_str(raw_query);
        }
        url
    }

    /// Forwards one call and returns the backend JSON with its status.
    pub async fn relay(
        &self,
        method: Method,
        path: &str,
        raw_query: &str,
        body: Option<Vec<u8>>,
    ) -> ServiceResult<Relayed> {
        let url = self.backend_url(path, raw_query);
        log::debug!("Relaying {method} {url}");

        let mut request = self.http.request(method.clone(), &url);
        if let Some(body) = body {
            request = request
                .header(reqwest::header::CONTENT_TYPE, "application/json")
                .body(body);
        }

        let response = request.send().await.map_err(|err| {
            log::error!("Backend unreachable for {method} {url}: {err}");
            ApiError::Network(err.to_string())
        })?;
        let status = response.status();
        let bytes = response
            .bytes()
            .await
            .map_err(|err| ApiError::Network(err.to_string()))?;

        if !status.is_success() {
            return Err(ServiceError::Upstream(ApiError::Backend {
                status: status.as_u16(),
                detail: extract_detail(status.as_u16(), &bytes),
            }));
        }

        let body = if bytes.iter().all(u8::is_ascii_whitespace) {
            Value::Object(Default::default())
        } else {
            serde_json::from_slice(&bytes).map_err(|err| {
                log::error!("Backend answered {method} {url} with invalid JSON: {err}");
                ApiError::Decode(err.to_string())
            })?
        };

        Ok(Relayed {
            status: status.as_u16(),
            body,
        })
    }

    /// Probes the backend health endpoint, waiting at most the status timeout.
    pub async fn backend_status(&self) -> StatusReport {
        let url = format!("{}{}", self.backend_url, paths::HEALTH);
        let started = Instant::now();
        let check = self.http.get(&url).send();

        let failure = match tokio::time::timeout(self.status_timeout, check).await {
            Ok(Ok(response)) if response.status().is_success() => {
                return StatusReport {
                    status: BackendStatus {
                        online: true,
                        latency_ms: Some(started.elapsed().as_millis() as u64),
                        source: StatusSource::Live,
                    },
                    statistiques: None,
                };
            }
            Ok(Ok(response)) => format!("health check answered {}", response.status()),
            Ok(Err(err)) => err.to_string(),
            Err(_) => format!("no answer within {:?}", self.status_timeout),
        };

        log::warn!("Backend offline ({failure}), using {} fallback", self.fallback.name());
        let statistiques = (self.fallback.name() != "none").then(|| self.fallback.statistics());
        StatusReport {
            status: BackendStatus {
                online: false,
                latency_ms: None,
                source: StatusSource::Fallback,
            },
            statistiques,
        }
    }
}

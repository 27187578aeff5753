//! Typed client for the complaints backend.
//!
//! [`DashboardBackend`] lists one method per backend capability; the store
//! only talks to this trait so tests can substitute scripted backends.
//! [`ApiClient`] is the reqwest implementation and owns URL construction,
//! query encoding and response reshaping.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Method, Response};
use serde::Deserialize;
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::domain::complaint::{Complaint, ComplaintPage, ComplaintScope, NewComplaint};
use crate::domain::filters::{FilterSelection, FilterVocabulary};
use crate::domain::job::{JobKind, JobSummary};
use crate::domain::statistics::{StatisticsSnapshot, TrendSeries};
use crate::domain::suggestion::SuggestionSnapshot;
use crate::domain::types::{ComplaintId, OrganisationId};
use crate::dto::errors::extract_detail;
use crate::dto::filters::FiltersEnvelope;
use crate::dto::statistics::{StatisticsResponse, TrendResponse};
use crate::dto::suggestions::SuggestionsResponse;

pub mod errors;
#[cfg(feature = "test-mocks")]
pub mod mock;
pub mod query;

pub use errors::{ApiError, ApiResult};
pub use query::QueryParams;

/// Resource paths shared by the backend (`/api/v1` prefix) and the proxy (`/api` prefix).
pub mod paths {
    pub const BACKEND_PREFIX: &str = "/api/v1";
    pub const PROXY_PREFIX: &str = "/api";

    pub const STATISTICS: &str = "/dashboard/statistiques";
    pub const AVAILABLE_FILTERS: &str = "/dashboard/filtres-disponibles";
    pub const COMPLAINTS: &str = "/plaintes";
    pub const SUGGESTIONS_BY_SERVICE: &str = "/suggestions/par-service";
    pub const PROCESS_SERVICE: &str = "/process-service";
    pub const PROCESS_FILES: &str = "/process-files";
    pub const TRENDS: &str = "/statistiques/tendances";
    /// Health check, served outside the versioned prefix.
    pub const HEALTH: &str = "/health";
}

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Every backend capability the dashboard relies on.
#[async_trait]
pub trait DashboardBackend: Send + Sync {
    async fn list_complaints(
        &self,
        filters: &FilterSelection,
        page: u32,
        limit: u32,
    ) -> ApiResult<ComplaintPage>;

    async fn list_complaints_by_scope(
        &self,
        scope: ComplaintScope,
        page: u32,
        limit: u32,
    ) -> ApiResult<ComplaintPage>;

    async fn get_complaint(&self, id: ComplaintId) -> ApiResult<Complaint>;

    async fn get_statistics(&self, filters: &FilterSelection) -> ApiResult<StatisticsSnapshot>;

    async fn get_suggestions_by_service(&self) -> ApiResult<SuggestionSnapshot>;

    async fn create_complaint(&self, payload: &NewComplaint) -> ApiResult<Complaint>;

    async fn get_available_filters(
        &self,
        organisation_id: OrganisationId,
    ) -> ApiResult<FilterVocabulary>;

    async fn get_trends(&self, periode: &str) -> ApiResult<TrendSeries>;

    async fn run_job(&self, job: JobKind) -> ApiResult<JobSummary>;
}

/// Create endpoint answers either the bare complaint or `{plainte: ...}`.
#[derive(Deserialize)]
#[serde(untagged)]
enum CreatedComplaint {
    Wrapped { plainte: Complaint },
    Bare(Complaint),
}

/// reqwest-backed [`DashboardBackend`].
#[derive(Clone, Debug)]
pub struct ApiClient {
    http: Client,
    base_url: String,
    prefix: &'static str,
}

impl ApiClient {
    /// Client talking to the backend directly (`{base_url}/api/v1/...`).
    pub fn new(base_url: &str) -> ApiResult<Self> {
        Self::build(base_url, paths::BACKEND_PREFIX, DEFAULT_TIMEOUT)
    }

    /// Client talking to the gateway proxy (`{proxy_url}/api/...`).
    pub fn via_proxy(proxy_url: &str) -> ApiResult<Self> {
        Self::build(proxy_url, paths::PROXY_PREFIX, DEFAULT_TIMEOUT)
    }

    /// Rebuilds the HTTP client with another per-request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> ApiResult<Self> {
        self.http = Client::builder().timeout(timeout).build()?;
        Ok(self)
    }

    fn build(base_url: &str, prefix: &'static str, timeout: Duration) -> ApiResult<Self> {
        let http = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            prefix,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Full URL for a resource path and its query.
    pub fn url(&self, path: &str, query: &QueryParams) -> ApiResult<String> {
        let mut url = format!("{}{}{}", self.base_url, self.prefix, path);
        if !query.is_empty() {
            url.push('?');
            url.push_str(&query.encode()?);
        }
        Ok(url)
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str, query: QueryParams) -> ApiResult<T> {
        let url = self.url(path, &query)?;
        log::debug!("GET {url}");
        let response = self.http.get(&url).send().await.map_err(|err| {
            log::error!("GET {url} failed: {err}");
            ApiError::from(err)
        })?;
        read_json(response).await
    }

    async fn send_json<T, B>(&self, method: Method, path: &str, body: Option<&B>) -> ApiResult<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let url = self.url(path, &QueryParams::new())?;
        log::debug!("{method} {url}");
        let mut request = self.http.request(method.clone(), &url);
        if let Some(body) = body {
            request = request.json(body);
        }
        let response = request.send().await.map_err(|err| {
            log::error!("{method} {url} failed: {err}");
            ApiError::from(err)
        })?;
        read_json(response).await
    }
}

/// Checks the status and parses the whole body, or fails without a value.
async fn read_json<T: DeserializeOwned>(response: Response) -> ApiResult<T> {
    let status = response.status();
    let body = response.bytes().await.map_err(ApiError::from)?;

    if !status.is_success() {
        let detail = extract_detail(status.as_u16(), &body);
        log::warn!("Backend answered {status}: {detail}");
        return Err(ApiError::Backend {
            status: status.as_u16(),
            detail,
        });
    }

    serde_json::from_slice(&body).map_err(ApiError::from)
}

#[async_trait]
impl DashboardBackend for ApiClient {
    async fn list_complaints(
        &self,
        filters: &FilterSelection,
        page: u32,
        limit: u32,
    ) -> ApiResult<ComplaintPage> {
        let query = QueryParams::new().page(page, limit).filters(filters);
        self.get_json(paths::COMPLAINTS, query).await
    }

    async fn list_complaints_by_scope(
        &self,
        scope: ComplaintScope,
        page: u32,
        limit: u32,
    ) -> ApiResult<ComplaintPage> {
        let path = format!("{}/{}", paths::COMPLAINTS, scope.segment());
        self.get_json(&path, QueryParams::new().page(page, limit))
            .await
    }

    async fn get_complaint(&self, id: ComplaintId) -> ApiResult<Complaint> {
        let path = format!("{}/{}", paths::COMPLAINTS, id);
        self.get_json(&path, QueryParams::new()).await
    }

    async fn get_statistics(&self, filters: &FilterSelection) -> ApiResult<StatisticsSnapshot> {
        let raw: StatisticsResponse = self
            .get_json(paths::STATISTICS, QueryParams::new().filters(filters))
            .await?;
        Ok(raw.into())
    }

    async fn get_suggestions_by_service(&self) -> ApiResult<SuggestionSnapshot> {
        let raw: SuggestionsResponse = self
            .get_json(paths::SUGGESTIONS_BY_SERVICE, QueryParams::new())
            .await?;
        Ok(raw.into())
    }

    async fn create_complaint(&self, payload: &NewComplaint) -> ApiResult<Complaint> {
        let created: CreatedComplaint = self
            .send_json(Method::POST, paths::COMPLAINTS, Some(payload))
            .await?;
        Ok(match created {
            CreatedComplaint::Wrapped { plainte } => plainte,
            CreatedComplaint::Bare(complaint) => complaint,
        })
    }

    async fn get_available_filters(
        &self,
        organisation_id: OrganisationId,
    ) -> ApiResult<FilterVocabulary> {
        let envelope: FiltersEnvelope = self
            .get_json(
                paths::AVAILABLE_FILTERS,
                QueryParams::new().push("organisation_id", organisation_id),
            )
            .await?;
        Ok(envelope.into())
    }

    async fn get_trends(&self, periode: &str) -> ApiResult<TrendSeries> {
        let raw: TrendResponse = self
            .get_json(paths::TRENDS, QueryParams::new().push("periode", periode))
            .await?;
        Ok(raw.into())
    }

    async fn run_job(&self, job: JobKind) -> ApiResult<JobSummary> {
        let path = match job {
            JobKind::ProcessService => paths::PROCESS_SERVICE,
            JobKind::ProcessFiles => paths::PROCESS_FILES,
        };
        self.send_json::<JobSummary, serde_json::Value>(Method::POST, path, None)
            .await
    }
}

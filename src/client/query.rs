//! Query-string construction for backend calls.

use crate::client::errors::{ApiError, ApiResult};
use crate::domain::filters::FilterSelection;

/// Ordered query parameters; blank values are never recorded.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct QueryParams(Vec<(String, String)>);

impl QueryParams {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `key=value` unless the value is blank. Non-blank values are sent
    /// verbatim; trimming belongs to [`FilterSelection::set`].
    #[must_use]
    pub fn push(mut self, key: &str, value: impl ToString) -> Self {
        let value = value.to_string();
        if !value.trim().is_empty() {
            self.0.push((key.to_string(), value));
        }
        self
    }

    #[must_use]
    pub fn push_opt<V: ToString>(self, key: &str, value: Option<V>) -> Self {
        match value {
            Some(value) => self.push(key, value),
            None => self,
        }
    }

    /// Adds every constraining field of the selection plus the tenant.
    #[must_use]
    pub fn filters(self, filters: &FilterSelection) -> Self {
        let query = filters
            .active_fields()
            .fold(self, |query, (field, value)| query.push(field.as_str(), value));
        query.push("organisation_id", filters.organisation_id)
    }

    #[must_use]
    pub fn page(self, page: u32, limit: u32) -> Self {
        self.push("page", page.max(1)).push("limit", limit.max(1))
    }

    pub fn pairs(&self) -> &[(String, String)] {
        &self.0
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// URL-encodes the parameters, without the leading `?`.
    pub fn encode(&self) -> ApiResult<String> {
        serde_html_form::to_string(&self.0).map_err(|e| ApiError::InvalidRequest(e.to_string()))
    }

    /// Parses a raw query string; blank values are dropped like in [`QueryParams::push`].
    pub fn parse(raw: &str) -> ApiResult<Self> {
        let pairs: Vec<(String, String)> =
            serde_html_form::from_str(raw).map_err(|e| ApiError::InvalidRequest(e.to_string()))?;
        Ok(pairs
            .into_iter()
            .fold(Self::new(), |query, (key, value)| query.push(&key, value)))
    }
}

use thiserror::Error;

/// Failure of a call to the complaints backend.
///
/// A call either yields a fully parsed value or one of these; partial
/// results are never returned.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// Backend unreachable or the request timed out.
    #[error("connection error: {0}")]
    Network(String),

    /// Backend answered with a non-2xx status.
    #[error("backend error ({status}): {detail}")]
    Backend { status: u16, detail: String },

    /// Backend answered 2xx with a body that does not match the expected shape.
    #[error("invalid backend response: {0}")]
    Decode(String),

    /// The request could not be built from the given parameters.
    #[error("invalid request: {0}")]
    InvalidRequest(String),
}

pub type ApiResult<T> = Result<T, ApiError>;

impl ApiError {
    /// HTTP status reported by the backend, when it answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Backend { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Message suitable for a user-facing notification.
    pub fn detail(&self) -> &str {
        match self {
            ApiError::Network(_) => crate::dto::errors::CONNECTION_ERROR_DETAIL,
            ApiError::Backend { detail, .. } => detail,
            ApiError::Decode(detail) | ApiError::InvalidRequest(detail) => detail,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            ApiError::Decode(err.to_string())
        } else if err.is_builder() {
            ApiError::InvalidRequest(err.to_string())
        } else {
            ApiError::Network(err.to_string())
        }
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        ApiError::Decode(err.to_string())
    }
}

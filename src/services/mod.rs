//! Gateway-side services and their error type.

use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use thiserror::Error;

use crate::client::ApiError;
use crate::domain::types::TypeConstraintError;
use crate::dto::errors::ErrorBody;
use crate::forms::FormError;

pub mod gateway;

/// Errors surfaced by the proxy routes.
///
/// Every variant renders as a JSON `{detail}` body.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// The backend call failed or answered non-2xx.
    #[error(transparent)]
    Upstream(#[from] ApiError),

    #[error(transparent)]
    Form(#[from] FormError),

    #[error("invalid identifier: {0}")]
    InvalidId(#[from] TypeConstraintError),

    /// Request body or path could not be extracted.
    #[error("{0}")]
    BadRequest(String),

    #[error("not found")]
    NotFound,
}

pub type ServiceResult<T> = Result<T, ServiceError>;

impl ServiceError {
    /// Message placed in the `detail` field.
    pub fn detail(&self) -> String {
        match self {
            ServiceError::Upstream(err) => err.detail().to_string(),
            other => other.to_string(),
        }
    }
}

impl ResponseError for ServiceError {
    fn status_code(&self) -> StatusCode {
        match self {
            ServiceError::Upstream(ApiError::Backend { status, .. }) => {
                StatusCode::from_u16(*status).unwrap_or(StatusCode::BAD_GATEWAY)
            }
            ServiceError::Upstream(ApiError::Network(_)) => StatusCode::INTERNAL_SERVER_ERROR,
            ServiceError::Upstream(ApiError::Decode(_)) => StatusCode::BAD_GATEWAY,
            ServiceError::Upstream(ApiError::InvalidRequest(_)) | ServiceError::BadRequest(_) => {
                StatusCode::BAD_REQUEST
            }
            ServiceError::Form(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ServiceError::InvalidId(_) | ServiceError::NotFound => StatusCode::NOT_FOUND,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        if status.is_server_error() {
            log::error!("Proxy request failed: {self}");
        } else {
            log::warn!("Proxy request rejected: {self}");
        }
        HttpResponse::build(status).json(ErrorBody::new(self.detail()))
    }
}

//! Form definitions validated before anything reaches the store or the backend.

use thiserror::Error;
use validator::ValidationErrors;

pub mod complaint;

#[derive(Debug, Error)]
/// Errors that can occur when processing form data.
pub enum FormError {
    #[error("validation errors: {0}")]
    Validation(#[from] ValidationErrors),

    #[error("invalid response deadline")]
    InvalidDeadline,

    #[error("response deadline is before the submission date")]
    DeadlineInPast,

    #[error("invalid organisation_id")]
    InvalidOrganisationId,

    #[error("{0} cannot be blank")]
    BlankField(&'static str),
}

//! Value objects shared by the dashboard projections.
//!
//! Identifiers are positive and text that must be present is trimmed and
//! non-empty; anything built from these types can be sent to the backend
//! without further checks.
use std::fmt;
use std::ops::Deref;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Tenant used when the caller does not pick an organisation explicitly.
pub const DEFAULT_ORGANISATION_ID: i32 = 1;

/// A raw value was rejected while building a value object.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypeConstraintError {
    #[error("identifier must be positive")]
    NonPositiveId,
    #[error("text must not be blank")]
    EmptyString,
    #[error("malformed notification id")]
    InvalidUuid,
}

/// Positive `i32` identifier newtype, (de)serialized as the bare number.
macro_rules! positive_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
        #[serde(try_from = "i32", into = "i32")]
        pub struct $name(i32);

        impl $name {
            pub fn new(raw: i32) -> Result<Self, TypeConstraintError> {
                (raw > 0)
                    .then_some(Self(raw))
                    .ok_or(TypeConstraintError::NonPositiveId)
            }

            pub const fn get(self) -> i32 {
                self.0
            }
        }

        impl TryFrom<i32> for $name {
            type Error = TypeConstraintError;

            fn try_from(raw: i32) -> Result<Self, Self::Error> {
                Self::new(raw)
            }
        }

        impl From<$name> for i32 {
            fn from(id: $name) -> Self {
                id.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                fmt::Display::fmt(&self.0, f)
            }
        }
    };
}

positive_id!(
    /// Tenant (hospital) whose complaints the dashboard shows.
    OrganisationId
);
positive_id!(
    /// Backend key of a complaint, as used in `/plaintes/{id}`.
    ComplaintId
);

impl Default for OrganisationId {
    fn default() -> Self {
        Self(DEFAULT_ORGANISATION_ID)
    }
}

/// Trimmed text that is never blank.
#[derive(Clone, Debug, Serialize, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct NonEmptyString(String);

impl NonEmptyString {
    pub fn new(raw: impl AsRef<str>) -> Result<Self, TypeConstraintError> {
        match raw.as_ref().trim() {
            "" => Err(TypeConstraintError::EmptyString),
            text => Ok(Self(text.to_owned())),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Deref for NonEmptyString {
    type Target = str;

    fn deref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NonEmptyString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Handle of a queued notification, used to dismiss it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NotificationId(Uuid);

impl NotificationId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for NotificationId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for NotificationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl FromStr for NotificationId {
    type Err = TypeConstraintError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        raw.trim()
            .parse()
            .map(Self)
            .map_err(|_| TypeConstraintError::InvalidUuid)
    }
}

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::domain::types::NotificationId;

/// Lifetime of a notification when the caller does not pick one.
pub const DEFAULT_NOTIFICATION_DURATION: Duration = Duration::from_secs(5);

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
    Success,
    Error,
}

/// Transient message shown after a store action.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct NotificationItem {
    pub id: NotificationId,
    #[serde(rename = "type")]
    pub kind: NotificationKind,
    pub message: String,
    #[serde(rename = "durationMs", with = "duration_ms")]
    pub duration: Duration,
}

impl NotificationItem {
    pub fn new(kind: NotificationKind, message: impl Into<String>, duration: Duration) -> Self {
        Self {
            id: NotificationId::new(),
            kind,
            message: message.into(),
            duration,
        }
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self::new(
            NotificationKind::Success,
            message,
            DEFAULT_NOTIFICATION_DURATION,
        )
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::new(NotificationKind::Error, message, DEFAULT_NOTIFICATION_DURATION)
    }
}

mod duration_ms {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(value.as_millis() as u64)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        u64::deserialize(deserializer).map(Duration::from_millis)
    }
}

//! Backend batch jobs and backend reachability.

use serde::{Deserialize, Serialize};

/// Batch jobs the dashboard can trigger on the backend.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum JobKind {
    /// Re-run AI processing per hospital service.
    ProcessService,
    /// Import and analyse pending complaint files.
    ProcessFiles,
}

impl JobKind {
    pub fn label(self) -> &'static str {
        match self {
            JobKind::ProcessService => "traitement par service",
            JobKind::ProcessFiles => "traitement des fichiers",
        }
    }
}

/// Echo returned once a batch job finished.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct JobSummary {
    pub message: String,
    pub traites: u64,
    pub erreurs: u64,
}

/// Where a [`BackendStatus`] answer came from.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum StatusSource {
    Live,
    Fallback,
}

/// Outcome of a bounded backend health poll.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct BackendStatus {
    pub online: bool,
    pub latency_ms: Option<u64>,
    pub source: StatusSource,
}

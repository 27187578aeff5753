//! Aggregate figures shown on the dashboard home.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Complaint count for one hospital service.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct ServiceCount {
    pub service: String,
    pub total: u64,
}

/// Processing state of the imported complaint files.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct FileStatusBreakdown {
    pub traites: u64,
    pub en_attente: u64,
    pub en_erreur: u64,
}

/// Conditions the dashboard highlights with a banner.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct AlertFlags {
    /// Urgent complaints are waiting past their deadline.
    pub backlog_urgent: bool,
    /// Too few AI suggestions were approved by staff.
    pub approbation_ia_faible: bool,
}

impl AlertFlags {
    pub fn any(&self) -> bool {
        self.backlog_urgent || self.approbation_ia_faible
    }
}

/// Statistics for the current filter selection.
///
/// Always replaced as a whole; the store never patches single fields.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct StatisticsSnapshot {
    pub nouvelles: u64,
    pub en_attente: u64,
    pub en_cours: u64,
    pub resolues_ce_mois: u64,
    pub satisfaction_moyenne: f64,
    pub par_service: Vec<ServiceCount>,
    pub par_priorite: BTreeMap<String, u64>,
    pub fichiers: FileStatusBreakdown,
    pub alertes: AlertFlags,
}

impl StatisticsSnapshot {
    /// Complaints that still need work.
    pub fn open_total(&self) -> u64 {
        self.nouvelles + self.en_attente + self.en_cours
    }

    /// Service with the most complaints, ties resolved by backend order.
    pub fn busiest_service(&self) -> Option<&ServiceCount> {
        self.par_service
            .iter()
            .reduce(|best, item| if item.total > best.total { item } else { best })
    }
}

/// One day (or bucket) of the complaint trend chart.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct TrendPoint {
    pub date: NaiveDate,
    pub total: u64,
    pub resolues: u64,
}

/// Complaint volume over a period such as `7j`, `30j` or `12m`.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct TrendSeries {
    pub periode: String,
    pub points: Vec<TrendPoint>,
}

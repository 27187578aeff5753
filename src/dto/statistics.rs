//! Backend shapes for `/dashboard/statistiques` and `/statistiques/tendances`.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::Deserialize;

use crate::domain::statistics::{
    AlertFlags, FileStatusBreakdown, ServiceCount, StatisticsSnapshot, TrendPoint, TrendSeries,
};

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct StatisticsResponse {
    pub nouvelles_plaintes: u64,
    pub plaintes_en_attente: u64,
    pub plaintes_en_cours: u64,
    pub resolues_ce_mois: u64,
    pub satisfaction_moyenne: Option<f64>,
    pub par_service: Vec<ServiceCountResponse>,
    pub par_priorite: BTreeMap<String, u64>,
    pub fichiers: FileStatusResponse,
    pub alertes: AlertsResponse,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ServiceCountResponse {
    #[serde(alias = "type_service")]
    pub service: String,
    #[serde(alias = "count", alias = "nombre")]
    pub total: u64,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct FileStatusResponse {
    pub traites: u64,
    pub en_attente: u64,
    pub en_erreur: u64,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct AlertsResponse {
    pub backlog_urgent: bool,
    pub approbation_ia_faible: bool,
}

impl From<StatisticsResponse> for StatisticsSnapshot {
    fn from(raw: StatisticsResponse) -> Self {
        Self {
            nouvelles: raw.nouvelles_plaintes,
            en_attente: raw.plaintes_en_attente,
            en_cours: raw.plaintes_en_cours,
            resolues_ce_mois: raw.resolues_ce_mois,
            satisfaction_moyenne: raw
                .satisfaction_moyenne
                .filter(|value| value.is_finite())
                .unwrap_or_default(),
            par_service: raw
                .par_service
                .into_iter()
                .map(|item| ServiceCount {
                    service: item.service,
                    total: item.total,
                })
                .collect(),
            par_priorite: raw.par_priorite,
            fichiers: FileStatusBreakdown {
                traites: raw.fichiers.traites,
                en_attente: raw.fichiers.en_attente,
                en_erreur: raw.fichiers.en_erreur,
            },
            alertes: AlertFlags {
                backlog_urgent: raw.alertes.backlog_urgent,
                approbation_ia_faible: raw.alertes.approbation_ia_faible,
            },
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct TrendResponse {
    pub periode: String,
    pub points: Vec<TrendPointResponse>,
}

#[derive(Debug, Deserialize)]
pub struct TrendPointResponse {
    pub date: String,
    #[serde(default)]
    pub total: u64,
    #[serde(default)]
    pub resolues: u64,
}

impl From<TrendResponse> for TrendSeries {
    /// Points whose date cannot be read are dropped; the rest keep backend order.
    fn from(raw: TrendResponse) -> Self {
        let points = raw
            .points
            .into_iter()
            .filter_map(|point| {
                let date = NaiveDate::parse_from_str(point.date.get(..10)?, "%Y-%m-%d").ok()?;
                Some(TrendPoint {
                    date,
                    total: point.total,
                    resolues: point.resolues,
                })
            })
            .collect();
        Self {
            periode: raw.periode,
            points,
        }
    }
}

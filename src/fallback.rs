//! Data substituted when the backend cannot answer.
//!
//! Both the store (when a resource has never loaded) and the gateway status
//! route (when polling times out) ask a [`FallbackSource`]. Which one is
//! used is a configuration choice, see [`FallbackMode`].

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::{Days, Local, NaiveDate};
use serde::Deserialize;

use crate::domain::complaint::ComplaintPage;
use crate::domain::filters::FilterVocabulary;
use crate::domain::statistics::{
    AlertFlags, FileStatusBreakdown, ServiceCount, StatisticsSnapshot, TrendPoint, TrendSeries,
};
use crate::domain::suggestion::{ServiceSuggestions, Suggestion, SuggestionKind, SuggestionSnapshot};

/// Provider of placeholder projections.
pub trait FallbackSource: Send + Sync {
    /// Short name used in logs.
    fn name(&self) -> &'static str;

    fn statistics(&self) -> StatisticsSnapshot;

    fn suggestions(&self) -> SuggestionSnapshot;

    fn vocabulary(&self) -> FilterVocabulary;

    fn complaints(&self) -> ComplaintPage;

    fn trends(&self, periode: &str) -> TrendSeries;
}

/// Empty projections: the UI shows zeroes rather than invented figures.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoFallback;

impl FallbackSource for NoFallback {
    fn name(&self) -> &'static str {
        "none"
    }

    fn statistics(&self) -> StatisticsSnapshot {
        StatisticsSnapshot::default()
    }

    fn suggestions(&self) -> SuggestionSnapshot {
        SuggestionSnapshot::default()
    }

    fn vocabulary(&self) -> FilterVocabulary {
        FilterVocabulary::default()
    }

    fn complaints(&self) -> ComplaintPage {
        ComplaintPage::default()
    }

    fn trends(&self, periode: &str) -> TrendSeries {
        TrendSeries {
            periode: periode.to_string(),
            points: Vec::new(),
        }
    }
}

/// Fixed demonstration dataset for offline presentations.
#[derive(Clone, Copy, Debug, Default)]
pub struct DemoData;

const DEMO_SERVICES: [(&str, u64); 4] = [
    ("Urgences", 18),
    ("Cardiologie", 9),
    ("Pédiatrie", 6),
    ("Radiologie", 4),
];

impl FallbackSource for DemoData {
    fn name(&self) -> &'static str {
        "demo"
    }

    fn statistics(&self) -> StatisticsSnapshot {
        StatisticsSnapshot {
            nouvelles: 12,
            en_attente: 8,
            en_cours: 15,
            resolues_ce_mois: 42,
            satisfaction_moyenne: 3.8,
            par_service: DEMO_SERVICES
                .iter()
                .map(|(service, total)| ServiceCount {
                    service: service.to_string(),
                    total: *total,
                })
                .collect(),
            par_priorite: BTreeMap::from([
                ("haute".to_string(), 7),
                ("moyenne".to_string(), 19),
                ("basse".to_string(), 11),
            ]),
            fichiers: FileStatusBreakdown {
                traites: 31,
                en_attente: 3,
                en_erreur: 1,
            },
            alertes: AlertFlags {
                backlog_urgent: true,
                approbation_ia_faible: false,
            },
        }
    }

    fn suggestions(&self) -> SuggestionSnapshot {
        let mut urgences = ServiceSuggestions {
            service: "Urgences".to_string(),
            ..ServiceSuggestions::default()
        };
        urgences.par_type.insert(
            SuggestionKind::Reponse,
            vec![Suggestion {
                plainte_id: None,
                contenu: "Nous vous présentons nos excuses pour le temps d'attente.".to_string(),
                confiance: Some(0.87),
            }],
        );
        urgences.par_type.insert(
            SuggestionKind::Action,
            vec![Suggestion {
                plainte_id: None,
                contenu: "Renforcer l'équipe d'accueil en soirée.".to_string(),
                confiance: Some(0.72),
            }],
        );
        SuggestionSnapshot {
            services: vec![urgences],
        }
    }

    fn vocabulary(&self) -> FilterVocabulary {
        FilterVocabulary {
            types_services: DEMO_SERVICES
                .iter()
                .map(|(service, _)| service.to_string())
                .collect(),
            categories_principales: vec!["Accueil".into(), "Soins".into(), "Facturation".into()],
            sous_categories: Vec::new(),
            priorites: vec!["haute".into(), "moyenne".into(), "basse".into()],
            statuts: vec![
                "nouvelle".into(),
                "en_attente".into(),
                "en_cours".into(),
                "resolue".into(),
                "fermee".into(),
            ],
        }
    }

    fn complaints(&self) -> ComplaintPage {
        ComplaintPage {
            page: 1,
            limit: 10,
            ..ComplaintPage::default()
        }
    }

    fn trends(&self, periode: &str) -> TrendSeries {
        let today = Local::now().date_naive();
        TrendSeries {
            periode: periode.to_string(),
            points: demo_trend(today),
        }
    }
}

/// Seven daily points ending at `today`.
fn demo_trend(today: NaiveDate) -> Vec<TrendPoint> {
    (0..7u64)
        .rev()
        .filter_map(|days_ago| {
            let date = today.checked_sub_days(Days::new(days_ago))?;
            Some(TrendPoint {
                date,
                total: 5 + (days_ago * 3) % 7,
                resolues: 2 + days_ago % 3,
            })
        })
        .collect()
}

/// Configured fallback behaviour.
#[derive(Clone, Copy, Debug, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum FallbackMode {
    #[default]
    None,
    Demo,
}

impl FallbackMode {
    pub fn source(self) -> Arc<dyn FallbackSource> {
        match self {
            FallbackMode::None => Arc::new(NoFallback),
            FallbackMode::Demo => Arc::new(DemoData),
        }
    }
}

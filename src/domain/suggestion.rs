//! AI suggestions grouped by hospital service.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// What an AI suggestion proposes.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "snake_case")]
pub enum SuggestionKind {
    /// Draft answer to send to the plaintiff.
    Reponse,
    /// Corrective action for the service.
    Action,
    Classification,
    MotsCles,
    Priorite,
}

impl SuggestionKind {
    /// Maps the backend `type` label, accepting the historical spellings.
    pub fn from_label(label: &str) -> Option<Self> {
        match label.trim().to_lowercase().as_str() {
            "reponse" | "réponse" | "response" | "texte_reponse" => Some(Self::Reponse),
            "action" | "texte_action" => Some(Self::Action),
            "classification" | "categorie" => Some(Self::Classification),
            "mots_cles" | "mots-cles" | "keywords" => Some(Self::MotsCles),
            "priorite" | "priorité" | "priority" => Some(Self::Priorite),
            _ => None,
        }
    }
}

/// A single AI proposal attached to a complaint.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Suggestion {
    pub plainte_id: Option<i32>,
    pub contenu: String,
    /// Model confidence in `[0, 1]` when the backend reports one.
    pub confiance: Option<f64>,
}

/// Suggestions for one service, bucketed by kind.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct ServiceSuggestions {
    pub service: String,
    pub par_type: BTreeMap<SuggestionKind, Vec<Suggestion>>,
}

impl ServiceSuggestions {
    pub fn total(&self) -> usize {
        self.par_type.values().map(Vec::len).sum()
    }
}

/// Coarse cache of every suggestion, loaded once per session.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct SuggestionSnapshot {
    pub services: Vec<ServiceSuggestions>,
}

impl SuggestionSnapshot {
    pub fn for_service(&self, service: &str) -> Option<&ServiceSuggestions> {
        self.services.iter().find(|group| group.service == service)
    }

    /// All suggestions of one kind across services.
    pub fn by_kind(&self, kind: SuggestionKind) -> impl Iterator<Item = (&str, &Suggestion)> {
        self.services.iter().flat_map(move |group| {
            group
                .par_type
                .get(&kind)
                .into_iter()
                .flatten()
                .map(move |suggestion| (group.service.as_str(), suggestion))
        })
    }

    pub fn is_empty(&self) -> bool {
        self.services.iter().all(|group| group.total() == 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn labels_map_to_kinds() {
        assert_eq!(SuggestionKind::from_label("Réponse"), Some(SuggestionKind::Reponse));
        assert_eq!(SuggestionKind::from_label("keywords"), Some(SuggestionKind::MotsCles));
        assert_eq!(SuggestionKind::from_label("autre"), None);
    }

    #[test]
    fn by_kind_walks_every_service() {
        let mut cardio = ServiceSuggestions {
            service: "Cardiologie".into(),
            ..ServiceSuggestions::default()
        };
        cardio.par_type.insert(
            SuggestionKind::Action,
            vec![Suggestion {
                plainte_id: Some(3),
                contenu: "Rappeler le patient".into(),
                confiance: Some(0.8),
            }],
        );
        let snapshot = SuggestionSnapshot {
            services: vec![cardio, ServiceSuggestions::default()],
        };

        let actions: Vec<_> = snapshot.by_kind(SuggestionKind::Action).collect();
        assert_eq!(actions.len(), 1);
        assert_eq!(actions[0].0, "Cardiologie");
        assert!(!snapshot.is_empty());
        assert!(SuggestionSnapshot::default().is_empty());
    }
}

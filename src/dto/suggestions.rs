//! Backend shape for `/suggestions/par-service`.

use serde::Deserialize;

use crate::domain::suggestion::{
    ServiceSuggestions, Suggestion, SuggestionKind, SuggestionSnapshot,
};

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct SuggestionsResponse {
    pub services: Vec<ServiceSuggestionsResponse>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ServiceSuggestionsResponse {
    #[serde(alias = "type_service")]
    pub service: String,
    pub suggestions: Vec<SuggestionResponse>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct SuggestionResponse {
    pub plainte_id: Option<i32>,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(alias = "texte")]
    pub contenu: String,
    pub confiance: Option<f64>,
}

impl From<SuggestionsResponse> for SuggestionSnapshot {
    fn from(raw: SuggestionsResponse) -> Self {
        let services = raw
            .services
            .into_iter()
            .map(|group| {
                let mut grouped = ServiceSuggestions {
                    service: group.service,
                    ..ServiceSuggestions::default()
                };
                for item in group.suggestions {
                    let Some(kind) = SuggestionKind::from_label(&item.kind) else {
                        log::debug!("Ignoring suggestion of unknown type {:?}", item.kind);
                        continue;
                    };
                    grouped.par_type.entry(kind).or_default().push(Suggestion {
                        plainte_id: item.plainte_id,
                        contenu: item.contenu,
                        confiance: item.confiance.filter(|c| (0.0..=1.0).contains(c)),
                    });
                }
                grouped
            })
            .collect();
        Self { services }
    }
}

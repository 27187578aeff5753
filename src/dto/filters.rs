//! Backend shape for `/dashboard/filtres-disponibles`.

use serde::Deserialize;

use crate::domain::filters::FilterVocabulary;

#[derive(Debug, Default, Deserialize)]
pub struct FiltersEnvelope {
    #[serde(default)]
    pub filtres: FilterVocabulary,
}

impl From<FiltersEnvelope> for FilterVocabulary {
    fn from(envelope: FiltersEnvelope) -> Self {
        envelope.filtres
    }
}

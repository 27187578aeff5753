//! Dashboard filter selection and the vocabulary it is picked from.

use serde::{Deserialize, Serialize};

use crate::domain::types::OrganisationId;

/// Structural filter applied to statistics and complaint lists.
///
/// An empty string means "no constraint" for that field. The
/// [`Default`] value is the canonical reset state.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct FilterSelection {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub type_service: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub categorie_principale: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub sous_categorie: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub priorite: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub statut: String,
    pub organisation_id: OrganisationId,
}

/// Names of the free-text fields of a [`FilterSelection`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FilterField {
    TypeService,
    CategoriePrincipale,
    SousCategorie,
    Priorite,
    Statut,
}

impl FilterField {
    pub const ALL: [FilterField; 5] = [
        FilterField::TypeService,
        FilterField::CategoriePrincipale,
        FilterField::SousCategorie,
        FilterField::Priorite,
        FilterField::Statut,
    ];

    /// Query parameter name used by the backend.
    pub fn as_str(self) -> &'static str {
        match self {
            FilterField::TypeService => "type_service",
            FilterField::CategoriePrincipale => "categorie_principale",
            FilterField::SousCategorie => "sous_categorie",
            FilterField::Priorite => "priorite",
            FilterField::Statut => "statut",
        }
    }
}

impl FilterSelection {
    /// Selection scoped to another tenant, every other field cleared.
    pub fn for_organisation(organisation_id: OrganisationId) -> Self {
        Self {
            organisation_id,
            ..Self::default()
        }
    }

    pub fn get(&self, field: FilterField) -> &str {
        match field {
            FilterField::TypeService => &self.type_service,
            FilterField::CategoriePrincipale => &self.categorie_principale,
            FilterField::SousCategorie => &self.sous_categorie,
            FilterField::Priorite => &self.priorite,
            FilterField::Statut => &self.statut,
        }
    }

    /// Replaces a single field; surrounding whitespace is not a constraint.
    pub fn set(&mut self, field: FilterField, value: impl Into<String>) {
        let value = value.into().trim().to_string();
        let slot = match field {
            FilterField::TypeService => &mut self.type_service,
            FilterField::CategoriePrincipale => &mut self.categorie_principale,
            FilterField::SousCategorie => &mut self.sous_categorie,
            FilterField::Priorite => &mut self.priorite,
            FilterField::Statut => &mut self.statut,
        };
        *slot = value;
    }

    /// Builder-style variant of [`FilterSelection::set`].
    #[must_use]
    pub fn with(mut self, field: FilterField, value: impl Into<String>) -> Self {
        self.set(field, value);
        self
    }

    /// Fields that actually constrain the query, in backend order.
    pub fn active_fields(&self) -> impl Iterator<Item = (FilterField, &str)> {
        FilterField::ALL
            .into_iter()
            .map(|field| (field, self.get(field)))
            .filter(|(_, value)| !value.is_empty())
    }

    /// True when only the tenant constrains the selection.
    pub fn is_unconstrained(&self) -> bool {
        self.active_fields().next().is_none()
    }
}

/// Legal values for each selectable filter, in the order the backend sent them.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct FilterVocabulary {
    pub types_services: Vec<String>,
    pub categories_principales: Vec<String>,
    pub sous_categories: Vec<String>,
    pub priorites: Vec<String>,
    pub statuts: Vec<String>,
}

impl FilterVocabulary {
    /// Options offered for the given field.
    pub fn options(&self, field: FilterField) -> &[String] {
        match field {
            FilterField::TypeService => &self.types_services,
            FilterField::CategoriePrincipale => &self.categories_principales,
            FilterField::SousCategorie => &self.sous_categories,
            FilterField::Priorite => &self.priorites,
            FilterField::Statut => &self.statuts,
        }
    }

    /// Whether `value` may be selected for `field`. Empty always is.
    pub fn allows(&self, field: FilterField, value: &str) -> bool {
        value.is_empty() || self.options(field).iter().any(|option| option == value)
    }
}

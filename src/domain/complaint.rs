use chrono::{DateTime, Days, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Deserializer, Serialize};

use crate::domain::types::{NonEmptyString, OrganisationId};
use crate::pagination::page_window;

/// Days granted to answer a complaint when the form leaves the deadline blank.
pub const DEFAULT_RESPONSE_DELAY_DAYS: u64 = 7;

/// Read-only copy of a backend complaint.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Complaint {
    pub id: i32,
    /// Human readable reference such as `PL-2024-0042`.
    pub plainte_id: Option<String>,
    pub titre: String,
    pub description: Option<String>,
    pub type_service: Option<String>,
    pub categorie_principale: Option<String>,
    pub sous_categorie: Option<String>,
    pub priorite: Option<String>,
    pub statut: Option<String>,
    pub nom_plaignant: Option<String>,
    pub prenom_plaignant: Option<String>,
    pub email_plaignant: Option<String>,
    pub telephone_plaignant: Option<String>,
    #[serde(deserialize_with = "lenient_datetime")]
    pub date_creation: Option<NaiveDateTime>,
    #[serde(deserialize_with = "lenient_datetime")]
    pub date_limite_reponse: Option<NaiveDateTime>,
    pub resume_ia: Option<String>,
    pub categorie_ia: Option<String>,
    pub sentiment_ia: Option<String>,
}

impl Complaint {
    /// "Prénom Nom" of the plaintiff, when known.
    pub fn plaintiff_name(&self) -> Option<String> {
        let parts: Vec<&str> = [&self.prenom_plaignant, &self.nom_plaignant]
            .into_iter()
            .flatten()
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
            .collect();
        if parts.is_empty() {
            None
        } else {
            Some(parts.join(" "))
        }
    }

    /// True once the answer deadline has passed.
    pub fn is_overdue(&self, now: NaiveDateTime) -> bool {
        self.date_limite_reponse
            .is_some_and(|deadline| deadline < now)
    }
}

/// Accepts RFC 3339, naive ISO timestamps or plain dates; anything else is `None`.
fn lenient_datetime<'de, D>(deserializer: D) -> Result<Option<NaiveDateTime>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw.as_deref().and_then(parse_timestamp))
}

pub(crate) fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Some(parsed.naive_utc());
    }
    if let Ok(parsed) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(parsed);
    }
    if let Ok(parsed) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S%.f") {
        return Some(parsed);
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
}

/// One page of complaints as returned by the list endpoints.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ComplaintPage {
    pub plaintes: Vec<Complaint>,
    pub total: u64,
    pub page: u32,
    pub limit: u32,
    pub total_pages: u32,
}

impl ComplaintPage {
    /// Page links to render, `None` marking an ellipsis.
    pub fn page_links(&self) -> Vec<Option<usize>> {
        page_window(self.total_pages as usize, self.page.max(1) as usize)
    }

    pub fn has_next(&self) -> bool {
        self.page < self.total_pages
    }
}

/// Status-scoped complaint lists exposed by the backend.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ComplaintScope {
    EnCours,
    Traitees,
    EnAttente,
}

impl ComplaintScope {
    /// Path segment under `/plaintes/`.
    pub fn segment(self) -> &'static str {
        match self {
            ComplaintScope::EnCours => "en-cours",
            ComplaintScope::Traitees => "traitees",
            ComplaintScope::EnAttente => "en-attente",
        }
    }

    pub fn from_segment(segment: &str) -> Option<Self> {
        match segment {
            "en-cours" => Some(ComplaintScope::EnCours),
            "traitees" => Some(ComplaintScope::Traitees),
            "en-attente" => Some(ComplaintScope::EnAttente),
            _ => None,
        }
    }
}

/// Payload posted to create a complaint.
#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct NewComplaint {
    pub titre: NonEmptyString,
    pub description: NonEmptyString,
    pub type_service: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub categorie_principale: Option<String>,
    pub priorite: String,
    pub nom_plaignant: NonEmptyString,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prenom_plaignant: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email_plaignant: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub telephone_plaignant: Option<String>,
    /// Serialized as `YYYY-MM-DD`.
    pub date_limite_reponse: NaiveDate,
    pub organisation_id: OrganisationId,
}

/// Deadline applied when none was picked: the submission date plus seven days.
pub fn default_response_deadline(submitted_on: NaiveDate) -> NaiveDate {
    submitted_on
        .checked_add_days(Days::new(DEFAULT_RESPONSE_DELAY_DAYS))
        .unwrap_or(NaiveDate::MAX)
}

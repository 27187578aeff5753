use chrono::NaiveDate;
use serde::Deserialize;
use validator::Validate;

use crate::domain::complaint::{NewComplaint, default_response_deadline};
use crate::domain::types::{NonEmptyString, OrganisationId};
use crate::forms::FormError;

/// Priority applied when the form leaves it blank.
pub const DEFAULT_PRIORITY: &str = "moyenne";

#[derive(Clone, Debug, Default, Deserialize, Validate)]
#[serde(default)]
/// Complaint creation form as submitted by the dashboard modal.
pub struct CreateComplaintForm {
    #[validate(length(min = 1, max = 200))]
    pub titre: String,
    #[validate(length(min = 1))]
    pub description: String,
    /// Hospital service the complaint is about.
    #[validate(length(min = 1))]
    pub type_service: String,
    pub categorie_principale: Option<String>,
    pub priorite: Option<String>,
    #[validate(length(min = 1))]
    pub nom_plaignant: String,
    pub prenom_plaignant: Option<String>,
    #[validate(email)]
    pub email_plaignant: Option<String>,
    pub telephone_plaignant: Option<String>,
    /// `YYYY-MM-DD`; blank means one week after submission.
    pub date_limite_reponse: Option<String>,
    pub organisation_id: Option<i32>,
}

impl CreateComplaintForm {
    /// Validates the form and builds the payload sent to the backend.
    ///
    /// `submitted_on` is the local calendar date of the submission; it
    /// anchors the default deadline.
    pub fn into_new_complaint(self, submitted_on: NaiveDate) -> Result<NewComplaint, FormError> {
        let form = Self {
            email_plaignant: blank_to_none(self.email_plaignant),
            ..self
        };
        form.validate()?;

        let date_limite_reponse = match blank_to_none(form.date_limite_reponse) {
            Some(raw) => {
                let deadline = NaiveDate::parse_from_str(&raw, "%Y-%m-%d")
                    .map_err(|_| FormError::InvalidDeadline)?;
                if deadline < submitted_on {
                    return Err(FormError::DeadlineInPast);
                }
                deadline
            }
            None => default_response_deadline(submitted_on),
        };

        let organisation_id = match form.organisation_id {
            Some(id) => OrganisationId::new(id).map_err(|_| FormError::InvalidOrganisationId)?,
            None => OrganisationId::default(),
        };

        Ok(NewComplaint {
            titre: NonEmptyString::new(form.titre).map_err(|_| FormError::BlankField("titre"))?,
            description: NonEmptyString::new(form.description)
                .map_err(|_| FormError::BlankField("description"))?,
            type_service: non_blank(form.type_service, "type_service")?,
            categorie_principale: blank_to_none(form.categorie_principale),
            priorite: blank_to_none(form.priorite).unwrap_or_else(|| DEFAULT_PRIORITY.to_string()),
            nom_plaignant: NonEmptyString::new(form.nom_plaignant)
                .map_err(|_| FormError::BlankField("nom_plaignant"))?,
            prenom_plaignant: blank_to_none(form.prenom_plaignant),
            email_plaignant: form.email_plaignant,
            telephone_plaignant: blank_to_none(form.telephone_plaignant),
            date_limite_reponse,
            organisation_id,
        })
    }
}

fn blank_to_none(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn non_blank(value: String, field: &'static str) -> Result<String, FormError> {
    blank_to_none(Some(value)).ok_or(FormError::BlankField(field))
}

use actix_web::{HttpRequest, HttpResponse, get, post, web};
use chrono::Local;
use reqwest::Method;

use crate::client::paths;
use crate::domain::complaint::ComplaintScope;
use crate::domain::types::ComplaintId;
use crate::forms::complaint::CreateComplaintForm;
use crate::routes::relayed;
use crate::services::gateway::Gateway;
use crate::services::{ServiceError, ServiceResult};

#[get("/plaintes")]
pub async fn list_complaints(
    req: HttpRequest,
    gateway: web::Data<Gateway>,
) -> ServiceResult<HttpResponse> {
    let answer = gateway
        .relay(Method::GET, paths::COMPLAINTS, req.query_string(), None)
        .await?;
    Ok(relayed(answer))
}

/// Validates the form, fills the default deadline and forwards the payload.
#[post("/plaintes")]
pub async fn create_complaint(
    form: web::Json<CreateComplaintForm>,
    gateway: web::Data<Gateway>,
) -> ServiceResult<HttpResponse> {
    let submitted_on = Local::now().date_naive();
    let payload = form.into_inner().into_new_complaint(submitted_on)?;
    let body = serde_json::to_vec(&payload).map_err(|e| ServiceError::BadRequest(e.to_string()))?;

    let answer = gateway
        .relay(Method::POST, paths::COMPLAINTS, "", Some(body))
        .await?;
    log::info!("Complaint '{}' forwarded to the backend", payload.titre);
    Ok(relayed(answer))
}

#[get("/plaintes/{scope:en-cours|traitees|en-attente}")]
pub async fn list_complaints_by_scope(
    req: HttpRequest,
    scope: web::Path<String>,
    gateway: web::Data<Gateway>,
) -> ServiceResult<HttpResponse> {
    let scope = ComplaintScope::from_segment(&scope).ok_or(ServiceError::NotFound)?;
    let path = format!("{}/{}", paths::COMPLAINTS, scope.segment());
    let answer = gateway
        .relay(Method::GET, &path, req.query_string(), None)
        .await?;
    Ok(relayed(answer))
}

#[get("/plaintes/{id}")]
pub async fn show_complaint(
    id: web::Path<i32>,
    gateway: web::Data<Gateway>,
) -> ServiceResult<HttpResponse> {
    let id = ComplaintId::new(id.into_inner())?;
    let path = format!("{}/{}", paths::COMPLAINTS, id);
    let answer = gateway.relay(Method::GET, &path, "", None).await?;
    Ok(relayed(answer))
}

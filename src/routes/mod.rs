//! Local `/api` routes of the gateway proxy.

use actix_web::http::StatusCode;
use actix_web::{HttpResponse, web};

use crate::services::ServiceError;
use crate::services::gateway::Relayed;

pub mod complaints;
pub mod dashboard;
pub mod jobs;
pub mod status;
pub mod suggestions;

/// Registers every proxy route under `/api`.
///
/// Scoped complaint lists are registered before `/plaintes/{id}` so the
/// literal segments win.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            .app_data(web::JsonConfig::default().error_handler(|err, _| {
                ServiceError::BadRequest(err.to_string()).into()
            }))
            .app_data(
                web::PathConfig::default()
                    .error_handler(|_, _| ServiceError::NotFound.into()),
            )
            .service(dashboard::statistics)
            .service(dashboard::available_filters)
            .service(dashboard::trends)
            .service(complaints::list_complaints)
            .service(complaints::create_complaint)
            .service(complaints::list_complaints_by_scope)
            .service(complaints::show_complaint)
            .service(suggestions::suggestions_by_service)
            .service(jobs::process_service)
            .service(jobs::process_files)
            .service(status::backend_status)
            .default_service(web::to(not_found)),
    );
}

async fn not_found() -> Result<HttpResponse, ServiceError> {
    Err(ServiceError::NotFound)
}

/// Replays a backend answer: same status, same JSON.
pub(crate) fn relayed(relayed: Relayed) -> HttpResponse {
    let status = StatusCode::from_u16(relayed.status).unwrap_or(StatusCode::OK);
    HttpResponse::build(status).json(relayed.body)
}

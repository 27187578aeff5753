use actix_web::{HttpResponse, get, web};

use crate::services::gateway::Gateway;

/// Always 200; an offline backend is reported in the body.
#[get("/backend-status")]
pub async fn backend_status(gateway: web::Data<Gateway>) -> HttpResponse {
    HttpResponse::Ok().json(gateway.backend_status().await)
}

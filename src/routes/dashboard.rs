use actix_web::{HttpRequest, HttpResponse, get, web};
use reqwest::Method;

use crate::client::paths;
use crate::routes::relayed;
use crate::services::ServiceResult;
use crate::services::gateway::Gateway;

#[get("/dashboard/statistiques")]
pub async fn statistics(
    req: HttpRequest,
    gateway: web::Data<Gateway>,
) -> ServiceResult<HttpResponse> {
    let answer = gateway
        .relay(Method::GET, paths::STATISTICS, req.query_string(), None)
        .await?;
    Ok(relayed(answer))
}

#[get("/dashboard/filtres-disponibles")]
pub async fn available_filters(
    req: HttpRequest,
    gateway: web::Data<Gateway>,
) -> ServiceResult<HttpResponse> {
    let answer = gateway
        .relay(Method::GET, paths::AVAILABLE_FILTERS, req.query_string(), None)
        .await?;
    Ok(relayed(answer))
}

#[get("/statistiques/tendances")]
pub async fn trends(req: HttpRequest, gateway: web::Data<Gateway>) -> ServiceResult<HttpResponse> {
    let answer = gateway
        .relay(Method::GET, paths::TRENDS, req.query_string(), None)
        .await?;
    Ok(relayed(answer))
}

use actix_web::{HttpRequest, HttpResponse, get, web};
use reqwest::Method;

use crate::client::paths;
use crate::routes::relayed;
use crate::services::ServiceResult;
use crate::services::gateway::Gateway;

#[get("/suggestions/par-service")]
pub async fn suggestions_by_service(
    req: HttpRequest,
    gateway: web::Data<Gateway>,
) -> ServiceResult<HttpResponse> {
    let answer = gateway
        .relay(
            Method::GET,
            paths::SUGGESTIONS_BY_SERVICE,
            req.query_string(),
            None,
        )
        .await?;
    Ok(relayed(answer))
}

//! Batch job triggers. These can run for a while, so the proxy timeout applies.

use actix_web::{HttpResponse, post, web};
use reqwest::Method;

use crate::client::paths;
use crate::routes::relayed;
use crate::services::ServiceResult;
use crate::services::gateway::Gateway;

#[post("/process-service")]
pub async fn process_service(gateway: web::Data<Gateway>) -> ServiceResult<HttpResponse> {
    let answer = gateway
        .relay(Method::POST, paths::PROCESS_SERVICE, "", None)
        .await?;
    Ok(relayed(answer))
}

#[post("/process-files")]
pub async fn process_files(gateway: web::Data<Gateway>) -> ServiceResult<HttpResponse> {
    let answer = gateway
        .relay(Method::POST, paths::PROCESS_FILES, "", None)
        .await?;
    Ok(relayed(answer))
}

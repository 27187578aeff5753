//! Orchestration layer of the hospital complaints dashboard.
//!
//! The library exposes the typed backend client, the application store and
//! (with the `server` feature) the `/api` gateway proxy.

pub mod client;
pub mod domain;
pub mod dto;
pub mod fallback;
pub mod forms;
pub mod models;
pub mod pagination;
pub mod store;

#[cfg(feature = "server")]
pub mod routes;
#[cfg(feature = "server")]
pub mod services;

#[cfg(feature = "server")]
pub use server::run;

#[cfg(feature = "server")]
mod server {
    use actix_cors::Cors;
    use actix_web::{App, HttpServer, middleware, web};

    use crate::models::config::ServerConfig;
    use crate::services::gateway::Gateway;

    /// Builds and runs the Actix-Web gateway using the provided configuration.
    pub async fn run(server_config: ServerConfig) -> std::io::Result<()> {
        let gateway = Gateway::new(&server_config)
            .map_err(|e| std::io::Error::other(format!("Failed to build HTTP client: {e}")))?;
        let gateway = web::Data::new(gateway);

        log::info!(
            "Proxying /api to {} (fallback: {:?})",
            server_config.backend_url,
            server_config.fallback
        );

        let bind_address = (server_config.address.clone(), server_config.port);

        HttpServer::new(move || {
            App::new()
                .wrap(Cors::permissive())
                .wrap(middleware::Logger::default())
                .configure(crate::routes::configure)
                .app_data(gateway.clone())
        })
        .bind(bind_address)?
        .run()
        .await
    }
}

//! Findback HTTP server
//!
//! Actix-web REST API over item submission, listing and matching

pub mod error;
pub mod items;
pub mod routes;
pub mod state;
pub mod types;

use actix_cors::Cors;
use actix_web::{web, App, HttpServer};
use findback_common::{AppConfig, FindbackError, Result};
use std::sync::Arc;
use tracing::info;
use tracing_actix_web::TracingLogger;

pub use error::ApiError;
pub use items::ItemService;
pub use state::AppState;

/// Build state from `config` and serve until shutdown
pub async fn start_server(config: AppConfig) -> Result<()> {
    let bind_addr = config.server_bind_address();
    let state = Arc::new(AppState::new(config).await?);

    info!("Starting HTTP server on {}", bind_addr);

    HttpServer::new(move || {
        App::new()
            .wrap(TracingLogger::default())
            .wrap(Cors::permissive())
            .app_data(web::Data::new(state.clone()))
            .configure(routes::configure)
    })
    .bind(&bind_addr)
    .map_err(|e| FindbackError::config(format!("Failed to bind {}: {}", bind_addr, e)))?
    .run()
    .await?;

    info!("HTTP server stopped");
    Ok(())
}

//! Fieldgate API composition root.

#![forbid(unsafe_code)]

mod api_config;
mod api_router;
mod api_services;
mod dto;
mod error;
mod handlers;
mod middleware;
mod state;

use fieldgate_core::AppError;
use tracing::info;

use crate::api_config::{ApiConfig, StorageBackendConfig, init_tracing};
use crate::api_services::StoragePorts;

#[tokio::main]
async fn main() -> Result<(), AppError> {
    dotenvy::dotenv().ok();
    init_tracing();

    let config = ApiConfig::load()?;

    let ports = match &config.storage {
        StorageBackendConfig::Memory => {
            if config.migrate_only {
                return Err(AppError::Validation(
                    "migrate requires STORAGE_BACKEND=postgres".to_owned(),
                ));
            }
            StoragePorts::in_memory()
        }
        StorageBackendConfig::Postgres { database_url } => {
            let pool = api_services::connect_database(database_url).await?;
            if config.migrate_only {
                info!("database migrations applied successfully");
                return Ok(());
            }
            StoragePorts::postgres(pool)
        }
    };

    let app_state = api_services::build_app_state(&config, ports)?;
    let app = api_router::build_router(app_state);

    let address = config.socket_address()?;
    let listener = tokio::net::TcpListener::bind(address)
        .await
        .map_err(|error| AppError::Internal(format!("failed to bind API listener: {error}")))?;

    info!(%address, "fieldgate-api listening");

    axum::serve(listener, app)
        .await
        .map_err(|error| AppError::Internal(format!("API server failed: {error}")))
}

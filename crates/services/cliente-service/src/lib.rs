//! Cliente Service Library
//!
//! Customer management over HTTP: users (individual or corporate) and the
//! payment methods they own.

pub mod api;
pub mod config;
pub mod infra;
pub mod repository;
pub mod service;

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use domain::UserFactory;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::api::AppState;
use crate::config::ClienteServiceConfig;
use crate::infra::Database;
use crate::repository::UserStore;
use crate::service::UserManager;

/// Run the service with the given configuration.
pub async fn run_embedded(
    config: ClienteServiceConfig,
) -> Result<(), Box<dyn std::error::Error>> {
    run_server_with_config(config).await
}

/// Run migrations (for CLI commands).
pub async fn run_migrations(
    config: &ClienteServiceConfig,
    action: MigrateAction,
) -> Result<(), Box<dyn std::error::Error>> {
    let db = Database::connect_without_migrations(&config.database_url).await?;

    match action {
        MigrateAction::Up => {
            db.run_migrations().await?;
            info!("Migrations applied successfully");
        }
        MigrateAction::Down => {
            db.rollback_migration().await?;
            info!("Rolled back last migration");
        }
        MigrateAction::Status => {
            let status = db.migration_status().await?;
            for (name, applied) in status {
                let marker = if applied { "[x]" } else { "[ ]" };
                println!("{} {}", marker, name);
            }
        }
        MigrateAction::Fresh => {
            db.fresh_migrations().await?;
            info!("Database reset and migrations applied");
        }
    }

    Ok(())
}

/// Migration action type.
#[derive(Debug, Clone, Copy)]
pub enum MigrateAction {
    Up,
    Down,
    Status,
    Fresh,
}

/// Wire repository, service and router on top of a connected database.
pub fn build_app(db: Database, config: &ClienteServiceConfig) -> Router {
    let user_repo = Arc::new(UserStore::new(db.get_connection()));
    let factory = UserFactory::new(config.require_payment_method);
    let user_service = Arc::new(UserManager::new(user_repo, factory));

    let state = AppState::new(user_service, Some(db));
    api::create_router(state).layer(TraceLayer::new_for_http())
}

/// Run the HTTP server with the given configuration.
async fn run_server_with_config(
    config: ClienteServiceConfig,
) -> Result<(), Box<dyn std::error::Error>> {
    let db = Database::connect(&config.database_url).await?;
    if config.require_payment_method {
        info!("Users must keep at least one active payment method");
    }

    let app = build_app(db, &config);

    let addr: SocketAddr = config.service.addr().parse()?;
    info!(service = %config.service.service_name, "Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

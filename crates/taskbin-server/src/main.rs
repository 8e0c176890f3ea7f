//! Taskbin Server — application entry point.

mod context;
mod error;
mod routes;
mod state;

use std::sync::Arc;

use taskbin_db::DbManager;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use crate::state::{AppState, ServerConfig};

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env().add_directive("taskbin=info".parse().unwrap()),
        )
        .json()
        .init();

    info!("Starting taskbin server...");

    let config = ServerConfig::from_env();

    let manager = match DbManager::connect(&config.db).await {
        Ok(manager) => manager,
        Err(err) => {
            error!(error = %err, "failed to connect to storage");
            std::process::exit(1);
        }
    };

    if let Err(err) = taskbin_db::run_migrations(manager.client()).await {
        error!(error = %err, "failed to run migrations");
        std::process::exit(1);
    }

    let state = Arc::new(AppState::new(&manager, config.session.clone()));
    let app = routes::router(state)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http());

    let listener = match tokio::net::TcpListener::bind(&config.bind).await {
        Ok(listener) => listener,
        Err(err) => {
            error!(error = %err, bind = %config.bind, "failed to bind listener");
            std::process::exit(1);
        }
    };

    info!(bind = %config.bind, policy = ?config.session.policy, "listening");

    if let Err(err) = axum::serve(listener, app).await {
        error!(error = %err, "server terminated");
        std::process::exit(1);
    }
}

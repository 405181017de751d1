use std::sync::Arc;

use anyhow::{Context, Result};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

use super::api::{self, AppState};
use super::handle::StoreHandle;
use crate::report::Granularity;
use crate::store::{Store, StorePaths};

/// Configuration for the REST server.
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub paths: StorePaths,
    /// Answer cross-origin requests from any origin
    pub cors: bool,
    pub report_group: Granularity,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 5000,
            paths: StorePaths::in_dir("data"),
            cors: true,
            report_group: Granularity::Day,
        }
    }
}

/// Build the full application router.
pub fn build_router(state: Arc<AppState>, cors: bool) -> Router {
    let mut app = api::api_router()
        .with_state(state)
        .layer(TraceLayer::new_for_http());
    if cors {
        app = app.layer(CorsLayer::permissive());
    }
    app
}

/// Start the server and run until Ctrl+C.
pub async fn start_server(config: ServerConfig) -> Result<()> {
    let store = Store::open(&config.paths);
    let created = store
        .ensure_files()
        .context("Failed to create the data files")?;
    for path in &created {
        info!(path = %path.display(), "created empty data file");
    }

    let state = Arc::new(AppState {
        store: StoreHandle::new(store),
        report_group: config.report_group,
    });
    let app = build_router(state, config.cors);

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;

    let local_addr = listener.local_addr()?;
    info!(%local_addr, cors = config.cors, "server listening");
    println!("pharmalog API running at http://{}", local_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    println!("Server shut down gracefully.");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "failed to listen for Ctrl+C; shutting down");
        return;
    }
    info!("shutting down");
}

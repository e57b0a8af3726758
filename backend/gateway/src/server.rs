//! Main HTTP Gateway Server.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;

use anyhow::Result;
use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{info, instrument, warn};

use pixdrop_core::{MediaUploadService, UploadOptions, UploadPolicy, UPLOAD_PATH};
use pixdrop_media::UploadFanout;

use crate::{control_ui, health_api, upload};

/// Application state shared across routes. Read-only after startup.
#[derive(Clone)]
pub struct GatewayState {
    pub policy: Arc<UploadPolicy>,
    pub fanout: Arc<UploadFanout>,
    pub started_at: Instant,
}

impl GatewayState {
    pub fn new(
        policy: UploadPolicy,
        service: Arc<dyn MediaUploadService>,
        options: UploadOptions,
    ) -> Self {
        let fanout = UploadFanout::new(service, options, policy.batch_size);
        Self {
            policy: Arc::new(policy),
            fanout: Arc::new(fanout),
            started_at: Instant::now(),
        }
    }
}

/// Build the Axum router with all gateway routes.
///
/// The default body limit is off: the upload handler caps what it buffers
/// per file, so oversize requests still get a validation error.
pub fn build_router(state: GatewayState) -> Router {
    Router::new()
        .route(UPLOAD_PATH, post(upload::upload_files))
        .route("/api/health", get(health_api::get_health))
        .route("/api/limits", get(health_api::get_limits))
        .merge(control_ui::ui_router())
        .layer(DefaultBodyLimit::disable())
        .with_state(state)
}

/// Starts the HTTP server and runs until Ctrl-C.
#[instrument(skip(state))]
pub async fn start_server(addr: SocketAddr, state: GatewayState) -> Result<()> {
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let listener = TcpListener::bind(&addr).await?;
    info!("Gateway HTTP server listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Gateway HTTP server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "Failed to listen for Ctrl-C; shutting down");
    }
}

//! Gateway Health API

use axum::{extract::State, Json};
use serde::Serialize;

use crate::server::GatewayState;

#[derive(Serialize)]
pub struct HealthReport {
    pub status: &'static str,
    pub service: &'static str,
    pub version: &'static str,
    pub media_provider: String,
    pub uptime_seconds: u64,
}

/// Handler for `GET /api/health`
pub async fn get_health(State(state): State<GatewayState>) -> Json<HealthReport> {
    Json(HealthReport {
        status: "ok",
        service: "pixdrop",
        version: env!("CARGO_PKG_VERSION"),
        media_provider: state.fanout.service_name().to_string(),
        uptime_seconds: state.started_at.elapsed().as_secs(),
    })
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadLimits {
    pub max_files: usize,
    pub max_file_size_bytes: u64,
    pub allowed_types: Vec<String>,
}

/// Handler for `GET /api/limits`, read by the upload page.
pub async fn get_limits(State(state): State<GatewayState>) -> Json<UploadLimits> {
    Json(UploadLimits {
        max_files: state.policy.max_files,
        max_file_size_bytes: state.policy.max_file_size,
        allowed_types: state.policy.allowed_mime_types.clone(),
    })
}

//! Upload page static asset.

use axum::{response::Html, routing::get, Router};

use crate::server::GatewayState;

const INDEX_HTML: &str = include_str!("../assets/index.html");

/// Returns a router that serves the drag-and-drop upload page at `/`.
pub fn ui_router() -> Router<GatewayState> {
    Router::new().route("/", get(|| async { Html(INDEX_HTML) }))
}

//! pixdrop Gateway HTTP Server
//!
//! Accepts multipart image uploads, validates them, and forwards them to the
//! configured media service. Also serves the browser upload page.

pub mod control_ui;
pub mod error;
pub mod health_api;
pub mod server;
pub mod upload;

pub use error::ApiError;
pub use server::{build_router, start_server, GatewayState};
pub use upload::UploadResponse;

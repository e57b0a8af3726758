//! Telemetry and structured logging components for pixdrop.
//!
//! Handles log redaction, JSON output generation, file rotation, and upload event logging.

pub mod event_logger;
pub mod logger;
pub mod redact;

pub use event_logger::{UploadEvent, UploadEventEntry, UploadEventLogger};
pub use logger::{bootstrap_subscriber, bootstrap_subscriber_with_writer, init_logger, LogGuard};
pub use redact::redact_sensitive_data;

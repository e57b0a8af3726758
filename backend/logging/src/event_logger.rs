//! Upload Event Logger
//!
//! Structured per-request upload events (rejections, per-file results, totals)
//! emitted on the `upload_events` tracing target.

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{info, warn};
use uuid::Uuid;

use crate::redact::redact_sensitive_data;

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum UploadEvent {
    Rejected {
        kind: String,
        reason: String,
    },
    FileUploaded {
        file_name: String,
        url: String,
    },
    FileFailed {
        file_name: String,
        error: String,
    },
    Completed {
        uploaded: usize,
        failed: usize,
    },
}

#[derive(Debug, Serialize)]
pub struct UploadEventEntry {
    pub request_id: Uuid,
    pub timestamp: DateTime<Utc>,
    pub event: UploadEvent,
}

pub struct UploadEventLogger;

impl UploadEventLogger {
    /// Redact and emit one event. Failures and rejections log at WARN.
    pub fn log_event(request_id: Uuid, event: UploadEvent) -> UploadEventEntry {
        let entry = UploadEventEntry {
            request_id,
            timestamp: Utc::now(),
            event: Self::redacted(event),
        };

        let payload = serde_json::to_string(&entry).unwrap_or_default();
        match &entry.event {
            UploadEvent::FileFailed { .. } | UploadEvent::Rejected { .. } => {
                warn!(target: "upload_events", request_id = %request_id, event = %payload, "Upload event");
            }
            _ => {
                info!(target: "upload_events", request_id = %request_id, event = %payload, "Upload event");
            }
        }
        entry
    }

    fn redacted(mut event: UploadEvent) -> UploadEvent {
        match &mut event {
            UploadEvent::Rejected { reason, .. } => *reason = redact_sensitive_data(reason),
            UploadEvent::FileFailed { error, .. } => *error = redact_sensitive_data(error),
            UploadEvent::FileUploaded { .. } | UploadEvent::Completed { .. } => {}
        }
        event
    }
}

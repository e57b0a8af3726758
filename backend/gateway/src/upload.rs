//! `POST /api/upload`
//!
//! Validating -> {Rejected, FanningOut} -> {AllFailed, PartialOrFullSuccess}.
//! Nothing is retried and nothing outlives the request.

use axum::{
    extract::{multipart::MultipartRejection, Multipart, State},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::{info, info_span, warn, Instrument};
use uuid::Uuid;

use pixdrop_core::{
    collect_urls, validate_files, PendingFile, UploadError, UploadOutcome, UploadPolicy,
    UPLOAD_FIELD_NAME,
};
use pixdrop_logging::{UploadEvent, UploadEventLogger};

use crate::error::ApiError;
use crate::server::GatewayState;

const FALLBACK_MIME: &str = "application/octet-stream";

#[derive(Debug, Serialize, Deserialize)]
pub struct UploadResponse {
    pub urls: Vec<String>,
}

/// Handler for `POST /api/upload`.
pub async fn upload_files(
    State(state): State<GatewayState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<UploadResponse>, ApiError> {
    let request_id = Uuid::new_v4();
    handle_upload(state, request_id, multipart)
        .instrument(info_span!("upload", %request_id))
        .await
}

async fn handle_upload(
    state: GatewayState,
    request_id: Uuid,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<UploadResponse>, ApiError> {
    let multipart = multipart.map_err(|rejection| {
        warn!(error = %rejection.body_text(), "Rejected malformed upload request");
        ApiError::internal(rejection.body_text())
    })?;

    match process_upload(&state, request_id, multipart).await {
        Ok(urls) => {
            info!(uploaded = urls.len(), "Upload request completed");
            Ok(Json(UploadResponse { urls }))
        }
        Err(e) => {
            warn!(kind = e.kind(), error = %e, "Upload request failed");
            Err(ApiError::from(e))
        }
    }
}

async fn process_upload(
    state: &GatewayState,
    request_id: Uuid,
    multipart: Multipart,
) -> Result<Vec<String>, UploadError> {
    let files = read_files(multipart, &state.policy).await?;
    info!(files = files.len(), "Received upload request");

    if let Err(e) = validate_files(&state.policy, &files) {
        UploadEventLogger::log_event(
            request_id,
            UploadEvent::Rejected {
                kind: e.kind().to_string(),
                reason: e.to_string(),
            },
        );
        return Err(e);
    }

    let outcomes = state.fanout.run(&files).await;
    log_outcomes(request_id, &outcomes);
    collect_urls(&outcomes)
}

/// Collect every part under `files`, in order. Other fields are ignored.
///
/// A part keeps at most `max_file_size + 1` bytes; the rest is only counted
/// into `byte_size`, so validation sees the real size without the whole file
/// being buffered. Parts past `max_files` are recorded but left unread.
async fn read_files(
    mut multipart: Multipart,
    policy: &UploadPolicy,
) -> Result<Vec<PendingFile>, UploadError> {
    let keep = usize::try_from(policy.max_file_size)
        .unwrap_or(usize::MAX)
        .saturating_add(1);
    let mut files = Vec::new();

    while let Some(mut field) = multipart
        .next_field()
        .await
        .map_err(|e| UploadError::Unexpected(e.body_text()))?
    {
        if field.name() != Some(UPLOAD_FIELD_NAME) {
            continue;
        }
        let name = field.file_name().unwrap_or("blob").to_string();
        let mime_type = field.content_type().unwrap_or(FALLBACK_MIME).to_string();

        if files.len() >= policy.max_files {
            files.push(PendingFile::new(name, mime_type, Vec::<u8>::new()));
            continue;
        }

        let mut content = Vec::new();
        let mut byte_size = 0u64;
        while let Some(chunk) = field
            .chunk()
            .await
            .map_err(|e| UploadError::Unexpected(e.body_text()))?
        {
            byte_size += chunk.len() as u64;
            let room = keep.saturating_sub(content.len());
            content.extend_from_slice(&chunk[..chunk.len().min(room)]);
        }
        files.push(PendingFile {
            name,
            mime_type,
            byte_size,
            content: content.into(),
        });
    }

    Ok(files)
}

fn log_outcomes(request_id: Uuid, outcomes: &[UploadOutcome]) {
    let mut failed = 0;
    for outcome in outcomes {
        let event = match outcome {
            UploadOutcome::Success { file_name, url } => UploadEvent::FileUploaded {
                file_name: file_name.clone(),
                url: url.clone(),
            },
            UploadOutcome::Failure { file_name, cause } => {
                failed += 1;
                UploadEvent::FileFailed {
                    file_name: file_name.clone(),
                    error: cause.clone(),
                }
            }
        };
        UploadEventLogger::log_event(request_id, event);
    }
    UploadEventLogger::log_event(
        request_id,
        UploadEvent::Completed {
            uploaded: outcomes.len() - failed,
            failed,
        },
    );
}

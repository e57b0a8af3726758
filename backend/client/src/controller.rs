//! Client-side upload state machine: `Idle -> Uploading -> Idle`.
//!
//! The controller owns the pending queue and everything a UI renders:
//! progress, the inline error, the transient notification and the result
//! URLs. Only one request is in flight at a time; a `submit` while
//! uploading is a no-op.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Instant;

use serde::Deserialize;
use tracing::{debug, info, warn};

use pixdrop_core::{
    PendingFile, UploadError, UploadPolicy, UploadRequest, ValidationError, ValidationReason,
};

use crate::notification::{Notification, NotificationKind};
use crate::progress::ProgressState;
use crate::transport::{ProgressFn, TransportError, UploadTransport};

pub const SUCCESS_MESSAGE: &str = "Upload successful!";
pub const GENERIC_FAILURE_MESSAGE: &str = "Upload failed";
pub const NETWORK_ERROR_MESSAGE: &str = "Network error, please try again";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControllerState {
    Idle,
    Uploading,
}

/// What one call to [`UploadController::submit`] did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Queue empty or a request already in flight.
    Skipped,
    Succeeded(Vec<String>),
    Failed(String),
}

#[derive(Deserialize)]
struct SuccessBody {
    urls: Vec<String>,
}

#[derive(Deserialize)]
struct ErrorBody {
    error: Option<String>,
}

#[derive(Default)]
struct Inner {
    queue: Vec<PendingFile>,
    results: Vec<String>,
    uploading: bool,
    progress: ProgressState,
    error: Option<String>,
    notification: Option<Notification>,
}

impl Inner {
    fn fail(&mut self, message: &str) -> SubmitOutcome {
        self.error = Some(message.to_string());
        self.notification = Some(Notification::new(
            message,
            NotificationKind::Error,
            Instant::now(),
        ));
        SubmitOutcome::Failed(message.to_string())
    }
}

fn lock(inner: &Mutex<Inner>) -> MutexGuard<'_, Inner> {
    inner.lock().unwrap_or_else(PoisonError::into_inner)
}

pub struct UploadController<T> {
    transport: T,
    policy: UploadPolicy,
    inner: Arc<Mutex<Inner>>,
}

impl<T: UploadTransport> UploadController<T> {
    pub fn new(transport: T, policy: UploadPolicy) -> Self {
        Self {
            transport,
            policy,
            inner: Arc::new(Mutex::new(Inner::default())),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        lock(&self.inner)
    }

    /// Append files to the queue and return how many were added.
    ///
    /// The call is all-or-nothing: a file of a disallowed type, or a queue
    /// that would exceed `max_files`, leaves the queue untouched and surfaces
    /// the error. Any earlier error is cleared first.
    pub fn enqueue(&self, files: Vec<PendingFile>) -> Result<usize, UploadError> {
        let mut inner = self.lock();
        inner.error = None;

        let rejected: Vec<ValidationError> = files
            .iter()
            .filter(|f| !self.policy.allows_type(&f.mime_type))
            .map(|f| ValidationError::new(f.name.clone(), ValidationReason::InvalidType))
            .collect();

        let err = if !rejected.is_empty() {
            Some(UploadError::InvalidFiles(rejected))
        } else if inner.queue.len() + files.len() > self.policy.max_files {
            Some(UploadError::TooManyFiles {
                max: self.policy.max_files,
            })
        } else {
            None
        };
        if let Some(err) = err {
            inner.error = Some(err.to_string());
            return Err(err);
        }

        let count = files.len();
        inner.queue.extend(files);
        Ok(count)
    }

    /// Remove one queued file by position. An in-flight request keeps its own copy.
    pub fn dequeue(&self, index: usize) -> Option<PendingFile> {
        let mut inner = self.lock();
        (index < inner.queue.len()).then(|| inner.queue.remove(index))
    }

    /// Send the whole queue as one request and settle into a terminal state.
    pub async fn submit(&self) -> SubmitOutcome {
        let request = {
            let mut inner = self.lock();
            if inner.uploading || inner.queue.is_empty() {
                return SubmitOutcome::Skipped;
            }
            let request = match UploadRequest::new(inner.queue.clone(), &self.policy) {
                Ok(request) => request,
                Err(e) => return inner.fail(&e.to_string()),
            };
            inner.uploading = true;
            inner.progress.reset();
            inner.error = None;
            request
        };

        info!(files = request.len(), total_bytes = request.total_bytes(), "upload started");

        let shared = Arc::clone(&self.inner);
        let on_progress: ProgressFn = Arc::new(move |sent, total| {
            lock(&shared).progress.update(sent, total);
        });
        let result = self.transport.send(&request, on_progress).await;

        let mut inner = self.lock();
        inner.uploading = false;

        match result {
            Ok(response) if response.status == 200 => {
                match serde_json::from_str::<SuccessBody>(&response.body) {
                    Ok(body) => {
                        info!(uploaded = body.urls.len(), "upload succeeded");
                        inner.results = body.urls.clone();
                        inner.queue.clear();
                        inner.notification = Some(Notification::new(
                            SUCCESS_MESSAGE,
                            NotificationKind::Success,
                            Instant::now(),
                        ));
                        SubmitOutcome::Succeeded(body.urls)
                    }
                    Err(e) => {
                        warn!(error = %e, "unreadable success body");
                        inner.fail(GENERIC_FAILURE_MESSAGE)
                    }
                }
            }
            Ok(response) => {
                let message = serde_json::from_str::<ErrorBody>(&response.body)
                    .ok()
                    .and_then(|b| b.error)
                    .filter(|m| !m.is_empty())
                    .unwrap_or_else(|| GENERIC_FAILURE_MESSAGE.to_string());
                warn!(status = response.status, error = %message, "upload rejected");
                inner.fail(&message)
            }
            Err(TransportError::Network(detail)) => {
                debug!(detail = %detail, "upload transport failed");
                inner.fail(NETWORK_ERROR_MESSAGE)
            }
            Err(TransportError::Build(detail)) => {
                warn!(detail = %detail, "upload request could not be built");
                inner.fail(GENERIC_FAILURE_MESSAGE)
            }
        }
    }

    pub fn state(&self) -> ControllerState {
        if self.lock().uploading {
            ControllerState::Uploading
        } else {
            ControllerState::Idle
        }
    }

    pub fn is_uploading(&self) -> bool {
        self.state() == ControllerState::Uploading
    }

    pub fn queue(&self) -> Vec<PendingFile> {
        self.lock().queue.clone()
    }

    pub fn results(&self) -> Vec<String> {
        self.lock().results.clone()
    }

    pub fn progress(&self) -> u8 {
        self.lock().progress.percent()
    }

    /// Persistent inline error; cleared by the next `enqueue` or `submit`.
    pub fn error(&self) -> Option<String> {
        self.lock().error.clone()
    }

    pub fn visible_notification(&self, now: Instant) -> Option<Notification> {
        self.lock()
            .notification
            .clone()
            .filter(|n| n.is_visible_at(now))
    }
}

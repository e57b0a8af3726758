//! Bounded-concurrency fan-out of one request's files to the media service.
//!
//! Files are cut into fixed-size batches. Batches run one after another and
//! every upload inside a batch runs concurrently, so at most `batch_size`
//! calls from one request are ever outstanding. A failed file becomes an
//! `UploadOutcome::Failure`; it never cancels its siblings or later batches.

use std::sync::Arc;
use std::time::Instant;

use futures::future::join_all;
use tracing::{debug, warn};

use pixdrop_core::{MediaUploadService, PendingFile, UploadOptions, UploadOutcome};

pub struct UploadFanout {
    service: Arc<dyn MediaUploadService>,
    options: UploadOptions,
    batch_size: usize,
}

impl UploadFanout {
    pub fn new(service: Arc<dyn MediaUploadService>, options: UploadOptions, batch_size: usize) -> Self {
        Self {
            service,
            options,
            batch_size: batch_size.max(1),
        }
    }

    pub fn service_name(&self) -> &str {
        self.service.name()
    }

    pub fn batch_size(&self) -> usize {
        self.batch_size
    }

    pub fn options(&self) -> &UploadOptions {
        &self.options
    }

    /// Upload every file and return one outcome per file, in submission order.
    pub async fn run(&self, files: &[PendingFile]) -> Vec<UploadOutcome> {
        let mut outcomes = Vec::with_capacity(files.len());

        for (index, batch) in files.chunks(self.batch_size).enumerate() {
            let started = Instant::now();
            debug!(batch = index, files = batch.len(), "Starting upload batch");

            let results = join_all(batch.iter().map(|file| self.upload_one(file))).await;

            debug!(
                batch = index,
                elapsed_ms = started.elapsed().as_millis() as u64,
                succeeded = results.iter().filter(|o| o.is_success()).count(),
                "Upload batch settled"
            );
            outcomes.extend(results);
        }

        outcomes
    }

    async fn upload_one(&self, file: &PendingFile) -> UploadOutcome {
        match self.service.upload(file, &self.options).await {
            Ok(url) => {
                debug!(file = %file.name, url = %url, "File uploaded");
                UploadOutcome::Success {
                    file_name: file.name.clone(),
                    url,
                }
            }
            Err(e) => {
                warn!(
                    file = %file.name,
                    provider = self.service.name(),
                    error = %e,
                    "Failed to upload file"
                );
                UploadOutcome::Failure {
                    file_name: file.name.clone(),
                    cause: format!("{e:#}"),
                }
            }
        }
    }
}

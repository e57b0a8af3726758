//! In-memory media service used by tests and `serve --mock-media`.

use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use anyhow::{bail, Result};
use async_trait::async_trait;

use pixdrop_core::{MediaUploadService, PendingFile, UploadOptions};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MockEvent {
    Started(String),
    Finished(String),
}

/// A media service that returns deterministic URLs and records call activity.
pub struct MockMediaService {
    base_url: String,
    latency: Duration,
    fail_names: HashSet<String>,
    fail_all: bool,
    calls: AtomicUsize,
    in_flight: AtomicUsize,
    peak: AtomicUsize,
    events: Mutex<Vec<MockEvent>>,
}

impl Default for MockMediaService {
    fn default() -> Self {
        Self::new()
    }
}

impl MockMediaService {
    pub fn new() -> Self {
        Self {
            base_url: "https://media.example.test".to_string(),
            latency: Duration::ZERO,
            fail_names: HashSet::new(),
            fail_all: false,
            calls: AtomicUsize::new(0),
            in_flight: AtomicUsize::new(0),
            peak: AtomicUsize::new(0),
            events: Mutex::new(Vec::new()),
        }
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    /// Fail every upload of a file with this name.
    pub fn failing_on(mut self, file_name: impl Into<String>) -> Self {
        self.fail_names.insert(file_name.into());
        self
    }

    pub fn failing_all(mut self) -> Self {
        self.fail_all = true;
        self
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Highest number of simultaneously outstanding calls seen so far.
    pub fn peak_in_flight(&self) -> usize {
        self.peak.load(Ordering::SeqCst)
    }

    pub fn events(&self) -> Vec<MockEvent> {
        self.events.lock().map(|e| e.clone()).unwrap_or_default()
    }

    fn record(&self, event: MockEvent) {
        if let Ok(mut events) = self.events.lock() {
            events.push(event);
        }
    }
}

struct InFlight<'a>(&'a AtomicUsize);

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

#[async_trait]
impl MediaUploadService for MockMediaService {
    fn name(&self) -> &str {
        "mock"
    }

    async fn upload(&self, file: &PendingFile, options: &UploadOptions) -> Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        let _guard = InFlight(&self.in_flight);
        self.peak.fetch_max(now, Ordering::SeqCst);
        self.record(MockEvent::Started(file.name.clone()));

        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }

        self.record(MockEvent::Finished(file.name.clone()));
        if self.fail_all || self.fail_names.contains(&file.name) {
            bail!("mock upload rejected {}", file.name);
        }
        Ok(format!("{}/{}/{}", self.base_url, options.folder, file.name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn builds_url_from_folder_and_name() {
        let mock = MockMediaService::new().with_base_url("https://cdn.test");
        let file = PendingFile::new("a.png", "image/png", vec![1u8]);
        let url = mock
            .upload(&file, &UploadOptions::auto_optimized("latihan1"))
            .await
            .unwrap();
        assert_eq!(url, "https://cdn.test/latihan1/a.png");
        assert_eq!(mock.events().len(), 2);
    }

    #[tokio::test]
    async fn failing_all_rejects_everything() {
        let mock = MockMediaService::new().failing_all();
        let file = PendingFile::new("a.png", "image/png", vec![1u8]);
        assert!(mock.upload(&file, &UploadOptions::auto_optimized("x")).await.is_err());
        assert_eq!(mock.call_count(), 1);
    }
}

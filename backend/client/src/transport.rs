//! HTTP transport for one multipart upload request.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;
use futures::stream::{self, StreamExt};
use reqwest::multipart::{Form, Part};
use thiserror::Error;

use pixdrop_core::{UploadRequest, UPLOAD_FIELD_NAME, UPLOAD_PATH};

/// Progress callback: `(bytes_sent, total_bytes)`.
///
/// `HttpTransport` counts a chunk as sent when the HTTP client pulls it from
/// the body stream, not when it reaches the socket. On a slow link the
/// reported figure can run ahead of the wire by the client's write buffer.
pub type ProgressFn = Arc<dyn Fn(u64, u64) + Send + Sync>;

const DEFAULT_CHUNK_SIZE: usize = 64 * 1024;

/// Whatever the server answered, before any interpretation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportResponse {
    pub status: u16,
    pub body: String,
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TransportError {
    /// No response arrived: connection refused, reset, timed out.
    #[error("network error: {0}")]
    Network(String),

    /// The request could not be assembled locally.
    #[error("invalid request: {0}")]
    Build(String),
}

/// Sends one upload request and reports byte-level progress.
#[async_trait]
pub trait UploadTransport: Send + Sync {
    async fn send(
        &self,
        request: &UploadRequest,
        on_progress: ProgressFn,
    ) -> Result<TransportResponse, TransportError>;
}

/// reqwest-backed transport posting to `{endpoint}/api/upload`.
pub struct HttpTransport {
    client: reqwest::Client,
    endpoint: String,
    chunk_size: usize,
}

impl HttpTransport {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self::with_client(reqwest::Client::new(), endpoint)
    }

    pub fn with_client(client: reqwest::Client, endpoint: impl Into<String>) -> Self {
        Self {
            client,
            endpoint: endpoint.into(),
            chunk_size: DEFAULT_CHUNK_SIZE,
        }
    }

    /// Granularity of progress events.
    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size.max(1);
        self
    }

    pub fn upload_url(&self) -> String {
        format!("{}{}", self.endpoint.trim_end_matches('/'), UPLOAD_PATH)
    }
}

fn split_chunks(content: &Bytes, chunk_size: usize) -> Vec<Bytes> {
    (0..content.len())
        .step_by(chunk_size)
        .map(|start| content.slice(start..(start + chunk_size).min(content.len())))
        .collect()
}

#[async_trait]
impl UploadTransport for HttpTransport {
    async fn send(
        &self,
        request: &UploadRequest,
        on_progress: ProgressFn,
    ) -> Result<TransportResponse, TransportError> {
        let total: u64 = request.files().iter().map(|f| f.content.len() as u64).sum();
        let sent = Arc::new(AtomicU64::new(0));

        let mut form = Form::new();
        for file in request.files() {
            let sent = Arc::clone(&sent);
            let progress = Arc::clone(&on_progress);
            let chunks = split_chunks(&file.content, self.chunk_size);
            // Counted on hand-off to the client.
            let body = stream::iter(chunks).map(move |chunk| {
                let now = sent.fetch_add(chunk.len() as u64, Ordering::SeqCst) + chunk.len() as u64;
                progress(now, total);
                Ok::<Bytes, std::io::Error>(chunk)
            });

            let part = Part::stream_with_length(
                reqwest::Body::wrap_stream(body),
                file.content.len() as u64,
            )
            .file_name(file.name.clone())
            .mime_str(&file.mime_type)
            .map_err(|e| TransportError::Build(format!("{}: {e}", file.name)))?;
            form = form.part(UPLOAD_FIELD_NAME, part);
        }

        let url = self.upload_url();
        tracing::debug!(url = %url, files = request.len(), total_bytes = total, "sending upload");

        let response = self
            .client
            .post(&url)
            .multipart(form)
            .send()
            .await
            .map_err(|e| TransportError::Network(e.to_string()))?;

        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| TransportError::Network(e.to_string()))?;
        Ok(TransportResponse { status, body })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    use axum::extract::Multipart;
    use axum::routing::post;
    use axum::{Json, Router};
    use pixdrop_core::{PendingFile, UploadPolicy};
    use serde_json::{json, Value};

    async fn echo_sizes(mut multipart: Multipart) -> Json<Value> {
        let mut parts = Vec::new();
        while let Some(field) = multipart.next_field().await.unwrap() {
            let name = field.name().unwrap_or_default().to_string();
            let file_name = field.file_name().unwrap_or_default().to_string();
            let mime = field.content_type().unwrap_or_default().to_string();
            let size = field.bytes().await.unwrap().len();
            parts.push(json!({ "field": name, "file": file_name, "mime": mime, "size": size }));
        }
        Json(json!({ "parts": parts }))
    }

    async fn spawn_stub() -> String {
        let app = Router::new().route("/api/upload", post(echo_sizes));
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{addr}")
    }

    #[test]
    fn chunks_cover_content() {
        let content = Bytes::from(vec![1u8; 10]);
        let chunks = split_chunks(&content, 4);
        assert_eq!(chunks.iter().map(Bytes::len).collect::<Vec<_>>(), vec![4, 4, 2]);
        assert!(split_chunks(&Bytes::new(), 4).is_empty());
    }

    #[test]
    fn upload_url_joins_path() {
        let t = HttpTransport::new("http://localhost:3000/");
        assert_eq!(t.upload_url(), "http://localhost:3000/api/upload");
    }

    #[tokio::test]
    async fn posts_every_file_under_shared_field() {
        let base = spawn_stub().await;
        let transport = HttpTransport::new(base).with_chunk_size(1024);
        let request = UploadRequest::new(
            vec![
                PendingFile::new("a.png", "image/png", vec![0u8; 3000]),
                PendingFile::new("b.jpg", "image/jpeg", vec![0u8; 1000]),
            ],
            &UploadPolicy::default(),
        )
        .unwrap();

        let events = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&events);
        let on_progress: ProgressFn = Arc::new(move |sent, total| {
            sink.lock().unwrap().push((sent, total));
        });

        let response = transport.send(&request, on_progress).await.unwrap();
        assert_eq!(response.status, 200);

        let body: Value = serde_json::from_str(&response.body).unwrap();
        let parts = body["parts"].as_array().unwrap();
        assert_eq!(parts.len(), 2);
        assert_eq!(parts[0]["field"], "files");
        assert_eq!(parts[0]["file"], "a.png");
        assert_eq!(parts[0]["size"], 3000);
        assert_eq!(parts[1]["mime"], "image/jpeg");

        let events = events.lock().unwrap();
        assert!(events.windows(2).all(|w| w[0].0 <= w[1].0));
        assert_eq!(events.last().copied(), Some((4000, 4000)));
    }

    #[tokio::test]
    async fn unreachable_server_is_network_error() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let transport = HttpTransport::new(format!("http://{addr}"));
        let request = UploadRequest::new(
            vec![PendingFile::new("a.png", "image/png", vec![0u8; 16])],
            &UploadPolicy::default(),
        )
        .unwrap();
        let err = transport.send(&request, Arc::new(|_, _| {})).await.unwrap_err();
        assert!(matches!(err, TransportError::Network(_)));
    }
}

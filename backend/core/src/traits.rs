use anyhow::Result;
use async_trait::async_trait;

use crate::types::{PendingFile, UploadOptions};

/// An external hosted media service that stores a file and returns its URL.
///
/// Implementations must be safe to call concurrently from one request.
#[async_trait]
pub trait MediaUploadService: Send + Sync {
    /// Provider name (e.g., "cloudinary", "mock").
    fn name(&self) -> &str;

    /// Upload one file and return its secure, retrievable URL.
    async fn upload(&self, file: &PendingFile, options: &UploadOptions) -> Result<String>;
}

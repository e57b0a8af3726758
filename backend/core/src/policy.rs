//! Upload limits applied to every request.

use serde::{Deserialize, Serialize};

/// Default maximum number of files per request.
pub const DEFAULT_MAX_FILES: usize = 5;

/// Default maximum size of a single file (5 MiB).
pub const DEFAULT_MAX_FILE_SIZE: u64 = 5 * 1024 * 1024;

/// Default number of concurrent media service calls per request.
pub const DEFAULT_BATCH_SIZE: usize = 3;

/// Multipart field name shared by every uploaded file.
pub const UPLOAD_FIELD_NAME: &str = "files";

/// Path of the upload endpoint.
pub const UPLOAD_PATH: &str = "/api/upload";

/// MIME types accepted by default.
pub const DEFAULT_ALLOWED_MIME_TYPES: &[&str] = &["image/jpeg", "image/png", "image/webp"];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadPolicy {
    pub max_files: usize,
    pub max_file_size: u64,
    pub allowed_mime_types: Vec<String>,
    pub batch_size: usize,
}

impl Default for UploadPolicy {
    fn default() -> Self {
        Self {
            max_files: DEFAULT_MAX_FILES,
            max_file_size: DEFAULT_MAX_FILE_SIZE,
            allowed_mime_types: DEFAULT_ALLOWED_MIME_TYPES
                .iter()
                .map(|s| s.to_string())
                .collect(),
            batch_size: DEFAULT_BATCH_SIZE,
        }
    }
}

impl UploadPolicy {
    pub fn allows_type(&self, mime_type: &str) -> bool {
        self.allowed_mime_types.iter().any(|t| t == mime_type)
    }

    pub fn allows_size(&self, byte_size: u64) -> bool {
        byte_size <= self.max_file_size
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_limits() {
        let p = UploadPolicy::default();
        assert_eq!(p.max_files, 5);
        assert_eq!(p.max_file_size, 5_242_880);
        assert_eq!(p.batch_size, 3);
        assert!(p.allows_type("image/webp"));
        assert!(!p.allows_type("image/gif"));
    }

    #[test]
    fn size_limit_is_inclusive() {
        let p = UploadPolicy::default();
        assert!(p.allows_size(DEFAULT_MAX_FILE_SIZE));
        assert!(!p.allows_size(DEFAULT_MAX_FILE_SIZE + 1));
    }
}

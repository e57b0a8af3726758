//! Domain types shared by the upload gateway and the upload client.

use bytes::Bytes;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::UploadError;
use crate::policy::UploadPolicy;

// ---------------------------------------------------------------------------
// Files
// ---------------------------------------------------------------------------

/// A locally held file: what the user picked, or what one multipart part carried.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingFile {
    pub name: String,
    pub mime_type: String,
    /// Declared size in bytes.
    pub byte_size: u64,
    pub content: Bytes,
}

impl PendingFile {
    /// Build a file whose declared size is its content length.
    pub fn new(name: impl Into<String>, mime_type: impl Into<String>, content: impl Into<Bytes>) -> Self {
        let content = content.into();
        Self {
            name: name.into(),
            mime_type: mime_type.into(),
            byte_size: content.len() as u64,
            content,
        }
    }
}

/// An ordered, immutable batch of 1..=`max_files` files sent in one request.
#[derive(Debug, Clone)]
pub struct UploadRequest {
    files: Vec<PendingFile>,
}

impl UploadRequest {
    pub fn new(files: Vec<PendingFile>, policy: &UploadPolicy) -> Result<Self, UploadError> {
        if files.is_empty() {
            return Err(UploadError::NoFilesProvided);
        }
        if files.len() > policy.max_files {
            return Err(UploadError::TooManyFiles { max: policy.max_files });
        }
        Ok(Self { files })
    }

    pub fn files(&self) -> &[PendingFile] {
        &self.files
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Sum of declared sizes.
    pub fn total_bytes(&self) -> u64 {
        self.files.iter().map(|f| f.byte_size).sum()
    }
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "reason")]
pub enum ValidationReason {
    InvalidType,
    TooLarge { max_bytes: u64 },
    TooManyFiles { max: usize },
}

/// One rule violation for one file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationError {
    pub file_name: String,
    #[serde(flatten)]
    pub reason: ValidationReason,
}

impl ValidationError {
    pub fn new(file_name: impl Into<String>, reason: ValidationReason) -> Self {
        Self {
            file_name: file_name.into(),
            reason,
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.reason {
            ValidationReason::InvalidType => write!(f, "{}: Invalid file type", self.file_name),
            ValidationReason::TooLarge { max_bytes } => write!(
                f,
                "{}: File too large (max {}MB)",
                self.file_name,
                max_bytes / (1024 * 1024)
            ),
            ValidationReason::TooManyFiles { max } => {
                write!(f, "{}: Maximum {max} files allowed", self.file_name)
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Outcomes
// ---------------------------------------------------------------------------

/// Result of forwarding one file to the media service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum UploadOutcome {
    Success { file_name: String, url: String },
    Failure { file_name: String, cause: String },
}

impl UploadOutcome {
    pub fn file_name(&self) -> &str {
        match self {
            UploadOutcome::Success { file_name, .. } | UploadOutcome::Failure { file_name, .. } => {
                file_name
            }
        }
    }

    pub fn url(&self) -> Option<&str> {
        match self {
            UploadOutcome::Success { url, .. } => Some(url),
            UploadOutcome::Failure { .. } => None,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, UploadOutcome::Success { .. })
    }
}

// ---------------------------------------------------------------------------
// Media service options
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceKind {
    #[default]
    Image,
}

impl ResourceKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ResourceKind::Image => "image",
        }
    }
}

/// A delivery-time optimisation directive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Transformation {
    Quality(String),
    FetchFormat(String),
}

impl Transformation {
    /// Provider short form, e.g. `q_auto`.
    pub fn directive(&self) -> String {
        match self {
            Transformation::Quality(v) => format!("q_{v}"),
            Transformation::FetchFormat(v) => format!("f_{v}"),
        }
    }
}

/// Per-file configuration sent along with each upload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadOptions {
    pub folder: String,
    pub resource_kind: ResourceKind,
    pub transformations: Vec<Transformation>,
}

impl UploadOptions {
    /// Image upload into `folder` with automatic quality and format.
    pub fn auto_optimized(folder: impl Into<String>) -> Self {
        Self {
            folder: folder.into(),
            resource_kind: ResourceKind::Image,
            transformations: vec![
                Transformation::Quality("auto".into()),
                Transformation::FetchFormat("auto".into()),
            ],
        }
    }

    /// Chained transformation string, one component per directive.
    pub fn transformation_string(&self) -> String {
        self.transformations
            .iter()
            .map(Transformation::directive)
            .collect::<Vec<_>>()
            .join("/")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_rejects_empty_and_oversized() {
        let policy = UploadPolicy::default();
        assert_eq!(
            UploadRequest::new(vec![], &policy).unwrap_err(),
            UploadError::NoFilesProvided
        );
        let files = (0..6)
            .map(|i| PendingFile::new(format!("{i}.png"), "image/png", vec![0u8; 4]))
            .collect();
        assert_eq!(
            UploadRequest::new(files, &policy).unwrap_err(),
            UploadError::TooManyFiles { max: 5 }
        );
    }

    #[test]
    fn request_totals_declared_sizes() {
        let files = vec![
            PendingFile::new("a.png", "image/png", vec![0u8; 10]),
            PendingFile::new("b.png", "image/png", vec![0u8; 32]),
        ];
        let req = UploadRequest::new(files, &UploadPolicy::default()).unwrap();
        assert_eq!(req.total_bytes(), 42);
        assert_eq!(req.files()[1].name, "b.png");
    }

    #[test]
    fn auto_optimized_transformation_string() {
        let opts = UploadOptions::auto_optimized("latihan1");
        assert_eq!(opts.transformation_string(), "q_auto/f_auto");
        assert_eq!(opts.resource_kind.as_str(), "image");
    }

    #[test]
    fn outcome_accessors() {
        let ok = UploadOutcome::Success { file_name: "a.png".into(), url: "https://x/a.png".into() };
        let bad = UploadOutcome::Failure { file_name: "b.png".into(), cause: "boom".into() };
        assert_eq!(ok.url(), Some("https://x/a.png"));
        assert!(bad.url().is_none());
        assert_eq!(bad.file_name(), "b.png");
    }
}

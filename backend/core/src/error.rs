use thiserror::Error;

use crate::types::ValidationError;

/// Top-level error type for an upload request.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum UploadError {
    #[error("No files uploaded")]
    NoFilesProvided,

    #[error("Maximum {max} files allowed")]
    TooManyFiles { max: usize },

    #[error("{}", join_reasons(.0))]
    InvalidFiles(Vec<ValidationError>),

    #[error("Failed to upload {file_name}: {cause}")]
    PerFileUploadFailure { file_name: String, cause: String },

    #[error("All files failed to upload")]
    AllUploadsFailed,

    #[error("{0}")]
    Unexpected(String),

    #[error("network error: {0}")]
    Network(String),
}

impl UploadError {
    /// Stable snake_case label for structured logs.
    pub fn kind(&self) -> &'static str {
        match self {
            UploadError::NoFilesProvided => "no_files_provided",
            UploadError::TooManyFiles { .. } => "too_many_files",
            UploadError::InvalidFiles(_) => "invalid_files",
            UploadError::PerFileUploadFailure { .. } => "per_file_upload_failure",
            UploadError::AllUploadsFailed => "all_uploads_failed",
            UploadError::Unexpected(_) => "unexpected",
            UploadError::Network(_) => "network",
        }
    }

    /// Validation errors are request-fatal and raised before any external call.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            UploadError::NoFilesProvided
                | UploadError::TooManyFiles { .. }
                | UploadError::InvalidFiles(_)
        )
    }
}

fn join_reasons(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

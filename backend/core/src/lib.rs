pub mod error;
pub mod policy;
pub mod traits;
pub mod types;
pub mod validation;

pub use error::UploadError;
pub use policy::{UploadPolicy, UPLOAD_FIELD_NAME, UPLOAD_PATH};
pub use traits::MediaUploadService;
pub use types::{
    PendingFile, ResourceKind, Transformation, UploadOptions, UploadOutcome, UploadRequest,
    ValidationError, ValidationReason,
};
pub use validation::{check_file, collect_urls, validate_files};

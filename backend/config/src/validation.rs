//! Config validation: deep schema checks with user-friendly error messages.

use crate::schema::{MediaProvider, PixdropConfig};
use thiserror::Error;

/// A config validation error with field path and message.
#[derive(Debug, Error)]
#[error("Config validation error at '{path}': {message}")]
pub struct ConfigValidationError {
    pub path: String,
    pub message: String,
}

/// A collection of validation errors found in one pass.
#[derive(Debug, Default)]
pub struct ValidationReport {
    pub errors: Vec<ConfigValidationError>,
    pub warnings: Vec<ConfigValidationError>,
}

impl ValidationReport {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    fn error(&mut self, path: impl Into<String>, message: impl Into<String>) {
        self.errors.push(ConfigValidationError {
            path: path.into(),
            message: message.into(),
        });
    }

    fn warn(&mut self, path: impl Into<String>, message: impl Into<String>) {
        self.warnings.push(ConfigValidationError {
            path: path.into(),
            message: message.into(),
        });
    }
}

/// Validate the config and return a report of all errors and warnings.
pub fn validate(config: &PixdropConfig) -> ValidationReport {
    let mut report = ValidationReport::default();
    validate_server(config, &mut report);
    validate_media(config, &mut report);
    validate_upload(config, &mut report);
    report
}

fn validate_server(config: &PixdropConfig, report: &mut ValidationReport) {
    let port = config.port();
    if port < 1024 && port != 80 && port != 443 {
        report.warn(
            "server.port",
            format!("Port {port} requires elevated privileges; consider using a port >= 1024"),
        );
    }
}

/// Cloudinary needs credentials, either as a URL or as three fields.
fn validate_media(config: &PixdropConfig, report: &mut ValidationReport) {
    if config.media_provider() != MediaProvider::Cloudinary {
        report.warn("media.provider", "Mock media provider: uploads are not stored anywhere");
        return;
    }
    let has_credentials = config
        .media
        .as_ref()
        .map(|m| m.has_credentials())
        .unwrap_or(false);
    if !has_credentials {
        report.error(
            "media",
            "Cloudinary credentials are required: set CLOUDINARY_URL or CLOUDINARY_CLOUD_NAME, CLOUDINARY_API_KEY and CLOUDINARY_API_SECRET",
        );
    }
    if config.upload_folder().trim().is_empty() {
        report.error("media.folder", "Upload folder cannot be empty");
    }
}

fn validate_upload(config: &PixdropConfig, report: &mut ValidationReport) {
    let policy = config.upload_policy();
    if policy.max_files == 0 {
        report.error("upload.maxFiles", "maxFiles must be >= 1");
    }
    if policy.max_file_size == 0 {
        report.error("upload.maxFileSizeBytes", "maxFileSizeBytes must be > 0");
    }
    if policy.batch_size == 0 {
        report.error("upload.batchSize", "batchSize must be >= 1");
    }
    if policy.allowed_mime_types.is_empty() {
        report.error("upload.allowedTypes", "At least one MIME type must be allowed");
    }
    for (i, mime) in policy.allowed_mime_types.iter().enumerate() {
        if !mime.starts_with("image/") {
            report.warn(
                format!("upload.allowedTypes[{i}]"),
                format!("'{mime}' is not an image type; the media service expects images"),
            );
        }
    }
}

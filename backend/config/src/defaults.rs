//! Config defaults: applies sensible default values to parsed config.

use pixdrop_core::UploadPolicy;

use crate::schema::{LoggingConfig, MediaConfig, PixdropConfig, ServerConfig, UploadConfig};

/// Default bind address.
pub const DEFAULT_BIND: &str = "0.0.0.0";

/// Default HTTP port.
pub const DEFAULT_PORT: u16 = 3000;

/// Default destination folder on the media service.
pub const DEFAULT_FOLDER: &str = "latihan1";

/// Default log level.
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Apply all defaults to a freshly loaded config.
pub fn apply_all_defaults(config: PixdropConfig) -> PixdropConfig {
    let config = apply_server_defaults(config);
    let config = apply_media_defaults(config);
    let config = apply_upload_defaults(config);
    apply_logging_defaults(config)
}

fn apply_server_defaults(mut config: PixdropConfig) -> PixdropConfig {
    let server = config.server.get_or_insert_with(ServerConfig::default);
    server.bind.get_or_insert_with(|| DEFAULT_BIND.to_string());
    server.port.get_or_insert(DEFAULT_PORT);
    config
}

fn apply_media_defaults(mut config: PixdropConfig) -> PixdropConfig {
    let media = config.media.get_or_insert_with(MediaConfig::default);
    media.provider.get_or_insert_with(Default::default);
    media.folder.get_or_insert_with(|| DEFAULT_FOLDER.to_string());
    config
}

/// Fill unset upload limits from `UploadPolicy::default()`.
fn apply_upload_defaults(mut config: PixdropConfig) -> PixdropConfig {
    let policy = UploadPolicy::default();
    let upload = config.upload.get_or_insert_with(UploadConfig::default);
    upload.max_files.get_or_insert(policy.max_files);
    upload.max_file_size_bytes.get_or_insert(policy.max_file_size);
    upload
        .allowed_types
        .get_or_insert_with(|| policy.allowed_mime_types.clone());
    upload.batch_size.get_or_insert(policy.batch_size);
    config
}

fn apply_logging_defaults(mut config: PixdropConfig) -> PixdropConfig {
    let logging = config.logging.get_or_insert_with(LoggingConfig::default);
    logging.level.get_or_insert_with(|| DEFAULT_LOG_LEVEL.to_string());
    logging.json.get_or_insert(false);
    config
}

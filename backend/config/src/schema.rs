//! pixdrop runtime configuration schema.
//!
//! Every section is optional so a partial YAML file deserializes cleanly;
//! `defaults::apply_all_defaults` fills in the rest.

use serde::{Deserialize, Serialize};

use pixdrop_core::UploadPolicy;

use crate::defaults::{DEFAULT_BIND, DEFAULT_FOLDER, DEFAULT_LOG_LEVEL, DEFAULT_PORT};

// ---------------------------------------------------------------------------
// Top-level config
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PixdropConfig {
    /// HTTP server settings
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub server: Option<ServerConfig>,

    /// External media service settings
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub media: Option<MediaConfig>,

    /// Per-request upload limits
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub upload: Option<UploadConfig>,

    /// Logging configuration
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logging: Option<LoggingConfig>,
}

// ---------------------------------------------------------------------------
// Sections
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServerConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bind: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub port: Option<u16>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaProvider {
    #[default]
    Cloudinary,
    Mock,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MediaConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provider: Option<MediaProvider>,
    /// `cloudinary://<key>:<secret>@<cloud>`; takes precedence over the split fields
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cloudinary_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cloud_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_secret: Option<String>,
    /// Destination folder for uploaded assets
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub folder: Option<String>,
    /// Override of the provider API origin
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
}

impl MediaConfig {
    /// True when either the URL form or all three split credentials are present.
    pub fn has_credentials(&self) -> bool {
        let set = |v: &Option<String>| v.as_deref().map(|s| !s.is_empty()).unwrap_or(false);
        set(&self.cloudinary_url) || (set(&self.cloud_name) && set(&self.api_key) && set(&self.api_secret))
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_files: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_file_size_bytes: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allowed_types: Option<Vec<String>>,
    /// Concurrent media service calls per request
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub batch_size: Option<usize>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoggingConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub level: Option<String>,
    /// Directory for rolling NDJSON logs; console only when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dir: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub json: Option<bool>,
}

// ---------------------------------------------------------------------------
// Resolved accessors
// ---------------------------------------------------------------------------

impl PixdropConfig {
    pub fn bind_address(&self) -> String {
        self.server
            .as_ref()
            .and_then(|s| s.bind.clone())
            .unwrap_or_else(|| DEFAULT_BIND.to_string())
    }

    pub fn port(&self) -> u16 {
        self.server.as_ref().and_then(|s| s.port).unwrap_or(DEFAULT_PORT)
    }

    pub fn media_provider(&self) -> MediaProvider {
        self.media.as_ref().and_then(|m| m.provider).unwrap_or_default()
    }

    pub fn upload_folder(&self) -> String {
        self.media
            .as_ref()
            .and_then(|m| m.folder.clone())
            .unwrap_or_else(|| DEFAULT_FOLDER.to_string())
    }

    /// Upload limits with unset fields taken from `UploadPolicy::default()`.
    pub fn upload_policy(&self) -> UploadPolicy {
        let mut policy = UploadPolicy::default();
        if let Some(upload) = &self.upload {
            if let Some(v) = upload.max_files {
                policy.max_files = v;
            }
            if let Some(v) = upload.max_file_size_bytes {
                policy.max_file_size = v;
            }
            if let Some(v) = &upload.allowed_types {
                policy.allowed_mime_types = v.clone();
            }
            if let Some(v) = upload.batch_size {
                policy.batch_size = v;
            }
        }
        policy
    }

    pub fn log_level(&self) -> String {
        self.logging
            .as_ref()
            .and_then(|l| l.level.clone())
            .unwrap_or_else(|| DEFAULT_LOG_LEVEL.to_string())
    }

    pub fn log_dir(&self) -> Option<String> {
        self.logging.as_ref().and_then(|l| l.dir.clone())
    }

    pub fn log_json(&self) -> bool {
        self.logging.as_ref().and_then(|l| l.json).unwrap_or(false)
    }
}

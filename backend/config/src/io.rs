//! Config file location and loading.

use crate::schema::PixdropConfig;
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, info};

/// Default config file name within the config directory.
const CONFIG_FILE_NAME: &str = "config.yaml";

/// Resolve the pixdrop config directory.
/// Priority: `PIXDROP_CONFIG_DIR` env > `~/.pixdrop/`
pub fn config_dir() -> PathBuf {
    if let Ok(dir) = std::env::var("PIXDROP_CONFIG_DIR") {
        return PathBuf::from(dir);
    }
    match dirs::home_dir() {
        Some(home) => home.join(".pixdrop"),
        None => PathBuf::from(".pixdrop"),
    }
}

/// Resolve the full path to the main config file.
pub fn config_file_path(config_dir: &Path) -> PathBuf {
    config_dir.join(CONFIG_FILE_NAME)
}

/// Read the raw YAML config as a JSON value tree.
///
/// Returns an empty object if the file doesn't exist (first run).
pub async fn load_config_value(path: &Path) -> Result<serde_json::Value> {
    if !path.exists() {
        debug!(path = %path.display(), "Config file does not exist; using defaults");
        return Ok(serde_json::Value::Object(Default::default()));
    }

    let raw = fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    let value: serde_json::Value = serde_yaml::from_str(&raw)
        .with_context(|| format!("Failed to parse config YAML at: {}", path.display()))?;

    info!(path = %path.display(), "Loaded config");
    // An empty YAML document parses as null.
    Ok(if value.is_null() {
        serde_json::Value::Object(Default::default())
    } else {
        value
    })
}

/// Load and parse the config from disk without env processing.
pub async fn load_config(path: &Path) -> Result<PixdropConfig> {
    let value = load_config_value(path).await?;
    serde_json::from_value(value)
        .with_context(|| format!("Invalid config structure in: {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("pixdrop-{}-{name}", uuid::Uuid::new_v4()))
    }

    #[tokio::test]
    async fn missing_file_yields_defaults() {
        let cfg = load_config(&temp_path("missing.yaml")).await.unwrap();
        assert!(cfg.server.is_none());
    }

    #[tokio::test]
    async fn reads_yaml_file() {
        let path = temp_path("config.yaml");
        fs::write(&path, "server:\n  port: 4100\n").await.unwrap();
        let cfg = load_config(&path).await.unwrap();
        assert_eq!(cfg.port(), 4100);
        let _ = fs::remove_file(&path).await;
    }

    #[tokio::test]
    async fn empty_file_yields_defaults() {
        let path = temp_path("empty.yaml");
        fs::write(&path, "").await.unwrap();
        let cfg = load_config(&path).await.unwrap();
        assert!(cfg.media.is_none());
        let _ = fs::remove_file(&path).await;
    }
}

//! Environment handling for config values.
//!
//! Two mechanisms:
//! - `${VAR_NAME}` references inside the YAML file, resolved at load time.
//!   Only uppercase `[A-Z_][A-Z0-9_]*` names are matched; `$${}` escapes to a
//!   literal `${}`.
//! - Well-known deployment variables (`CLOUDINARY_*`, `PIXDROP_*`) that
//!   override whatever the file says.

use anyhow::{bail, Result};
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;
use std::collections::HashMap;
use tracing::warn;

use crate::schema::{LoggingConfig, MediaConfig, PixdropConfig, ServerConfig};

/// Pattern matching an env var reference, optionally preceded by an escaping `$`.
static ENV_VAR_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(\$?)\$\{([A-Z_][A-Z0-9_]*)\}").unwrap());

/// Error returned for missing env vars.
#[derive(Debug, thiserror::Error)]
#[error("Missing env var \"{var_name}\" referenced at config path: {config_path}")]
pub struct MissingEnvVarError {
    pub var_name: String,
    pub config_path: String,
}

/// Substitute `${VAR}` references in a config JSON value tree from the process env.
pub fn resolve_env_vars(value: &Value) -> Result<Value> {
    substitute_value(value, &std::env::vars().collect(), "")
}

/// Substitute env vars using a provided map (useful for testing).
pub fn resolve_env_vars_with(value: &Value, env: &HashMap<String, String>) -> Result<Value> {
    substitute_value(value, env, "")
}

fn substitute_value(value: &Value, env: &HashMap<String, String>, path: &str) -> Result<Value> {
    match value {
        Value::String(s) => Ok(Value::String(substitute_string(s, env, path)?)),
        Value::Array(arr) => {
            let result: Result<Vec<_>> = arr
                .iter()
                .enumerate()
                .map(|(i, v)| substitute_value(v, env, &format!("{path}[{i}]")))
                .collect();
            Ok(Value::Array(result?))
        }
        Value::Object(map) => {
            let mut result = serde_json::Map::new();
            for (k, v) in map {
                let child_path = if path.is_empty() {
                    k.clone()
                } else {
                    format!("{path}.{k}")
                };
                result.insert(k.clone(), substitute_value(v, env, &child_path)?);
            }
            Ok(Value::Object(result))
        }
        other => Ok(other.clone()),
    }
}

fn substitute_string(s: &str, env: &HashMap<String, String>, path: &str) -> Result<String> {
    if !s.contains('$') {
        return Ok(s.to_string());
    }

    let mut error: Option<MissingEnvVarError> = None;
    let substituted = ENV_VAR_PATTERN.replace_all(s, |caps: &regex::Captures| {
        let var_name = &caps[2];
        if !caps[1].is_empty() {
            return format!("${{{var_name}}}");
        }
        match env.get(var_name) {
            Some(val) if !val.is_empty() => val.clone(),
            _ => {
                if error.is_none() {
                    error = Some(MissingEnvVarError {
                        var_name: var_name.to_string(),
                        config_path: path.to_string(),
                    });
                }
                String::new()
            }
        }
    });

    if let Some(err) = error {
        bail!(err);
    }
    Ok(substituted.into_owned())
}

/// Apply deployment env vars from the process environment.
pub fn apply_env_overrides(config: PixdropConfig) -> PixdropConfig {
    apply_env_overrides_with(config, &std::env::vars().collect())
}

/// Apply deployment env vars from a provided map.
///
/// Recognized: `PIXDROP_BIND`, `PIXDROP_PORT`, `PIXDROP_UPLOAD_FOLDER`,
/// `PIXDROP_MEDIA_PROVIDER`, `PIXDROP_LOG_DIR`, `CLOUDINARY_URL`,
/// `CLOUDINARY_CLOUD_NAME`, `CLOUDINARY_API_KEY`, `CLOUDINARY_API_SECRET`.
pub fn apply_env_overrides_with(
    mut config: PixdropConfig,
    env: &HashMap<String, String>,
) -> PixdropConfig {
    let get = |key: &str| env.get(key).filter(|v| !v.is_empty()).cloned();

    {
        let server = config.server.get_or_insert_with(ServerConfig::default);
        if let Some(bind) = get("PIXDROP_BIND") {
            server.bind = Some(bind);
        }
        if let Some(port) = get("PIXDROP_PORT") {
            match port.parse() {
                Ok(p) => server.port = Some(p),
                Err(_) => warn!(value = %port, "Ignoring invalid PIXDROP_PORT"),
            }
        }
    }

    {
        let media = config.media.get_or_insert_with(MediaConfig::default);
        if let Some(provider) = get("PIXDROP_MEDIA_PROVIDER") {
            match serde_json::from_value(Value::String(provider.to_lowercase())) {
                Ok(p) => media.provider = Some(p),
                Err(_) => warn!(value = %provider, "Ignoring unknown PIXDROP_MEDIA_PROVIDER"),
            }
        }
        if let Some(url) = get("CLOUDINARY_URL") {
            media.cloudinary_url = Some(url);
        }
        if let Some(v) = get("CLOUDINARY_CLOUD_NAME") {
            media.cloud_name = Some(v);
        }
        if let Some(v) = get("CLOUDINARY_API_KEY") {
            media.api_key = Some(v);
        }
        if let Some(v) = get("CLOUDINARY_API_SECRET") {
            media.api_secret = Some(v);
        }
        if let Some(v) = get("PIXDROP_UPLOAD_FOLDER") {
            media.folder = Some(v);
        }
    }

    if let Some(dir) = get("PIXDROP_LOG_DIR") {
        config.logging.get_or_insert_with(LoggingConfig::default).dir = Some(dir);
    }

    config
}

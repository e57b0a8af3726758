//! `pixdrop-config`: runtime configuration for the pixdrop upload gateway.
//!
//! Provides:
//! - Typed config schema (server, media service, upload limits, logging)
//! - YAML loading with `${ENV_VAR}` substitution
//! - Deployment env overrides (`CLOUDINARY_*`, `PIXDROP_*`)
//! - Default value application
//! - Validation report
//! - Config redaction for safe display
//!
//! The prepared config is read-only for the life of the process.

pub mod defaults;
pub mod env;
pub mod io;
pub mod redact;
pub mod schema;
pub mod validation;

pub use defaults::apply_all_defaults;
pub use env::{
    apply_env_overrides, apply_env_overrides_with, resolve_env_vars, resolve_env_vars_with,
    MissingEnvVarError,
};
pub use io::{config_dir, config_file_path, load_config, load_config_value};
pub use redact::{collect_redacted_paths, redact};
pub use schema::{LoggingConfig, MediaConfig, MediaProvider, PixdropConfig, ServerConfig, UploadConfig};
pub use validation::{validate, ConfigValidationError, ValidationReport};

use anyhow::{Context, Result};
use std::collections::HashMap;
use std::path::Path;

/// Load the file, substitute `${VAR}`s, apply env overrides and defaults, and validate.
///
/// This is the main entry point for loading a config at startup. Env
/// overrides that cannot be applied are logged as warnings. Validation
/// problems are only returned; callers print them and decide whether errors
/// are fatal.
pub async fn load_and_prepare(path: &Path) -> Result<(PixdropConfig, ValidationReport)> {
    let env: HashMap<String, String> = std::env::vars().collect();
    load_and_prepare_with(path, &env).await
}

/// `load_and_prepare` against an explicit environment map.
pub async fn load_and_prepare_with(
    path: &Path,
    env: &HashMap<String, String>,
) -> Result<(PixdropConfig, ValidationReport)> {
    let value = load_config_value(path).await?;

    let value = resolve_env_vars_with(&value, env).context("Failed to resolve env vars in config")?;

    let config: PixdropConfig =
        serde_json::from_value(value).context("Failed to deserialize config after processing")?;

    let config = apply_env_overrides_with(config, env);
    let config = apply_all_defaults(config);

    let report = validate(&config);
    Ok((config, report))
}

//! `pixdrop config`: effective config with secrets redacted, plus the validation report.

use std::path::Path;

use anyhow::Result;

use pixdrop_config::{redact, validate, PixdropConfig};

use crate::terminal_output::{note_info, note_success, render_table};

pub fn run(config_path: &Path, config: &PixdropConfig) -> Result<()> {
    note_info(&format!("Config file: {}", config_path.display()));

    let value = serde_json::to_value(config)?;
    println!("{}", serde_yaml::to_string(&redact(&value))?);

    let report = validate(config);
    if report.errors.is_empty() && report.warnings.is_empty() {
        note_success("Config is valid");
        return Ok(());
    }

    let rows: Vec<Vec<String>> = report
        .errors
        .iter()
        .map(|e| ("error", e))
        .chain(report.warnings.iter().map(|w| ("warning", w)))
        .map(|(level, issue)| vec![level.to_string(), issue.path.clone(), issue.message.clone()])
        .collect();
    print!("{}", render_table(&["Level", "Path", "Message"], &rows));
    Ok(())
}

//! `pixdrop upload`: terminal front-end for the upload controller.

use std::io::stdout;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{bail, Context, Result};

use pixdrop_client::{HttpTransport, SubmitOutcome, UploadController};
use pixdrop_core::{PendingFile, UploadPolicy};
use pixdrop_media::{detect_mime_type, is_image};

use crate::terminal_output::{
    note_error, note_info, note_success, note_warn, render_progress_bar, stream_write,
};

const REDRAW_INTERVAL: Duration = Duration::from_millis(100);

pub async fn run(paths: &[PathBuf], endpoint: &str, policy: UploadPolicy) -> Result<()> {
    let mut files = Vec::with_capacity(paths.len());
    for path in paths {
        let file = read_file(path).await?;
        if !is_image(&file.mime_type) {
            note_warn(&format!("Skipping {}: not an image", file.name));
        } else if !policy.allows_type(&file.mime_type) {
            note_warn(&format!("Skipping {}: {} is not accepted", file.name, file.mime_type));
        } else {
            files.push(file);
        }
    }

    let controller = UploadController::new(HttpTransport::new(endpoint), policy);
    let queued = controller.enqueue(files)?;
    if queued == 0 {
        bail!("nothing to upload");
    }

    note_info(&format!("Uploading {queued} file(s) to {endpoint}"));

    let mut out = stdout();
    let submit = controller.submit();
    tokio::pin!(submit);
    let mut ticker = tokio::time::interval(REDRAW_INTERVAL);

    let outcome = loop {
        tokio::select! {
            outcome = &mut submit => break outcome,
            _ = ticker.tick() => {
                stream_write(&mut out, &format!("\r{}", render_progress_bar(controller.progress())))?;
            }
        }
    };
    stream_write(&mut out, &format!("\r{}\n", render_progress_bar(controller.progress())))?;

    match outcome {
        SubmitOutcome::Succeeded(urls) => {
            note_success(pixdrop_client::SUCCESS_MESSAGE);
            for url in urls {
                println!("  {url}");
            }
            Ok(())
        }
        SubmitOutcome::Failed(message) => {
            note_error(&message);
            bail!("upload failed")
        }
        SubmitOutcome::Skipped => bail!("nothing to upload"),
    }
}

async fn read_file(path: &Path) -> Result<PendingFile> {
    let content = tokio::fs::read(path)
        .await
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());
    Ok(PendingFile::new(name, detect_mime_type(path), content))
}

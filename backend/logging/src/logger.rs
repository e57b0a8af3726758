//! Structured Logger
//!
//! Wraps `tracing` to provide console output, optional NDJSON file rotation,
//! and environment-based level control.

use std::path::Path;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing::Subscriber;
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

const BOOTSTRAP_LEVEL: &str = "warn";

/// Keeps the file writer flushing until dropped; hold it for the life of `main`.
pub struct LogGuard {
    _file: Option<WorkerGuard>,
}

/// Initialize the global structured logger.
///
/// `RUST_LOG` takes precedence over `level`. When `log_dir` is set, a daily
/// rolling NDJSON file (`pixdrop.log.YYYY-MM-DD`) is written alongside the
/// console output.
pub fn init_logger(log_dir: Option<&Path>, level: &str, json_console: bool) -> LogGuard {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level));

    let console_layer = if json_console {
        fmt::layer()
            .json()
            .with_writer(std::io::stdout)
            .boxed()
    } else {
        fmt::layer()
            .with_writer(std::io::stdout)
            .with_target(false)
            .with_ansi(true)
            .boxed()
    };

    let (file_layer, file_guard) = match log_dir {
        Some(dir) => {
            let appender = RollingFileAppender::new(Rotation::DAILY, dir, "pixdrop.log");
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = fmt::layer()
                .json()
                .with_writer(writer)
                .with_ansi(false)
                .boxed();
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    let _ = tracing_subscriber::registry()
        .with(env_filter)
        .with(console_layer)
        .with(file_layer)
        .try_init();

    LogGuard { _file: file_guard }
}

/// Console subscriber for work done before `init_logger` can run, such as
/// loading the config file that names the log level. Scope it with
/// `WithSubscriber::with_subscriber` so the global logger is still free.
pub fn bootstrap_subscriber() -> impl Subscriber + Send + Sync {
    bootstrap_subscriber_with_writer(std::io::stderr)
}

/// `bootstrap_subscriber` writing to `writer`. Shows `warn` and above unless
/// `RUST_LOG` says otherwise.
pub fn bootstrap_subscriber_with_writer<W>(writer: W) -> impl Subscriber + Send + Sync
where
    W: for<'a> MakeWriter<'a> + Send + Sync + 'static,
{
    fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(BOOTSTRAP_LEVEL)),
        )
        .with_writer(writer)
        .with_target(false)
        .with_ansi(false)
        .finish()
}

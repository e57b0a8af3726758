mod config_cmd;
mod terminal_output;
mod upload_cmd;

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use tracing::info;
use tracing::instrument::WithSubscriber;

use pixdrop_config::{
    config_dir, config_file_path, load_and_prepare, validate, MediaProvider, PixdropConfig,
    ServerConfig,
};
use pixdrop_core::{MediaUploadService, UploadOptions};
use pixdrop_gateway::{start_server, GatewayState};
use pixdrop_logging::{bootstrap_subscriber, init_logger};
use pixdrop_media::{CloudinaryCredentials, CloudinaryUploader, MockMediaService};

use terminal_output::{note_error, note_warn};

#[derive(Parser)]
#[command(name = "pixdrop")]
#[command(about = "pixdrop: drag-and-drop image uploads to a hosted media service")]
#[command(version)]
struct Cli {
    /// Config file (defaults to ~/.pixdrop/config.yaml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the upload gateway and serve the upload page
    Serve {
        /// Port to bind the HTTP server to
        #[arg(short, long)]
        port: Option<u16>,
        /// Address to bind the HTTP server to
        #[arg(long)]
        bind: Option<String>,
        /// Use the in-memory media service instead of Cloudinary
        #[arg(long)]
        mock_media: bool,
    },
    /// Upload images through a running gateway
    Upload {
        /// Image files to upload
        #[arg(required = true)]
        files: Vec<PathBuf>,
        /// Gateway origin
        #[arg(short, long, default_value = "http://localhost:3000")]
        endpoint: String,
    },
    /// Print the effective config with secrets redacted
    Config,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config_path = cli
        .config
        .unwrap_or_else(|| config_file_path(&config_dir()));
    // The configured logger needs the loaded config; env override warnings
    // from loading go to a console-only subscriber.
    let (config, _report) = load_and_prepare(&config_path)
        .with_subscriber(bootstrap_subscriber())
        .await?;

    match cli.command {
        Commands::Serve {
            port,
            bind,
            mock_media,
        } => {
            let log_dir = config.log_dir().map(PathBuf::from);
            let _guard = init_logger(log_dir.as_deref(), &config.log_level(), config.log_json());
            let config = apply_serve_flags(config, port, bind, mock_media);
            run_server(config).await?;
        }
        Commands::Upload { files, endpoint } => {
            let _guard = init_logger(None, "warn", false);
            upload_cmd::run(&files, &endpoint, config.upload_policy()).await?;
        }
        Commands::Config => {
            config_cmd::run(&config_path, &config)?;
        }
    }

    Ok(())
}

fn apply_serve_flags(
    mut config: PixdropConfig,
    port: Option<u16>,
    bind: Option<String>,
    mock_media: bool,
) -> PixdropConfig {
    let server = config.server.get_or_insert_with(ServerConfig::default);
    if port.is_some() {
        server.port = port;
    }
    if bind.is_some() {
        server.bind = bind;
    }
    if mock_media {
        config.media.get_or_insert_with(Default::default).provider = Some(MediaProvider::Mock);
    }
    config
}

async fn run_server(config: PixdropConfig) -> Result<()> {
    let report = validate(&config);
    for warning in &report.warnings {
        note_warn(&format!("{}: {}", warning.path, warning.message));
    }
    if !report.is_valid() {
        for error in &report.errors {
            note_error(&format!("{}: {}", error.path, error.message));
        }
        bail!("invalid configuration ({} error(s))", report.errors.len());
    }

    let addr: SocketAddr = format!("{}:{}", config.bind_address(), config.port())
        .parse()
        .context("Invalid bind address")?;
    let folder = config.upload_folder();
    let service = build_media_service(&config)?;

    info!(
        addr = %addr,
        provider = service.name(),
        folder = %folder,
        "Starting pixdrop gateway"
    );

    let state = GatewayState::new(
        config.upload_policy(),
        service,
        UploadOptions::auto_optimized(folder),
    );
    start_server(addr, state).await
}

fn build_media_service(config: &PixdropConfig) -> Result<Arc<dyn MediaUploadService>> {
    if config.media_provider() == MediaProvider::Mock {
        return Ok(Arc::new(MockMediaService::new()));
    }

    let media = config
        .media
        .as_ref()
        .context("Cloudinary credentials are not configured")?;
    let credentials = match &media.cloudinary_url {
        Some(url) if !url.is_empty() => CloudinaryCredentials::from_url(url)?,
        _ => CloudinaryCredentials::new(
            media.cloud_name.clone().unwrap_or_default(),
            media.api_key.clone().unwrap_or_default(),
            media.api_secret.clone().unwrap_or_default(),
        ),
    };

    let mut uploader = CloudinaryUploader::new(credentials);
    if let Some(base_url) = &media.base_url {
        uploader = uploader.with_base_url(base_url.clone());
    }
    Ok(Arc::new(uploader))
}

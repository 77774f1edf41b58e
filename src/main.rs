//! Demo server for the header patching middleware.
//!
//! Serves a fixed response on every path with the configured policy
//! applied to its headers.

use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;

use patch_headers::config::{load_config, loader::override_bind_address, PatchConfig};
use patch_headers::observability::logging;
use patch_headers::{HttpServer, Shutdown};

#[derive(Parser)]
#[command(name = "patch-headers")]
#[command(about = "Serve a demo response with a response header policy applied", long_about = None)]
struct Cli {
    /// Path to a TOML or JSON configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override the configured bind address.
    #[arg(short, long)]
    bind: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => load_config(path)?,
        None => PatchConfig::default(),
    };
    if let Some(bind) = cli.bind {
        config = override_bind_address(config, bind)?;
    }

    logging::init(&config.observability.log_level);
    tracing::info!("patch-headers v{} starting", env!("CARGO_PKG_VERSION"));

    tracing::info!(
        bind_address = %config.listener.bind_address,
        request_timeout_secs = config.timeouts.request_secs,
        policy = ?config.policy,
        "Configuration loaded"
    );

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    let server = HttpServer::new(config)?;

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    let server_task = tokio::spawn(server.run(listener, server_shutdown));

    shutdown.trigger_on_ctrl_c().await;
    server_task.await??;

    tracing::info!("Shutdown complete");
    Ok(())
}

//! HTTP server for helpdesk list views and field catalogs.
//!
//! Opens the site snapshot (installing the built-in doctypes on first run),
//! seeds the system ticket types and serves the RPC methods until Ctrl+C.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use helpdesk_api::{Router, Server};
use helpdesk_core::config::DeskConfig;
use helpdesk_core::persistence::SnapshotManager;
use helpdesk_core::seed;
use tokio::signal;
use tracing_subscriber::EnvFilter;

/// Command-line arguments for the helpdesk server.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Port to listen on
    #[arg(short, long, default_value_t = 8080)]
    port: u16,

    /// Host address to bind to
    #[arg(long, default_value = "127.0.0.1")]
    host: String,

    /// Data directory holding the site snapshot
    #[arg(long, default_value = "./data")]
    data_dir: PathBuf,

    /// Lifetime of cached field catalogs in seconds
    #[arg(long, default_value_t = 3600)]
    cache_ttl_secs: u64,

    /// Page length for list requests that do not send one
    #[arg(long, default_value_t = 20)]
    page_length: usize,

    /// Request timeout in milliseconds
    #[arg(long, default_value_t = 5000)]
    request_timeout_ms: u64,

    /// Response timeout in milliseconds
    #[arg(long, default_value_t = 10000)]
    response_timeout_ms: u64,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = Arc::new(DeskConfig {
        data_dir: args.data_dir.clone(),
        cache_ttl_secs: args.cache_ttl_secs,
        default_page_length: args.page_length,
        request_timeout_ms: args.request_timeout_ms,
        response_timeout_ms: args.response_timeout_ms,
        ..DeskConfig::default()
    });

    let snapshots = SnapshotManager::new(&config);
    let site = snapshots
        .open_site(&config)
        .with_context(|| format!("Failed to open site in {}", config.data_dir.display()))?;

    let store = site.database.as_ref();
    if seed::create_fallback_ticket_type(store)? {
        tracing::info!("Created fallback ticket type '{}'", seed::DEFAULT_TICKET_TYPE);
    }
    let created = seed::create_ootb_ticket_types(store)?;
    if !created.is_empty() {
        tracing::info!("Created ticket types: {}", created.join(", "));
    }
    snapshots.save(&site).context("Failed to save site snapshot")?;

    let router = Router::new(site.services(), Arc::clone(&config))
        .map_err(|e| anyhow::anyhow!("Failed to build router: {}", e))?;
    let addr: SocketAddr = format!("{}:{}", args.host, args.port)
        .parse()
        .with_context(|| format!("Invalid listen address {}:{}", args.host, args.port))?;

    tracing::info!(
        "Starting helpdesk server on {} (data directory {}, page length {}, cache ttl {}s)",
        addr,
        config.data_dir.display(),
        config.default_page_length,
        config.cache_ttl_secs
    );

    let shutdown = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to listen for ctrl_c: {}", e);
        }
        tracing::info!("Shutting down server...");
    };
    Server::new(addr, router).serve(shutdown).await?;

    snapshots.save(&site).context("Failed to save site snapshot on shutdown")?;
    Ok(())
}

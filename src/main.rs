//! Exchange server.
//!
//! Serves the request-context helpers over HTTP so they can be exercised
//! end to end.
//!
//! ```text
//!   Client ──▶ listener ──▶ middleware ──▶ handler ──▶ Exchange helpers
//!                          (request id,    (info, echo,   (introspection,
//!                           trace,          hash, ...)     composition,
//!                           timeout,                       gzip, md5)
//!                           body limit)
//! ```

use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;

use exchange_context::config::{load_config, override_bind_address, ServerConfig};
use exchange_context::observability::init_logging;
use exchange_context::{HttpServer, Shutdown};

#[derive(Parser)]
#[command(name = "exchange-server")]
#[command(about = "Embedded HTTP server exposing the exchange helpers", long_about = None)]
struct Cli {
    /// Path to a TOML configuration file. Defaults are used when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override the listener bind address.
    #[arg(short, long)]
    bind: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => load_config(path)?,
        None => ServerConfig::default(),
    };
    let config = override_bind_address(config, cli.bind)?;

    init_logging(&config.observability);

    tracing::info!("exchange-server v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        bind_address = %config.listener.bind_address,
        pretty_json = config.exchange.pretty_json,
        max_body_bytes = config.exchange.max_body_bytes,
        request_timeout_secs = config.timeouts.request_secs,
        "Configuration loaded"
    );

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let shutdown = Shutdown::new();
    shutdown.trigger_on_ctrl_c();

    let server = HttpServer::new(config);
    server.run(listener, shutdown.subscribe()).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}

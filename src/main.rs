use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use tokio::net::TcpListener;

use wraithdriver::config::{load_config, DriverConfig};
use wraithdriver::lifecycle::Shutdown;
use wraithdriver::observability::{logging, metrics};
use wraithdriver::protocol::Dispatcher;
use wraithdriver::session::SessionRegistry;
use wraithdriver::HttpServer;

/// WebDriver-protocol automation server.
#[derive(Debug, Parser)]
#[command(name = "wraithdriver", version)]
struct Cli {
    /// Path to a TOML configuration file.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Override the listener bind address.
    #[arg(long)]
    bind: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => load_config(path)?,
        None => DriverConfig::default(),
    };
    if let Some(bind) = cli.bind {
        config.listener.bind_address = bind;
    }

    logging::init(&config.observability.log_filter);

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        bind_address = %config.listener.bind_address,
        request_timeout_secs = config.timeouts.request_secs,
        "wraithdriver starting"
    );

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => metrics::init_exporter(addr),
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "failed to parse metrics address"
            ),
        }
    }

    let engine = Arc::new(SessionRegistry::new());
    let shutdown = Arc::new(Shutdown::new());
    let dispatcher = Arc::new(Dispatcher::with_default_handlers(engine, shutdown.clone()));

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "listening for commands");

    let server = HttpServer::new(&config, dispatcher, shutdown);
    server.run(listener).await?;

    tracing::info!("shutdown complete");
    Ok(())
}

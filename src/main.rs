//! Stock web shell dev server.
//!
//! ```text
//!                          ┌──────────────────────────────────────────────┐
//!                          │                 DEV SERVER                   │
//!     Browser request      │  ┌──────────┐    ┌───────────┐               │
//!     ─────────────────────┼─▶│ listener │───▶│  server   │               │
//!                          │  └──────────┘    └─────┬─────┘               │
//!                          │                        │                     │
//!                          │          ┌─────────────┼──────────────┐      │
//!                          │          ▼             ▼              ▼      │
//!                          │   ┌────────────┐ ┌───────────┐ ┌───────────┐ │
//!                          │   │ /api proxy │ │ /ws proxy │ │ app shell │ │
//!                          │   └─────┬──────┘ └─────┬─────┘ │ + router  │ │
//!                          │         │              │       └───────────┘ │
//!                          └─────────┼──────────────┼─────────────────────┘
//!                                    ▼              ▼
//!                                 Backend (http://localhost:8000)
//! ```

use std::path::PathBuf;

use clap::Parser;

use stock_web_shell::config::{load_or_default, validate_config, ConfigError};
use stock_web_shell::lifecycle::{launch, wait_for_shutdown_signal, Shutdown, ShutdownReason};
use stock_web_shell::observability::{logging, metrics};

#[derive(Parser)]
#[command(name = "stock-web-shell")]
#[command(about = "Dev server for the stock web client", long_about = None)]
struct Args {
    /// TOML configuration file; built-in defaults when omitted
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override dev_server.bind_address
    #[arg(short, long)]
    bind: Option<String>,

    /// Override http.base_url
    #[arg(long)]
    base_url: Option<String>,

    /// Fail instead of trying the next port when the bind port is taken
    #[arg(long)]
    strict_port: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let mut config = load_or_default(args.config.as_deref())?;
    if let Some(bind) = args.bind {
        config.dev_server.bind_address = bind;
    }
    if let Some(base_url) = args.base_url {
        config.http.base_url = base_url;
    }
    if args.strict_port {
        config.dev_server.strict_port = true;
    }
    validate_config(&config).map_err(ConfigError::Validation)?;

    logging::init(&config.observability)?;
    tracing::info!(version = env!("CARGO_PKG_VERSION"), "stock-web-shell starting");
    tracing::info!(
        bind_address = %config.dev_server.bind_address,
        base_url = %config.http.base_url,
        timeout_ms = config.http.timeout_ms,
        proxies = config.dev_server.proxies.len(),
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    let shutdown = Shutdown::new();
    let running = launch(&config, &shutdown).await?;
    tracing::info!(address = %running.local_addr, "Listening for connections");

    wait_for_shutdown_signal().await;
    shutdown.trigger(ShutdownReason::Signal);
    running.handle.await??;

    tracing::info!("Shutdown complete");
    Ok(())
}

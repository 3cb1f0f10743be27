//! Gateway binary.
//!
//! ```text
//!                        ┌───────────────────────────────────────────┐
//!                        │                 GATEWAY                   │
//!   Browser / client     │  ┌──────────┐     ┌────────────────────┐  │
//!   ─────────────────────┼─▶│  axum    │────▶│ /api/*  → gateway  │──┼──▶ API server
//!                        │  │  router  │     │ /, /static/* → fs  │  │    (upstream)
//!   ◀────────────────────┼──│          │◀────│                    │◀─┼───
//!                        │  └──────────┘     └────────────────────┘  │
//!                        │   request id · tracing · body limit       │
//!                        └───────────────────────────────────────────┘
//! ```

use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;

use gateway_proxy::config::{resolve_config, ConfigOverrides};
use gateway_proxy::observability::{logging, metrics};
use gateway_proxy::{HttpServer, Shutdown};

#[derive(Parser)]
#[command(name = "gateway-proxy")]
#[command(about = "HTTP gateway forwarding /api requests to an internal API server", long_about = None)]
struct Cli {
    /// TOML configuration file
    #[arg(short, long, env = "GATEWAY_CONFIG")]
    config: Option<PathBuf>,

    /// Address to listen on, e.g. 0.0.0.0:8001
    #[arg(long, env = "GATEWAY_BIND_ADDRESS")]
    bind: Option<String>,

    /// Upstream API base URL, e.g. http://localhost:8080
    #[arg(long, env = "GATEWAY_UPSTREAM_URL")]
    upstream: Option<String>,

    /// Upstream request deadline in milliseconds
    #[arg(long, env = "GATEWAY_REQUEST_TIMEOUT_MS")]
    timeout_ms: Option<u64>,

    /// Upstream connect timeout in milliseconds; must be below the deadline
    #[arg(long, env = "GATEWAY_CONNECT_TIMEOUT_MS")]
    connect_timeout_ms: Option<u64>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config = resolve_config(
        cli.config.as_deref(),
        ConfigOverrides {
            bind_address: cli.bind,
            upstream_url: cli.upstream,
            request_timeout_ms: cli.timeout_ms,
            connect_timeout_ms: cli.connect_timeout_ms,
        },
    )?;

    logging::init_tracing(&config.observability.log_level);

    tracing::info!("gateway-proxy v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        bind_address = %config.listener.bind_address,
        upstream = %config.upstream.base_url,
        request_timeout_ms = config.upstream.request_timeout_ms,
        connect_timeout_ms = config.upstream.connect_timeout().as_millis() as u64,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        // Validated at load time.
        if let Ok(addr) = config.observability.metrics_address.parse() {
            metrics::init_metrics(addr);
        }
    }

    let server = HttpServer::new(config)?;

    let listener = TcpListener::bind(&server.config().listener.bind_address).await?;
    tracing::info!(
        address = %listener.local_addr()?,
        "Listening for connections"
    );

    let shutdown = Shutdown::new();
    server.run(listener, shutdown.subscribe()).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}

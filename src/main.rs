//! Tianditu search gateway.
//!
//! # Architecture Overview
//!
//! ```text
//!     Browser                ┌──────────────────────────────────────────┐
//!     ──────────────────────▶│  http: request id → CORS/preflight       │
//!                            │        → router (/api/tdt-search,        │
//!                            │                  /health, 404)           │
//!                            │                    │                     │
//!                            │                    ▼                     │
//!                            │  gateway: params → upstream client ──────┼──▶ Upstream
//!     ◀──────────────────────│           ◀── JSON relay / error envelope│     search API
//!                            └──────────────────────────────────────────┘
//! ```

use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;

use tdt_gateway::config::{load_config, validate_config, ConfigError, GatewayConfig};
use tdt_gateway::http::GatewayServer;
use tdt_gateway::lifecycle::{wait_for_signal, Shutdown};
use tdt_gateway::observability::{logging, metrics};

#[derive(Debug, Parser)]
#[command(name = "tdt-gateway")]
#[command(about = "CORS gateway for the Tianditu search API", long_about = None)]
struct Cli {
    /// TOML configuration file. Built-in defaults apply when omitted.
    #[arg(short, long, env = "TDT_GATEWAY_CONFIG")]
    config: Option<PathBuf>,

    /// Port to listen on, overriding the configuration.
    #[arg(short, long, env = "PORT")]
    port: Option<u16>,

    /// Upstream search endpoint, overriding the configuration.
    #[arg(long, env = "TDT_UPSTREAM_URL")]
    upstream_url: Option<String>,
}

impl Cli {
    fn resolve_config(&self) -> Result<GatewayConfig, ConfigError> {
        let mut config = match &self.config {
            Some(path) => load_config(path)?,
            None => GatewayConfig::default(),
        };

        if let Some(port) = self.port {
            config.listener.port = port;
        }
        if let Some(url) = &self.upstream_url {
            config.upstream.base_url = url.clone();
        }

        validate_config(&config).map_err(ConfigError::Validation)?;
        Ok(config)
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let config = cli.resolve_config()?;

    logging::init(&config.observability.log_level);
    tracing::info!("tdt-gateway v{} starting", env!("CARGO_PKG_VERSION"));

    if config.observability.metrics_enabled {
        let addr = config.observability.metrics_address.parse()?;
        metrics::init_metrics(addr)?;
    }

    let listener = TcpListener::bind(config.bind_address()).await?;
    let server = GatewayServer::new(config)?;

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    tokio::spawn(async move {
        wait_for_signal().await;
        shutdown.trigger();
    });

    server.run(listener, server_shutdown).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}

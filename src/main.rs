//! Edge gateway binary.
//!
//! # Architecture Overview
//!
//! ```text
//!                        ┌──────────────────────────────────────────────┐
//!                        │                 EDGE GATEWAY                  │
//!     Browser request    │  ┌─────────┐    ┌──────────┐                  │
//!     ───────────────────┼─▶│  http   │───▶│ session  │── 302 /login ──▶ │
//!                        │  │ server  │    │   gate   │                  │
//!                        │  └─────────┘    └────┬─────┘                  │
//!                        │                      │                        │
//!                        │          pages ◀─────┼─────▶ /api/**          │
//!                        │                      │                        │
//!                        │                ┌─────▼─────┐   ┌───────────┐  │
//!                        │                │  routing  │──▶│ forwarder │──┼──▶ Upstream API
//!                        │                │   table   │   └─────┬─────┘  │
//!                        │                └───────────┘         │        │
//!     Response           │                ┌────────────┐        │        │
//!     ◀──────────────────┼────────────────│ translator │◀───────┘        │
//!                        │                └────────────┘                 │
//!                        │   config · observability · security · lifecycle│
//!                        └──────────────────────────────────────────────┘
//! ```

use std::net::SocketAddr;
use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;

use edge_gateway::config::{load_config_with, BACKEND_URL_ENV};
use edge_gateway::http::GatewayServer;
use edge_gateway::lifecycle::{signals, Shutdown};
use edge_gateway::net::tls::load_tls_config;
use edge_gateway::observability::{logging, metrics};

#[derive(Parser)]
#[command(name = "edge-gateway")]
#[command(about = "Session-gating edge gateway in front of a backend API", long_about = None)]
struct Args {
    /// TOML configuration file.
    #[arg(short, long, env = "GATEWAY_CONFIG")]
    config: Option<PathBuf>,

    /// Override listener.bind_address.
    #[arg(short, long)]
    bind: Option<String>,

    /// Override the upstream base URL (takes precedence over BACKEND_URL).
    #[arg(long)]
    backend_url: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let mut config = load_config_with(args.config.as_deref(), |key| {
        if key == BACKEND_URL_ENV {
            if let Some(url) = &args.backend_url {
                return Some(url.clone());
            }
        }
        std::env::var(key).ok()
    })?;
    if let Some(bind) = args.bind {
        config.listener.bind_address = bind;
    }

    logging::init_logging(&config.observability);
    tracing::info!(version = env!("CARGO_PKG_VERSION"), "edge-gateway starting");
    tracing::info!(
        bind_address = %config.listener.bind_address,
        upstream = %config.upstream.normalized_base_url(),
        tls = config.listener.tls.is_some(),
        request_timeout_secs = config.timeouts.request_secs,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse::<SocketAddr>() {
            Ok(addr) => {
                if let Err(e) = metrics::init_metrics(addr) {
                    tracing::error!(error = %e, "Failed to start metrics exporter");
                }
            }
            Err(e) => {
                tracing::error!(
                    address = %config.observability.metrics_address,
                    error = %e,
                    "Invalid metrics address"
                );
            }
        }
    }

    let shutdown = Shutdown::new();
    signals::spawn_signal_listener(&shutdown);

    let tls = config.listener.tls.clone();
    let bind_address = config.listener.bind_address.clone();
    let server = GatewayServer::new(config)?;

    match tls {
        Some(tls) => {
            let tls_config = load_tls_config(&tls).await?;
            let addr: SocketAddr = bind_address.parse()?;
            server.run_tls(addr, tls_config, shutdown.subscribe()).await?;
        }
        None => {
            let listener = TcpListener::bind(&bind_address).await?;
            server.run(listener, shutdown.subscribe()).await?;
        }
    }

    tracing::info!("edge-gateway stopped");
    Ok(())
}

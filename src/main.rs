//! JSON-RPC Gateway
//!
//! Terminates TLS, validates JSON-RPC requests (single or batch), counts
//! calls per method and relays everything to one upstream Ethereum node.
//!
//! # Architecture Overview
//!
//! ```text
//!                      ┌──────────────────────────────────────────────────┐
//!                      │                  RPC GATEWAY                      │
//!                      │                                                   │
//!   POST /rpc          │  ┌─────────┐   ┌───────────┐   ┌──────────────┐  │
//!   ───────────────────┼─▶│  net    │──▶│   http    │──▶│ rpc payload  │  │
//!                      │  │ TLS     │   │  router   │   │  validation  │  │
//!                      │  └─────────┘   └─────┬─────┘   └──────┬───────┘  │
//!                      │                      │                │          │
//!   GET /metrics       │                      ▼                ▼          │
//!   ◀──────────────────┼──────────────┌──────────────┐  ┌─────────────┐   │
//!                      │              │   method     │◀─│  tracking   │   │
//!                      │              │   registry   │  └──────┬──────┘   │
//!                      │              └──────────────┘         ▼          │
//!   Client Response    │                              ┌──────────────┐    │
//!   ◀──────────────────┼──────────────────────────────│  upstream    │◀───┼─── Ethereum
//!                      │                              │  forwarder   │    │    node
//!                      │                              └──────────────┘    │
//!                      └──────────────────────────────────────────────────┘
//! ```

use clap::Parser;
use std::path::PathBuf;

use rpc_gateway::config::load_config;
use rpc_gateway::lifecycle::{launch, StartupError};
use rpc_gateway::observability::logging::init_logging;

#[derive(Parser)]
#[command(name = "rpc-gateway", version)]
#[command(about = "TLS-terminating JSON-RPC gateway with per-method call metrics")]
struct Cli {
    /// Optional TOML configuration file. Environment variables override it.
    #[arg(short, long, env = "GATEWAY_CONFIG")]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config = match load_config(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            let e = StartupError::from(e);
            // Logging is not configured yet.
            eprintln!("rpc-gateway: {e}");
            return Err(e.into());
        }
    };

    init_logging(&config.observability);
    tracing::info!(version = env!("CARGO_PKG_VERSION"), "rpc-gateway starting");

    if let Err(e) = launch(config).await {
        tracing::error!(error = %e, "Failed to start HTTPS gateway");
        return Err(e.into());
    }

    tracing::info!("Shutdown complete");
    Ok(())
}

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{info, warn};

use timechain::config::{DEFAULT_RPC_URL, RPC_URL_ENV};
use timechain::logging::init_logging;
use timechain::{ApiServer, FeeService, RpcClient, ServiceConfig};

#[derive(Parser, Debug)]
#[command(name = "timechain-server", version, about = "Bitcoin fee API over a full-node JSON-RPC endpoint")]
struct Cli {
    /// Path to a TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override the bind address
    #[arg(long)]
    bind: Option<String>,

    /// Override the listening port
    #[arg(short, long)]
    port: Option<u16>,
}

#[actix_web::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config =
        ServiceConfig::load(cli.config.as_deref()).context("Failed to load configuration")?;
    if let Some(bind) = cli.bind {
        config.api.bind_address = bind;
    }
    if let Some(port) = cli.port {
        config.api.port = port;
    }
    config.validate().context("Invalid configuration")?;

    init_logging(&config.log_level);

    if config.rpc.url == DEFAULT_RPC_URL {
        warn!("{} not set, using public gateway {}", RPC_URL_ENV, DEFAULT_RPC_URL);
    }
    info!(
        timeout_secs = config.rpc.timeout_secs,
        max_concurrent_lookups = config.rpc.max_concurrent_lookups,
        "Using upstream node {}",
        config.rpc.redacted_url()
    );

    let rpc = RpcClient::from_config(&config.rpc).context("Failed to create RPC client")?;
    let fees = FeeService::new(Arc::new(rpc))
        .with_max_concurrent_lookups(config.rpc.max_concurrent_lookups);

    let server = ApiServer::new(fees, config.api.clone())
        .start()
        .context("Failed to start API server")?;

    server.await.context("API server error")?;
    info!("API server stopped");

    Ok(())
}

//! fedtrust node — entry point.
//!
//! Starts the trust manager with configuration from a TOML file or
//! defaults.

use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use fedtrust_node::config::FedtrustConfig;
use fedtrust_node::node::TrustNode;

/// fedtrust trust manager node
#[derive(Parser, Debug)]
#[command(name = "fedtrust-node", version, about = "Trust and reputation manager node")]
struct Args {
    /// Path to the configuration file (TOML).
    #[arg(short, long, default_value = "fedtrust.toml")]
    config: PathBuf,

    /// Override the own platform id.
    #[arg(long)]
    platform_id: Option<String>,

    /// Override the API port.
    #[arg(long)]
    api_port: Option<u16>,

    /// Override the data directory.
    #[arg(long)]
    data_dir: Option<PathBuf>,

    /// Override the log level (trace, debug, info, warn, error).
    #[arg(long, default_value = "info")]
    log_level: String,

    /// Generate a default config file and exit.
    #[arg(long)]
    init: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // Initialize tracing
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .init();

    // Handle --init flag
    if args.init {
        let config = FedtrustConfig::default();
        config.save(&args.config)?;
        tracing::info!(path = %args.config.display(), "wrote default config");
        return Ok(());
    }

    // Load configuration
    let mut config = FedtrustConfig::load(&args.config)?;

    // Apply CLI overrides
    if let Some(platform_id) = args.platform_id {
        config.platform.id = platform_id;
    }
    if let Some(api_port) = args.api_port {
        config.api.port = api_port;
    }
    if let Some(ref data_dir) = args.data_dir {
        config.storage.data_dir = data_dir.clone();
    }
    config.logging.level = args.log_level;

    tracing::info!("fedtrust node v{}", env!("CARGO_PKG_VERSION"));

    let mut node = TrustNode::new(config);
    node.start().await?;

    tokio::signal::ctrl_c().await?;
    tracing::info!("received shutdown signal");

    node.shutdown().await;
    tracing::info!("fedtrust node exited cleanly");
    Ok(())
}

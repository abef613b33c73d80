use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use cluster_inventory::cli::{self, Cli};

fn main() -> anyhow::Result<()> {
    // Initialize logging; stdout belongs to the exports
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    info!(command = ?cli.command, "Starting cluster-inventory");
    cli::run(cli)
}

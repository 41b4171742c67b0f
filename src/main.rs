use clap::Parser;
use std::path::Path;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use rust_sextant::config::SextantConfig;
use rust_sextant::interactive;
use rust_sextant::session::AccountService;

#[derive(Parser)]
#[command(name = "sextant", about = "Account and session manager for a blockchain identity client")]
struct Cli {
    /// Path to the TOML config file
    #[arg(short, long, default_value = "sextant.toml")]
    config: String,

    /// Override the active network from the config
    #[arg(long)]
    network: Option<String>,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let mut config = SextantConfig::load_or_default(&cli.config);
    if let Some(network) = cli.network {
        config.node.network = network;
    }

    let filter = EnvFilter::try_new(&config.node.log_level)
        .unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    info!(
        "Active network: '{}' (accounts at '{}')",
        config.node.network, config.node.accounts_dir
    );

    let history_file = config.node.history_file.clone();
    let service = AccountService::new(config);
    match service.load_catalog().await {
        Ok(count) => info!("{} account(s) known", count),
        Err(e) => {
            error!("Failed to load account catalog: {}", e);
            std::process::exit(1);
        }
    }

    interactive::start(&service, Path::new(&history_file)).await;
}

use std::sync::Arc;

use ephemeral_wallets::build_manager;
use ephemeral_wallets::console::run_menu;
use ephemeral_wallets::models::ServiceConfig;
use ephemeral_wallets::services::wallet::{MoneroWalletRpc, Reaper};
use tokio::io::BufReader;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // Logs go to stderr so they do not interleave with the menu
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into()))
        .with_writer(std::io::stderr)
        .init();

    let config = match ServiceConfig::from_env() {
        Ok(config) => config,
        Err(_) if std::env::var("MASTER_WALLET_ADDRESS").is_err() => {
            println!("Please set the MASTER_WALLET_ADDRESS environment variable.");
            return;
        }
        Err(e) => {
            eprintln!("Invalid configuration: {e}");
            std::process::exit(1);
        }
    };

    let backend = match MoneroWalletRpc::new(config.wallet_rpc_url.clone(), config.backend_timeout) {
        Ok(backend) => backend,
        Err(e) => {
            eprintln!("{e}");
            std::process::exit(1);
        }
    };

    let manager = build_manager(&config, Arc::new(backend));
    let reaper = Reaper::new(manager.clone(), config.reaper_interval).spawn();

    let stdin = BufReader::new(tokio::io::stdin());
    if let Err(e) = run_menu(&manager, stdin, tokio::io::stdout()).await {
        tracing::error!("Console I/O failed: {}", e);
    }

    reaper.shutdown().await;
}

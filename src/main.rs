use std::sync::Arc;

use ephemeral_wallets::models::ServiceConfig;
use ephemeral_wallets::services::node_sync::{self, SYNC_POLL_INTERVAL};
use ephemeral_wallets::services::wallet::MoneroWalletRpc;
use ephemeral_wallets::{build_manager, create_rocket};
use tracing_subscriber::EnvFilter;

#[rocket::main]
async fn main() -> Result<(), rocket::Error> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();
    tracing::info!("Starting the ephemeral wallet service...");

    let dsn = std::env::var("SENTRY_DSN")
        .ok()
        .and_then(|s| s.parse().ok());
    let _sentry = sentry::init(sentry::ClientOptions {
        dsn,
        release: sentry::release_name!(),
        ..Default::default()
    });

    let config = match ServiceConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("Invalid configuration: {}", e);
            std::process::exit(1);
        }
    };

    if let Some(monerod_url) = &config.monerod_url {
        if let Err(e) = node_sync::wait_for_sync(monerod_url, SYNC_POLL_INTERVAL).await {
            tracing::error!("Daemon sync check failed: {}", e);
            std::process::exit(1);
        }
    }

    let backend = match MoneroWalletRpc::new(config.wallet_rpc_url.clone(), config.backend_timeout) {
        Ok(backend) => backend,
        Err(e) => {
            tracing::error!("{}", e);
            std::process::exit(1);
        }
    };

    let manager = build_manager(&config, Arc::new(backend));
    let _rocket = create_rocket(&config, manager).launch().await?;
    Ok(())
}

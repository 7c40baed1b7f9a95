use rocket::{Build, Rocket};
use rocket_okapi::openapi_get_routes;
use std::sync::Arc;

pub mod console;
pub mod error;
pub mod fairings;
pub mod models;
pub mod routes;
pub mod services;

use crate::fairings::{PanicCatcher, ReaperFairing, RequestLogger};
use crate::models::{AppState, ServiceConfig};
use crate::services::wallet::{JsonFileStore, LifecycleManager, WalletBackend};

/// Lifecycle manager persisting to the configured registry file
pub fn build_manager(
    config: &ServiceConfig,
    backend: Arc<dyn WalletBackend>,
) -> Arc<LifecycleManager> {
    let store = Arc::new(JsonFileStore::new(config.data_file.clone()));
    Arc::new(LifecycleManager::new(config, backend, store))
}

pub fn create_rocket(config: &ServiceConfig, manager: Arc<LifecycleManager>) -> Rocket<Build> {
    tracing::info!("Wallet service configured:");
    tracing::info!("  - Master address: {}", fairings::abbreviate_address(manager.master_address()));
    tracing::info!("  - Wallet RPC: {}", config.wallet_rpc_url);
    tracing::info!("  - Registry file: {}", config.data_file.display());
    tracing::info!("  - Wallet TTL: {}s", config.wallet_ttl.as_secs());
    tracing::info!("  - Tracked wallets: {}", manager.wallet_count());

    let app_state = AppState {
        manager,
        reaper_interval: config.reaper_interval,
    };

    rocket::build()
        .manage(app_state)
        .attach(RequestLogger)
        .attach(PanicCatcher)
        .attach(ReaperFairing::new())
        .mount(
            "/",
            openapi_get_routes![
                routes::index,
                routes::health,
                routes::create_wallet,
                routes::delete_wallet,
                routes::list_wallets,
            ],
        )
}

use std::path::PathBuf;
use std::time::Duration;

/// Wallet lifetime under the current policy
pub const DEFAULT_WALLET_TTL: Duration = Duration::from_secs(30 * 60);
/// How often the reaper looks for expired wallets
pub const DEFAULT_REAPER_INTERVAL: Duration = Duration::from_secs(60);
/// Upper bound on any single wallet RPC call
pub const DEFAULT_BACKEND_TIMEOUT: Duration = Duration::from_secs(30);

pub const DEFAULT_WALLET_RPC_URL: &str = "http://127.0.0.1:28088/json_rpc";
pub const DEFAULT_DATA_FILE: &str = "wallet_data.json";

/// Configuration for the wallet service
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    /// Destination for every sweep
    pub master_wallet_address: String,
    /// monero-wallet-rpc JSON-RPC endpoint
    pub wallet_rpc_url: String,
    /// Registry snapshot location
    pub data_file: PathBuf,
    pub wallet_ttl: Duration,
    pub reaper_interval: Duration,
    pub backend_timeout: Duration,
    /// monerod RPC base URL; when set, startup waits for the daemon to sync
    pub monerod_url: Option<String>,
}

impl ServiceConfig {
    /// Config with defaults for everything but the master address
    pub fn new(master_wallet_address: impl Into<String>) -> Self {
        Self {
            master_wallet_address: master_wallet_address.into(),
            wallet_rpc_url: DEFAULT_WALLET_RPC_URL.to_string(),
            data_file: PathBuf::from(DEFAULT_DATA_FILE),
            wallet_ttl: DEFAULT_WALLET_TTL,
            reaper_interval: DEFAULT_REAPER_INTERVAL,
            backend_timeout: DEFAULT_BACKEND_TIMEOUT,
            monerod_url: None,
        }
    }

    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, String> {
        let master_wallet_address = std::env::var("MASTER_WALLET_ADDRESS")
            .ok()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .ok_or("MASTER_WALLET_ADDRESS environment variable not set")?;

        let config = Self {
            master_wallet_address,
            wallet_rpc_url: std::env::var("WALLET_RPC_URL")
                .unwrap_or_else(|_| DEFAULT_WALLET_RPC_URL.to_string()),
            data_file: std::env::var("WALLET_DATA_FILE")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from(DEFAULT_DATA_FILE)),
            wallet_ttl: secs_from_env("WALLET_TTL_SECS", DEFAULT_WALLET_TTL)?,
            reaper_interval: secs_from_env("REAPER_INTERVAL_SECS", DEFAULT_REAPER_INTERVAL)?,
            backend_timeout: secs_from_env("BACKEND_TIMEOUT_SECS", DEFAULT_BACKEND_TIMEOUT)?,
            monerod_url: std::env::var("MONEROD_URL")
                .ok()
                .filter(|s| !s.trim().is_empty()),
        };

        Ok(config)
    }
}

fn secs_from_env(name: &str, default: Duration) -> Result<Duration, String> {
    match std::env::var(name) {
        Ok(raw) => {
            let secs = raw
                .trim()
                .parse::<u64>()
                .map_err(|e| format!("Invalid {name} '{raw}': {e}"))?;
            if secs == 0 {
                return Err(format!("{name} must be greater than zero"));
            }
            Ok(Duration::from_secs(secs))
        }
        Err(_) => Ok(default),
    }
}

//! Wait for monerod to finish syncing before serving wallets
//!
//! wallet-rpc answers balance and sweep calls against whatever chain state
//! the daemon has, so addresses handed out before the daemon catches up
//! would report stale balances.

use serde::Deserialize;
use serde_json::json;
use std::time::Duration;

use super::wallet::JsonRpcClient;
use crate::error::BackendError;

/// Poll period used by the server binary
pub const SYNC_POLL_INTERVAL: Duration = Duration::from_secs(10);

/// Subset of monerod's `get_info` result
#[derive(Debug, Clone, Deserialize)]
pub struct DaemonInfo {
    pub height: u64,
    #[serde(default)]
    pub target_height: u64,
    #[serde(default)]
    pub synchronized: bool,
}

impl DaemonInfo {
    /// monerod reports `target_height == 0` once it has no taller peer
    pub fn is_synchronized(&self) -> bool {
        self.synchronized || self.target_height == 0 || self.height >= self.target_height
    }
}

/// `http://host:18081` → `http://host:18081/json_rpc`
pub fn json_rpc_url(daemon_url: &str) -> String {
    let base = daemon_url.trim_end_matches('/');
    if base.ends_with("/json_rpc") {
        base.to_string()
    } else {
        format!("{base}/json_rpc")
    }
}

pub async fn fetch_info(client: &JsonRpcClient) -> Result<DaemonInfo, BackendError> {
    client.call("get_info", json!({})).await
}

/// Block until the daemon reports itself synchronized
///
/// Request failures are logged and retried on the next poll.
pub async fn wait_for_sync(daemon_url: &str, poll_interval: Duration) -> Result<(), String> {
    let client = JsonRpcClient::new(json_rpc_url(daemon_url), poll_interval)?;
    tracing::info!("Waiting for Monero node at {} to synchronize...", client.url());

    loop {
        match fetch_info(&client).await {
            Ok(info) if info.is_synchronized() => {
                tracing::info!(height = info.height, "Monero node is synchronized");
                return Ok(());
            }
            Ok(info) => {
                tracing::info!(
                    height = info.height,
                    target_height = info.target_height,
                    "Monero node still syncing"
                );
            }
            Err(e) => {
                tracing::warn!("Error checking node synchronization: {}", e);
            }
        }
        tokio::time::sleep(poll_interval).await;
    }
}

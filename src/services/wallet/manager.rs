//! Ephemeral wallet lifecycle coordinator
//!
//! [`LifecycleManager`] ties the registry, the wallet backend and the store
//! together. A wallet moves `Active → Sweeping → removed`; an address that
//! has been removed is never registered again.
//!
//! Listing and expiry are decoupled: `list_active` hides a
//! wallet as soon as less than a full minute of its TTL remains, while the
//! record itself stays in the registry until the reaper's next pass (at most
//! one reaper interval later).

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use chrono::Duration as TimeDelta;
use futures::future::join_all;

use super::backend::{Clock, SystemClock, WalletBackend};
use super::registry::WalletRegistry;
use super::store::{RegistrySnapshot, RegistryStore};
use crate::error::{BackendError, Result, WalletError};
use crate::models::config::ServiceConfig;
use crate::models::wallet::{BackendHandle, TransferResult, WalletRecord, WalletSummary};

/// Store writes tried before a mutation is reported as failed
const SAVE_ATTEMPTS: u32 = 2;

/// Outcome of one expiry pass
#[derive(Debug, Default)]
pub struct SweepReport {
    /// Expired wallets swept and removed
    pub swept: Vec<String>,
    /// Expired wallets already removed or claimed by a concurrent delete
    pub skipped: Vec<String>,
    /// Expired wallets kept for the next pass
    pub failed: Vec<(String, WalletError)>,
}

impl SweepReport {
    pub fn is_empty(&self) -> bool {
        self.swept.is_empty() && self.skipped.is_empty() && self.failed.is_empty()
    }
}

/// Central coordinator for ephemeral wallet operations
pub struct LifecycleManager {
    registry: WalletRegistry,
    backend: Arc<dyn WalletBackend>,
    store: Arc<dyn RegistryStore>,
    clock: Arc<dyn Clock>,
    master_address: String,
    ttl: TimeDelta,
    backend_timeout: Duration,
    /// Serializes snapshot-and-save so an older snapshot never lands last
    persist_lock: tokio::sync::Mutex<()>,
}

impl LifecycleManager {
    /// Create a manager, loading whatever the store last persisted
    pub fn new(
        config: &ServiceConfig,
        backend: Arc<dyn WalletBackend>,
        store: Arc<dyn RegistryStore>,
    ) -> Self {
        let recovered = store
            .load()
            .into_iter()
            .map(|(address, created_at)| WalletRecord::new(address, created_at, None));
        let registry = WalletRegistry::from_records(recovered);
        if !registry.is_empty() {
            tracing::info!("Recovered {} wallet(s) from previous run", registry.len());
        }

        Self {
            registry,
            backend,
            store,
            clock: Arc::new(SystemClock),
            master_address: config.master_wallet_address.clone(),
            ttl: TimeDelta::milliseconds(config.wallet_ttl.as_millis() as i64),
            backend_timeout: config.backend_timeout,
            persist_lock: tokio::sync::Mutex::new(()),
        }
    }

    /// Replace the time source
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn master_address(&self) -> &str {
        &self.master_address
    }

    pub fn ttl(&self) -> TimeDelta {
        self.ttl
    }

    /// Registry entry for an address, in any lifecycle state
    pub fn wallet(&self, address: &str) -> Option<WalletRecord> {
        self.registry.get(address)
    }

    pub fn wallet_count(&self) -> usize {
        self.registry.len()
    }

    /// Register a fresh wallet and return its address
    ///
    /// The wallet becomes visible only once the store holds it. The registry
    /// is unchanged if the backend or the store fails.
    pub async fn create_wallet(&self) -> Result<String> {
        let (address, handle) = self
            .call_backend("new_wallet", self.backend.new_wallet())
            .await?;

        let record = WalletRecord::new(address.clone(), self.clock.now(), Some(handle));
        let created_at = record.created_at;
        self.persist_then(
            |snapshot| {
                if snapshot.contains_key(&address) {
                    return Err(WalletError::DuplicateAddress(address.clone()));
                }
                snapshot.insert(address.clone(), created_at);
                Ok(())
            },
            || self.registry.insert(record),
        )
        .await
        .inspect_err(|e| {
            tracing::error!(address = %address, "Wallet not registered: {}", e);
        })?;

        tracing::info!(address = %address, "Created ephemeral wallet");
        Ok(address)
    }

    /// Sweep a wallet into the master address and remove it
    ///
    /// Returns `Ok(false)` for unknown addresses and for wallets another
    /// delete is already sweeping. If the sweep or the store write fails the
    /// wallet stays registered so a later call or reaper pass can retry it;
    /// a retry after a landed transfer finds a zero balance and only
    /// repeats the store write.
    pub async fn delete_wallet(&self, address: &str) -> Result<bool> {
        let record = match self.registry.reserve(address) {
            Ok(record) => record,
            Err(WalletError::NotFound(_)) => return Ok(false),
            Err(e) => return Err(e),
        };

        match self.sweep(&record).await {
            Ok(Some(transfer)) => {
                tracing::info!(
                    address = %address,
                    amount = transfer.amount,
                    fee = transfer.fee,
                    txs = ?transfer.tx_hashes,
                    "Swept wallet balance to master address"
                );
            }
            Ok(None) => {
                tracing::debug!(address = %address, "Wallet empty, nothing to sweep");
            }
            Err(e) => {
                self.registry.release(address);
                tracing::warn!(address = %address, "Sweep failed, keeping wallet: {}", e);
                return Err(e);
            }
        }

        // Acknowledge only once the store no longer holds the address
        let removed = self
            .persist_then(
                |snapshot| {
                    snapshot.remove(address);
                    Ok(())
                },
                || self.registry.remove(address),
            )
            .await;
        if let Err(e) = removed {
            self.registry.release(address);
            tracing::error!(address = %address, "Wallet swept but removal not persisted, keeping it: {}", e);
            return Err(e);
        }

        tracing::info!(address = %address, "Deleted wallet");
        Ok(true)
    }

    /// Wallets with at least one full minute left, with live balances
    pub async fn list_active(&self) -> Vec<WalletSummary> {
        let now = self.clock.now();
        let visible: Vec<(WalletRecord, i64)> = self
            .registry
            .snapshot()
            .into_iter()
            .filter(WalletRecord::is_active)
            .filter_map(|record| {
                let minutes = record.minutes_remaining(self.ttl, now);
                (minutes > 0).then_some((record, minutes))
            })
            .collect();

        // Outside the registry lock: a slow backend must not block writers
        let balances = join_all(visible.iter().map(|(record, _)| self.balance_of(record))).await;

        visible
            .into_iter()
            .zip(balances)
            .map(|((record, minutes), balance)| {
                WalletSummary::new(record.address, minutes, balance)
            })
            .collect()
    }

    /// Delete every wallet whose TTL window has elapsed
    ///
    /// Failures are isolated per wallet; failed wallets stay registered and
    /// are retried on the next pass.
    pub async fn sweep_expired(&self) -> SweepReport {
        let now = self.clock.now();
        let expired: Vec<String> = self
            .registry
            .snapshot()
            .into_iter()
            .filter(|record| record.is_active() && record.is_expired(self.ttl, now))
            .map(|record| record.address)
            .collect();

        let mut report = SweepReport::default();
        for address in expired {
            match self.delete_wallet(&address).await {
                Ok(true) => report.swept.push(address),
                Ok(false) => report.skipped.push(address),
                Err(e) => {
                    tracing::warn!(address = %address, "Expired wallet not swept: {}", e);
                    report.failed.push((address, e));
                }
            }
        }
        report
    }

    async fn sweep(&self, record: &WalletRecord) -> Result<Option<TransferResult>> {
        let handle = self.resolve_handle(record).await?;
        let balance = self
            .call_backend("balance", self.backend.balance(handle))
            .await?;
        if balance == 0 {
            return Ok(None);
        }

        let transfer = self
            .call_backend(
                "transfer_all",
                self.backend.transfer_all(handle, &self.master_address),
            )
            .await?;
        Ok(Some(transfer))
    }

    async fn balance_of(&self, record: &WalletRecord) -> Option<u64> {
        let balance = async {
            let handle = self.resolve_handle(record).await?;
            self.call_backend("balance", self.backend.balance(handle))
                .await
        }
        .await;

        balance
            .inspect_err(|e| {
                tracing::warn!(address = %record.address, "Balance unavailable: {}", e);
            })
            .ok()
    }

    async fn resolve_handle(&self, record: &WalletRecord) -> Result<BackendHandle> {
        if let Some(handle) = record.backend_handle {
            return Ok(handle);
        }

        let handle = self
            .call_backend("attach", self.backend.attach(&record.address))
            .await?;
        self.registry.set_handle(&record.address, handle);
        tracing::debug!(address = %record.address, "Re-attached recovered wallet");
        Ok(handle)
    }

    async fn call_backend<T>(
        &self,
        operation: &'static str,
        call: impl Future<Output = std::result::Result<T, BackendError>>,
    ) -> Result<T> {
        match tokio::time::timeout(self.backend_timeout, call).await {
            Ok(result) => result.map_err(WalletError::from),
            Err(_) => Err(WalletError::BackendTimeout {
                operation,
                after: self.backend_timeout,
            }),
        }
    }

    /// Save an edited snapshot, then apply the matching in-memory change
    ///
    /// Both steps run under `persist_lock`, so every registry membership
    /// change lands on disk before any caller can observe it.
    async fn persist_then<T>(
        &self,
        edit: impl FnOnce(&mut RegistrySnapshot) -> Result<()>,
        apply: impl FnOnce() -> Result<T>,
    ) -> Result<T> {
        let _guard = self.persist_lock.lock().await;
        let mut snapshot: RegistrySnapshot = self
            .registry
            .snapshot()
            .into_iter()
            .map(|record| (record.address, record.created_at))
            .collect();
        edit(&mut snapshot)?;

        let snapshot = Arc::new(snapshot);
        let mut attempt = 1;
        loop {
            let store = Arc::clone(&self.store);
            let to_save = Arc::clone(&snapshot);
            let saved = tokio::task::spawn_blocking(move || store.save(&to_save))
                .await
                .map_err(|e| WalletError::PersistenceFailure(format!("save task failed: {e}")))
                .and_then(|saved| saved);
            match saved {
                Ok(()) => break,
                Err(e) if attempt < SAVE_ATTEMPTS => {
                    tracing::warn!("Registry save failed (attempt {}), retrying: {}", attempt, e);
                    attempt += 1;
                }
                Err(e) => return Err(e),
            }
        }

        apply()
    }
}

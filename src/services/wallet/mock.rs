//! Mock implementations for testing wallet services
//!
//! These stand in for monero-wallet-rpc, the registry file and the wall
//! clock so lifecycle behavior can be exercised without external services.

use async_trait::async_trait;
use chrono::{DateTime, Duration as TimeDelta, Utc};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use super::backend::{Clock, WalletBackend};
use super::store::{RegistrySnapshot, RegistryStore};
use crate::error::{BackendError, WalletError};
use crate::models::wallet::{BackendHandle, TransferResult};

/// A transfer the mock backend executed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MockTransfer {
    pub from: String,
    pub to: String,
    pub amount: u64,
}

#[derive(Debug, Default)]
struct MockState {
    addresses: HashMap<u64, String>,
    balances: HashMap<String, u64>,
    transfers: Vec<MockTransfer>,
    queued_addresses: Vec<String>,
}

/// In-memory wallet backend with failure and latency injection
#[derive(Debug, Default)]
pub struct MockWalletBackend {
    state: Mutex<MockState>,
    next_handle: AtomicU64,
    fail_new_wallet: AtomicBool,
    fail_transfers: AtomicBool,
    fail_balance: AtomicBool,
    balance_delay_ms: AtomicU64,
    transfer_delay_ms: AtomicU64,
    new_wallet_delay_ms: AtomicU64,
    transfer_attempts: AtomicUsize,
}

impl MockWalletBackend {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, MockState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Credit an address as if a deposit arrived
    pub fn set_balance(&self, address: &str, amount: u64) {
        self.lock().balances.insert(address.to_string(), amount);
    }

    pub fn balance_of(&self, address: &str) -> u64 {
        self.lock().balances.get(address).copied().unwrap_or(0)
    }

    /// Transfers that succeeded, in order
    pub fn transfers(&self) -> Vec<MockTransfer> {
        self.lock().transfers.clone()
    }

    pub fn transfers_from(&self, address: &str) -> usize {
        self.lock()
            .transfers
            .iter()
            .filter(|t| t.from == address)
            .count()
    }

    /// Every `transfer_all` call, including failed ones
    pub fn transfer_attempts(&self) -> usize {
        self.transfer_attempts.load(Ordering::SeqCst)
    }

    /// Make the next `new_wallet` hand out this address
    pub fn queue_address(&self, address: &str) {
        self.lock().queued_addresses.push(address.to_string());
    }

    pub fn fail_new_wallet(&self, fail: bool) {
        self.fail_new_wallet.store(fail, Ordering::SeqCst);
    }

    pub fn fail_transfers(&self, fail: bool) {
        self.fail_transfers.store(fail, Ordering::SeqCst);
    }

    pub fn fail_balance(&self, fail: bool) {
        self.fail_balance.store(fail, Ordering::SeqCst);
    }

    pub fn set_balance_delay(&self, delay: Duration) {
        self.balance_delay_ms
            .store(delay.as_millis() as u64, Ordering::SeqCst);
    }

    pub fn set_transfer_delay(&self, delay: Duration) {
        self.transfer_delay_ms
            .store(delay.as_millis() as u64, Ordering::SeqCst);
    }

    pub fn set_new_wallet_delay(&self, delay: Duration) {
        self.new_wallet_delay_ms
            .store(delay.as_millis() as u64, Ordering::SeqCst);
    }

    fn address_for(&self, handle: BackendHandle) -> Result<String, BackendError> {
        self.lock()
            .addresses
            .get(&handle.id())
            .cloned()
            .ok_or_else(|| BackendError::Rpc {
                code: -1,
                message: format!("no account {}", handle.id()),
            })
    }

    async fn pause(delay_ms: &AtomicU64) {
        let ms = delay_ms.load(Ordering::SeqCst);
        if ms > 0 {
            tokio::time::sleep(Duration::from_millis(ms)).await;
        }
    }
}

#[async_trait]
impl WalletBackend for MockWalletBackend {
    async fn new_wallet(&self) -> Result<(String, BackendHandle), BackendError> {
        Self::pause(&self.new_wallet_delay_ms).await;
        if self.fail_new_wallet.load(Ordering::SeqCst) {
            return Err(BackendError::Transport("connection refused".to_string()));
        }

        let id = self.next_handle.fetch_add(1, Ordering::SeqCst);
        let mut state = self.lock();
        let address = if state.queued_addresses.is_empty() {
            format!("4{}", uuid::Uuid::new_v4().simple())
        } else {
            state.queued_addresses.remove(0)
        };
        state.addresses.insert(id, address.clone());
        state.balances.entry(address.clone()).or_insert(0);
        Ok((address, BackendHandle::new(id)))
    }

    async fn attach(&self, address: &str) -> Result<BackendHandle, BackendError> {
        let state = self.lock();
        state
            .addresses
            .iter()
            .find(|(_, a)| a.as_str() == address)
            .map(|(id, _)| BackendHandle::new(*id))
            .ok_or_else(|| BackendError::UnknownAddress(address.to_string()))
    }

    async fn balance(&self, handle: BackendHandle) -> Result<u64, BackendError> {
        Self::pause(&self.balance_delay_ms).await;
        if self.fail_balance.load(Ordering::SeqCst) {
            return Err(BackendError::Transport("balance unavailable".to_string()));
        }
        let address = self.address_for(handle)?;
        Ok(self.balance_of(&address))
    }

    async fn transfer_all(
        &self,
        handle: BackendHandle,
        destination: &str,
    ) -> Result<TransferResult, BackendError> {
        self.transfer_attempts.fetch_add(1, Ordering::SeqCst);
        Self::pause(&self.transfer_delay_ms).await;
        if self.fail_transfers.load(Ordering::SeqCst) {
            return Err(BackendError::Rpc {
                code: -4,
                message: "not enough unlocked money".to_string(),
            });
        }

        let address = self.address_for(handle)?;
        let mut state = self.lock();
        let amount = state.balances.insert(address.clone(), 0).unwrap_or(0);
        *state.balances.entry(destination.to_string()).or_insert(0) += amount;
        state.transfers.push(MockTransfer {
            from: address,
            to: destination.to_string(),
            amount,
        });

        Ok(TransferResult {
            tx_hashes: vec![format!("{:064x}", state.transfers.len())],
            amount,
            fee: 0,
        })
    }
}

/// Registry store kept in memory, with injectable save failures
#[derive(Debug, Default)]
pub struct MemoryStore {
    snapshot: Mutex<RegistrySnapshot>,
    fail_saves: AtomicBool,
    save_delay_ms: AtomicU64,
    saves: AtomicUsize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_snapshot(snapshot: RegistrySnapshot) -> Self {
        Self {
            snapshot: Mutex::new(snapshot),
            ..Self::default()
        }
    }

    pub fn snapshot(&self) -> RegistrySnapshot {
        self.snapshot
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn fail_saves(&self, fail: bool) {
        self.fail_saves.store(fail, Ordering::SeqCst);
    }

    /// Block each save for `delay`, widening the window before it lands
    pub fn set_save_delay(&self, delay: Duration) {
        self.save_delay_ms
            .store(delay.as_millis() as u64, Ordering::SeqCst);
    }

    pub fn save_count(&self) -> usize {
        self.saves.load(Ordering::SeqCst)
    }
}

impl RegistryStore for MemoryStore {
    fn load(&self) -> RegistrySnapshot {
        self.snapshot()
    }

    fn save(&self, snapshot: &RegistrySnapshot) -> crate::error::Result<()> {
        let delay_ms = self.save_delay_ms.load(Ordering::SeqCst);
        if delay_ms > 0 {
            std::thread::sleep(Duration::from_millis(delay_ms));
        }
        if self.fail_saves.load(Ordering::SeqCst) {
            return Err(WalletError::PersistenceFailure("disk full".to_string()));
        }
        self.saves.fetch_add(1, Ordering::SeqCst);
        *self
            .snapshot
            .lock()
            .unwrap_or_else(PoisonError::into_inner) = snapshot.clone();
        Ok(())
    }
}

/// Clock that only moves when told to
#[derive(Debug)]
pub struct ManualClock {
    now: Mutex<DateTime<Utc>>,
}

impl ManualClock {
    pub fn new(start: DateTime<Utc>) -> Self {
        Self {
            now: Mutex::new(start),
        }
    }

    pub fn advance(&self, by: TimeDelta) {
        *self.now.lock().unwrap_or_else(PoisonError::into_inner) += by;
    }

    pub fn set(&self, to: DateTime<Utc>) {
        *self.now.lock().unwrap_or_else(PoisonError::into_inner) = to;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

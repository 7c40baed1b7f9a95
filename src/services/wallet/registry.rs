//! In-memory registry of live ephemeral wallets
//!
//! One mutex guards the whole map. Every operation takes it briefly and
//! never awaits while holding it, so callers must not do backend or disk
//! I/O from inside a registry call.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::error::{Result, WalletError};
use crate::models::wallet::{BackendHandle, SweepState, WalletRecord};

#[derive(Debug, Default)]
pub struct WalletRegistry {
    entries: Mutex<HashMap<String, WalletRecord>>,
}

impl WalletRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a registry from recovered records; later duplicates are dropped
    pub fn from_records(records: impl IntoIterator<Item = WalletRecord>) -> Self {
        let mut entries = HashMap::new();
        for record in records {
            entries.entry(record.address.clone()).or_insert(record);
        }
        Self {
            entries: Mutex::new(entries),
        }
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, WalletRecord>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn insert(&self, record: WalletRecord) -> Result<()> {
        let mut entries = self.lock();
        if entries.contains_key(&record.address) {
            return Err(WalletError::DuplicateAddress(record.address));
        }
        entries.insert(record.address.clone(), record);
        Ok(())
    }

    pub fn remove(&self, address: &str) -> Result<WalletRecord> {
        self.lock()
            .remove(address)
            .ok_or_else(|| WalletError::NotFound(address.to_string()))
    }

    pub fn get(&self, address: &str) -> Option<WalletRecord> {
        self.lock().get(address).cloned()
    }

    /// Claim an active wallet for sweeping
    ///
    /// Only one caller can win the claim. Unknown and already-claimed
    /// addresses both report `NotFound`.
    pub fn reserve(&self, address: &str) -> Result<WalletRecord> {
        let mut entries = self.lock();
        match entries.get_mut(address) {
            Some(record) if record.is_active() => {
                record.state = SweepState::Sweeping;
                Ok(record.clone())
            }
            _ => Err(WalletError::NotFound(address.to_string())),
        }
    }

    /// Hand a claimed wallet back after a failed sweep
    pub fn release(&self, address: &str) -> bool {
        match self.lock().get_mut(address) {
            Some(record) if record.state == SweepState::Sweeping => {
                record.state = SweepState::Active;
                true
            }
            _ => false,
        }
    }

    /// Cache a backend handle resolved after a restart
    pub fn set_handle(&self, address: &str, handle: BackendHandle) {
        if let Some(record) = self.lock().get_mut(address) {
            record.backend_handle = Some(handle);
        }
    }

    /// Point-in-time copy ordered by creation time, then address
    pub fn snapshot(&self) -> Vec<WalletRecord> {
        let mut records: Vec<WalletRecord> = self.lock().values().cloned().collect();
        records.sort_by(|a, b| {
            a.created_at
                .cmp(&b.created_at)
                .then_with(|| a.address.cmp(&b.address))
        });
        records
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }
}

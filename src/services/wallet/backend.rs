//! Capability contract of the external wallet service
//!
//! The lifecycle manager never touches keys or the chain directly. It asks a
//! [`WalletBackend`] for fresh addresses, balances and sweeps, and reads the
//! time through a [`Clock`] so TTL accounting can be driven by tests.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::error::BackendError;
use crate::models::wallet::{BackendHandle, TransferResult};

/// Wallet operations delegated to an external wallet service
#[async_trait]
pub trait WalletBackend: Send + Sync {
    /// Create a new address-bearing wallet
    async fn new_wallet(&self) -> Result<(String, BackendHandle), BackendError>;

    /// Re-resolve the session for an address created earlier
    ///
    /// Used for records recovered from disk, whose handles are not persisted.
    async fn attach(&self, address: &str) -> Result<BackendHandle, BackendError>;

    /// Total balance in atomic units
    async fn balance(&self, handle: BackendHandle) -> Result<u64, BackendError>;

    /// Move the whole balance to `destination`
    async fn transfer_all(
        &self,
        handle: BackendHandle,
        destination: &str,
    ) -> Result<TransferResult, BackendError>;
}

/// Source of the current time
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall-clock time
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

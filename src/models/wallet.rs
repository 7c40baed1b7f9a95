use chrono::{DateTime, Duration as TimeDelta, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Atomic units per XMR (piconero)
pub const ATOMIC_UNITS_PER_XMR: u64 = 1_000_000_000_000;

/// Opaque reference to a wallet session held by the backend
///
/// Never persisted. After a restart the lifecycle manager re-resolves it
/// from the address through [`WalletBackend::attach`].
///
/// [`WalletBackend::attach`]: crate::services::wallet::WalletBackend::attach
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BackendHandle(u64);

impl BackendHandle {
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    pub fn id(&self) -> u64 {
        self.0
    }
}

/// Where a registry entry is in its lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SweepState {
    /// Registered and eligible for listing, deletion and expiry
    Active,
    /// Reserved by a delete whose transfer has not finished yet
    Sweeping,
}

/// One ephemeral wallet
#[derive(Debug, Clone)]
pub struct WalletRecord {
    /// Receiving address; primary key of the registry
    pub address: String,
    /// Start of the TTL window, immutable once set
    pub created_at: DateTime<Utc>,
    /// Live backend session, `None` for records recovered from disk
    pub backend_handle: Option<BackendHandle>,
    pub state: SweepState,
}

impl WalletRecord {
    pub fn new(
        address: impl Into<String>,
        created_at: DateTime<Utc>,
        backend_handle: Option<BackendHandle>,
    ) -> Self {
        Self {
            address: address.into(),
            created_at,
            backend_handle,
            state: SweepState::Active,
        }
    }

    pub fn expires_at(&self, ttl: TimeDelta) -> DateTime<Utc> {
        self.created_at + ttl
    }

    /// Time left in the TTL window; negative once it has elapsed
    pub fn remaining(&self, ttl: TimeDelta, now: DateTime<Utc>) -> TimeDelta {
        self.expires_at(ttl) - now
    }

    /// `floor(remaining / 60s)`
    pub fn minutes_remaining(&self, ttl: TimeDelta, now: DateTime<Utc>) -> i64 {
        self.remaining(ttl, now).num_seconds().div_euclid(60)
    }

    /// True once `now - created_at >= ttl`
    pub fn is_expired(&self, ttl: TimeDelta, now: DateTime<Utc>) -> bool {
        now - self.created_at >= ttl
    }

    pub fn is_active(&self) -> bool {
        self.state == SweepState::Active
    }
}

/// Outcome of sweeping a wallet into the master address
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransferResult {
    pub tx_hashes: Vec<String>,
    /// Amount moved, in atomic units
    pub amount: u64,
    /// Network fee paid, in atomic units
    pub fee: u64,
}

/// A wallet as shown by `GET /wallets`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct WalletSummary {
    pub address: String,
    pub minutes_remaining: i64,
    /// Balance in atomic units, `null` if the backend could not report it
    pub balance: Option<u64>,
    /// Same balance formatted as XMR
    pub balance_xmr: Option<String>,
}

impl WalletSummary {
    pub fn new(address: String, minutes_remaining: i64, balance: Option<u64>) -> Self {
        Self {
            address,
            minutes_remaining,
            balance,
            balance_xmr: balance.map(format_xmr),
        }
    }
}

/// Format atomic units as a decimal XMR amount with 12 places
pub fn format_xmr(atomic: u64) -> String {
    format!(
        "{}.{:012}",
        atomic / ATOMIC_UNITS_PER_XMR,
        atomic % ATOMIC_UNITS_PER_XMR
    )
}

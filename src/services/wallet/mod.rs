//! Ephemeral wallet lifecycle services
//!
//! This module provides:
//! - WalletBackend: capability contract of the external wallet service
//! - MoneroWalletRpc: WalletBackend over monero-wallet-rpc
//! - WalletRegistry: lock-guarded map of live wallets
//! - RegistryStore: durable registry snapshots (JsonFileStore)
//! - LifecycleManager: create / delete-with-sweep / list / expiry sweep
//! - Reaper: periodic driver of the expiry sweep

pub mod backend;
pub mod manager;
pub mod mock;
pub mod monero;
pub mod reaper;
pub mod registry;
pub mod store;

pub use backend::{Clock, SystemClock, WalletBackend};
pub use manager::{LifecycleManager, SweepReport};
pub use mock::{ManualClock, MemoryStore, MockTransfer, MockWalletBackend};
pub use monero::{JsonRpcClient, MoneroWalletRpc};
pub use reaper::{Reaper, ReaperHandle};
pub use registry::WalletRegistry;
pub use store::{JsonFileStore, RegistrySnapshot, RegistryStore};

// Re-export model types for convenience
pub use crate::models::wallet::{BackendHandle, TransferResult, WalletRecord, WalletSummary};

//! Error types for the ephemeral wallet service

use std::time::Duration;

use rocket::http::Status;
use thiserror::Error;

/// Result type alias using [`WalletError`]
pub type Result<T> = std::result::Result<T, WalletError>;

/// Errors surfaced by the wallet lifecycle
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum WalletError {
    /// Wallet creation, balance or transfer call failed
    #[error("Wallet backend unavailable: {0}")]
    BackendUnavailable(String),

    /// A backend call did not answer within the configured timeout
    #[error("Wallet backend timed out after {}s during {operation}", .after.as_secs())]
    BackendTimeout {
        operation: &'static str,
        after: Duration,
    },

    /// Operation on an address the registry does not know
    #[error("Wallet not found: {0}")]
    NotFound(String),

    /// Registry already holds this address
    #[error("Duplicate wallet address: {0}")]
    DuplicateAddress(String),

    /// Registry snapshot could not be read or written
    #[error("Persistence failure: {0}")]
    PersistenceFailure(String),
}

impl WalletError {
    /// Stable machine-readable kind, used in API error bodies
    pub fn kind(&self) -> &'static str {
        match self {
            Self::BackendUnavailable(_) => "BackendUnavailable",
            Self::BackendTimeout { .. } => "BackendTimeout",
            Self::NotFound(_) => "NotFound",
            Self::DuplicateAddress(_) => "DuplicateAddress",
            Self::PersistenceFailure(_) => "PersistenceFailure",
        }
    }

    /// HTTP status an API caller receives for this error
    pub fn status(&self) -> Status {
        match self {
            Self::BackendUnavailable(_) => Status::ServiceUnavailable,
            Self::BackendTimeout { .. } => Status::GatewayTimeout,
            Self::NotFound(_) => Status::NotFound,
            Self::DuplicateAddress(_) | Self::PersistenceFailure(_) => {
                Status::InternalServerError
            }
        }
    }
}

/// Error returned by a [`WalletBackend`](crate::services::wallet::WalletBackend)
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BackendError {
    /// Transport-level failure talking to the wallet service
    #[error("request failed: {0}")]
    Transport(String),

    /// The wallet service answered with an error object
    #[error("rpc error {code}: {message}")]
    Rpc { code: i64, message: String },

    /// The answer could not be decoded
    #[error("malformed response: {0}")]
    Malformed(String),

    /// The backend has no wallet for this address
    #[error("unknown address: {0}")]
    UnknownAddress(String),
}

impl From<BackendError> for WalletError {
    fn from(e: BackendError) -> Self {
        WalletError::BackendUnavailable(e.to_string())
    }
}

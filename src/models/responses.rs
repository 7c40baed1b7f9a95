use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::wallet::WalletSummary;
use crate::error::WalletError;

pub const STATUS_SUCCESS: &str = "success";
pub const STATUS_ERROR: &str = "error";

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct CreateWalletResponse {
    pub status: String,
    pub address: String,
}

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct DeleteWalletResponse {
    pub status: String,
    pub message: String,
}

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct ListWalletsResponse {
    pub status: String,
    pub wallets: Vec<WalletSummary>,
}

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct HealthResponse {
    pub status: String,
    /// RFC 3339 server time
    pub timestamp: String,
}

/// Body of every non-2xx response
#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct ErrorResponse {
    pub status: String,
    pub kind: String,
    pub message: String,
}

impl From<&WalletError> for ErrorResponse {
    fn from(e: &WalletError) -> Self {
        Self {
            status: STATUS_ERROR.to_string(),
            kind: e.kind().to_string(),
            message: e.to_string(),
        }
    }
}

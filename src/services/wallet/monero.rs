//! monero-wallet-rpc backend
//!
//! Every ephemeral wallet is an *account* inside one wallet file served by
//! `monero-wallet-rpc`. The account index is the backend handle, and
//! `get_address_index` maps a recovered address back to its account.

use async_trait::async_trait;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use std::time::Duration;

use super::backend::WalletBackend;
use crate::error::BackendError;
use crate::models::wallet::{BackendHandle, TransferResult};

/// Label attached to every account created here
pub const ACCOUNT_LABEL: &str = "ephemeral";

/// wallet-rpc `WALLET_RPC_ERROR_CODE_WRONG_ADDRESS`, also returned by
/// `get_address_index` for addresses that belong to another wallet
pub const WRONG_ADDRESS_CODE: i64 = -2;

/// Headroom over the lifecycle deadline so the caller's timeout fires first
pub const TRANSPORT_GRACE: Duration = Duration::from_secs(5);

/// Minimal JSON-RPC 2.0 client shared by the wallet and daemon integrations
#[derive(Clone)]
pub struct JsonRpcClient {
    client: reqwest::Client,
    url: String,
}

#[derive(Debug, Deserialize)]
struct RpcEnvelope<R> {
    result: Option<R>,
    error: Option<RpcErrorBody>,
}

#[derive(Debug, Deserialize)]
struct RpcErrorBody {
    code: i64,
    message: String,
}

impl JsonRpcClient {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self, String> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| format!("Failed to build HTTP client: {e}"))?;
        Ok(Self {
            client,
            url: url.into(),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub async fn call<R: DeserializeOwned>(
        &self,
        method: &str,
        params: Value,
    ) -> Result<R, BackendError> {
        let body = json!({
            "jsonrpc": "2.0",
            "id": "0",
            "method": method,
            "params": params,
        });

        let response = self
            .client
            .post(&self.url)
            .json(&body)
            .send()
            .await
            .map_err(|e| BackendError::Transport(format!("{method}: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            return Err(BackendError::Transport(format!(
                "{method}: HTTP {status}"
            )));
        }

        let value: Value = response
            .json()
            .await
            .map_err(|e| BackendError::Malformed(format!("{method}: {e}")))?;
        decode_response(method, value)
    }
}

/// Unwrap a JSON-RPC response body into its `result`
pub fn decode_response<R: DeserializeOwned>(method: &str, value: Value) -> Result<R, BackendError> {
    let envelope: RpcEnvelope<R> = serde_json::from_value(value)
        .map_err(|e| BackendError::Malformed(format!("{method}: {e}")))?;

    if let Some(error) = envelope.error {
        return Err(BackendError::Rpc {
            code: error.code,
            message: error.message,
        });
    }

    envelope
        .result
        .ok_or_else(|| BackendError::Malformed(format!("{method}: missing result")))
}

#[derive(Debug, Deserialize)]
struct CreateAccountResult {
    account_index: u32,
    address: String,
}

#[derive(Debug, Deserialize)]
struct AddressIndex {
    major: u32,
}

#[derive(Debug, Deserialize)]
struct GetAddressIndexResult {
    index: AddressIndex,
}

#[derive(Debug, Deserialize)]
struct GetBalanceResult {
    balance: u64,
}

#[derive(Debug, Default, Deserialize)]
struct SweepAllResult {
    #[serde(default)]
    tx_hash_list: Vec<String>,
    #[serde(default)]
    amount_list: Vec<u64>,
    #[serde(default)]
    fee_list: Vec<u64>,
}

impl From<SweepAllResult> for TransferResult {
    fn from(r: SweepAllResult) -> Self {
        TransferResult {
            amount: r.amount_list.iter().sum(),
            fee: r.fee_list.iter().sum(),
            tx_hashes: r.tx_hash_list,
        }
    }
}

/// [`WalletBackend`] over monero-wallet-rpc
#[derive(Clone)]
pub struct MoneroWalletRpc {
    rpc: JsonRpcClient,
}

impl MoneroWalletRpc {
    /// `deadline` is the per-call limit the lifecycle manager enforces; the
    /// HTTP client only backstops it
    pub fn new(url: impl Into<String>, deadline: Duration) -> Result<Self, String> {
        Ok(Self {
            rpc: JsonRpcClient::new(url, transport_timeout(deadline))?,
        })
    }

    fn account(handle: BackendHandle) -> Result<u32, BackendError> {
        u32::try_from(handle.id())
            .map_err(|_| BackendError::Malformed(format!("invalid account index {}", handle.id())))
    }
}

#[async_trait]
impl WalletBackend for MoneroWalletRpc {
    async fn new_wallet(&self) -> Result<(String, BackendHandle), BackendError> {
        let created: CreateAccountResult = self
            .rpc
            .call("create_account", json!({ "label": ACCOUNT_LABEL }))
            .await?;
        Ok((
            created.address,
            BackendHandle::new(u64::from(created.account_index)),
        ))
    }

    async fn attach(&self, address: &str) -> Result<BackendHandle, BackendError> {
        let found: Result<GetAddressIndexResult, BackendError> = self
            .rpc
            .call("get_address_index", json!({ "address": address }))
            .await;
        found
            .map(|found| BackendHandle::new(u64::from(found.index.major)))
            .map_err(|e| attach_error(address, e))
    }

    async fn balance(&self, handle: BackendHandle) -> Result<u64, BackendError> {
        let balance: GetBalanceResult = self
            .rpc
            .call(
                "get_balance",
                json!({ "account_index": Self::account(handle)? }),
            )
            .await?;
        Ok(balance.balance)
    }

    async fn transfer_all(
        &self,
        handle: BackendHandle,
        destination: &str,
    ) -> Result<TransferResult, BackendError> {
        let swept: SweepAllResult = self
            .rpc
            .call(
                "sweep_all",
                json!({
                    "address": destination,
                    "account_index": Self::account(handle)?,
                    "subaddr_indices_all": true,
                }),
            )
            .await?;
        Ok(swept.into())
    }
}

fn transport_timeout(deadline: Duration) -> Duration {
    deadline.saturating_add(TRANSPORT_GRACE)
}

/// Only a wrong-address answer means the wallet does not know `address`
fn attach_error(address: &str, e: BackendError) -> BackendError {
    match e {
        BackendError::Rpc { code, .. } if code == WRONG_ADDRESS_CODE => {
            BackendError::UnknownAddress(address.to_string())
        }
        e => e,
    }
}

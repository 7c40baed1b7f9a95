// Wallet route handlers called directly with managed state

use chrono::Duration as TimeDelta;
use ephemeral_wallets::routes::wallet::{create_wallet, delete_wallet, list_wallets};
use rocket::{State, http::Status};
use std::sync::Arc;

use crate::test_utils::{MASTER_ADDRESS, TestHarness};
use ephemeral_wallets::services::wallet::MemoryStore;

#[tokio::test]
async fn test_create_wallet_returns_address() {
    let harness = TestHarness::new();
    harness.backend.queue_address("4NewWallet");
    let test_state = harness.app_state();
    let state = State::from(&test_state);

    let response = create_wallet(state).await.unwrap().into_inner();

    assert_eq!(response.status, "success");
    assert_eq!(response.address, "4NewWallet");
    assert!(harness.manager.wallet("4NewWallet").is_some());
}

#[tokio::test]
async fn test_create_wallet_backend_down() {
    let harness = TestHarness::new();
    harness.backend.fail_new_wallet(true);
    let test_state = harness.app_state();
    let state = State::from(&test_state);

    let (status, body) = create_wallet(state).await.unwrap_err();

    assert_eq!(status, Status::ServiceUnavailable);
    assert_eq!(body.status, "error");
    assert_eq!(body.kind, "BackendUnavailable");
    assert_eq!(harness.manager.wallet_count(), 0);
}

#[tokio::test]
async fn test_create_wallet_persistence_failure() {
    let store = Arc::new(MemoryStore::new());
    store.fail_saves(true);
    let harness = TestHarness::with_store(store);
    let test_state = harness.app_state();
    let state = State::from(&test_state);

    let (status, body) = create_wallet(state).await.unwrap_err();

    assert_eq!(status, Status::InternalServerError);
    assert_eq!(body.kind, "PersistenceFailure");
    assert_eq!(harness.manager.wallet_count(), 0);
}

#[tokio::test]
async fn test_delete_wallet_sweeps_to_master() {
    let harness = TestHarness::new();
    let address = harness.manager.create_wallet().await.unwrap();
    harness.backend.set_balance(&address, 1_500_000_000_000);
    let test_state = harness.app_state();
    let state = State::from(&test_state);

    let response = delete_wallet(state, address.clone())
        .await
        .unwrap()
        .into_inner();

    assert_eq!(response.status, "success");
    assert_eq!(response.message, "Wallet deleted successfully");
    assert_eq!(harness.backend.balance_of(MASTER_ADDRESS), 1_500_000_000_000);
    assert!(harness.manager.wallet(&address).is_none());
}

#[tokio::test]
async fn test_delete_unknown_wallet_is_not_found() {
    let harness = TestHarness::new();
    let test_state = harness.app_state();
    let state = State::from(&test_state);

    let (status, body) = delete_wallet(state, "4Unknown".to_string())
        .await
        .unwrap_err();

    assert_eq!(status, Status::NotFound);
    assert_eq!(body.message, "Wallet not found");
    assert_eq!(harness.backend.transfer_attempts(), 0);
}

#[tokio::test]
async fn test_delete_wallet_transfer_failure_keeps_wallet() {
    let harness = TestHarness::new();
    let address = harness.manager.create_wallet().await.unwrap();
    harness.backend.set_balance(&address, 42);
    harness.backend.fail_transfers(true);
    let test_state = harness.app_state();
    let state = State::from(&test_state);

    let (status, body) = delete_wallet(state, address.clone()).await.unwrap_err();

    assert_eq!(status, Status::ServiceUnavailable);
    assert_eq!(body.kind, "BackendUnavailable");
    assert!(harness.manager.wallet(&address).is_some());
    assert_eq!(harness.backend.balance_of(&address), 42);
}

#[tokio::test]
async fn test_list_wallets_reports_minutes_and_balance() {
    let harness = TestHarness::new();
    let address = harness.manager.create_wallet().await.unwrap();
    harness.backend.set_balance(&address, 250_000_000_000);
    harness.clock.advance(TimeDelta::minutes(10));
    let test_state = harness.app_state();
    let state = State::from(&test_state);

    let response = list_wallets(state).await.into_inner();

    assert_eq!(response.status, "success");
    assert_eq!(response.wallets.len(), 1);
    let wallet = &response.wallets[0];
    assert_eq!(wallet.address, address);
    assert_eq!(wallet.minutes_remaining, 20);
    assert_eq!(wallet.balance, Some(250_000_000_000));
    assert_eq!(wallet.balance_xmr.as_deref(), Some("0.250000000000"));
}

#[tokio::test]
async fn test_list_wallets_balance_unavailable() {
    let harness = TestHarness::new();
    harness.manager.create_wallet().await.unwrap();
    harness.backend.fail_balance(true);
    let test_state = harness.app_state();
    let state = State::from(&test_state);

    let response = list_wallets(state).await.into_inner();

    assert_eq!(response.wallets.len(), 1);
    assert_eq!(response.wallets[0].balance, None);
    assert_eq!(response.wallets[0].balance_xmr, None);
}

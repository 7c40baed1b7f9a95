// Registry survives restarts through the JSON file store

use std::sync::Arc;
use std::time::Duration;

use chrono::Duration as TimeDelta;
use ephemeral_wallets::services::wallet::{JsonFileStore, MemoryStore, RegistryStore};

use crate::test_utils::{MASTER_ADDRESS, TestHarness, epoch, test_config};

#[tokio::test]
async fn test_restart_recovers_wallets_and_ttl() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("wallet_data.json");

    let first = TestHarness::with_store(Arc::new(JsonFileStore::new(&path)));
    let kept = first.manager.create_wallet().await.unwrap();
    first.clock.advance(TimeDelta::minutes(5));
    let deleted = first.manager.create_wallet().await.unwrap();
    assert!(first.manager.delete_wallet(&deleted).await.unwrap());
    first.backend.set_balance(&kept, 2_000);

    // Same wallet service, fresh process
    let second = TestHarness::with_parts(
        test_config(),
        first.backend.clone(),
        Arc::new(JsonFileStore::new(&path)),
    );

    assert_eq!(second.manager.wallet_count(), 1);
    let recovered = second.manager.wallet(&kept).unwrap();
    assert_eq!(recovered.created_at, epoch());
    assert!(recovered.backend_handle.is_none());
    assert!(second.manager.wallet(&deleted).is_none());

    second.clock.advance(TimeDelta::minutes(10));
    let listed = second.manager.list_active().await;
    assert_eq!(listed[0].minutes_remaining, 20);
    assert_eq!(listed[0].balance, Some(2_000));

    // The recovered wallet is still swept on expiry
    second.clock.advance(TimeDelta::minutes(30));
    let report = second.manager.sweep_expired().await;
    assert_eq!(report.swept, vec![kept]);
    assert_eq!(second.backend.balance_of(MASTER_ADDRESS), 2_000);
    assert!(JsonFileStore::new(&path).load().is_empty());
}

#[tokio::test]
async fn test_every_mutation_is_persisted() {
    let store = Arc::new(MemoryStore::new());
    let harness = TestHarness::with_store(store.clone());

    let a = harness.manager.create_wallet().await.unwrap();
    let b = harness.manager.create_wallet().await.unwrap();
    assert_eq!(store.snapshot().len(), 2);
    assert_eq!(store.snapshot().get(&a), Some(&epoch()));

    harness.manager.delete_wallet(&a).await.unwrap();
    let snapshot = store.snapshot();
    assert_eq!(snapshot.len(), 1);
    assert!(snapshot.contains_key(&b));

    harness.clock.advance(TimeDelta::minutes(30));
    harness.manager.sweep_expired().await;
    assert!(store.snapshot().is_empty());
}

#[tokio::test]
async fn test_failed_persist_rolls_back_create() {
    let store = Arc::new(MemoryStore::new());
    let harness = TestHarness::with_store(store.clone());
    let existing = harness.manager.create_wallet().await.unwrap();

    store.fail_saves(true);
    assert!(harness.manager.create_wallet().await.is_err());

    assert_eq!(harness.manager.wallet_count(), 1);
    assert!(harness.manager.wallet(&existing).is_some());
    assert_eq!(store.snapshot().len(), 1);
}

#[tokio::test]
async fn test_delete_is_acknowledged_only_once_persisted() {
    let store = Arc::new(MemoryStore::new());
    let harness = TestHarness::with_store(store.clone());
    let address = harness.manager.create_wallet().await.unwrap();
    harness.backend.set_balance(&address, 55);

    store.fail_saves(true);
    let err = harness.manager.delete_wallet(&address).await.unwrap_err();
    assert_eq!(err.kind(), "PersistenceFailure");

    // Funds moved, but the wallet stays registered and retryable
    assert_eq!(harness.backend.balance_of(MASTER_ADDRESS), 55);
    assert!(harness.manager.wallet(&address).unwrap().is_active());

    store.fail_saves(false);
    assert!(harness.manager.delete_wallet(&address).await.unwrap());
    assert_eq!(harness.backend.transfers_from(&address), 1);
    assert!(!store.snapshot().contains_key(&address));

    // A restart over the same store does not bring it back
    let restarted = TestHarness::with_parts(test_config(), harness.backend.clone(), store.clone());
    assert!(restarted.manager.wallet(&address).is_none());
    assert!(restarted.manager.list_active().await.is_empty());
}

#[tokio::test]
async fn test_wallet_hidden_until_create_is_persisted() {
    let store = Arc::new(MemoryStore::new());
    let harness = TestHarness::with_store(store.clone());
    harness.backend.queue_address("4Pending");
    store.set_save_delay(Duration::from_millis(150));
    store.fail_saves(true);

    let manager = harness.manager.clone();
    let create = tokio::spawn(async move { manager.create_wallet().await });
    tokio::time::sleep(Duration::from_millis(40)).await;

    // Save still in flight: nothing to list, nothing to delete
    assert!(harness.manager.list_active().await.is_empty());
    assert!(!harness.manager.delete_wallet("4Pending").await.unwrap());

    assert!(create.await.unwrap().is_err());
    assert_eq!(harness.manager.wallet_count(), 0);
    assert!(store.snapshot().is_empty());
}

#[tokio::test]
async fn test_wallet_visible_once_create_is_persisted() {
    let store = Arc::new(MemoryStore::new());
    let harness = TestHarness::with_store(store.clone());
    harness.backend.queue_address("4Slow");
    store.set_save_delay(Duration::from_millis(100));

    let manager = harness.manager.clone();
    let create = tokio::spawn(async move { manager.create_wallet().await });
    tokio::time::sleep(Duration::from_millis(30)).await;
    assert!(harness.manager.wallet("4Slow").is_none());

    assert_eq!(create.await.unwrap().unwrap(), "4Slow");
    assert!(store.snapshot().contains_key("4Slow"));
    assert_eq!(harness.manager.list_active().await.len(), 1);
}

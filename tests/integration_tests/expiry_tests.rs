// TTL accounting as seen through listing and the expiry sweep

use chrono::Duration as TimeDelta;

use crate::test_utils::{MASTER_ADDRESS, TestHarness};

#[tokio::test]
async fn test_wallet_timeline() {
    let harness = TestHarness::new();
    let address = harness.manager.create_wallet().await.unwrap();
    harness.backend.set_balance(&address, 5_000);

    let listed = harness.manager.list_active().await;
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].minutes_remaining, 30);

    harness.clock.advance(TimeDelta::minutes(29));
    let listed = harness.manager.list_active().await;
    assert_eq!(listed[0].minutes_remaining, 1);
    assert!(harness.manager.sweep_expired().await.is_empty());

    harness.clock.advance(TimeDelta::minutes(2));
    let report = harness.manager.sweep_expired().await;
    assert_eq!(report.swept, vec![address.clone()]);
    assert!(harness.manager.wallet(&address).is_none());
    assert_eq!(harness.backend.balance_of(MASTER_ADDRESS), 5_000);
    assert!(harness.manager.list_active().await.is_empty());
    assert!(!harness.manager.delete_wallet(&address).await.unwrap());
}

#[tokio::test]
async fn test_minutes_remaining_never_increases() {
    let harness = TestHarness::new();
    harness.manager.create_wallet().await.unwrap();

    let mut previous = i64::MAX;
    for _ in 0..40 {
        let listed = harness.manager.list_active().await;
        let minutes = listed.first().map(|w| w.minutes_remaining).unwrap_or(0);
        assert!(minutes <= previous, "{minutes} > {previous}");
        previous = minutes;
        harness.clock.advance(TimeDelta::seconds(47));
    }
    assert_eq!(previous, 0);
}

#[tokio::test]
async fn test_last_partial_minute_is_hidden_but_not_swept() {
    let harness = TestHarness::new();
    let address = harness.manager.create_wallet().await.unwrap();

    harness.clock.advance(TimeDelta::minutes(29) + TimeDelta::seconds(30));

    assert!(harness.manager.list_active().await.is_empty());
    assert!(harness.manager.sweep_expired().await.is_empty());
    assert!(harness.manager.wallet(&address).is_some());
}

#[tokio::test]
async fn test_expiry_boundary_is_inclusive() {
    let harness = TestHarness::new();
    let address = harness.manager.create_wallet().await.unwrap();

    harness.clock.advance(TimeDelta::minutes(30) - TimeDelta::milliseconds(1));
    assert!(harness.manager.sweep_expired().await.is_empty());

    harness.clock.advance(TimeDelta::milliseconds(1));
    assert_eq!(harness.manager.sweep_expired().await.swept, vec![address]);
}

#[tokio::test]
async fn test_listing_is_ordered_by_creation() {
    let harness = TestHarness::new();
    harness.backend.queue_address("4Zulu");
    harness.backend.queue_address("4Alpha");

    harness.manager.create_wallet().await.unwrap();
    harness.clock.advance(TimeDelta::minutes(1));
    harness.manager.create_wallet().await.unwrap();

    let listed = harness.manager.list_active().await;
    let addresses: Vec<&str> = listed.iter().map(|w| w.address.as_str()).collect();
    assert_eq!(addresses, vec!["4Zulu", "4Alpha"]);
    assert_eq!(listed[0].minutes_remaining, 29);
    assert_eq!(listed[1].minutes_remaining, 30);
}

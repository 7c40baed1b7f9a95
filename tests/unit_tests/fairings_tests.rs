use ephemeral_wallets::fairings::{
    PanicCatcher, ReaperFairing, RequestLogger, abbreviate_address, loggable_path,
};
use rocket::fairing::Fairing;

#[test]
fn test_fairing_names() {
    assert_eq!(RequestLogger.info().name, "Request/Response Logger");
    assert_eq!(PanicCatcher.info().name, "Panic Catcher");
    assert_eq!(ReaperFairing::new().info().name, "Wallet Reaper");
}

#[test]
fn test_addresses_are_abbreviated_in_logs() {
    let address = crate::test_utils::MASTER_ADDRESS;
    let path = format!("/wallet/{address}");

    let logged = loggable_path(&path);
    assert!(!logged.contains(address));
    assert_eq!(logged, format!("/wallet/{}", abbreviate_address(address)));
}

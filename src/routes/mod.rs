use rocket::http::Status;
use rocket::serde::json::Json;

use crate::error::WalletError;
use crate::models::ErrorResponse;

pub mod info;
pub mod wallet;

// Re-export all route functions for easy access
pub use info::*;
pub use wallet::*;

/// Map a lifecycle error to the API error tuple, reporting faults to Sentry
pub(crate) fn error_response(endpoint: &str, e: &WalletError) -> (Status, Json<ErrorResponse>) {
    match e {
        WalletError::NotFound(_) => {
            tracing::info!("{} -> {}", endpoint, e);
        }
        _ => {
            tracing::error!("{} failed: {}", endpoint, e);
            sentry::capture_message(&format!("{endpoint} failed: {e}"), sentry::Level::Error);
        }
    }
    (e.status(), Json(ErrorResponse::from(e)))
}

use rocket::serde::json::Json;
use rocket::{State, delete, get, http::Status, post};
use rocket_okapi::openapi;

use super::error_response;
use crate::models::{
    AppState, CreateWalletResponse, DeleteWalletResponse, ErrorResponse, ListWalletsResponse,
    STATUS_ERROR, STATUS_SUCCESS,
};

type ApiError = (Status, Json<ErrorResponse>);

/// Creates a new ephemeral wallet.
///
/// The wallet is swept into the master address and removed once its TTL
/// elapses.
#[openapi(tag = "Wallet")]
#[post("/wallet")]
pub async fn create_wallet(state: &State<AppState>) -> Result<Json<CreateWalletResponse>, ApiError> {
    tracing::info!("Received request: POST /wallet");

    let address = state
        .manager
        .create_wallet()
        .await
        .map_err(|e| error_response("POST /wallet", &e))?;

    Ok(Json(CreateWalletResponse {
        status: STATUS_SUCCESS.to_string(),
        address,
    }))
}

/// Sweeps a wallet into the master address and deletes it.
///
/// Unknown addresses return 404. If the sweep fails the wallet is kept and
/// the error is returned so the call can be retried.
#[openapi(tag = "Wallet")]
#[delete("/wallet/<address>")]
pub async fn delete_wallet(
    state: &State<AppState>,
    address: String,
) -> Result<Json<DeleteWalletResponse>, ApiError> {
    tracing::info!("Received request: DELETE /wallet/{}", address);
    let _guard = sentry::Hub::current().push_scope();
    sentry::configure_scope(|scope| {
        scope.set_tag("endpoint", "/wallet/<address>");
        scope.set_extra("wallet_address", address.clone().into());
    });

    match state.manager.delete_wallet(&address).await {
        Ok(true) => Ok(Json(DeleteWalletResponse {
            status: STATUS_SUCCESS.to_string(),
            message: "Wallet deleted successfully".to_string(),
        })),
        Ok(false) => Err((
            Status::NotFound,
            Json(ErrorResponse {
                status: STATUS_ERROR.to_string(),
                kind: "NotFound".to_string(),
                message: "Wallet not found".to_string(),
            }),
        )),
        Err(e) => Err(error_response("DELETE /wallet", &e)),
    }
}

/// Lists active wallets with minutes remaining and live balance.
///
/// Wallets in the last minute of their TTL are omitted even if the reaper
/// has not removed them yet.
#[openapi(tag = "Wallet")]
#[get("/wallets")]
pub async fn list_wallets(state: &State<AppState>) -> Json<ListWalletsResponse> {
    tracing::info!("Received request: GET /wallets");

    Json(ListWalletsResponse {
        status: STATUS_SUCCESS.to_string(),
        wallets: state.manager.list_active().await,
    })
}

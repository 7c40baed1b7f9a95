pub mod app_state;
pub mod config;
pub mod responses;
pub mod wallet;

pub use app_state::{ApiEndpoints, ApiSummary, AppState, EndpointInfo};
pub use config::ServiceConfig;
pub use responses::{
    CreateWalletResponse, DeleteWalletResponse, ErrorResponse, HealthResponse,
    ListWalletsResponse, STATUS_ERROR, STATUS_SUCCESS,
};
pub use wallet::{
    BackendHandle, SweepState, TransferResult, WalletRecord, WalletSummary, format_xmr,
};

use rocket::get;
use rocket::serde::json::Json;
use rocket_okapi::openapi;

use crate::models::{ApiEndpoints, ApiSummary, HealthResponse, STATUS_SUCCESS};

/// Lists the available endpoints.
#[openapi(tag = "Info")]
#[get("/")]
pub fn index() -> Json<ApiSummary> {
    tracing::info!("Received request: GET /");
    Json(ApiEndpoints::get_summary())
}

/// Liveness probe.
#[openapi(tag = "Info")]
#[get("/health")]
pub fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: STATUS_SUCCESS.to_string(),
        timestamp: chrono::Utc::now().to_rfc3339(),
    })
}

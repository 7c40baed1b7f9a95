use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;

use crate::services::wallet::LifecycleManager;

/// API endpoint information for documentation
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct EndpointInfo {
    pub method: String,
    pub path: String,
    pub description: String,
}

/// Central registry of all API endpoints
pub struct ApiEndpoints;

impl ApiEndpoints {
    pub fn get_all() -> Vec<EndpointInfo> {
        let endpoint = |method: &str, path: &str, description: &str| EndpointInfo {
            method: method.to_string(),
            path: path.to_string(),
            description: description.to_string(),
        };

        vec![
            endpoint("GET", "/", "Welcome page with API documentation"),
            endpoint("GET", "/health", "Liveness probe"),
            endpoint("POST", "/wallet", "Create a new ephemeral wallet"),
            endpoint(
                "DELETE",
                "/wallet/<address>",
                "Sweep a wallet's balance to the master address and delete it",
            ),
            endpoint(
                "GET",
                "/wallets",
                "List active wallets with minutes remaining and balance",
            ),
        ]
    }

    pub fn get_summary() -> ApiSummary {
        let endpoints = Self::get_all();
        ApiSummary {
            total_endpoints: endpoints.len(),
            endpoints,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ApiSummary {
    pub total_endpoints: usize,
    pub endpoints: Vec<EndpointInfo>,
}

/// State shared by every route
#[derive(Clone)]
pub struct AppState {
    pub manager: Arc<LifecycleManager>,
    /// Period of the reaper spawned on liftoff
    pub reaper_interval: Duration,
}

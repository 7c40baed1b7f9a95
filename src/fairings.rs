use rocket::fairing::{Fairing, Info, Kind};
use rocket::http::Status;
use rocket::{Data, Orbit, Request, Response, Rocket};
use tokio::sync::Mutex;

use crate::models::AppState;
use crate::services::wallet::{Reaper, ReaperHandle};

/// Shorten a wallet address for log output
pub fn abbreviate_address(address: &str) -> String {
    let chars: Vec<char> = address.chars().collect();
    if chars.len() <= 16 {
        return address.to_string();
    }
    let head: String = chars[..8].iter().collect();
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{head}...{tail}")
}

/// Request path with any wallet address abbreviated
pub fn loggable_path(path: &str) -> String {
    match path.strip_prefix("/wallet/") {
        Some(address) if !address.is_empty() => {
            format!("/wallet/{}", abbreviate_address(address))
        }
        _ => path.to_string(),
    }
}

/// Logs incoming requests and outgoing responses.
///
/// Captures method, path, remote address, and response status. Wallet
/// addresses in the path are abbreviated.
pub struct RequestLogger;

#[rocket::async_trait]
impl Fairing for RequestLogger {
    fn info(&self) -> Info {
        Info {
            name: "Request/Response Logger",
            kind: Kind::Request | Kind::Response,
        }
    }

    async fn on_request(&self, request: &mut Request<'_>, _: &mut Data<'_>) {
        let method = request.method();
        let path = loggable_path(request.uri().path().as_str());
        let remote = request
            .remote()
            .map(|r| r.to_string())
            .unwrap_or_else(|| "unknown".to_string());

        tracing::info!("Incoming request: {} {} from {}", method, path, remote);
    }

    async fn on_response<'r>(&self, request: &'r Request<'_>, response: &mut Response<'r>) {
        let method = request.method();
        let path = loggable_path(request.uri().path().as_str());
        let status = response.status();

        tracing::info!("Response: {} {} - Status: {}", method, path, status);

        if status.class().is_server_error() {
            tracing::error!("Error response: {} {} returned {}", method, path, status);
        }
    }
}

/// Catches and logs internal server errors that may indicate panics.
///
/// Monitors for 500 status responses and reports them to Sentry for investigation.
pub struct PanicCatcher;

#[rocket::async_trait]
impl Fairing for PanicCatcher {
    fn info(&self) -> Info {
        Info {
            name: "Panic Catcher",
            kind: Kind::Response,
        }
    }

    async fn on_response<'r>(&self, request: &'r Request<'_>, response: &mut Response<'r>) {
        if response.status() == Status::InternalServerError {
            let method = request.method();
            let path = loggable_path(request.uri().path().as_str());

            tracing::error!(
                "Internal Server Error detected for {} {} - possible panic or unhandled error",
                method,
                path
            );

            sentry::capture_message(
                &format!("Internal Server Error: {method} {path}"),
                sentry::Level::Error,
            );
        }
    }
}

/// Runs the reaper for as long as the server is up.
///
/// Spawned on liftoff from the managed [`AppState`]; cancelled and awaited
/// on shutdown so an in-flight pass is not cut short.
#[derive(Default)]
pub struct ReaperFairing {
    handle: Mutex<Option<ReaperHandle>>,
}

impl ReaperFairing {
    pub fn new() -> Self {
        Self::default()
    }
}

#[rocket::async_trait]
impl Fairing for ReaperFairing {
    fn info(&self) -> Info {
        Info {
            name: "Wallet Reaper",
            kind: Kind::Liftoff | Kind::Shutdown,
        }
    }

    async fn on_liftoff(&self, rocket: &Rocket<Orbit>) {
        let Some(state) = rocket.state::<AppState>() else {
            tracing::error!("AppState not managed, reaper not started");
            return;
        };

        let reaper = Reaper::new(state.manager.clone(), state.reaper_interval);
        *self.handle.lock().await = Some(reaper.spawn());
    }

    async fn on_shutdown(&self, _rocket: &Rocket<Orbit>) {
        if let Some(handle) = self.handle.lock().await.take() {
            tracing::info!("Stopping reaper");
            handle.shutdown().await;
        }
    }
}

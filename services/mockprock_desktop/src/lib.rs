pub mod api;
pub mod callbacks;
pub mod provider;
pub mod registry;

use axum::{
    extract::Request,
    http::{header, HeaderValue},
    middleware::{self, Next},
    response::Response,
    routing::{get, post},
    Json, Router,
};
use mockprock_adapter::Endpoint;
use serde_json::json;
use registry::Registry;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::time::Duration;

/// How long `/desktop/stop` pretends to upload before answering.
pub const DEFAULT_STOP_DELAY: Duration = Duration::from_secs(60);
/// Delay between finishing an attempt and its review callback.
pub const DEFAULT_REVIEW_DELAY: Duration = Duration::from_secs(10);
/// Delay between the download page and the ready callback.
pub const DEFAULT_READY_DELAY: Duration = Duration::from_secs(2);

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub stop_delay: Duration,
    pub review_delay: Duration,
    pub ready_delay: Duration,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            stop_delay: DEFAULT_STOP_DELAY,
            review_delay: DEFAULT_REVIEW_DELAY,
            ready_delay: DEFAULT_READY_DELAY,
        }
    }
}

impl ServerConfig {
    /// Every delay zero.
    pub fn immediate() -> Self {
        Self {
            stop_delay: Duration::ZERO,
            review_delay: Duration::ZERO,
            ready_delay: Duration::ZERO,
        }
    }
}

/// One emulated desktop application (`None` until the first start) plus the
/// provider's exam registry.
#[derive(Clone, Default)]
pub struct AppState {
    pub desktop_status: Arc<RwLock<Option<String>>>,
    pub stop_delay: Duration,
    pub registry: Arc<RwLock<Registry>>,
    pub review_delay: Duration,
    pub ready_delay: Duration,
    /// Client for LMS callbacks
    pub http: reqwest::Client,
}

impl AppState {
    pub fn new(config: &ServerConfig) -> Self {
        Self {
            stop_delay: config.stop_delay,
            review_delay: config.review_delay,
            ready_delay: config.ready_delay,
            ..Default::default()
        }
    }

    pub fn registry(&self) -> RwLockReadGuard<'_, Registry> {
        self.registry.read().unwrap_or_else(|e| e.into_inner())
    }

    pub fn registry_mut(&self) -> RwLockWriteGuard<'_, Registry> {
        self.registry.write().unwrap_or_else(|e| e.into_inner())
    }

    pub fn status(&self) -> Option<String> {
        self.desktop_status
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    pub fn set_status(&self, status: &str) {
        *self
            .desktop_status
            .write()
            .unwrap_or_else(|e| e.into_inner()) = Some(status.to_string());
    }
}

pub fn app(config: ServerConfig) -> Router {
    app_with_state(AppState::new(&config))
}

/// Build the router around an existing state, so callers can inspect or seed it.
pub fn app_with_state(state: AppState) -> Router {
    Router::new()
        .route("/healthz", get(healthz))
        .route(Endpoint::Ping.path(), get(api::ping))
        .route(Endpoint::Start.path(), post(api::start))
        .route(Endpoint::Stop.path(), post(api::stop))
        .route("/v1/config/", get(provider::get_config))
        .route("/v1/exam/", post(provider::create_exam))
        .route(
            "/v1/exam/:exam_id/",
            get(provider::get_exam).post(provider::update_exam),
        )
        .route("/v1/exam/:exam_id/attempt/", post(provider::create_attempt))
        .route(
            "/v1/exam/:exam_id/attempt/:attempt_id/",
            get(provider::get_attempt).patch(provider::patch_attempt),
        )
        .route("/download", get(provider::download))
        .layer(middleware::from_fn(allow_cross_origin))
        .with_state(state)
}

/// Middleware: the desktop endpoints are called from browser pages on other origins.
async fn allow_cross_origin(req: Request, next: Next) -> Response {
    let mut resp = next.run(req).await;
    let headers = resp.headers_mut();
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_ORIGIN,
        HeaderValue::from_static("*"),
    );
    headers.insert(header::CACHE_CONTROL, HeaderValue::from_static("no-cache"));
    resp
}

async fn healthz() -> Json<serde_json::Value> {
    Json(json!({"ok": true}))
}

pub mod test {
    use std::net::SocketAddr;
    use tokio::net::TcpListener;

    use super::{AppState, ServerConfig};

    /// Spawn the server on a random port. Returns the address, the shared
    /// state, and a JoinHandle that keeps the server alive until dropped.
    pub async fn spawn(
        config: ServerConfig,
    ) -> (SocketAddr, AppState, tokio::task::JoinHandle<()>) {
        let state = AppState::new(&config);
        let app = super::app_with_state(state.clone());
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        (addr, state, handle)
    }
}

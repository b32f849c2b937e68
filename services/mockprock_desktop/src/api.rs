use axum::{extract::State, Json};
use mockprock_adapter::{Endpoint, StatusEnvelope};
use tracing::info;

use crate::AppState;

/// GET /desktop/ping: report the current status (null before the first start).
pub async fn ping(State(state): State<AppState>) -> Json<StatusEnvelope> {
    Json(StatusEnvelope {
        status: state.status(),
    })
}

/// POST /desktop/start
pub async fn start(State(state): State<AppState>) -> Json<StatusEnvelope> {
    let status = Endpoint::Start.expected_status();
    state.set_status(status);
    info!(status, "desktop session started");
    Json(StatusEnvelope::new(status))
}

/// POST /desktop/stop: flips to uploading, then holds the response for the
/// configured upload delay.
pub async fn stop(State(state): State<AppState>) -> Json<StatusEnvelope> {
    let status = Endpoint::Stop.expected_status();
    state.set_status(status);
    info!(status, delay = ?state.stop_delay, "desktop session stopping");
    if !state.stop_delay.is_zero() {
        tokio::time::sleep(state.stop_delay).await;
    }
    Json(StatusEnvelope {
        status: state.status(),
    })
}

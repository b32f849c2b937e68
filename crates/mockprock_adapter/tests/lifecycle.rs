use std::sync::{Arc, Mutex};

use axum::{
    extract::State,
    http::{header, Method as HttpMethod, StatusCode, Uri},
    response::IntoResponse,
    Router,
};
use mockprock_adapter::{
    AdapterConfig, DesktopAdapter, Endpoint, LifecycleError, Method, ProctoringEventHandler,
    RecordingTrace, DEFAULT_BASE_URL,
};
use tokio::net::TcpListener;

type Seen = Arc<Mutex<Vec<(HttpMethod, String)>>>;

#[derive(Clone)]
struct Fixture {
    status: StatusCode,
    body: &'static str,
    seen: Seen,
}

/// Answers every request with the same status and body, remembering what it saw.
async fn respond(State(f): State<Fixture>, method: HttpMethod, uri: Uri) -> impl IntoResponse {
    f.seen.lock().unwrap().push((method, uri.path().to_string()));
    (f.status, [(header::CONTENT_TYPE, "application/json")], f.body)
}

async fn fixture(status: StatusCode, body: &'static str) -> (String, Seen, tokio::task::JoinHandle<()>) {
    let seen: Seen = Default::default();
    let app = Router::new().fallback(respond).with_state(Fixture {
        status,
        body,
        seen: seen.clone(),
    });
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let handle = tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    (format!("http://{addr}"), seen, handle)
}

fn adapter(base: &str) -> DesktopAdapter {
    DesktopAdapter::new(AdapterConfig::new(base)).unwrap()
}

/// An address nothing listens on.
async fn refused_base() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{addr}")
}

// ── start ─────────────────────────────────────────────────────────

#[tokio::test]
async fn start_resolves_when_running() {
    let (base, seen, _h) = fixture(StatusCode::OK, r#"{"status":"running"}"#).await;
    adapter(&base).on_start_exam_attempt().await.unwrap();
    assert_eq!(
        *seen.lock().unwrap(),
        vec![(HttpMethod::POST, "/desktop/start".to_string())]
    );
}

#[tokio::test]
async fn start_rejects_other_status() {
    let (base, _seen, _h) = fixture(StatusCode::OK, r#"{"status":"anything-else"}"#).await;
    let err = adapter(&base).on_start_exam_attempt().await.unwrap_err();
    assert!(err.is_mismatch(), "{err}");
    assert!(err.status_pair().is_none(), "mismatch is a bare rejection");
}

// ── stop ──────────────────────────────────────────────────────────

#[tokio::test]
async fn end_resolves_when_uploading() {
    let (base, seen, _h) = fixture(StatusCode::OK, r#"{"status":"uploading"}"#).await;
    adapter(&base).on_end_exam_attempt().await.unwrap();
    assert_eq!(
        *seen.lock().unwrap(),
        vec![(HttpMethod::POST, "/desktop/stop".to_string())]
    );
}

#[tokio::test]
async fn end_rejects_running() {
    let (base, _seen, _h) = fixture(StatusCode::OK, r#"{"status":"running"}"#).await;
    let err = adapter(&base).on_end_exam_attempt().await.unwrap_err();
    match err {
        LifecycleError::StatusMismatch {
            endpoint,
            expected,
            actual,
        } => {
            assert_eq!(endpoint, Endpoint::Stop);
            assert_eq!(expected, "uploading");
            assert_eq!(actual.as_deref(), Some("running"));
        }
        other => panic!("expected mismatch, got {other}"),
    }
}

// ── ping ──────────────────────────────────────────────────────────

#[tokio::test]
async fn ping_resolves_when_running() {
    let (base, seen, _h) = fixture(StatusCode::OK, r#"{"status":"running"}"#).await;
    adapter(&base).on_ping().await.unwrap();
    assert_eq!(
        *seen.lock().unwrap(),
        vec![(HttpMethod::GET, "/desktop/ping".to_string())]
    );
}

#[tokio::test]
async fn ping_rejects_uploading() {
    let (base, _seen, _h) = fixture(StatusCode::OK, r#"{"status":"uploading"}"#).await;
    assert!(adapter(&base).on_ping().await.unwrap_err().is_mismatch());
}

#[tokio::test]
async fn ping_rejects_null_status() {
    let (base, _seen, _h) = fixture(StatusCode::OK, r#"{"status":null}"#).await;
    assert!(adapter(&base).on_ping().await.unwrap_err().is_mismatch());
}

// ── transport failures ────────────────────────────────────────────

#[tokio::test]
async fn non_2xx_rejects_with_status_pair() {
    let (base, _seen, _h) =
        fixture(StatusCode::INTERNAL_SERVER_ERROR, r#"{"status":"running"}"#).await;
    let a = adapter(&base);
    for endpoint in Endpoint::ALL {
        let err = a.call(endpoint).await.unwrap_err();
        let pair = err.status_pair().expect("http failures carry a pair");
        assert_eq!(pair.status, 500);
        assert_eq!(pair.status_text, "Internal Server Error");
        assert!(err.is_transport());
    }
}

#[tokio::test]
async fn connection_refused_rejects_every_callback() {
    let a = adapter(&refused_base().await);
    let results = [
        a.on_start_exam_attempt().await,
        a.on_end_exam_attempt().await,
        a.on_ping().await,
    ];
    for result in results {
        let err = result.unwrap_err();
        assert!(matches!(err, LifecycleError::Transport { .. }), "{err}");
        let pair = err.status_pair().unwrap();
        assert_eq!(pair.status, 0);
        assert!(!pair.status_text.is_empty());
    }
}

#[tokio::test]
async fn non_json_body_is_a_decode_failure() {
    let (base, _seen, _h) = fixture(StatusCode::OK, "<html>hello</html>").await;
    let err = adapter(&base).on_ping().await.unwrap_err();
    assert!(matches!(err, LifecycleError::Decode(_)), "{err}");
    assert!(!err.is_transport() && !err.is_mismatch());
}

// ── base address ──────────────────────────────────────────────────

#[test]
fn default_config_targets_loopback() {
    let a = DesktopAdapter::new(AdapterConfig::default()).unwrap();
    assert_eq!(a.base_url(), DEFAULT_BASE_URL);
    let table: Vec<_> = Endpoint::ALL
        .iter()
        .map(|e| e.request(a.base_url()))
        .map(|r| (r.method, r.address))
        .collect();
    assert_eq!(
        table,
        vec![
            (Method::Post, "http://localhost:11136/desktop/start".to_string()),
            (Method::Post, "http://localhost:11136/desktop/stop".to_string()),
            (Method::Get, "http://localhost:11136/desktop/ping".to_string()),
        ]
    );
}

#[tokio::test]
async fn padded_base_url_still_hits_documented_paths() {
    let (base, seen, _h) = fixture(StatusCode::OK, r#"{"status":"running"}"#).await;
    let a = adapter(&format!("  {base}/ "));
    a.on_ping().await.unwrap();
    assert_eq!(
        *seen.lock().unwrap(),
        vec![(HttpMethod::GET, "/desktop/ping".to_string())]
    );
}

#[tokio::test]
async fn explicit_base_url_prefixes_every_path() {
    let (base, seen, _h) = fixture(StatusCode::OK, r#"{"status":"running"}"#).await;
    let config = AdapterConfig::from_json(&format!(r#"{{"baseUrl": "{base}/agent/"}}"#)).unwrap();
    let a = DesktopAdapter::new(config).unwrap();
    assert_eq!(a.base_url(), format!("{base}/agent"));

    let _ = a.on_start_exam_attempt().await;
    let _ = a.on_ping().await;
    let _ = a.on_end_exam_attempt().await;

    assert_eq!(
        *seen.lock().unwrap(),
        vec![
            (HttpMethod::POST, "/agent/desktop/start".to_string()),
            (HttpMethod::GET, "/agent/desktop/ping".to_string()),
            (HttpMethod::POST, "/agent/desktop/stop".to_string()),
        ]
    );
}

#[test]
fn malformed_base_url_is_rejected_at_construction() {
    let err = DesktopAdapter::new(AdapterConfig::new("localhost:11136")).err().unwrap();
    assert!(matches!(err, LifecycleError::InvalidBaseUrl { .. }), "{err}");
}

// ── tracing hook ──────────────────────────────────────────────────

#[tokio::test]
async fn trace_records_one_event_per_call_in_order() {
    let (base, _seen, _h) = fixture(StatusCode::OK, r#"{"status":"running"}"#).await;
    let trace = Arc::new(RecordingTrace::new());
    let a = adapter(&base).with_trace(trace.clone());

    a.on_start_exam_attempt().await.unwrap();
    a.on_ping().await.unwrap();
    a.on_ping().await.unwrap();
    // Stop expects "uploading"; the failure is still traced.
    assert!(a.on_end_exam_attempt().await.is_err());

    assert_eq!(
        trace.endpoints(),
        vec![Endpoint::Start, Endpoint::Ping, Endpoint::Ping, Endpoint::Stop]
    );
    let events = trace.events();
    assert_eq!(events[0].address, format!("{base}/desktop/start"));
    assert_eq!(events[0].method, Method::Post);
    assert_eq!(events[3].address, format!("{base}/desktop/stop"));
}

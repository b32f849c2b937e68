//! Mock proctoring provider REST API, as an LMS proctoring backend sees it.
//!
//! Exams and attempts live in the in-memory [`Registry`](crate::registry::Registry).
//! Finishing an attempt schedules a review callback; visiting the download
//! page schedules a ready callback.

use axum::{
    extract::{Host, Path, Query, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    Json,
};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::info;

use crate::callbacks;
use crate::AppState;

pub const PROVIDER_NAME: &str = "MockProck";

pub const INSTRUCTIONS: [&str; 5] = [
    "First of all, have a nice day.",
    "A new window will open. You will run a system check before downloading the proctoring application.",
    "You will be asked to verify your identity as part of the proctoring exam set up. Make sure you are on a computer with a webcam, and that you have valid photo identification such as a driver's license or passport, before you continue.",
    "When you are finished, you will be redirected to the exam.",
    "Finally, have a nice day!",
];

const DOWNLOAD_PAGE: &str = r#"<html>
<head>
</head>
    <body><h1>Downloading...</h1>
    <p>You're pretending to download the MockProck desktop software</p>
    <p>In fact, you'll be redirected back to the exam...</p>
<script>
setTimeout(window.close, 10000);
</script>
    </body>
</html>
"#;

pub fn download_url(host: &str) -> String {
    format!("http://{host}/download")
}

/// Provider-wide configuration the LMS shows when setting up an exam.
pub fn proctoring_config(host: &str) -> Value {
    json!({
        "download_url": download_url(host),
        "name": PROVIDER_NAME,
        "config": {
            "allow_cheating": "Allow the student to cheat",
            "allow_notes": "Allow the student to take notes",
        },
        "instructions": INSTRUCTIONS,
    })
}

fn not_found(what: &str) -> Response {
    (
        StatusCode::NOT_FOUND,
        Json(json!({"error": format!("{what} not found")})),
    )
        .into_response()
}

/// GET /v1/config/
pub async fn get_config(Host(host): Host) -> Json<Value> {
    Json(proctoring_config(&host))
}

/// POST /v1/exam/
pub async fn create_exam(State(state): State<AppState>, Json(exam): Json<Value>) -> Json<Value> {
    let id = state.registry_mut().create_exam(exam);
    info!(exam_id = %id, "saved exam");
    Json(json!({"id": id}))
}

/// GET /v1/exam/:exam_id/ (unknown exams read as `{}`)
pub async fn get_exam(State(state): State<AppState>, Path(exam_id): Path<String>) -> Json<Value> {
    let exam = state.registry().exam(&exam_id).cloned();
    Json(exam.unwrap_or_else(|| json!({})))
}

/// POST /v1/exam/:exam_id/
pub async fn update_exam(
    State(state): State<AppState>,
    Path(exam_id): Path<String>,
    Json(exam): Json<Value>,
) -> Json<Value> {
    if state.registry_mut().put_exam(&exam_id, exam) {
        info!(%exam_id, "updated exam");
    } else {
        info!(%exam_id, "update for unknown exam, stored as new");
    }
    Json(json!({"id": exam_id}))
}

/// POST /v1/exam/:exam_id/attempt/
pub async fn create_attempt(
    State(state): State<AppState>,
    Path(exam_id): Path<String>,
    Json(attempt): Json<Value>,
) -> Json<Value> {
    let id = state.registry_mut().create_attempt(&exam_id, attempt);
    info!(%exam_id, attempt_id = %id, "created attempt");
    Json(json!({"id": id}))
}

/// GET /v1/exam/:exam_id/attempt/:attempt_id/
///
/// The stored attempt plus what the learner needs to get going: the software
/// download link, the instructions, and the exam's config.
pub async fn get_attempt(
    State(state): State<AppState>,
    Host(host): Host,
    Path((exam_id, attempt_id)): Path<(String, String)>,
) -> Json<Value> {
    let reg = state.registry();
    let mut attempt = reg
        .attempt(&exam_id, &attempt_id)
        .cloned()
        .filter(Value::is_object)
        .unwrap_or_else(|| json!({}));
    attempt["download_url"] = json!(format!(
        "{}?attempt={attempt_id}&exam={exam_id}",
        download_url(&host)
    ));
    attempt["instructions"] = json!(INSTRUCTIONS);
    attempt["config"] = reg.exam_config(&exam_id);
    Json(attempt)
}

/// PATCH /v1/exam/:exam_id/attempt/:attempt_id/
///
/// `{"status": "stop"}` finishes the attempt and schedules its review.
pub async fn patch_attempt(
    State(state): State<AppState>,
    Path((exam_id, attempt_id)): Path<(String, String)>,
    Json(patch): Json<Value>,
) -> Response {
    let merged = state
        .registry_mut()
        .update_attempt(&exam_id, &attempt_id, &patch);
    if merged.is_none() {
        return not_found("attempt");
    }
    let status = patch.get("status").cloned().unwrap_or(Value::Null);
    if status == "stop" {
        info!(%attempt_id, delay = ?state.review_delay, "finished attempt, review scheduled");
        callbacks::schedule_review(&state, &exam_id, &attempt_id);
    } else {
        info!(%attempt_id, %status, "attempt status changed");
    }
    Json(json!({"id": attempt_id, "status": status})).into_response()
}

#[derive(Debug, Deserialize)]
pub struct DownloadQuery {
    pub attempt: Option<String>,
    pub exam: Option<String>,
}

/// GET /download: pretend to hand out the desktop software, then report
/// the attempt ready.
pub async fn download(
    State(state): State<AppState>,
    Query(q): Query<DownloadQuery>,
) -> Html<&'static str> {
    info!(attempt = ?q.attempt, "download requested");
    if let (Some(exam_id), Some(attempt_id)) = (&q.exam, &q.attempt) {
        callbacks::schedule_ready(&state, exam_id, attempt_id);
    }
    Html(DOWNLOAD_PAGE)
}

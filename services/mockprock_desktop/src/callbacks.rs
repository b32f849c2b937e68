//! Delayed callbacks to the LMS that owns an attempt.
//!
//! Both fire from a detached task: the request that triggers them returns
//! right away, and a failed callback is only logged.

use serde_json::{json, Value};
use std::time::Duration;
use tracing::{info, warn};

use crate::AppState;

pub fn ready_url(lms_host: &str, attempt_id: &str) -> String {
    format!("{lms_host}/api/edx_proctoring/v1/proctored_exam/attempt/{attempt_id}/ready")
}

pub fn review_url(lms_host: &str, attempt_id: &str) -> String {
    format!("{lms_host}/api/edx_proctoring/v1/proctored_exam/attempt/{attempt_id}/reviewed")
}

pub fn ready_payload() -> Value {
    json!({"status": "ready"})
}

/// Every attempt passes review, with one canned comment.
pub fn review_payload() -> Value {
    json!({
        "status": "verified",
        "comments": [
            {"comment": "Looks suspicious", "status": "ok"}
        ]
    })
}

/// Tell the LMS the desktop software is "installed", after `state.ready_delay`.
pub fn schedule_ready(state: &AppState, exam_id: &str, attempt_id: &str) {
    let Some(lms_host) = state.registry().lms_host(exam_id, attempt_id) else {
        warn!(exam_id, attempt_id, "ready callback skipped: attempt has no lms_host");
        return;
    };
    spawn_post(
        state,
        state.ready_delay,
        ready_url(&lms_host, attempt_id),
        ready_payload(),
        "ready",
    );
}

/// Send a "verified" review for a finished attempt, after `state.review_delay`.
pub fn schedule_review(state: &AppState, exam_id: &str, attempt_id: &str) {
    let Some(lms_host) = state.registry().lms_host(exam_id, attempt_id) else {
        warn!(exam_id, attempt_id, "review callback skipped: attempt has no lms_host");
        return;
    };
    spawn_post(
        state,
        state.review_delay,
        review_url(&lms_host, attempt_id),
        review_payload(),
        "review",
    );
}

fn spawn_post(state: &AppState, delay: Duration, url: String, payload: Value, kind: &'static str) {
    let http = state.http.clone();
    tokio::spawn(async move {
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
        match http.post(&url).json(&payload).send().await {
            Ok(resp) => {
                let status = resp.status();
                let body = resp.text().await.unwrap_or_default();
                info!(kind, %url, status = status.as_u16(), %body, "LMS callback answered");
            }
            Err(e) => warn!(kind, %url, error = %e, "LMS callback failed"),
        }
    });
}

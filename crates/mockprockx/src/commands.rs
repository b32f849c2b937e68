use colored::Colorize;
use mockprock_adapter::{Endpoint, LifecycleError, ProctoringEventHandler, Result};
use std::time::Duration;
use tracing::info;

fn report(endpoint: Endpoint, result: &Result<()>) {
    match result {
        Ok(()) => println!(
            "{} {} {}",
            "●".green(),
            endpoint.callback().bold(),
            format!("({endpoint})").dimmed()
        ),
        Err(e) => {
            let detail = match e.status_pair() {
                Some(pair) => format!("status={} {}", pair.status, pair.status_text),
                None => e.to_string(),
            };
            println!("{} {} {}", "●".red(), endpoint.callback().bold(), detail.red());
        }
    }
}

// ── single callbacks ────────────────────────────────────────────

pub async fn start<H: ProctoringEventHandler>(handler: &H) -> Result<()> {
    let result = handler.on_start_exam_attempt().await;
    report(Endpoint::Start, &result);
    result
}

pub async fn stop<H: ProctoringEventHandler>(handler: &H) -> Result<()> {
    let result = handler.on_end_exam_attempt().await;
    report(Endpoint::Stop, &result);
    result
}

pub async fn ping<H: ProctoringEventHandler>(handler: &H) -> Result<()> {
    let result = handler.on_ping().await;
    report(Endpoint::Ping, &result);
    result
}

// ── session ─────────────────────────────────────────────────────

/// Drive a whole attempt the way a host would: start, `pings` pings spaced
/// by `interval`, then stop. Stops at the first rejected callback.
pub async fn session<H: ProctoringEventHandler>(
    handler: &H,
    pings: u32,
    interval: Duration,
) -> Result<()> {
    start(handler).await?;
    for n in 0..pings {
        if n > 0 && !interval.is_zero() {
            tokio::time::sleep(interval).await;
        }
        ping(handler).await?;
    }
    stop(handler).await?;
    info!(pings, "session complete");
    Ok(())
}

/// Standardized exit codes.
/// 0 = OK, 1 = other, 2 = input error, 3 = status mismatch, 4 = HTTP error, 5 = unreachable.
pub const EXIT_OK: i32 = 0;
pub const EXIT_OTHER: i32 = 1;
pub const EXIT_INPUT: i32 = 2;
pub const EXIT_MISMATCH: i32 = 3;
pub const EXIT_HTTP: i32 = 4;
pub const EXIT_UNREACHABLE: i32 = 5;

pub fn exit_code_for(err: &LifecycleError) -> i32 {
    match err {
        LifecycleError::InvalidBaseUrl { .. } => EXIT_INPUT,
        LifecycleError::StatusMismatch { .. } => EXIT_MISMATCH,
        LifecycleError::Http { .. } => EXIT_HTTP,
        LifecycleError::Transport { .. } => EXIT_UNREACHABLE,
        LifecycleError::Decode(_) => EXIT_OTHER,
    }
}

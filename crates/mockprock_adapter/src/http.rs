//! Desktop adapter. Drives the local desktop agent over HTTP.
//!
//! Each lifecycle callback is one request against `<base>/desktop/*`; the
//! callback succeeds only when the agent answers 2xx with the expected
//! `status` literal.

use std::error::Error as _;
use std::sync::Arc;

use tracing::{debug, warn};

use crate::error::{LifecycleError, Result};
use crate::handler::ProctoringEventHandler;
use crate::trace::{NoopTrace, TraceEvent, TraceSink};
use crate::types::{AdapterConfig, Endpoint, Method};

/// Validate a base address and strip surrounding whitespace and trailing
/// slashes so paths join cleanly.
pub fn normalize_base_url(raw: &str) -> Result<String> {
    let invalid = |reason: &str| LifecycleError::InvalidBaseUrl {
        url: raw.to_string(),
        reason: reason.to_string(),
    };
    let trimmed = raw.trim();
    let url = reqwest::Url::parse(trimmed).map_err(|e| invalid(&e.to_string()))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(invalid("scheme must be http or https"));
    }
    if url.cannot_be_a_base() || url.host_str().is_none() {
        return Err(invalid("not a url prefix"));
    }
    if url.query().is_some() || url.fragment().is_some() {
        return Err(invalid("query and fragment are not allowed"));
    }
    Ok(trimmed.trim_end_matches('/').to_string())
}

pub struct DesktopAdapter {
    base_url: String,
    http: reqwest::Client,
    trace: Arc<dyn TraceSink>,
}

impl DesktopAdapter {
    pub fn new(config: AdapterConfig) -> Result<Self> {
        let base_url = normalize_base_url(&config.base_url)?;
        let http = reqwest::Client::builder()
            .build()
            .map_err(|e| LifecycleError::Transport {
                status_text: e.to_string(),
            })?;
        Ok(Self {
            base_url,
            http,
            trace: Arc::new(NoopTrace),
        })
    }

    /// Route trace events to `sink` instead of dropping them.
    pub fn with_trace(mut self, sink: impl TraceSink + 'static) -> Self {
        self.trace = Arc::new(sink);
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Issue the single request behind `endpoint` and check its answer.
    pub async fn call(&self, endpoint: Endpoint) -> Result<()> {
        let req = endpoint.request(&self.base_url);
        self.trace.record(&TraceEvent {
            endpoint,
            method: req.method,
            address: req.address.clone(),
        });
        debug!(callback = endpoint.callback(), method = %req.method, url = %req.address, "desktop call");

        let builder = match req.method {
            Method::Get => self.http.get(&req.address),
            Method::Post => self.http.post(&req.address),
        };

        let resp = builder.send().await.map_err(|e| {
            warn!(callback = endpoint.callback(), error = %e, "desktop agent unreachable");
            LifecycleError::Transport {
                status_text: describe(&e),
            }
        })?;

        let status = resp.status();
        if !status.is_success() {
            warn!(callback = endpoint.callback(), status = status.as_u16(), "desktop agent error");
            return Err(LifecycleError::Http {
                status: status.as_u16(),
                status_text: status.canonical_reason().unwrap_or("unknown").to_string(),
            });
        }

        let body = resp.bytes().await.map_err(|e| LifecycleError::Transport {
            status_text: describe(&e),
        })?;

        endpoint.check_response(&body).inspect_err(|e| {
            warn!(callback = endpoint.callback(), error = %e, "desktop agent rejected call");
        })
    }
}

impl ProctoringEventHandler for DesktopAdapter {
    async fn on_start_exam_attempt(&self) -> Result<()> {
        self.call(Endpoint::Start).await
    }

    async fn on_end_exam_attempt(&self) -> Result<()> {
        self.call(Endpoint::Stop).await
    }

    async fn on_ping(&self) -> Result<()> {
        self.call(Endpoint::Ping).await
    }
}

/// Flatten a reqwest error and its sources ("error sending request: ... Connection refused").
fn describe(err: &reqwest::Error) -> String {
    let mut text = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        text.push_str(": ");
        text.push_str(&cause.to_string());
        source = cause.source();
    }
    text
}

//! Call tracing hook. Every lifecycle call reports one [`TraceEvent`] to the
//! adapter's sink before the request goes out.

use std::sync::{Arc, Mutex};

use crate::types::{Endpoint, Method};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TraceEvent {
    pub endpoint: Endpoint,
    pub method: Method,
    pub address: String,
}

pub trait TraceSink: Send + Sync {
    fn record(&self, event: &TraceEvent);
}

impl<T: TraceSink + ?Sized> TraceSink for Arc<T> {
    fn record(&self, event: &TraceEvent) {
        (**self).record(event)
    }
}

/// Default sink; drops everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopTrace;

impl TraceSink for NoopTrace {
    fn record(&self, _event: &TraceEvent) {}
}

/// Keeps every event in call order.
#[derive(Debug, Default)]
pub struct RecordingTrace(Mutex<Vec<TraceEvent>>);

impl RecordingTrace {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<TraceEvent> {
        self.0.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    pub fn endpoints(&self) -> Vec<Endpoint> {
        self.events().into_iter().map(|e| e.endpoint).collect()
    }
}

impl TraceSink for RecordingTrace {
    fn record(&self, event: &TraceEvent) {
        self.0
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(event.clone());
    }
}

//! MockProck: a mock proctoring event handler.
//!
//! A host exam-delivery framework drives three lifecycle callbacks; this
//! crate answers them by talking to a local desktop proctoring agent.
//!
//! # Architecture
//!
//! ```text
//! Host framework
//!   │  on_start_exam_attempt / on_end_exam_attempt / on_ping
//!   ▼
//! DesktopAdapter ── TraceSink (one event per call)
//!   │
//!   ▼  (one HTTP request per callback)
//! Desktop agent  POST /desktop/start → {"status":"running"}
//!                POST /desktop/stop  → {"status":"uploading"}
//!                GET  /desktop/ping  → {"status":"running"}
//! ```
//!
//! A callback resolves only when the agent answers 2xx with the expected
//! `status`. Transport failures carry a `{status, status_text}` pair; a wrong
//! status literal is a bare rejection, kept as its own error variant.
//!
//! The wire table ([`Endpoint`]) and envelope types build without the `http`
//! feature so servers can share them.

pub mod error;
pub mod handler;
#[cfg(feature = "http")]
pub mod http;
pub mod trace;
pub mod types;

pub use error::{LifecycleError, Result, StatusPair};
pub use handler::ProctoringEventHandler;
#[cfg(feature = "http")]
pub use http::DesktopAdapter;
pub use trace::{NoopTrace, RecordingTrace, TraceEvent, TraceSink};
pub use types::{AdapterConfig, DesktopRequest, Endpoint, Method, StatusEnvelope, DEFAULT_BASE_URL};

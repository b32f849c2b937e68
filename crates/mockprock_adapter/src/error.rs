use thiserror::Error;

use crate::types::Endpoint;

#[derive(Error, Debug)]
pub enum LifecycleError {
    /// The request never produced an HTTP response (refused, DNS, reset).
    #[error("transport: {status_text}")]
    Transport { status_text: String },

    #[error("http {status}: {status_text}")]
    Http { status: u16, status_text: String },

    #[error("{endpoint}: expected status {expected:?}, got {actual:?}")]
    StatusMismatch {
        endpoint: Endpoint,
        expected: &'static str,
        actual: Option<String>,
    },

    #[error("decode: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("invalid base url '{url}': {reason}")]
    InvalidBaseUrl { url: String, reason: String },
}

/// The `{status, statusText}` pair a host sees for transport-class failures.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusPair {
    /// HTTP status code, or 0 when no response arrived
    pub status: u16,
    pub status_text: String,
}

impl LifecycleError {
    /// Status pair for transport and HTTP failures; `None` for everything else,
    /// which reaches the host as a bare rejection.
    pub fn status_pair(&self) -> Option<StatusPair> {
        match self {
            LifecycleError::Transport { status_text } => Some(StatusPair {
                status: 0,
                status_text: status_text.clone(),
            }),
            LifecycleError::Http {
                status,
                status_text,
            } => Some(StatusPair {
                status: *status,
                status_text: status_text.clone(),
            }),
            _ => None,
        }
    }

    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            LifecycleError::Transport { .. } | LifecycleError::Http { .. }
        )
    }

    pub fn is_mismatch(&self) -> bool {
        matches!(self, LifecycleError::StatusMismatch { .. })
    }
}

pub type Result<T> = std::result::Result<T, LifecycleError>;

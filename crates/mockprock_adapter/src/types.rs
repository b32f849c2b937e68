use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{LifecycleError, Result};

/// Where the desktop agent listens when no base address is configured.
pub const DEFAULT_BASE_URL: &str = "http://localhost:11136";

/// Adapter construction options. Only `baseUrl` is recognized.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdapterConfig {
    /// URL prefix under which the `/desktop/*` endpoints live
    #[serde(default = "default_base_url")]
    pub base_url: String,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.into()
}

impl Default for AdapterConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
        }
    }
}

impl AdapterConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
        }
    }

    /// Parse a host-supplied options object, e.g. `{"baseUrl": "http://10.0.0.2:11136"}`.
    pub fn from_json(raw: &str) -> Result<Self> {
        Ok(serde_json::from_str(raw)?)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    Get,
    Post,
}

impl Method {
    pub fn as_str(self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The three desktop-agent endpoints and what each one must answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endpoint {
    Start,
    Stop,
    Ping,
}

impl Endpoint {
    pub const ALL: [Endpoint; 3] = [Endpoint::Start, Endpoint::Stop, Endpoint::Ping];

    pub fn path(self) -> &'static str {
        match self {
            Endpoint::Start => "/desktop/start",
            Endpoint::Stop => "/desktop/stop",
            Endpoint::Ping => "/desktop/ping",
        }
    }

    pub fn method(self) -> Method {
        match self {
            Endpoint::Start | Endpoint::Stop => Method::Post,
            Endpoint::Ping => Method::Get,
        }
    }

    /// The `status` literal that counts as success.
    pub fn expected_status(self) -> &'static str {
        match self {
            Endpoint::Start | Endpoint::Ping => "running",
            Endpoint::Stop => "uploading",
        }
    }

    /// Name of the lifecycle callback backed by this endpoint.
    pub fn callback(self) -> &'static str {
        match self {
            Endpoint::Start => "on_start_exam_attempt",
            Endpoint::Stop => "on_end_exam_attempt",
            Endpoint::Ping => "on_ping",
        }
    }

    /// Build the transient request descriptor under `base_url` (no trailing slash).
    pub fn request(self, base_url: &str) -> DesktopRequest {
        DesktopRequest {
            address: format!("{}{}", base_url, self.path()),
            method: self.method(),
        }
    }

    /// Decode a response body and compare its `status` with the expected literal.
    pub fn check_response(self, body: &[u8]) -> Result<()> {
        let envelope: StatusEnvelope = serde_json::from_slice(body)?;
        let expected = self.expected_status();
        if envelope.status.as_deref() == Some(expected) {
            Ok(())
        } else {
            Err(LifecycleError::StatusMismatch {
                endpoint: self,
                expected,
                actual: envelope.status,
            })
        }
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.method(), self.path())
    }
}

/// One outbound call; built per invocation and dropped afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DesktopRequest {
    pub address: String,
    pub method: Method,
}

/// Response body of every desktop endpoint. Other fields are ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusEnvelope {
    /// `None` when the agent reports no state (`null` or absent)
    #[serde(default)]
    pub status: Option<String>,
}

impl StatusEnvelope {
    pub fn new(status: impl Into<String>) -> Self {
        Self {
            status: Some(status.into()),
        }
    }
}

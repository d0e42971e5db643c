use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Body returned by the catalog API alongside non-2xx responses.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiErrorBody {
    #[serde(default)]
    pub message: Option<String>,
}

impl ApiErrorBody {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: Some(message.into()),
        }
    }

    /// Parses an error body, tolerating empty or non-JSON payloads.
    pub fn from_bytes(bytes: &[u8]) -> Self {
        serde_json::from_slice(bytes).unwrap_or_default()
    }

    /// The server-supplied message, when it carries any text.
    pub fn message(&self) -> Option<&str> {
        self.message
            .as_deref()
            .map(str::trim)
            .filter(|message| !message.is_empty())
    }
}

#[derive(Debug, Error)]
#[error("{status}: {}", .body.message().unwrap_or("no message"))]
pub struct ApiException {
    pub status: u16,
    pub body: ApiErrorBody,
}

impl ApiException {
    pub fn new(status: u16, body: ApiErrorBody) -> Self {
        Self { status, body }
    }
}

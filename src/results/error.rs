//! Search error taxonomy and user-facing messages

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// Problems with user input, caught before any request is sent
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Error)]
#[serde(rename_all = "snake_case")]
pub enum ValidationError {
    /// Not produced by the session, where blank text is a no-op. Available
    /// to callers that validate input before submitting.
    #[error("Enter a search term")]
    EmptyQuery,
    #[error("Select at least one source to search")]
    NoSourceSelected,
}

/// A failed search attempt
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Error)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SearchError {
    /// Rejected locally, never sent over the network
    #[error("validation error: {error}")]
    Validation { error: ValidationError },
    /// No response received
    #[error("network error: {message}")]
    Network { message: String },
    /// Response received with a failure status
    #[error("HTTP error {status}")]
    Http {
        status: u16,
        /// Structured reason extracted from the body, if any
        reason: Option<String>,
    },
    /// Anything else (request setup, undecodable payload)
    #[error("unknown error: {message}")]
    Unknown { message: String },
}

/// Classification used for messages and metrics
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    Validation,
    NetworkUnreachable,
    Unauthorized,
    RateLimited,
    ServerFault,
    MalformedQuery,
    Unknown,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Validation => "validation",
            Self::NetworkUnreachable => "network_unreachable",
            Self::Unauthorized => "unauthorized",
            Self::RateLimited => "rate_limited",
            Self::ServerFault => "server_fault",
            Self::MalformedQuery => "malformed_query",
            Self::Unknown => "unknown",
        }
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<ValidationError> for SearchError {
    fn from(error: ValidationError) -> Self {
        Self::Validation { error }
    }
}

impl SearchError {
    pub fn network(message: impl Into<String>) -> Self {
        Self::Network {
            message: message.into(),
        }
    }

    pub fn unknown(message: impl Into<String>) -> Self {
        Self::Unknown {
            message: message.into(),
        }
    }

    /// Build an HTTP error from a failure status and its response body
    pub fn from_response(status: u16, body: &str) -> Self {
        Self::Http {
            status,
            reason: extract_reason(body),
        }
    }

    /// Classify the error
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Validation { .. } => ErrorKind::Validation,
            Self::Network { .. } => ErrorKind::NetworkUnreachable,
            Self::Http { status, .. } => match status {
                401 | 403 => ErrorKind::Unauthorized,
                429 => ErrorKind::RateLimited,
                400..=499 => ErrorKind::MalformedQuery,
                500..=599 => ErrorKind::ServerFault,
                _ => ErrorKind::Unknown,
            },
            Self::Unknown { .. } => ErrorKind::Unknown,
        }
    }

    /// Message to show the user
    pub fn user_message(&self) -> String {
        if let Self::Http {
            reason: Some(reason),
            ..
        } = self
        {
            return format!("Search failed: {}", reason);
        }

        match (self, self.kind()) {
            (Self::Validation { error }, _) => error.to_string(),
            (_, ErrorKind::NetworkUnreachable) => {
                "Unable to reach the search service. Check your connection and try again."
                    .to_string()
            }
            (_, ErrorKind::Unauthorized) => {
                "You are not authorized to search these sources.".to_string()
            }
            (_, ErrorKind::RateLimited) => {
                "Too many searches. Please wait a moment and try again.".to_string()
            }
            (Self::Http { status, .. }, ErrorKind::ServerFault) => {
                format!("The search service encountered an error ({}).", status)
            }
            (Self::Http { status, .. }, ErrorKind::MalformedQuery) => {
                format!("The search request was rejected ({}). Try rephrasing your query.", status)
            }
            _ => "Search failed due to an unexpected error.".to_string(),
        }
    }

    /// Whether the user can fix this by changing their input
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation { .. })
    }
}

/// Pull a structured reason out of an error body.
///
/// The body may look like `{"message": "<json envelope>"}` or be the
/// envelope itself; the envelope is `{"error": {"reason": ..}}` or
/// `{"error": {"root_cause": [{"reason": ..}]}}`.
pub fn extract_reason(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;

    if let Some(message) = value.get("message").and_then(|m| m.as_str()) {
        if let Some(reason) = serde_json::from_str::<Value>(message)
            .ok()
            .as_ref()
            .and_then(envelope_reason)
        {
            return Some(reason);
        }
    }

    envelope_reason(&value)
}

fn envelope_reason(value: &Value) -> Option<String> {
    let error = value.get("error")?;

    let direct = error.get("reason").and_then(|r| r.as_str());
    let root_cause = || {
        error
            .get("root_cause")
            .and_then(|rc| rc.as_array())
            .and_then(|causes| causes.iter().find_map(|c| c.get("reason")?.as_str()))
    };

    direct
        .or_else(root_cause)
        .map(str::trim)
        .filter(|r| !r.is_empty())
        .map(String::from)
}

impl From<reqwest::Error> for SearchError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_connect() || e.is_timeout() || e.is_request() {
            Self::network(e.to_string())
        } else if let Some(status) = e.status() {
            Self::Http {
                status: status.as_u16(),
                reason: None,
            }
        } else {
            Self::unknown(e.to_string())
        }
    }
}

//! Normalized client errors.
//!
//! Every failure a caller can observe from [`HttpClient`](super::HttpClient)
//! is one of these variants, whichever stage produced it.

use reqwest::StatusCode;
use thiserror::Error;

use crate::client::response::ClientResponse;

#[derive(Debug, Error)]
pub enum ClientError {
    /// Raised while building the request or by a request interceptor.
    #[error("request construction failed: {0}")]
    RequestConstruction(String),

    #[error("invalid request URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },

    /// Connection refused, DNS failure, broken connection.
    #[error("network error for {url}: {message}")]
    Network { url: String, message: String },

    #[error("request to {url} timed out after {timeout_ms} ms")]
    Timeout { url: String, timeout_ms: u64 },

    /// A response arrived but its status is outside 2xx.
    #[error("request to {} failed with status {}", .response.url, .response.status)]
    Status { response: Box<ClientResponse> },

    #[error("request to {url} was cancelled")]
    Cancelled { url: String },

    #[error("failed to decode response body: {0}")]
    Decode(#[from] serde_json::Error),
}

impl ClientError {
    /// Short label used for metrics and log fields.
    pub fn kind(&self) -> &'static str {
        match self {
            ClientError::RequestConstruction(_) => "request_construction",
            ClientError::InvalidUrl { .. } => "invalid_url",
            ClientError::Network { .. } => "network",
            ClientError::Timeout { .. } => "timeout",
            ClientError::Status { .. } => "status",
            ClientError::Cancelled { .. } => "cancelled",
            ClientError::Decode(_) => "decode",
        }
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, ClientError::Timeout { .. })
    }

    /// Status code of the failed response, if one was received.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            ClientError::Status { response } => Some(response.status),
            _ => None,
        }
    }

    /// The response carried by a status error.
    pub fn response(&self) -> Option<&ClientResponse> {
        match self {
            ClientError::Status { response } => Some(response),
            _ => None,
        }
    }
}

//! Network transport behind the client pipeline.
//!
//! # Design Decisions
//! - The pipeline only depends on the `Transport` trait
//! - Deadlines and cancellation are enforced by the caller, not here
//! - Transport errors are mapped to `ClientError` at this boundary

use async_trait::async_trait;

use crate::client::error::ClientError;
use crate::client::request::OutgoingRequest;
use crate::client::response::ClientResponse;

/// Sends a prepared request and returns the buffered response.
///
/// Implementations return `Ok` for every response that arrives, whatever
/// its status.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, request: &OutgoingRequest) -> Result<ClientResponse, ClientError>;
}

/// Production transport backed by a pooled `reqwest::Client`.
#[derive(Debug, Clone, Default)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn send(&self, request: &OutgoingRequest) -> Result<ClientResponse, ClientError> {
        let mut builder = self
            .client
            .request(request.method.clone(), request.url.clone())
            .headers(request.headers.clone());
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = builder
            .send()
            .await
            .map_err(|e| map_error(e, request))?;

        let status = response.status();
        let headers = response.headers().clone();
        let url = response.url().clone();
        let body = response
            .bytes()
            .await
            .map_err(|e| map_error(e, request))?;

        Ok(ClientResponse {
            status,
            headers,
            body: body.to_vec(),
            url,
            request: request.clone(),
        })
    }
}

fn map_error(error: reqwest::Error, request: &OutgoingRequest) -> ClientError {
    let url = request.url.to_string();
    if error.is_timeout() {
        ClientError::Timeout {
            url,
            timeout_ms: request.timeout_ms(),
        }
    } else if error.is_builder() {
        ClientError::RequestConstruction(error.to_string())
    } else {
        ClientError::Network {
            url,
            message: error.to_string(),
        }
    }
}

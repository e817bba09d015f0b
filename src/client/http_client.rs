//! The client pipeline.

use std::sync::Arc;
use std::time::Instant;

use reqwest::Method;

use crate::client::error::ClientError;
use crate::client::interceptor::{
    RequestChain, RequestInterceptor, ResponseChain, ResponseInterceptor,
};
use crate::client::request::{CancelSignal, OutgoingRequest, RequestOptions};
use crate::client::response::ClientResponse;
use crate::client::transport::{ReqwestTransport, Transport};
use crate::config::RequestConfig;
use crate::observability::metrics;

/// Single outbound channel to the backend API.
///
/// Build it, call [`configure`](Self::configure) and register interceptors,
/// then share it behind an `Arc`. Requests only need `&self`.
#[derive(Clone)]
pub struct HttpClient {
    config: RequestConfig,
    transport: Arc<dyn Transport>,
    request_interceptors: RequestChain,
    response_interceptors: ResponseChain,
}

impl std::fmt::Debug for HttpClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpClient")
            .field("config", &self.config)
            .field("request_interceptors", &self.request_interceptors.len())
            .field("response_interceptors", &self.response_interceptors.len())
            .finish()
    }
}

impl HttpClient {
    pub fn new(config: RequestConfig) -> Self {
        Self::with_transport(config, Arc::new(ReqwestTransport::new()))
    }

    pub fn with_transport(config: RequestConfig, transport: Arc<dyn Transport>) -> Self {
        Self {
            config,
            transport,
            request_interceptors: RequestChain::default(),
            response_interceptors: ResponseChain::default(),
        }
    }

    /// Replace the request defaults. Last write wins.
    pub fn configure(&mut self, config: RequestConfig) {
        tracing::debug!(
            base_url = %config.base_url,
            timeout_ms = config.timeout_ms,
            "HTTP client configured"
        );
        self.config = config;
    }

    pub fn config(&self) -> &RequestConfig {
        &self.config
    }

    pub fn add_request_interceptor(&mut self, interceptor: Arc<dyn RequestInterceptor>) -> &mut Self {
        self.request_interceptors.push(interceptor);
        self
    }

    pub fn add_response_interceptor(&mut self, interceptor: Arc<dyn ResponseInterceptor>) -> &mut Self {
        self.response_interceptors.push(interceptor);
        self
    }

    /// Register one value as both a request and a response interceptor.
    pub fn add_interceptor<I>(&mut self, interceptor: I) -> &mut Self
    where
        I: RequestInterceptor + ResponseInterceptor + 'static,
    {
        let shared = Arc::new(interceptor);
        self.request_interceptors.push(shared.clone());
        self.response_interceptors.push(shared);
        self
    }

    /// Issue a request to `base_url + path`.
    ///
    /// Resolves with 2xx responses. Every other outcome, including failures
    /// raised by request interceptors, passes through the response stage's
    /// failure branch before it reaches the caller.
    pub async fn request(
        &self,
        method: Method,
        path: &str,
        mut options: RequestOptions,
    ) -> Result<ClientResponse, ClientError> {
        let start = Instant::now();
        let method_label = method.to_string();
        let cancel = options.cancel.take();

        let built = OutgoingRequest::build(&self.config, method, path, &options);
        let outcome = match self.request_interceptors.run(built).await {
            Ok(request) => self.dispatch(request, cancel).await,
            Err(error) => Err(error),
        };
        let result = self.response_interceptors.run(outcome).await;

        match &result {
            Ok(response) => {
                metrics::record_client_request(&method_label, response.status.as_str(), start)
            }
            Err(error) => {
                let label = error
                    .status()
                    .map(|s| s.as_str().to_string())
                    .unwrap_or_else(|| error.kind().to_string());
                metrics::record_client_request(&method_label, &label, start)
            }
        }
        result
    }

    pub async fn get(&self, path: &str) -> Result<ClientResponse, ClientError> {
        self.request(Method::GET, path, RequestOptions::default()).await
    }

    pub async fn post(&self, path: &str, body: serde_json::Value) -> Result<ClientResponse, ClientError> {
        self.request(Method::POST, path, RequestOptions::new().json(body)).await
    }

    pub async fn put(&self, path: &str, body: serde_json::Value) -> Result<ClientResponse, ClientError> {
        self.request(Method::PUT, path, RequestOptions::new().json(body)).await
    }

    pub async fn delete(&self, path: &str) -> Result<ClientResponse, ClientError> {
        self.request(Method::DELETE, path, RequestOptions::default()).await
    }

    async fn dispatch(
        &self,
        request: OutgoingRequest,
        cancel: Option<CancelSignal>,
    ) -> Result<ClientResponse, ClientError> {
        let url = request.url.to_string();
        let response = match cancel {
            Some(mut signal) => {
                tokio::select! {
                    biased;
                    _ = signal.cancelled() => Err(ClientError::Cancelled { url }),
                    result = self.send_with_deadline(&request) => result,
                }
            }
            None => self.send_with_deadline(&request).await,
        }?;

        if response.is_success() {
            Ok(response)
        } else {
            Err(ClientError::Status {
                response: Box::new(response),
            })
        }
    }

    async fn send_with_deadline(&self, request: &OutgoingRequest) -> Result<ClientResponse, ClientError> {
        let Some(deadline) = request.timeout else {
            return self.transport.send(request).await;
        };
        match tokio::time::timeout(deadline, self.transport.send(request)).await {
            Ok(result) => result,
            Err(_) => Err(ClientError::Timeout {
                url: request.url.to_string(),
                timeout_ms: request.timeout_ms(),
            }),
        }
    }
}

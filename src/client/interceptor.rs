//! Interceptor stages.
//!
//! # Responsibilities
//! - Define the request and response handler pairs
//! - Run each stage's handlers in registration order
//! - Provide the logging interceptor installed at bootstrap
//!
//! # Design Decisions
//! - A stage carries a `Result` from handler to handler: `Ok` goes to the
//!   success branch of the next pair, `Err` to its failure branch
//! - A failure branch may recover by returning `Ok`
//! - Default trait methods pass values through untouched

use std::sync::Arc;

use async_trait::async_trait;

use crate::client::error::ClientError;
use crate::client::request::OutgoingRequest;
use crate::client::response::ClientResponse;

/// Handler pair for the outgoing request stage.
#[async_trait]
pub trait RequestInterceptor: Send + Sync {
    /// Inspect or rewrite the request before it is sent.
    async fn on_request(&self, request: OutgoingRequest) -> Result<OutgoingRequest, ClientError> {
        Ok(request)
    }

    /// Observe a failure raised earlier in the request stage.
    async fn on_request_error(&self, error: ClientError) -> Result<OutgoingRequest, ClientError> {
        Err(error)
    }
}

/// Handler pair for the response stage.
#[async_trait]
pub trait ResponseInterceptor: Send + Sync {
    async fn on_response(&self, response: ClientResponse) -> Result<ClientResponse, ClientError> {
        Ok(response)
    }

    /// Observe a failed call. Returning `Ok` substitutes a response.
    async fn on_error(&self, error: ClientError) -> Result<ClientResponse, ClientError> {
        Err(error)
    }
}

/// Ordered request-stage handlers.
#[derive(Clone, Default)]
pub struct RequestChain {
    interceptors: Vec<Arc<dyn RequestInterceptor>>,
}

impl RequestChain {
    pub fn push(&mut self, interceptor: Arc<dyn RequestInterceptor>) {
        self.interceptors.push(interceptor);
    }

    pub fn len(&self) -> usize {
        self.interceptors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.interceptors.is_empty()
    }

    pub async fn run(
        &self,
        initial: Result<OutgoingRequest, ClientError>,
    ) -> Result<OutgoingRequest, ClientError> {
        let mut current = initial;
        for interceptor in &self.interceptors {
            current = match current {
                Ok(request) => interceptor.on_request(request).await,
                Err(error) => interceptor.on_request_error(error).await,
            };
        }
        current
    }
}

/// Ordered response-stage handlers.
#[derive(Clone, Default)]
pub struct ResponseChain {
    interceptors: Vec<Arc<dyn ResponseInterceptor>>,
}

impl ResponseChain {
    pub fn push(&mut self, interceptor: Arc<dyn ResponseInterceptor>) {
        self.interceptors.push(interceptor);
    }

    pub fn len(&self) -> usize {
        self.interceptors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.interceptors.is_empty()
    }

    pub async fn run(
        &self,
        outcome: Result<ClientResponse, ClientError>,
    ) -> Result<ClientResponse, ClientError> {
        let mut current = outcome;
        for interceptor in &self.interceptors {
            current = match current {
                Ok(response) => interceptor.on_response(response).await,
                Err(error) => interceptor.on_error(error).await,
            };
        }
        current
    }
}

/// Logs every request, response and error with its target.
#[derive(Debug, Clone, Copy, Default)]
pub struct LoggingInterceptor;

#[async_trait]
impl RequestInterceptor for LoggingInterceptor {
    async fn on_request(&self, request: OutgoingRequest) -> Result<OutgoingRequest, ClientError> {
        tracing::info!(
            request_id = %request.id,
            method = %request.method,
            url = %request.url,
            "Sending request"
        );
        Ok(request)
    }

    async fn on_request_error(&self, error: ClientError) -> Result<OutgoingRequest, ClientError> {
        tracing::error!(kind = error.kind(), error = %error, "Request error");
        Err(error)
    }
}

#[async_trait]
impl ResponseInterceptor for LoggingInterceptor {
    async fn on_response(&self, response: ClientResponse) -> Result<ClientResponse, ClientError> {
        tracing::info!(
            request_id = %response.request.id,
            status = %response.status,
            url = %response.request.url,
            "Received response"
        );
        Ok(response)
    }

    async fn on_error(&self, error: ClientError) -> Result<ClientResponse, ClientError> {
        tracing::error!(kind = error.kind(), error = %error, "Response error");
        Err(error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::request::RequestOptions;
    use crate::config::RequestConfig;
    use reqwest::{Method, StatusCode};
    use std::sync::Mutex;

    fn request() -> OutgoingRequest {
        OutgoingRequest::build(
            &RequestConfig::default(),
            Method::GET,
            "/api/boards",
            &RequestOptions::new(),
        )
        .unwrap()
    }

    /// Appends its tag to a shared journal on every call.
    struct Tagging {
        tag: &'static str,
        journal: Arc<Mutex<Vec<String>>>,
        fail: bool,
    }

    #[async_trait]
    impl RequestInterceptor for Tagging {
        async fn on_request(&self, mut request: OutgoingRequest) -> Result<OutgoingRequest, ClientError> {
            self.journal.lock().unwrap().push(format!("{}:ok", self.tag));
            if self.fail {
                return Err(ClientError::RequestConstruction(self.tag.into()));
            }
            let path = format!("{}{}", request.path(), self.tag);
            request.set_path(&path);
            Ok(request)
        }

        async fn on_request_error(&self, error: ClientError) -> Result<OutgoingRequest, ClientError> {
            self.journal.lock().unwrap().push(format!("{}:err", self.tag));
            Err(error)
        }
    }

    struct Recover;

    #[async_trait]
    impl ResponseInterceptor for Recover {
        async fn on_error(&self, error: ClientError) -> Result<ClientResponse, ClientError> {
            match error {
                ClientError::Timeout { .. } => Ok(ClientResponse::new(request(), StatusCode::OK, "{}")),
                other => Err(other),
            }
        }
    }

    #[tokio::test]
    async fn test_request_chain_runs_in_registration_order() {
        let journal = Arc::new(Mutex::new(Vec::new()));
        let mut chain = RequestChain::default();
        for tag in ["a", "b", "c"] {
            chain.push(Arc::new(Tagging { tag, journal: journal.clone(), fail: false }));
        }

        let out = chain.run(Ok(request())).await.unwrap();
        assert_eq!(out.path(), "/api/boardsabc");
        assert_eq!(out.url.as_str(), "http://localhost:8000/api/boardsabc");
        assert_eq!(*journal.lock().unwrap(), vec!["a:ok", "b:ok", "c:ok"]);
    }

    #[tokio::test]
    async fn test_request_failure_skips_to_error_branch() {
        let journal = Arc::new(Mutex::new(Vec::new()));
        let mut chain = RequestChain::default();
        chain.push(Arc::new(Tagging { tag: "a", journal: journal.clone(), fail: true }));
        chain.push(Arc::new(Tagging { tag: "b", journal: journal.clone(), fail: false }));

        let err = chain.run(Ok(request())).await.unwrap_err();
        assert_eq!(err.kind(), "request_construction");
        assert_eq!(*journal.lock().unwrap(), vec!["a:ok", "b:err"]);
    }

    #[tokio::test]
    async fn test_response_error_can_recover() {
        let mut chain = ResponseChain::default();
        chain.push(Arc::new(LoggingInterceptor));
        chain.push(Arc::new(Recover));

        let timeout = ClientError::Timeout { url: "http://localhost:8000/x".into(), timeout_ms: 5 };
        let resp = chain.run(Err(timeout)).await.unwrap();
        assert_eq!(resp.status, StatusCode::OK);

        let network = ClientError::Network { url: "x".into(), message: "refused".into() };
        let err = chain.run(Err(network)).await.unwrap_err();
        assert_eq!(err.kind(), "network");
    }

    #[tokio::test]
    async fn test_logging_interceptor_is_transparent() {
        let req = request();
        let id = req.id;
        let out = RequestInterceptor::on_request(&LoggingInterceptor, req).await.unwrap();
        assert_eq!(out.id, id);
        assert_eq!(out.url.as_str(), "http://localhost:8000/api/boards");

        let resp = ClientResponse::new(out, StatusCode::CREATED, "body");
        let resp = ResponseInterceptor::on_response(&LoggingInterceptor, resp).await.unwrap();
        assert_eq!(resp.status, StatusCode::CREATED);
        assert_eq!(resp.body, b"body");
    }

    #[tokio::test]
    async fn test_empty_chain_passes_through() {
        let chain = ResponseChain::default();
        assert!(chain.is_empty());
        let err = chain
            .run(Err(ClientError::Cancelled { url: "u".into() }))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), "cancelled");
    }
}

//! Outgoing request representation and per-call options.

use std::sync::Arc;
use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::Method;
use tokio::sync::watch;
use url::Url;
use uuid::Uuid;

use crate::client::error::ClientError;
use crate::config::RequestConfig;

/// The request as seen by request interceptors.
///
/// Interceptors may rewrite any field; the transport sends whatever comes out
/// of the last one. `url` is the only target: redirect a call with
/// [`set_path`](Self::set_path) or by editing `url` directly.
#[derive(Debug, Clone)]
pub struct OutgoingRequest {
    /// Correlation id, also sent as `x-request-id`.
    pub id: Uuid,
    pub method: Method,
    pub url: Url,
    pub headers: HeaderMap,
    pub body: Option<serde_json::Value>,
    /// `None` waits forever.
    pub timeout: Option<Duration>,
}

impl OutgoingRequest {
    /// Build a request from the client defaults and per-call options.
    pub(crate) fn build(
        config: &RequestConfig,
        method: Method,
        path: &str,
        options: &RequestOptions,
    ) -> Result<Self, ClientError> {
        let joined = join_url(&config.base_url, path);
        let mut url = Url::parse(&joined).map_err(|e| ClientError::InvalidUrl {
            url: joined.clone(),
            reason: e.to_string(),
        })?;
        if !options.query.is_empty() {
            url.query_pairs_mut().extend_pairs(options.query.iter());
        }

        let id = Uuid::new_v4();
        let mut headers = HeaderMap::new();
        let per_call = options.headers.iter().map(|(name, value)| (name, value));
        for (name, value) in config.headers.iter().chain(per_call) {
            headers.insert(header_name(name)?, header_value(name, value)?);
        }
        if let Ok(value) = HeaderValue::from_str(&id.to_string()) {
            headers.insert("x-request-id", value);
        }

        let timeout_ms = options.timeout_ms.unwrap_or(config.timeout_ms);
        let timeout = (timeout_ms > 0).then(|| Duration::from_millis(timeout_ms));

        Ok(Self {
            id,
            method,
            url,
            headers,
            body: options.body.clone(),
            timeout,
        })
    }

    /// Path component of the target URL.
    pub fn path(&self) -> &str {
        self.url.path()
    }

    /// Point the request at another path on the same origin. The query is kept.
    pub fn set_path(&mut self, path: &str) {
        self.url.set_path(path);
    }

    /// Timeout in milliseconds, 0 when unbounded.
    pub fn timeout_ms(&self) -> u64 {
        self.timeout.map(|d| d.as_millis() as u64).unwrap_or(0)
    }
}

fn header_name(name: &str) -> Result<HeaderName, ClientError> {
    HeaderName::from_bytes(name.as_bytes())
        .map_err(|_| ClientError::RequestConstruction(format!("invalid header name '{name}'")))
}

fn header_value(name: &str, value: &str) -> Result<HeaderValue, ClientError> {
    HeaderValue::from_str(value)
        .map_err(|_| ClientError::RequestConstruction(format!("invalid value for header '{name}'")))
}

/// Join a base URL and a request path.
///
/// Absolute `http(s)://` paths bypass the base URL; otherwise exactly one
/// slash separates the two parts.
pub(crate) fn join_url(base: &str, path: &str) -> String {
    if path.starts_with("http://") || path.starts_with("https://") {
        return path.to_string();
    }
    if path.is_empty() {
        return base.to_string();
    }
    format!(
        "{}/{}",
        base.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}

/// Per-call overrides.
#[derive(Debug, Clone, Default)]
pub struct RequestOptions {
    pub headers: Vec<(String, String)>,
    pub query: Vec<(String, String)>,
    pub body: Option<serde_json::Value>,
    /// Overrides `RequestConfig::timeout_ms` for this call.
    pub timeout_ms: Option<u64>,
    pub cancel: Option<CancelSignal>,
}

impl RequestOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    pub fn query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }

    pub fn json(mut self, body: serde_json::Value) -> Self {
        self.body = Some(body);
        self
    }

    pub fn timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = Some(timeout_ms);
        self
    }

    pub fn cancel_on(mut self, signal: CancelSignal) -> Self {
        self.cancel = Some(signal);
        self
    }
}

/// Trigger side of a cancellation pair.
#[derive(Debug, Clone)]
pub struct CancelHandle {
    tx: Arc<watch::Sender<bool>>,
}

impl CancelHandle {
    pub fn cancel(&self) {
        self.tx.send_replace(true);
    }
}

/// Receiving side of a cancellation pair, passed in [`RequestOptions`].
#[derive(Debug, Clone)]
pub struct CancelSignal {
    rx: watch::Receiver<bool>,
}

impl CancelSignal {
    pub fn is_cancelled(&self) -> bool {
        *self.rx.borrow()
    }

    /// Resolves once cancelled. Pends forever if the handle is dropped first.
    pub async fn cancelled(&mut self) {
        if self.rx.wait_for(|cancelled| *cancelled).await.is_err() {
            std::future::pending::<()>().await;
        }
    }
}

/// Create a linked cancel handle and signal.
pub fn cancel_pair() -> (CancelHandle, CancelSignal) {
    let (tx, rx) = watch::channel(false);
    (CancelHandle { tx: Arc::new(tx) }, CancelSignal { rx })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_join_url() {
        assert_eq!(
            join_url("http://localhost:8000", "/quote/AAPL"),
            "http://localhost:8000/quote/AAPL"
        );
        assert_eq!(
            join_url("http://localhost:8000/", "api/boards"),
            "http://localhost:8000/api/boards"
        );
        assert_eq!(
            join_url("http://localhost:8000/v1", "//stocks"),
            "http://localhost:8000/v1/stocks"
        );
        assert_eq!(
            join_url("http://localhost:8000", "https://example.com/x"),
            "https://example.com/x"
        );
        assert_eq!(join_url("http://localhost:8000", ""), "http://localhost:8000");
    }

    #[test]
    fn test_build_applies_defaults() {
        let config = RequestConfig::default();
        let req = OutgoingRequest::build(
            &config,
            Method::GET,
            "/api/boards",
            &RequestOptions::new().query("page", "2"),
        )
        .unwrap();

        assert_eq!(req.url.as_str(), "http://localhost:8000/api/boards?page=2");
        assert_eq!(req.timeout, Some(Duration::from_millis(10_000)));
        assert_eq!(
            req.headers.get("accept").unwrap(),
            "application/json, text/plain, */*"
        );
        assert_eq!(
            req.headers.get("x-request-id").unwrap().to_str().unwrap(),
            req.id.to_string()
        );
    }

    #[test]
    fn test_build_per_call_overrides() {
        let config = RequestConfig::new("http://localhost:8000", 10_000);
        let req = OutgoingRequest::build(
            &config,
            Method::POST,
            "/x",
            &RequestOptions::new().timeout_ms(0).header("accept", "text/html"),
        )
        .unwrap();

        assert_eq!(req.timeout, None);
        assert_eq!(req.timeout_ms(), 0);
        assert_eq!(req.headers.get("accept").unwrap(), "text/html");
    }

    #[test]
    fn test_build_merges_config_and_call_headers() {
        let mut config = RequestConfig::default();
        config.headers.insert("x-client".into(), "stock-web".into());
        let req = OutgoingRequest::build(
            &config,
            Method::GET,
            "/x",
            &RequestOptions::new().header("authorization", "Bearer t"),
        )
        .unwrap();

        assert_eq!(req.headers.get("x-client").unwrap(), "stock-web");
        assert_eq!(req.headers.get("authorization").unwrap(), "Bearer t");
        assert_eq!(
            req.headers.get("accept").unwrap(),
            "application/json, text/plain, */*"
        );
    }

    #[test]
    fn test_set_path_keeps_origin_and_query() {
        let req = OutgoingRequest::build(
            &RequestConfig::default(),
            Method::GET,
            "/quote/AAPL",
            &RequestOptions::new().query("period", "1d"),
        );
        let mut req = req.unwrap();
        req.set_path("/api/v2/quote/AAPL");

        assert_eq!(req.path(), "/api/v2/quote/AAPL");
        assert_eq!(req.url.as_str(), "http://localhost:8000/api/v2/quote/AAPL?period=1d");
    }

    #[test]
    fn test_build_rejects_bad_header() {
        let config = RequestConfig::default();
        let err = OutgoingRequest::build(
            &config,
            Method::GET,
            "/x",
            &RequestOptions::new().header("bad header", "v"),
        )
        .unwrap_err();
        assert!(matches!(err, ClientError::RequestConstruction(_)));
    }

    #[test]
    fn test_build_rejects_bad_url() {
        let config = RequestConfig::new("not a url", 10);
        let err = OutgoingRequest::build(&config, Method::GET, "/x", &RequestOptions::new())
            .unwrap_err();
        assert!(matches!(err, ClientError::InvalidUrl { .. }));
    }

    #[tokio::test]
    async fn test_cancel_pair() {
        let (handle, mut signal) = cancel_pair();
        assert!(!signal.is_cancelled());
        handle.cancel();
        signal.cancelled().await;
        assert!(signal.is_cancelled());
    }
}

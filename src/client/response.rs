//! Completed backend responses.

use reqwest::header::HeaderMap;
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use url::Url;

use crate::client::error::ClientError;
use crate::client::request::OutgoingRequest;

/// A fully buffered response together with the request that produced it.
#[derive(Debug, Clone)]
pub struct ClientResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Vec<u8>,
    /// Final URL after redirects.
    pub url: Url,
    pub request: OutgoingRequest,
}

impl ClientResponse {
    pub fn new(request: OutgoingRequest, status: StatusCode, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            headers: HeaderMap::new(),
            body: body.into(),
            url: request.url.clone(),
            request,
        }
    }

    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }

    /// Deserialize the body as JSON.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, ClientError> {
        Ok(serde_json::from_slice(&self.body)?)
    }

    /// Body as UTF-8 text, lossy.
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::request::RequestOptions;
    use crate::config::RequestConfig;
    use reqwest::Method;
    use serde::Deserialize;

    fn request() -> OutgoingRequest {
        OutgoingRequest::build(
            &RequestConfig::default(),
            Method::GET,
            "/api/stocks/600519",
            &RequestOptions::new(),
        )
        .unwrap()
    }

    #[derive(Debug, Deserialize, PartialEq)]
    struct Quote {
        code: String,
        price: f64,
    }

    #[test]
    fn test_json_body() {
        let resp = ClientResponse::new(
            request(),
            StatusCode::OK,
            r#"{"code":"600519","price":1688.5}"#,
        );
        let quote: Quote = resp.json().unwrap();
        assert_eq!(
            quote,
            Quote {
                code: "600519".into(),
                price: 1688.5
            }
        );
        assert_eq!(resp.url.path(), "/api/stocks/600519");
    }

    #[test]
    fn test_json_decode_error() {
        let resp = ClientResponse::new(request(), StatusCode::OK, "<html>");
        let err = resp.json::<Quote>().unwrap_err();
        assert_eq!(err.kind(), "decode");
    }

    #[test]
    fn test_text_is_lossy() {
        let resp = ClientResponse::new(request(), StatusCode::OK, vec![b'o', b'k', 0xff]);
        assert_eq!(resp.text(), "ok\u{fffd}");
    }
}

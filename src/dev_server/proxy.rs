//! Backend proxying for configured path prefixes.
//!
//! # Responsibilities
//! - Compile proxy rules into upstream origins (HTTP and WebSocket flavours)
//! - Match request paths against rule prefixes
//! - Forward plain HTTP requests, streaming bodies both ways
//!
//! # Design Decisions
//! - First declared prefix wins, plain `starts_with` matching
//! - Hop-by-hop headers stripped in both directions
//! - `change_origin` rewrites Host to the target authority
//! - Upstream failures become 502 Bad Gateway

use axum::{
    body::Body,
    http::{header, HeaderMap, HeaderValue, Request, StatusCode, Uri, Version},
    response::{IntoResponse, Response},
};
use hyper_util::client::legacy::{connect::HttpConnector, Client};
use url::Url;

use crate::config::ProxyRule;
use crate::dev_server::error::DevServerError;
use crate::observability::metrics;

pub type UpstreamClient = Client<HttpConnector, Body>;

const HOP_BY_HOP: [&str; 8] = [
    "connection",
    "keep-alive",
    "proxy-authenticate",
    "proxy-authorization",
    "te",
    "trailer",
    "transfer-encoding",
    "upgrade",
];

/// A compiled proxy rule.
#[derive(Debug, Clone)]
pub struct ProxyRoute {
    pub prefix: String,
    pub change_origin: bool,
    pub ws: bool,
    http_origin: String,
    ws_origin: String,
    authority: String,
}

impl ProxyRoute {
    pub fn compile(rule: &ProxyRule) -> Result<Self, DevServerError> {
        let invalid = |reason: &str| DevServerError::InvalidTarget {
            target: rule.target.clone(),
            reason: reason.to_string(),
        };

        let target = Url::parse(&rule.target).map_err(|e| invalid(&e.to_string()))?;
        if !matches!(target.scheme(), "http" | "ws") {
            return Err(invalid("scheme must be http or ws"));
        }
        let host = target.host_str().ok_or_else(|| invalid("missing host"))?;
        let authority = match target.port() {
            Some(port) => format!("{host}:{port}"),
            None => host.to_string(),
        };
        let base_path = target.path().trim_end_matches('/');

        Ok(Self {
            prefix: rule.prefix.clone(),
            change_origin: rule.change_origin,
            ws: rule.ws,
            http_origin: format!("http://{authority}{base_path}"),
            ws_origin: format!("ws://{authority}{base_path}"),
            authority,
        })
    }

    pub fn matches(&self, path: &str) -> bool {
        path.starts_with(&self.prefix)
    }

    pub fn authority(&self) -> &str {
        &self.authority
    }

    /// Upstream URI for an HTTP request.
    pub fn http_uri(&self, path_and_query: &str) -> Result<Uri, axum::http::uri::InvalidUri> {
        format!("{}{}", self.http_origin, path_and_query).parse()
    }

    /// Upstream URL for a WebSocket connection.
    pub fn ws_url(&self, path_and_query: &str) -> String {
        format!("{}{}", self.ws_origin, path_and_query)
    }
}

/// Proxy rules in declaration order.
#[derive(Debug, Clone, Default)]
pub struct ProxyTable {
    routes: Vec<ProxyRoute>,
}

impl ProxyTable {
    pub fn from_config(rules: &[ProxyRule]) -> Result<Self, DevServerError> {
        let routes = rules
            .iter()
            .map(ProxyRoute::compile)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { routes })
    }

    pub fn match_path(&self, path: &str) -> Option<&ProxyRoute> {
        self.routes.iter().find(|route| route.matches(path))
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}

/// Remove hop-by-hop headers, including any named by `Connection`.
pub fn strip_hop_by_hop(headers: &mut HeaderMap) {
    let named: Vec<String> = headers
        .get_all(header::CONNECTION)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(','))
        .map(|name| name.trim().to_ascii_lowercase())
        .filter(|name| !name.is_empty())
        .collect();
    for name in named {
        headers.remove(name.as_str());
    }
    for name in HOP_BY_HOP {
        headers.remove(name);
    }
}

/// Forward a request to the rule's upstream and relay the response.
pub async fn forward(client: &UpstreamClient, route: &ProxyRoute, request: Request<Body>) -> Response {
    let request_id = request
        .headers()
        .get("x-request-id")
        .and_then(|v| v.to_str().ok())
        .unwrap_or("unknown")
        .to_string();

    let (mut parts, body) = request.into_parts();
    let path_and_query = parts
        .uri
        .path_and_query()
        .map(|pq| pq.as_str())
        .unwrap_or("/");

    let upstream = match route.http_uri(path_and_query) {
        Ok(uri) => uri,
        Err(e) => {
            tracing::warn!(request_id = %request_id, error = %e, "Cannot build upstream URI");
            metrics::record_proxy_request(&route.prefix, 502);
            return (StatusCode::BAD_GATEWAY, "Invalid upstream URI").into_response();
        }
    };

    tracing::debug!(
        request_id = %request_id,
        method = %parts.method,
        upstream = %upstream,
        "Proxying request"
    );

    strip_hop_by_hop(&mut parts.headers);
    if route.change_origin {
        if let Ok(host) = HeaderValue::from_str(route.authority()) {
            parts.headers.insert(header::HOST, host);
        }
    }
    parts.uri = upstream;
    parts.version = Version::HTTP_11;

    match client.request(Request::from_parts(parts, body)).await {
        Ok(response) => {
            let (mut parts, body) = response.into_parts();
            strip_hop_by_hop(&mut parts.headers);
            metrics::record_proxy_request(&route.prefix, parts.status.as_u16());
            Response::from_parts(parts, Body::new(body))
        }
        Err(e) => {
            tracing::error!(request_id = %request_id, error = %e, "Upstream error");
            metrics::record_proxy_request(&route.prefix, 502);
            (StatusCode::BAD_GATEWAY, "Upstream request failed").into_response()
        }
    }
}

//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the shell.
//! All types derive Serde traits for deserialization from config files.

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};

/// Root configuration for the application shell.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct AppConfig {
    /// Defaults applied to every outgoing backend request.
    pub http: RequestConfig,

    /// Development server (history fallback + backend proxy).
    pub dev_server: DevServerConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Request defaults for the HTTP client.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct RequestConfig {
    /// Prefix joined with every relative request path.
    pub base_url: String,

    /// Per-request deadline in milliseconds. Zero disables the deadline.
    pub timeout_ms: u64,

    /// Headers sent with every request. Configured entries are merged over
    /// the defaults; names are lowercased.
    #[serde(deserialize_with = "merge_default_headers")]
    pub headers: BTreeMap<String, String>,
}

impl RequestConfig {
    pub fn new(base_url: impl Into<String>, timeout_ms: u64) -> Self {
        Self {
            base_url: base_url.into(),
            timeout_ms,
            ..Self::default()
        }
    }
}

impl Default for RequestConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000".to_string(),
            timeout_ms: 10_000,
            headers: default_headers(),
        }
    }
}

fn default_headers() -> BTreeMap<String, String> {
    let mut headers = BTreeMap::new();
    headers.insert(
        "accept".to_string(),
        "application/json, text/plain, */*".to_string(),
    );
    headers
}

fn merge_default_headers<'de, D>(deserializer: D) -> Result<BTreeMap<String, String>, D::Error>
where
    D: Deserializer<'de>,
{
    let configured = BTreeMap::<String, String>::deserialize(deserializer)?;
    let mut headers = default_headers();
    headers.extend(
        configured
            .into_iter()
            .map(|(name, value)| (name.to_ascii_lowercase(), value)),
    );
    Ok(headers)
}

/// Development server configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct DevServerConfig {
    /// Bind address (e.g., "0.0.0.0:3000").
    pub bind_address: String,

    /// Fail instead of trying the next port when the address is taken.
    pub strict_port: bool,

    /// Element selector the root view is mounted into.
    pub mount_selector: String,

    /// Whole-request deadline for proxied and rendered requests, in seconds.
    pub request_timeout_secs: u64,

    /// Path prefixes forwarded to the backend.
    pub proxies: Vec<ProxyRule>,
}

impl Default for DevServerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:3000".to_string(),
            strict_port: false,
            mount_selector: "#app".to_string(),
            request_timeout_secs: 30,
            proxies: vec![
                ProxyRule {
                    prefix: "/api".to_string(),
                    target: "http://localhost:8000".to_string(),
                    change_origin: true,
                    ws: true,
                },
                ProxyRule {
                    prefix: "/ws".to_string(),
                    target: "ws://localhost:8000".to_string(),
                    change_origin: true,
                    ws: true,
                },
            ],
        }
    }
}

/// A single proxied path prefix.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ProxyRule {
    /// Path prefix to match (e.g., "/api").
    pub prefix: String,

    /// Upstream origin; `http://` or `ws://`.
    pub target: String,

    /// Rewrite the Host header to the target's authority.
    #[serde(default = "default_change_origin")]
    pub change_origin: bool,

    /// Accept WebSocket upgrades on this prefix.
    #[serde(default)]
    pub ws: bool,
}

fn default_change_origin() -> bool {
    true
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log filter directive; `RUST_LOG` takes precedence when set.
    pub log_level: Option<String>,

    /// Enable the Prometheus exporter.
    pub metrics_enabled: bool,

    /// Bind address for the metrics endpoint.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: None,
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}

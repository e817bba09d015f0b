//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate URLs, header names and bind addresses
//! - Detect duplicate proxy prefixes
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: AppConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::collections::HashSet;
use std::net::SocketAddr;

use reqwest::header::{HeaderName, HeaderValue};
use thiserror::Error;
use url::Url;

use crate::config::schema::AppConfig;

/// A single semantic problem in the configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("http.base_url '{value}' is not an absolute http(s) URL")]
    InvalidBaseUrl { value: String },

    #[error("http.headers contains invalid header '{name}'")]
    InvalidHeader { name: String },

    #[error("{field} '{value}' is not a socket address")]
    InvalidAddress { field: &'static str, value: String },

    #[error("proxy prefix '{prefix}' must start with '/'")]
    InvalidPrefix { prefix: String },

    #[error("proxy prefix '{prefix}' is declared more than once")]
    DuplicatePrefix { prefix: String },

    #[error("proxy target '{target}' must be an http:// or ws:// URL")]
    InvalidTarget { target: String },

    #[error("dev_server.mount_selector must not be empty")]
    EmptySelector,
}

/// Validate a parsed configuration.
pub fn validate_config(config: &AppConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    match Url::parse(&config.http.base_url) {
        Ok(url) if matches!(url.scheme(), "http" | "https") => {}
        _ => errors.push(ValidationError::InvalidBaseUrl {
            value: config.http.base_url.clone(),
        }),
    }

    for (name, value) in &config.http.headers {
        if HeaderName::from_bytes(name.as_bytes()).is_err()
            || HeaderValue::from_str(value).is_err()
        {
            errors.push(ValidationError::InvalidHeader { name: name.clone() });
        }
    }

    if config.dev_server.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::InvalidAddress {
            field: "dev_server.bind_address",
            value: config.dev_server.bind_address.clone(),
        });
    }

    if config.dev_server.mount_selector.trim().is_empty() {
        errors.push(ValidationError::EmptySelector);
    }

    let mut seen = HashSet::new();
    for rule in &config.dev_server.proxies {
        if !rule.prefix.starts_with('/') {
            errors.push(ValidationError::InvalidPrefix {
                prefix: rule.prefix.clone(),
            });
        }
        if !seen.insert(rule.prefix.as_str()) {
            errors.push(ValidationError::DuplicatePrefix {
                prefix: rule.prefix.clone(),
            });
        }
        match Url::parse(&rule.target) {
            Ok(url) if matches!(url.scheme(), "http" | "ws") && url.has_host() => {}
            _ => errors.push(ValidationError::InvalidTarget {
                target: rule.target.clone(),
            }),
        }
    }

    if config.observability.metrics_enabled
        && config.observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::InvalidAddress {
            field: "observability.metrics_address",
            value: config.observability.metrics_address.clone(),
        });
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

//! TCP listener binding.
//!
//! # Responsibilities
//! - Bind to the configured address
//! - When the port is taken and `strict_port` is off, try the following ports
//!
//! # Design Decisions
//! - Only `AddrInUse` moves on to the next port; any other error is fatal
//! - The walk is bounded so a misconfigured host fails fast

use std::io::ErrorKind;
use std::net::SocketAddr;

use tokio::net::TcpListener;

use crate::config::DevServerConfig;
use crate::dev_server::error::DevServerError;

/// Ports tried after the configured one when it is busy.
pub const MAX_PORT_ATTEMPTS: u16 = 10;

/// Bind the dev server listener.
pub async fn bind(config: &DevServerConfig) -> Result<TcpListener, DevServerError> {
    let addr: SocketAddr = config
        .bind_address
        .parse()
        .map_err(|_| DevServerError::InvalidAddress(config.bind_address.clone()))?;

    let attempts = if config.strict_port || addr.port() == 0 {
        0
    } else {
        MAX_PORT_ATTEMPTS
    };

    let mut candidate = addr;
    let mut offset = 0;
    loop {
        match TcpListener::bind(candidate).await {
            Ok(listener) => {
                let local_addr = listener.local_addr()?;
                if offset > 0 {
                    tracing::warn!(
                        requested = %addr,
                        address = %local_addr,
                        "Port in use, bound to the next free port"
                    );
                }
                tracing::info!(address = %local_addr, "Listener bound");
                return Ok(listener);
            }
            Err(e) if e.kind() == ErrorKind::AddrInUse && offset < attempts => {
                let Some(port) = candidate.port().checked_add(1) else {
                    return Err(DevServerError::Bind {
                        addr: candidate.to_string(),
                        source: e,
                    });
                };
                tracing::debug!(port = candidate.port(), "Port in use, trying next");
                offset += 1;
                candidate.set_port(port);
            }
            Err(e) => {
                return Err(DevServerError::Bind {
                    addr: candidate.to_string(),
                    source: e,
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(bind_address: String, strict_port: bool) -> DevServerConfig {
        DevServerConfig {
            bind_address,
            strict_port,
            ..DevServerConfig::default()
        }
    }

    #[tokio::test]
    async fn test_walks_to_next_port() {
        let taken = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = taken.local_addr().unwrap().port();

        match bind(&config(format!("127.0.0.1:{port}"), false)).await {
            Ok(listener) => assert_ne!(listener.local_addr().unwrap().port(), port),
            // the following ports may all be taken on a busy host
            Err(DevServerError::Bind { .. }) => {}
            Err(other) => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn test_strict_port_fails() {
        let taken = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = taken.local_addr().unwrap().port();

        let err = bind(&config(format!("127.0.0.1:{port}"), true)).await.unwrap_err();
        assert!(matches!(err, DevServerError::Bind { .. }));
    }

    #[tokio::test]
    async fn test_invalid_address() {
        let err = bind(&config("not-an-address".into(), false)).await.unwrap_err();
        assert!(matches!(err, DevServerError::InvalidAddress(_)));
    }
}

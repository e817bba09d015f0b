//! WebSocket proxy handling.
//!
//! # Responsibilities
//! - Detect WebSocket upgrade requests on `ws`-enabled prefixes
//! - Establish the backend connection before accepting the client upgrade
//! - Bidirectional frame forwarding
//!
//! # Data Flow
//! ```text
//! Browser ←──── WebSocket frames ────→ Dev server ←──── WebSocket frames ────→ Backend
//! ```
//!
//! # Design Decisions
//! - Backend unreachable: the upgrade is refused with 502, never half-opened
//! - Frame-level forwarding (no message buffering)
//! - Close frames propagated in both directions
//! - Ping/pong forwarded as ordinary frames

use axum::{
    extract::ws::{CloseFrame as ClientCloseFrame, Message as ClientMessage, WebSocket, WebSocketUpgrade},
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
};
use futures_util::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio_tungstenite::{
    connect_async,
    tungstenite::protocol::{frame::coding::CloseCode, CloseFrame as UpstreamCloseFrame},
    tungstenite::Message as UpstreamMessage,
    MaybeTlsStream, WebSocketStream,
};

use crate::dev_server::proxy::ProxyRoute;
use crate::observability::metrics;

type Upstream = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// True when the request asks for a WebSocket upgrade.
pub fn is_upgrade_request(headers: &HeaderMap) -> bool {
    let connection_upgrade = headers
        .get_all(header::CONNECTION)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(','))
        .any(|token| token.trim().eq_ignore_ascii_case("upgrade"));
    let upgrade_websocket = headers
        .get(header::UPGRADE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.eq_ignore_ascii_case("websocket"));
    connection_upgrade && upgrade_websocket
}

/// Connect to the backend, then complete the client upgrade and pump frames.
pub async fn bridge(ws: WebSocketUpgrade, route: &ProxyRoute, path_and_query: &str) -> Response {
    let url = route.ws_url(path_and_query);
    let upstream = match connect_async(url.as_str()).await {
        Ok((stream, _)) => stream,
        Err(e) => {
            tracing::error!(upstream = %url, error = %e, "WebSocket backend connection failed");
            metrics::record_proxy_request(&route.prefix, 502);
            return (StatusCode::BAD_GATEWAY, "Upstream WebSocket unavailable").into_response();
        }
    };

    tracing::debug!(upstream = %url, "WebSocket backend connected");
    metrics::record_proxy_request(&route.prefix, 101);
    ws.on_upgrade(move |socket| pump(socket, upstream, url))
}

async fn pump(client: WebSocket, upstream: Upstream, url: String) {
    let (mut client_tx, mut client_rx) = client.split();
    let (mut upstream_tx, mut upstream_rx) = upstream.split();

    loop {
        tokio::select! {
            incoming = client_rx.next() => match incoming {
                Some(Ok(message)) => {
                    let closing = matches!(message, ClientMessage::Close(_));
                    if upstream_tx.send(to_upstream(message)).await.is_err() || closing {
                        break;
                    }
                }
                Some(Err(e)) => {
                    tracing::debug!(upstream = %url, error = %e, "Client WebSocket error");
                    break;
                }
                None => break,
            },
            incoming = upstream_rx.next() => match incoming {
                Some(Ok(message)) => {
                    let Some(message) = to_client(message) else { continue };
                    let closing = matches!(message, ClientMessage::Close(_));
                    if client_tx.send(message).await.is_err() || closing {
                        break;
                    }
                }
                Some(Err(e)) => {
                    tracing::debug!(upstream = %url, error = %e, "Backend WebSocket error");
                    break;
                }
                None => break,
            },
        }
    }

    let _ = upstream_tx.close().await;
    let _ = client_tx.close().await;
    tracing::debug!(upstream = %url, "WebSocket session closed");
}

fn to_upstream(message: ClientMessage) -> UpstreamMessage {
    match message {
        ClientMessage::Text(text) => UpstreamMessage::Text(text.as_str().into()),
        ClientMessage::Binary(data) => UpstreamMessage::Binary(data),
        ClientMessage::Ping(data) => UpstreamMessage::Ping(data),
        ClientMessage::Pong(data) => UpstreamMessage::Pong(data),
        ClientMessage::Close(frame) => UpstreamMessage::Close(frame.map(|f| UpstreamCloseFrame {
            code: CloseCode::from(f.code),
            reason: f.reason.as_str().into(),
        })),
    }
}

fn to_client(message: UpstreamMessage) -> Option<ClientMessage> {
    let converted = match message {
        UpstreamMessage::Text(text) => ClientMessage::Text(text.as_str().into()),
        UpstreamMessage::Binary(data) => ClientMessage::Binary(data),
        UpstreamMessage::Ping(data) => ClientMessage::Ping(data),
        UpstreamMessage::Pong(data) => ClientMessage::Pong(data),
        UpstreamMessage::Close(frame) => ClientMessage::Close(frame.map(|f| ClientCloseFrame {
            code: u16::from(f.code),
            reason: f.reason.as_str().into(),
        })),
        UpstreamMessage::Frame(_) => return None,
    };
    Some(converted)
}

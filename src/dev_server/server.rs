//! Development server setup.
//!
//! # Responsibilities
//! - Create the Axum router with a single dispatching handler
//! - Wire up middleware (request id, tracing, timeout)
//! - Forward proxied prefixes to the backend (HTTP and WebSocket)
//! - Serve every other GET/HEAD path as a rendered page (history fallback)
//! - Graceful shutdown on the lifecycle shutdown signal

use std::sync::Arc;
use std::time::Duration;

use axum::{
    body::Body,
    extract::{ws::WebSocketUpgrade, FromRequestParts, State},
    http::{Method, Request, StatusCode},
    response::{Html, IntoResponse, Response},
    routing::any,
    Router,
};
use hyper_util::{
    client::legacy::{connect::HttpConnector, Client},
    rt::TokioExecutor,
};
use tokio::net::TcpListener;
use tower_http::{
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::app::{AppShell, RenderOutcome};
use crate::config::DevServerConfig;
use crate::dev_server::error::DevServerError;
use crate::dev_server::page::render_document;
use crate::dev_server::proxy::{self, ProxyTable, UpstreamClient};
use crate::dev_server::websocket;
use crate::lifecycle::ShutdownSignal;

/// State injected into the dispatch handler.
#[derive(Clone)]
pub struct AppState {
    pub shell: Arc<AppShell>,
    pub proxies: Arc<ProxyTable>,
    pub client: UpstreamClient,
    pub selector: Arc<str>,
}

/// HTTP server for local development.
pub struct DevServer {
    router: Router,
    proxies: Arc<ProxyTable>,
}

impl DevServer {
    pub fn new(config: &DevServerConfig, shell: AppShell) -> Result<Self, DevServerError> {
        let proxies = Arc::new(ProxyTable::from_config(&config.proxies)?);
        let selector: Arc<str> = shell
            .selector()
            .unwrap_or(config.mount_selector.as_str())
            .into();

        let client = Client::builder(TokioExecutor::new()).build(HttpConnector::new());

        let state = AppState {
            shell: Arc::new(shell),
            proxies: proxies.clone(),
            client,
            selector,
        };

        let router = Self::build_router(config, state);
        Ok(Self { router, proxies })
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    fn build_router(config: &DevServerConfig, state: AppState) -> Router {
        let mut router = Router::new()
            .route("/{*path}", any(dispatch))
            .route("/", any(dispatch))
            .with_state(state);
        if config.request_timeout_secs > 0 {
            router = router.layer(TimeoutLayer::new(Duration::from_secs(config.request_timeout_secs)));
        }
        router
            .layer(PropagateRequestIdLayer::x_request_id())
            .layer(TraceLayer::new_for_http())
            .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
    }

    pub fn proxies(&self) -> &ProxyTable {
        &self.proxies
    }

    /// Serve on `listener` until shutdown is triggered.
    pub async fn run(
        self,
        listener: TcpListener,
        shutdown: ShutdownSignal,
    ) -> Result<(), DevServerError> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, proxies = self.proxies.len(), "Dev server starting");

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                shutdown.triggered().await;
            })
            .await?;

        tracing::info!("Dev server stopped");
        Ok(())
    }
}

/// Proxy matched prefixes, render everything else.
async fn dispatch(State(state): State<AppState>, request: Request<Body>) -> Response {
    let path = request.uri().path().to_string();

    if let Some(route) = state.proxies.match_path(&path) {
        if route.ws && websocket::is_upgrade_request(request.headers()) {
            let path_and_query = request
                .uri()
                .path_and_query()
                .map(|pq| pq.as_str().to_string())
                .unwrap_or_else(|| path.clone());
            let (mut parts, _body) = request.into_parts();
            return match WebSocketUpgrade::from_request_parts(&mut parts, &state).await {
                Ok(ws) => websocket::bridge(ws, route, &path_and_query).await,
                Err(rejection) => rejection.into_response(),
            };
        }
        return proxy::forward(&state.client, route, request).await;
    }

    if !matches!(*request.method(), Method::GET | Method::HEAD) {
        return (StatusCode::METHOD_NOT_ALLOWED, "Method not allowed").into_response();
    }

    let rendered = state.shell.render_path(&path);
    let status = match rendered.outcome {
        RenderOutcome::Rendered => StatusCode::OK,
        RenderOutcome::NotFound => StatusCode::NOT_FOUND,
        RenderOutcome::Failed => StatusCode::INTERNAL_SERVER_ERROR,
    };
    tracing::debug!(
        path = %path,
        route = rendered.route.as_deref().unwrap_or("none"),
        status = status.as_u16(),
        "Rendered page"
    );
    (status, Html(render_document(&state.selector, &rendered))).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;
    use tower::ServiceExt;

    fn server() -> DevServer {
        let config = AppConfig::default();
        let shell = AppShell::bootstrap(&config).unwrap();
        DevServer::new(&config.dev_server, shell).unwrap()
    }

    async fn get(server: &DevServer, path: &str) -> (StatusCode, String) {
        let response = server
            .router
            .clone()
            .oneshot(Request::get(path).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, String::from_utf8(body.to_vec()).unwrap())
    }

    #[tokio::test]
    async fn test_history_fallback_renders_home() {
        let server = server();
        let (status, body) = get(&server, "/").await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("<div id=\"app\" data-route=\"Home\">"));
    }

    #[tokio::test]
    async fn test_history_fallback_renders_detail() {
        let server = server();
        let (status, body) = get(&server, "/stock/600519").await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("data-route=\"StockDetail\""));
        assert!(body.contains("600519"));
    }

    #[tokio::test]
    async fn test_unknown_path_is_404_page() {
        let server = server();
        let (status, body) = get(&server, "/portfolio/settings").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert!(body.contains("data-route=\"NotFound\""));
    }

    #[tokio::test]
    async fn test_non_get_on_page_is_rejected() {
        let server = server();
        let response = server
            .router
            .clone()
            .oneshot(Request::post("/").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
    }

    #[tokio::test]
    async fn test_request_id_is_propagated() {
        let server = server();
        let response = server
            .router
            .clone()
            .oneshot(Request::get("/").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert!(response.headers().contains_key("x-request-id"));
    }
}

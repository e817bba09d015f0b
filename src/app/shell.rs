//! Startup composition and the mounted view tree.

use std::sync::Arc;

use thiserror::Error;

use crate::app::error_handler::{ErrorBoundary, ErrorHandler, ErrorInfo, LoggingErrorHandler, RenderPhase};
use crate::app::routes::stock_routes;
use crate::app::view::{View, ViewContext, ViewRef};
use crate::app::views::NotFoundView;
use crate::client::{HttpClient, LoggingInterceptor};
use crate::config::{AppConfig, RequestConfig};
use crate::routing::{Location, RouteEntry, RouteError, RouteParams, Router};

#[derive(Debug, Error)]
pub enum AppError {
    #[error("route table rejected: {0}")]
    Route(#[from] RouteError),

    #[error("application already mounted at '{0}'")]
    AlreadyMounted(String),

    #[error("application is not mounted")]
    NotMounted,
}

/// How a render cycle ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderOutcome {
    Rendered,
    NotFound,
    /// The view failed; the boundary reported it and the mount is empty.
    Failed,
}

/// Output of one render cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rendered {
    pub path: String,
    pub route: Option<String>,
    pub html: String,
    pub outcome: RenderOutcome,
}

#[derive(Debug, Clone)]
struct MountPoint {
    selector: String,
    rendered: Rendered,
}

/// The composed application: client, router and error boundary.
pub struct AppShell {
    client: Arc<HttpClient>,
    router: Router<ViewRef>,
    boundary: ErrorBoundary,
    not_found: ViewRef,
    mount: Option<MountPoint>,
}

impl AppShell {
    /// Standard startup: configured client with logging interceptors, the
    /// stock route table and the logging error handler.
    pub fn bootstrap(config: &AppConfig) -> Result<Self, AppError> {
        let mut client = HttpClient::new(RequestConfig::default());
        client.configure(config.http.clone());
        Self::assemble(client, stock_routes(), Arc::new(LoggingErrorHandler))
    }

    /// Compose a shell from explicit parts.
    pub fn assemble(
        mut client: HttpClient,
        routes: Vec<RouteEntry<ViewRef>>,
        handler: Arc<dyn ErrorHandler>,
    ) -> Result<Self, AppError> {
        client.add_interceptor(LoggingInterceptor);
        let router = Router::new(routes)?;

        tracing::info!(
            base_url = %client.config().base_url,
            timeout_ms = client.config().timeout_ms,
            routes = router.route_count(),
            "Application shell initialized"
        );

        Ok(Self {
            client: Arc::new(client),
            router,
            boundary: ErrorBoundary::new(handler),
            not_found: Arc::new(NotFoundView),
            mount: None,
        })
    }

    pub fn client(&self) -> &Arc<HttpClient> {
        &self.client
    }

    pub fn router(&self) -> &Router<ViewRef> {
        &self.router
    }

    pub fn is_mounted(&self) -> bool {
        self.mount.is_some()
    }

    pub fn selector(&self) -> Option<&str> {
        self.mount.as_ref().map(|m| m.selector.as_str())
    }

    /// What is currently on screen.
    pub fn current(&self) -> Option<&Rendered> {
        self.mount.as_ref().map(|m| &m.rendered)
    }

    /// Mount the root view at `initial_path`. Allowed once.
    pub fn mount(&mut self, selector: &str, initial_path: &str) -> Result<&Rendered, AppError> {
        if let Some(existing) = &self.mount {
            return Err(AppError::AlreadyMounted(existing.selector.clone()));
        }
        self.router.replace(initial_path);
        let rendered = self.render_location(self.router.current(), RenderPhase::Mount);
        tracing::info!(selector = %selector, path = %rendered.path, "Application mounted");

        let mount = self.mount.insert(MountPoint {
            selector: selector.to_string(),
            rendered,
        });
        Ok(&mount.rendered)
    }

    pub fn navigate(&mut self, path: &str) -> Result<&Rendered, AppError> {
        self.ensure_mounted()?;
        self.router.push(path);
        self.update()
    }

    pub fn replace(&mut self, path: &str) -> Result<&Rendered, AppError> {
        self.ensure_mounted()?;
        self.router.replace(path);
        self.update()
    }

    /// Go back one entry. `Ok(None)` when there is nothing to go back to.
    pub fn back(&mut self) -> Result<Option<&Rendered>, AppError> {
        self.go(-1)
    }

    pub fn forward(&mut self) -> Result<Option<&Rendered>, AppError> {
        self.go(1)
    }

    pub fn go(&mut self, delta: isize) -> Result<Option<&Rendered>, AppError> {
        self.ensure_mounted()?;
        if self.router.go(delta).is_none() {
            return Ok(None);
        }
        self.update().map(Some)
    }

    /// Render a path without touching history or the mount point.
    pub fn render_path(&self, path: &str) -> Rendered {
        let location = match self.router.resolve(path) {
            Ok(matched) => Location::Matched(matched),
            Err(_) => Location::NotFound(path.to_string()),
        };
        self.render_location(&location, RenderPhase::Render)
    }

    fn ensure_mounted(&self) -> Result<(), AppError> {
        if self.mount.is_some() {
            Ok(())
        } else {
            Err(AppError::NotMounted)
        }
    }

    fn update(&mut self) -> Result<&Rendered, AppError> {
        let rendered = self.render_location(self.router.current(), RenderPhase::Update);
        let mount = self.mount.as_mut().ok_or(AppError::NotMounted)?;
        mount.rendered = rendered;
        Ok(&mount.rendered)
    }

    fn render_location(&self, location: &Location<ViewRef>, phase: RenderPhase) -> Rendered {
        let empty = RouteParams::new();
        let (view, route, params, outcome): (&dyn View, Option<&str>, &RouteParams, RenderOutcome) =
            match location {
                Location::Matched(m) => (m.view.as_ref(), Some(m.name.as_str()), &m.params, RenderOutcome::Rendered),
                Location::NotFound(_) => (self.not_found.as_ref(), None, &empty, RenderOutcome::NotFound),
            };
        let path = location.path();

        let ctx = ViewContext {
            route_name: route.unwrap_or("NotFound"),
            path,
            params,
            client: &self.client,
        };
        let info = ErrorInfo {
            phase,
            route: route.map(str::to_string),
            path: path.to_string(),
        };

        let (html, outcome) = match self.boundary.run(&info, || view.render(&ctx)) {
            Some(html) => (html, outcome),
            None => (String::new(), RenderOutcome::Failed),
        };

        Rendered {
            path: path.to_string(),
            route: route.map(str::to_string),
            html,
            outcome,
        }
    }
}

impl std::fmt::Debug for AppShell {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppShell")
            .field("client", &self.client)
            .field("routes", &self.router.route_count())
            .field("mount", &self.mount)
            .finish()
    }
}

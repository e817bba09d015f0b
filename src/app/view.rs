//! Renderable units bound to routes.

use std::sync::Arc;

use thiserror::Error;

use crate::client::HttpClient;
use crate::routing::RouteParams;

/// Failure raised while constructing or updating a view.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RenderError {
    #[error("render failed: {0}")]
    Failed(String),

    #[error("missing route parameter '{0}'")]
    MissingParam(String),

    #[error("view panicked: {0}")]
    Panicked(String),
}

/// Everything a view may read while rendering.
pub struct ViewContext<'a> {
    pub route_name: &'a str,
    pub path: &'a str,
    pub params: &'a RouteParams,
    pub client: &'a Arc<HttpClient>,
}

impl ViewContext<'_> {
    pub fn param(&self, name: &str) -> Option<&str> {
        self.params.get(name).map(String::as_str)
    }

    /// Like [`param`](Self::param) but a missing value is a render error.
    pub fn require_param(&self, name: &str) -> Result<&str, RenderError> {
        self.param(name)
            .ok_or_else(|| RenderError::MissingParam(name.to_string()))
    }
}

/// A view renders markup for the mount point.
pub trait View: Send + Sync {
    fn render(&self, ctx: &ViewContext<'_>) -> Result<String, RenderError>;
}

pub type ViewRef = Arc<dyn View>;

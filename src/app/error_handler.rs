//! Global error handling for view rendering.
//!
//! # Responsibilities
//! - Define the handler invoked for every failed render or update
//! - Wrap each render cycle so neither errors nor panics escape it
//!
//! # Design Decisions
//! - The boundary is the terminal point for render failures: report, then stop
//! - Panics are converted to `RenderError::Panicked` with their message
//! - No retries and no user-facing error markup

use std::any::Any;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use crate::app::view::RenderError;
use crate::observability::metrics;

/// Which part of the lifecycle was rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderPhase {
    /// Initial mount.
    Mount,
    /// Re-render after a history change.
    Update,
    /// Detached render (server-side page).
    Render,
}

impl fmt::Display for RenderPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            RenderPhase::Mount => "mount",
            RenderPhase::Update => "update",
            RenderPhase::Render => "render",
        })
    }
}

/// Context reported alongside a render failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorInfo {
    pub phase: RenderPhase,
    pub route: Option<String>,
    pub path: String,
}

/// Receives every render failure caught by the boundary.
pub trait ErrorHandler: Send + Sync {
    fn handle(&self, error: &RenderError, info: &ErrorInfo);
}

/// Default handler: log with context and count.
#[derive(Debug, Clone, Copy, Default)]
pub struct LoggingErrorHandler;

impl ErrorHandler for LoggingErrorHandler {
    fn handle(&self, error: &RenderError, info: &ErrorInfo) {
        let route = info.route.as_deref().unwrap_or("none");
        tracing::error!(
            error = %error,
            phase = %info.phase,
            route = %route,
            path = %info.path,
            "View error"
        );
        metrics::record_render_error(route);
    }
}

/// Top-level recovery boundary around each render cycle.
#[derive(Clone)]
pub struct ErrorBoundary {
    handler: Arc<dyn ErrorHandler>,
}

impl ErrorBoundary {
    pub fn new(handler: Arc<dyn ErrorHandler>) -> Self {
        Self { handler }
    }

    /// Run `f`, returning its value, or `None` after reporting a failure.
    pub fn run<T, F>(&self, info: &ErrorInfo, f: F) -> Option<T>
    where
        F: FnOnce() -> Result<T, RenderError>,
    {
        let error = match panic::catch_unwind(AssertUnwindSafe(f)) {
            Ok(Ok(value)) => return Some(value),
            Ok(Err(error)) => error,
            Err(payload) => RenderError::Panicked(panic_message(payload.as_ref())),
        };
        self.handler.handle(&error, info);
        None
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic payload".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[derive(Default)]
    struct Collecting {
        seen: Mutex<Vec<(RenderError, ErrorInfo)>>,
    }

    impl ErrorHandler for Collecting {
        fn handle(&self, error: &RenderError, info: &ErrorInfo) {
            self.seen.lock().unwrap().push((error.clone(), info.clone()));
        }
    }

    fn info() -> ErrorInfo {
        ErrorInfo {
            phase: RenderPhase::Update,
            route: Some("StockDetail".into()),
            path: "/stock/AAPL".into(),
        }
    }

    #[test]
    fn test_success_passes_through() {
        let handler = Arc::new(Collecting::default());
        let boundary = ErrorBoundary::new(handler.clone());
        assert_eq!(boundary.run(&info(), || Ok(7)), Some(7));
        assert!(handler.seen.lock().unwrap().is_empty());
    }

    #[test]
    fn test_error_is_reported_once() {
        let handler = Arc::new(Collecting::default());
        let boundary = ErrorBoundary::new(handler.clone());
        let out: Option<()> = boundary.run(&info(), || Err(RenderError::Failed("boom".into())));

        assert!(out.is_none());
        let seen = handler.seen.lock().unwrap();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].0, RenderError::Failed("boom".into()));
        assert_eq!(seen[0].1, info());
    }

    #[test]
    fn test_panic_is_contained() {
        let handler = Arc::new(Collecting::default());
        let boundary = ErrorBoundary::new(handler.clone());
        let out: Option<()> = boundary.run(&info(), || panic!("chart data missing"));

        assert!(out.is_none());
        let seen = handler.seen.lock().unwrap();
        assert_eq!(seen[0].0, RenderError::Panicked("chart data missing".into()));
    }

    #[test]
    fn test_formatted_panic_message() {
        let handler = Arc::new(Collecting::default());
        let boundary = ErrorBoundary::new(handler.clone());
        let code = "AAPL";
        let _: Option<()> = boundary.run(&info(), || panic!("no quote for {code}"));
        assert_eq!(
            handler.seen.lock().unwrap()[0].0,
            RenderError::Panicked("no quote for AAPL".into())
        );
    }

    #[test]
    fn test_logging_handler_does_not_panic() {
        LoggingErrorHandler.handle(&RenderError::Failed("x".into()), &info());
    }
}

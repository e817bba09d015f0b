//! Application shell subsystem.
//!
//! # Data Flow
//! ```text
//! bootstrap(AppConfig)
//!     → HttpClient (configure + logging interceptor pair)
//!     → Router (routes.rs table)
//!     → ErrorBoundary (error_handler.rs)
//! mount(selector, path) / navigate(path) / back() / forward()
//!     → Router re-resolves the location
//!     → ErrorBoundary wraps view.render(ViewContext)
//!     → Rendered stored on the mount point
//! ```
//!
//! # Design Decisions
//! - Mounting happens once per shell; a second mount is an error
//! - Every render runs inside the boundary; failures are reported, never rethrown
//! - Unmatched locations render the NotFound view
//! - Views receive the shared client through their context, never a global

pub mod error_handler;
pub mod routes;
pub mod shell;
pub mod view;
pub mod views;

pub use error_handler::{ErrorBoundary, ErrorHandler, ErrorInfo, LoggingErrorHandler, RenderPhase};
pub use shell::{AppError, AppShell, RenderOutcome, Rendered};
pub use view::{RenderError, View, ViewContext, ViewRef};

//! Stock web client shell.
//!
//! Configured backend HTTP client with an interceptor pipeline, a path
//! router with history, an application shell with a global render error
//! handler, and a development server that proxies the backend and serves
//! every other path through the router.

pub mod app;
pub mod client;
pub mod config;
pub mod dev_server;
pub mod lifecycle;
pub mod observability;
pub mod routing;

pub use app::AppShell;
pub use client::HttpClient;
pub use config::AppConfig;
pub use dev_server::DevServer;
pub use lifecycle::Shutdown;
pub use routing::Router;

//! Startup orchestration.
//!
//! # Responsibilities
//! - Bootstrap the application shell and mount it
//! - Bind the dev server listener
//! - Spawn the server task wired to the shutdown signal
//!
//! # Design Decisions
//! - Fail fast: any startup error is returned before traffic is accepted
//! - Subsystems initialize in order, not concurrently

use std::net::SocketAddr;

use tokio::task::JoinHandle;

use crate::app::AppShell;
use crate::config::AppConfig;
use crate::dev_server::{listener, DevServer, DevServerError};
use crate::lifecycle::Shutdown;

/// A started dev server.
pub struct Running {
    pub local_addr: SocketAddr,
    pub handle: JoinHandle<Result<(), DevServerError>>,
}

/// Bootstrap, mount at `/`, bind and start serving.
pub async fn launch(config: &AppConfig, shutdown: &Shutdown) -> Result<Running, DevServerError> {
    let mut shell = AppShell::bootstrap(config)?;
    let initial = shell
        .mount(&config.dev_server.mount_selector, "/")?
        .route
        .clone()
        .unwrap_or_else(|| "none".to_string());
    tracing::info!(
        selector = %config.dev_server.mount_selector,
        route = %initial,
        routes = shell.router().route_count(),
        base_url = %shell.client().config().base_url,
        "Shell ready"
    );

    let server = DevServer::new(&config.dev_server, shell)?;
    let listener = listener::bind(&config.dev_server).await?;
    let local_addr = listener.local_addr()?;

    let handle = tokio::spawn(server.run(listener, shutdown.subscribe()));
    Ok(Running { local_addr, handle })
}

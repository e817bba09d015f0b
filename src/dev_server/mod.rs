//! Development server subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → listener.rs (bind, walk to the next port unless strict)
//!     → server.rs (Axum setup, request id, trace, timeout)
//!     → proxy.rs (prefix match against the proxy table)
//!         ├─ WebSocket upgrade → websocket.rs (frame forwarding to backend)
//!         ├─ other request     → proxy.rs (HTTP forwarding to backend)
//!         └─ no prefix match   → page.rs (render the path through the shell)
//! ```
//!
//! # Design Decisions
//! - Proxy rules are checked in declaration order, first prefix wins
//! - Every unproxied path is a client-side route (history fallback)
//! - The shell is shared read-only; page renders never touch its history

pub mod error;
pub mod listener;
pub mod page;
pub mod proxy;
pub mod server;
pub mod websocket;

pub use error::DevServerError;
pub use server::DevServer;

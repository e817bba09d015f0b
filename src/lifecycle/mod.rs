//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (startup.rs):
//!     Config → Bootstrap shell → Mount → Bind listener → Spawn dev server
//!
//! Shutdown (shutdown.rs):
//!     Trigger → Stop accepting → Drain in-flight requests → Exit
//!
//! Signals (signals.rs):
//!     SIGTERM/SIGINT → Trigger graceful shutdown
//! ```
//!
//! # Design Decisions
//! - Ordered startup: shell first, listener last (traffic only when ready)
//! - Fail fast: any startup error is fatal
//! - One latched signal fans the shutdown out to every task

pub mod shutdown;
pub mod signals;
pub mod startup;

pub use shutdown::{Shutdown, ShutdownReason, ShutdownSignal};
pub use signals::wait_for_shutdown_signal;
pub use startup::{launch, Running};

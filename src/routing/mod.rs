//! Client-side routing subsystem.
//!
//! # Data Flow
//! ```text
//! Route table (at startup):
//!     RouteEntry[]
//!     → pattern.rs (compile "/stock/:code" into segments)
//!     → router.rs (reject duplicate paths / names, freeze)
//!
//! Location change:
//!     push / replace / back / forward
//!     → history.rs (update entry stack)
//!     → router.rs (re-resolve current location)
//!     → Location::Matched { view, params } | Location::NotFound
//! ```
//!
//! # Design Decisions
//! - Route table is immutable after construction
//! - Static segments match literally; `:name` captures one non-empty segment
//! - Resolution never fails loudly: unmatched paths are an explicit NotFound
//! - No guards; resolution is unconditional
//! - The router is generic over the view type so it stays a leaf module

pub mod history;
pub mod pattern;
pub mod router;

pub use history::{History, Navigation, NavigationKind};
pub use pattern::{PathPattern, RouteParams};
pub use router::{Location, RouteEntry, RouteError, RouteMatch, Router};

//! The application's route table.

use std::sync::Arc;

use crate::app::view::ViewRef;
use crate::app::views::{HomeView, StockDetailView};
use crate::routing::RouteEntry;

pub const HOME: &str = "Home";
pub const STOCK_DETAIL: &str = "StockDetail";

/// `/` → Home, `/stock/:code` → StockDetail.
pub fn stock_routes() -> Vec<RouteEntry<ViewRef>> {
    vec![
        RouteEntry::new("/", HOME, Arc::new(HomeView) as ViewRef),
        RouteEntry::new("/stock/:code", STOCK_DETAIL, Arc::new(StockDetailView) as ViewRef),
    ]
}

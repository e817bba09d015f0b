//! Route table, resolution and navigation.
//!
//! # Responsibilities
//! - Compile and validate route entries
//! - Resolve a path to its view and parameters, or NotFound
//! - Build paths from route names (named navigation)
//! - Re-resolve the current location on every history change
//!
//! # Design Decisions
//! - Immutable table after construction
//! - O(n) scan in registration order (route counts are tiny)
//! - Explicit NotFound rather than silent default

use std::collections::HashMap;

use thiserror::Error;

use crate::routing::history::{History, Navigation};
use crate::routing::pattern::{PathPattern, RouteParams};

/// Error type for router operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RouteError {
    #[error("Route not found: {0}")]
    NotFound(String),

    #[error("Invalid route pattern '{pattern}': {reason}")]
    InvalidPattern { pattern: String, reason: String },

    #[error("Duplicate route path: {0}")]
    DuplicatePath(String),

    #[error("Duplicate route name: {0}")]
    DuplicateName(String),

    #[error("Unknown route name: {0}")]
    UnknownRouteName(String),

    #[error("Missing parameter '{param}' for route '{route}'")]
    MissingParameter { route: String, param: String },
}

/// A path pattern bound to a named view.
#[derive(Debug, Clone)]
pub struct RouteEntry<V> {
    pub path: String,
    pub name: String,
    pub view: V,
}

impl<V> RouteEntry<V> {
    pub fn new(path: impl Into<String>, name: impl Into<String>, view: V) -> Self {
        Self {
            path: path.into(),
            name: name.into(),
            view,
        }
    }
}

/// A resolved route with extracted parameters.
#[derive(Debug, Clone)]
pub struct RouteMatch<V> {
    /// Route name, e.g. `StockDetail`.
    pub name: String,
    /// The pattern that matched, e.g. `/stock/:code`.
    pub pattern: String,
    /// The concrete path that was resolved.
    pub path: String,
    pub params: RouteParams,
    pub view: V,
}

/// Where the router currently points.
#[derive(Debug, Clone)]
pub enum Location<V> {
    Matched(RouteMatch<V>),
    NotFound(String),
}

impl<V> Location<V> {
    pub fn path(&self) -> &str {
        match self {
            Location::Matched(m) => &m.path,
            Location::NotFound(path) => path,
        }
    }

    pub fn route_name(&self) -> Option<&str> {
        match self {
            Location::Matched(m) => Some(&m.name),
            Location::NotFound(_) => None,
        }
    }
}

#[derive(Debug, Clone)]
struct CompiledRoute<V> {
    pattern: PathPattern,
    name: String,
    view: V,
}

/// The route table plus the history it follows.
#[derive(Debug, Clone)]
pub struct Router<V> {
    routes: Vec<CompiledRoute<V>>,
    by_name: HashMap<String, usize>,
    history: History,
    current: Location<V>,
}

impl<V: Clone> Router<V> {
    /// Build the route table. The history starts at `/`.
    pub fn new(entries: Vec<RouteEntry<V>>) -> Result<Self, RouteError> {
        let mut routes: Vec<CompiledRoute<V>> = Vec::with_capacity(entries.len());
        let mut by_name = HashMap::new();

        for entry in entries {
            let pattern = PathPattern::parse(&entry.path)?;
            if routes.iter().any(|r| r.pattern.same_shape(&pattern)) {
                return Err(RouteError::DuplicatePath(entry.path));
            }
            if by_name.contains_key(&entry.name) {
                return Err(RouteError::DuplicateName(entry.name));
            }
            by_name.insert(entry.name.clone(), routes.len());
            routes.push(CompiledRoute {
                pattern,
                name: entry.name,
                view: entry.view,
            });
        }

        let history = History::new("/");
        let mut router = Self {
            routes,
            by_name,
            history,
            current: Location::NotFound("/".to_string()),
        };
        router.sync();
        Ok(router)
    }

    /// Resolve a path against the table.
    pub fn resolve(&self, path: &str) -> Result<RouteMatch<V>, RouteError> {
        self.routes
            .iter()
            .find_map(|route| {
                route.pattern.matches(path).map(|params| RouteMatch {
                    name: route.name.clone(),
                    pattern: route.pattern.as_str().to_string(),
                    path: path.to_string(),
                    params,
                    view: route.view.clone(),
                })
            })
            .ok_or_else(|| RouteError::NotFound(path.to_string()))
    }

    /// Build a path for a named route.
    pub fn reverse(&self, name: &str, params: &[(&str, &str)]) -> Result<String, RouteError> {
        let index = self
            .by_name
            .get(name)
            .ok_or_else(|| RouteError::UnknownRouteName(name.to_string()))?;
        let params: RouteParams = params
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();

        self.routes[*index]
            .pattern
            .reverse(&params)
            .map_err(|param| RouteError::MissingParameter {
                route: name.to_string(),
                param,
            })
    }

    pub fn current(&self) -> &Location<V> {
        &self.current
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn route_count(&self) -> usize {
        self.routes.len()
    }

    pub fn has_route(&self, name: &str) -> bool {
        self.by_name.contains_key(name)
    }

    /// Registered `(name, pattern)` pairs in registration order.
    pub fn routes(&self) -> impl Iterator<Item = (&str, &str)> {
        self.routes
            .iter()
            .map(|r| (r.name.as_str(), r.pattern.as_str()))
    }

    pub fn push(&mut self, path: &str) -> Navigation {
        let navigation = self.history.push(path);
        self.sync();
        navigation
    }

    pub fn replace(&mut self, path: &str) -> Navigation {
        let navigation = self.history.replace(path);
        self.sync();
        navigation
    }

    pub fn back(&mut self) -> Option<Navigation> {
        self.go(-1)
    }

    pub fn forward(&mut self) -> Option<Navigation> {
        self.go(1)
    }

    /// Move through history. Out-of-range moves change nothing.
    pub fn go(&mut self, delta: isize) -> Option<Navigation> {
        let navigation = self.history.go(delta)?;
        self.sync();
        Some(navigation)
    }

    fn sync(&mut self) {
        let path = self.history.location().to_string();
        self.current = match self.resolve(&path) {
            Ok(matched) => {
                tracing::debug!(path = %path, route = %matched.name, "Route resolved");
                Location::Matched(matched)
            }
            Err(_) => {
                tracing::warn!(path = %path, "No route matched");
                Location::NotFound(path)
            }
        };
    }
}

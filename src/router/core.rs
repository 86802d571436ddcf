//! Route table - the only shared mutable state in the router.
//!
//! Buckets are keyed by uppercase method and hold routes in registration
//! order. A `std::sync::RwLock` guards the map: `register`/`reset` take it
//! exclusively, lookups take it shared. Dispatch holds the shared lock only
//! while scanning its bucket and cloning the winning `Arc<Route>`; middleware
//! and actions run after the guard is dropped.

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use http::Method;
use tracing::{debug, info, warn};

use super::params::RouteParams;
use super::pattern::{PathPattern, PatternError};
use super::route::{Action, Route};
use crate::dispatcher::RequestContext;
use crate::middleware::{Middleware, MiddlewareChain};

/// A route selected for a concrete path, with the parameters it captured.
#[derive(Debug, Clone)]
pub struct RouteMatch {
    /// Snapshot of the matched route; stays valid even if the table is
    /// reset while the dispatch is still running.
    pub route: Arc<Route>,
    pub params: RouteParams,
}

type Buckets = HashMap<String, Vec<Arc<Route>>>;

/// Method-keyed, order-preserving collection of routes.
#[derive(Default)]
pub struct RouteTable {
    buckets: RwLock<Buckets>,
}

impl RouteTable {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    // Route data is only ever appended or cleared whole, so a writer that
    // panicked cannot leave a bucket half-built; recover the guard.
    fn read(&self) -> RwLockReadGuard<'_, Buckets> {
        self.buckets.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Buckets> {
        self.buckets.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Register a closure action for every method in `methods` (`"GET|PUT"`).
    ///
    /// A malformed pattern is logged and installed as a route that never
    /// matches; use [`try_register`](Self::try_register) to reject it instead.
    pub fn register<F>(
        &self,
        methods: &str,
        pattern: &str,
        middleware: Vec<Arc<dyn Middleware>>,
        action: F,
    ) -> Arc<Route>
    where
        F: Fn(&mut RequestContext<'_>) + Send + Sync + 'static,
    {
        self.register_action(methods, pattern, middleware, Arc::new(action))
    }

    /// Same as [`register`](Self::register) for an already shared action.
    pub fn register_action(
        &self,
        methods: &str,
        pattern: &str,
        middleware: Vec<Arc<dyn Middleware>>,
        action: Arc<dyn Action>,
    ) -> Arc<Route> {
        let compiled = PathPattern::parse_lenient(pattern);
        if let Some(err) = compiled.rejection() {
            warn!(
                methods = %methods,
                pattern = %pattern,
                error = %err,
                "Malformed route pattern registered; it will never match"
            );
        }
        let route = Arc::new(Route::new(compiled, MiddlewareChain::new(middleware), action));
        self.insert(methods, Arc::clone(&route));
        route
    }

    /// Register a route, rejecting a malformed pattern.
    ///
    /// # Errors
    ///
    /// Returns the [`PatternError`] describing why the pattern is malformed;
    /// nothing is inserted in that case.
    pub fn try_register<F>(
        &self,
        methods: &str,
        pattern: &str,
        middleware: Vec<Arc<dyn Middleware>>,
        action: F,
    ) -> Result<Arc<Route>, PatternError>
    where
        F: Fn(&mut RequestContext<'_>) + Send + Sync + 'static,
    {
        let compiled = PathPattern::parse(pattern)?;
        let route = Arc::new(Route::new(
            compiled,
            MiddlewareChain::new(middleware),
            Arc::new(action),
        ));
        self.insert(methods, Arc::clone(&route));
        Ok(route)
    }

    /// Append `route` to the bucket of every method in `methods`.
    ///
    /// Returns the number of buckets the route was added to.
    pub fn insert(&self, methods: &str, route: Arc<Route>) -> usize {
        let methods = normalize_methods(methods);
        if methods.is_empty() {
            warn!(
                pattern = %route.pattern(),
                "Route registered without any valid method; ignored"
            );
            return 0;
        }

        let mut buckets = self.write();
        for method in &methods {
            buckets
                .entry(method.clone())
                .or_default()
                .push(Arc::clone(&route));
        }
        drop(buckets);

        info!(
            methods = ?methods,
            pattern = %route.pattern(),
            middleware = route.middleware().len(),
            "Route registered"
        );
        methods.len()
    }

    /// Snapshot of the routes registered for `method`, in registration order.
    ///
    /// `None` and an empty vector mean the same thing to callers.
    #[must_use]
    pub fn lookup(&self, method: &str) -> Option<Vec<Arc<Route>>> {
        let method = method.trim().to_ascii_uppercase();
        self.read().get(&method).cloned()
    }

    /// First route for `method` whose pattern matches `path`.
    ///
    /// `method` must already be uppercase.
    #[must_use]
    pub fn find(&self, method: &str, path: &str) -> Option<RouteMatch> {
        let buckets = self.read();
        let Some(bucket) = buckets.get(method).filter(|b| !b.is_empty()) else {
            debug!(method = %method, path = %path, "No routes registered for method");
            return None;
        };

        for route in bucket {
            if let Some(params) = route.pattern().match_path(path) {
                return Some(RouteMatch {
                    route: Arc::clone(route),
                    params,
                });
            }
        }

        debug!(
            method = %method,
            path = %path,
            candidates = bucket.len(),
            "No route pattern matched path"
        );
        None
    }

    /// Remove every route.
    ///
    /// Dispatches that already selected a route keep running with it.
    pub fn reset(&self) {
        let mut buckets = self.write();
        let removed: usize = buckets.values().map(Vec::len).sum();
        buckets.clear();
        drop(buckets);
        info!(removed, "Route table reset");
    }

    /// Number of (method, route) entries across all buckets.
    #[must_use]
    pub fn len(&self) -> usize {
        self.read().values().map(Vec::len).sum()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Methods that have a bucket, sorted.
    #[must_use]
    pub fn methods(&self) -> Vec<String> {
        let mut methods: Vec<String> = self.read().keys().cloned().collect();
        methods.sort();
        methods
    }

    /// `(method, pattern)` pairs in bucket order, methods sorted.
    #[must_use]
    pub fn describe(&self) -> Vec<(String, String)> {
        let buckets = self.read();
        let mut methods: Vec<&String> = buckets.keys().collect();
        methods.sort();
        methods
            .into_iter()
            .flat_map(|m| {
                buckets[m]
                    .iter()
                    .map(move |r| (m.clone(), r.pattern().as_str().to_string()))
            })
            .collect()
    }
}

/// Split a `|`-separated method list, uppercase it and drop invalid tokens.
///
/// Whitespace around tokens is ignored and empty tokens are skipped, so
/// `"get| put|"` yields `["GET", "PUT"]`. Duplicates are kept once.
#[must_use]
pub fn normalize_methods(methods: &str) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for token in methods.split('|') {
        let token = token.trim();
        if token.is_empty() {
            continue;
        }
        let upper = token.to_ascii_uppercase();
        if Method::from_bytes(upper.as_bytes()).is_err() {
            warn!(method = %token, "Invalid method token in route registration; skipped");
            continue;
        }
        if !out.contains(&upper) {
            out.push(upper);
        }
    }
    out
}

//! Dispatcher core - resolves one request to one outcome.
//!
//! ```text
//! Start → MethodLookup ─┬─ NoBucket ───────────────────────────→ Unmatched
//!                       └─ PathScan ─┬─ NoPatternMatch ────────→ Unmatched
//!                                    └─ MiddlewareEval ─┬─ Deny → Denied(status)
//!                                                       └─ Allow → ActionRun → Executed
//! ```
//!
//! One dispatch is one pass; there are no retries and no fallback to later
//! routes once a pattern has matched.

use std::sync::Arc;
use std::time::{Duration, Instant};

use tracing::{debug, info, info_span, warn};

use super::context::RequestContext;
use super::metrics::DispatchMetrics;
use super::query::QueryParams;
use super::response::ResponseSink;
use super::state::RequestState;
use crate::config::RouterConfig;
use crate::ids::DispatchId;
use crate::middleware::{Decision, Middleware};
use crate::router::{Action, PatternError, Route, RouteMatch, RouteTable};

/// Default threshold above which a dispatch is logged as slow.
pub const DEFAULT_SLOW_DISPATCH: Duration = Duration::from_millis(1);

/// Result of a dispatch.
///
/// "Nothing matched" and "matched but denied" are kept apart so the
/// boundary layer can choose between a not-found and an access-denied
/// response without the router knowing about either.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// No bucket for the method, or no pattern in it matched the path.
    Unmatched,
    /// A route matched but a middleware step denied it.
    Denied { status: u16 },
    /// A route matched, every middleware step allowed, the action ran.
    Executed,
}

impl DispatchOutcome {
    /// `(matched, deny_status, denied)`:
    /// `(false, 0, false)`, `(false, status, true)` or `(true, 0, false)`.
    #[must_use]
    pub fn into_parts(self) -> (bool, u16, bool) {
        match self {
            DispatchOutcome::Unmatched => (false, 0, false),
            DispatchOutcome::Denied { status } => (false, status, true),
            DispatchOutcome::Executed => (true, 0, false),
        }
    }

    #[must_use]
    pub fn is_executed(self) -> bool {
        self == DispatchOutcome::Executed
    }
}

/// Owns a [`RouteTable`] and dispatches requests against it.
///
/// Share it across request-processing threads with `Arc<Dispatcher>`; every
/// method takes `&self`.
pub struct Dispatcher {
    routes: RouteTable,
    metrics: DispatchMetrics,
    slow_threshold: Duration,
}

impl Default for Dispatcher {
    fn default() -> Self {
        Self::new()
    }
}

impl Dispatcher {
    /// Create a dispatcher with an empty route table.
    #[must_use]
    pub fn new() -> Self {
        Self {
            routes: RouteTable::new(),
            metrics: DispatchMetrics::new(),
            slow_threshold: DEFAULT_SLOW_DISPATCH,
        }
    }

    #[must_use]
    pub fn with_config(config: &RouterConfig) -> Self {
        Self {
            slow_threshold: config.slow_dispatch_threshold(),
            ..Self::new()
        }
    }

    #[must_use]
    pub fn routes(&self) -> &RouteTable {
        &self.routes
    }

    #[must_use]
    pub fn metrics(&self) -> &DispatchMetrics {
        &self.metrics
    }

    /// See [`RouteTable::register`].
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
        self.routes.register(methods, pattern, middleware, action)
    }

    /// See [`RouteTable::register_action`].
    pub fn register_action(
        &self,
        methods: &str,
        pattern: &str,
        middleware: Vec<Arc<dyn Middleware>>,
        action: Arc<dyn Action>,
    ) -> Arc<Route> {
        self.routes
            .register_action(methods, pattern, middleware, action)
    }

    /// See [`RouteTable::try_register`].
    ///
    /// # Errors
    ///
    /// Returns the [`PatternError`] for a malformed pattern.
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
        self.routes.try_register(methods, pattern, middleware, action)
    }

    /// Clear every route. In-flight dispatches keep the route they selected.
    pub fn reset(&self) {
        self.routes.reset();
    }

    /// Dispatch one request with a freshly generated [`DispatchId`].
    pub fn dispatch(
        &self,
        method: &str,
        path: &str,
        raw_query: &str,
        body: &[u8],
        response: &mut dyn ResponseSink,
    ) -> DispatchOutcome {
        self.dispatch_with_id(DispatchId::new(), method, path, raw_query, body, response)
    }

    /// Dispatch one request under the given id.
    pub fn dispatch_with_id(
        &self,
        dispatch_id: DispatchId,
        method: &str,
        path: &str,
        raw_query: &str,
        body: &[u8],
        response: &mut dyn ResponseSink,
    ) -> DispatchOutcome {
        let method = method.trim().to_ascii_uppercase();
        let span = info_span!("dispatch", %dispatch_id, method = %method, path = %path);
        let _entered = span.enter();
        let start = Instant::now();

        // The read guard lives only inside `find`; the Arc<Route> it hands
        // back is a snapshot that a concurrent reset cannot invalidate.
        let Some(RouteMatch { route, params }) = self.routes.find(&method, path) else {
            let elapsed = start.elapsed();
            self.metrics.record_unmatched(elapsed);
            debug!(duration_us = elapsed.as_micros(), "No route matched");
            return DispatchOutcome::Unmatched;
        };

        let mut ctx = RequestContext {
            dispatch_id,
            method: &method,
            path,
            pattern: route.pattern().raw(),
            route_params: params,
            query: QueryParams::parse(raw_query),
            state: RequestState::new(),
            body,
            response,
        };

        if let Decision::Deny(status) = route.middleware().evaluate(&mut ctx) {
            let elapsed = start.elapsed();
            self.metrics.record_denied(elapsed);
            info!(
                pattern = %route.pattern(),
                status,
                duration_us = elapsed.as_micros(),
                "Route denied by middleware"
            );
            return DispatchOutcome::Denied { status };
        }

        route.action().call(&mut ctx);

        let elapsed = start.elapsed();
        self.metrics.record_executed(elapsed);
        if elapsed > self.slow_threshold {
            warn!(
                pattern = %route.pattern(),
                route_params = ?ctx.route_params,
                duration_us = elapsed.as_micros(),
                threshold_us = self.slow_threshold.as_micros(),
                "Slow dispatch detected"
            );
        } else {
            info!(
                pattern = %route.pattern(),
                route_params = ?ctx.route_params,
                duration_us = elapsed.as_micros(),
                "Route executed"
            );
        }
        DispatchOutcome::Executed
    }
}

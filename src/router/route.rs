use std::fmt;
use std::sync::Arc;

use super::pattern::PathPattern;
use crate::dispatcher::RequestContext;
use crate::middleware::MiddlewareChain;

/// The handler invoked once a route matched and its middleware allowed.
///
/// Actions write their output through [`RequestContext::response`].
pub trait Action: Send + Sync {
    fn call(&self, ctx: &mut RequestContext<'_>);
}

impl<F> Action for F
where
    F: Fn(&mut RequestContext<'_>) + Send + Sync,
{
    fn call(&self, ctx: &mut RequestContext<'_>) {
        self(ctx)
    }
}

/// One registration: pattern, middleware chain and action.
///
/// Immutable after registration. A route registered for several methods is
/// a single `Arc<Route>` listed in each method bucket.
pub struct Route {
    pattern: PathPattern,
    middleware: MiddlewareChain,
    action: Arc<dyn Action>,
}

impl Route {
    #[must_use]
    pub fn new(pattern: PathPattern, middleware: MiddlewareChain, action: Arc<dyn Action>) -> Self {
        Self {
            pattern,
            middleware,
            action,
        }
    }

    #[must_use]
    pub fn pattern(&self) -> &PathPattern {
        &self.pattern
    }

    #[must_use]
    pub fn middleware(&self) -> &MiddlewareChain {
        &self.middleware
    }

    #[must_use]
    pub fn action(&self) -> &Arc<dyn Action> {
        &self.action
    }
}

impl fmt::Debug for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Route")
            .field("pattern", &self.pattern.as_str())
            .field("middleware", &self.middleware)
            .finish_non_exhaustive()
    }
}

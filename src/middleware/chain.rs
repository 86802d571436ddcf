use std::fmt;
use std::sync::Arc;

use tracing::debug;

use super::core::{Decision, Middleware};
use crate::dispatcher::RequestContext;

/// Ordered, short-circuiting list of middleware attached to one route.
#[derive(Clone, Default)]
pub struct MiddlewareChain {
    steps: Vec<Arc<dyn Middleware>>,
}

impl MiddlewareChain {
    #[must_use]
    pub fn new(steps: Vec<Arc<dyn Middleware>>) -> Self {
        Self { steps }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Run every step in order until one denies.
    ///
    /// An empty chain allows.
    pub fn evaluate(&self, ctx: &mut RequestContext<'_>) -> Decision {
        for (index, step) in self.steps.iter().enumerate() {
            if let Decision::Deny(status) = step.check(ctx) {
                debug!(
                    dispatch_id = %ctx.dispatch_id,
                    step = index,
                    middleware = step.name(),
                    status,
                    "Middleware denied request"
                );
                return Decision::Deny(status);
            }
        }
        Decision::Allow
    }
}

impl From<Vec<Arc<dyn Middleware>>> for MiddlewareChain {
    fn from(steps: Vec<Arc<dyn Middleware>>) -> Self {
        Self::new(steps)
    }
}

impl fmt::Debug for MiddlewareChain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.steps.iter().map(|s| s.name()))
            .finish()
    }
}

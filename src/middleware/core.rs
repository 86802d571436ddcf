use std::sync::Arc;

use crate::dispatcher::RequestContext;

/// Verdict of one middleware step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    /// Continue with the next step, or the action if this was the last.
    Allow,
    /// Stop the chain; the action does not run and the status code is
    /// surfaced to the caller.
    Deny(u16),
}

impl Decision {
    #[must_use]
    pub fn is_allowed(self) -> bool {
        matches!(self, Decision::Allow)
    }

    /// `(allow, deny_status)`, with a status of `0` when allowed.
    #[must_use]
    pub fn into_parts(self) -> (bool, u16) {
        match self {
            Decision::Allow => (true, 0),
            Decision::Deny(status) => (false, status),
        }
    }
}

impl From<(bool, u16)> for Decision {
    fn from((allow, status): (bool, u16)) -> Self {
        if allow {
            Decision::Allow
        } else {
            Decision::Deny(status)
        }
    }
}

/// An access-control step attached to a route.
///
/// Steps run in registration order. A step may write to
/// [`RequestContext::state`] before allowing; later steps and the action see
/// the write.
pub trait Middleware: Send + Sync {
    fn check(&self, ctx: &mut RequestContext<'_>) -> Decision;

    /// Name used in trace output when this step denies a request.
    fn name(&self) -> &str {
        std::any::type_name::<Self>()
    }
}

impl<F> Middleware for F
where
    F: Fn(&mut RequestContext<'_>) -> Decision + Send + Sync,
{
    fn check(&self, ctx: &mut RequestContext<'_>) -> Decision {
        self(ctx)
    }
}

/// Wrap a closure as a shareable middleware step.
///
/// Spelling the bound out here lets the closure's argument type be inferred.
pub fn from_fn<F>(f: F) -> Arc<dyn Middleware>
where
    F: Fn(&mut RequestContext<'_>) -> Decision + Send + Sync + 'static,
{
    Arc::new(f)
}

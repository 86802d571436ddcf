use tracing::info;

use super::{Decision, Middleware};
use crate::dispatcher::RequestContext;

/// Records one trace event per request that reaches it. Never denies.
pub struct TracingMiddleware;

impl Middleware for TracingMiddleware {
    fn check(&self, ctx: &mut RequestContext<'_>) -> Decision {
        info!(
            dispatch_id = %ctx.dispatch_id,
            method = %ctx.method,
            path = %ctx.path,
            pattern = %ctx.pattern,
            route_params = ?ctx.route_params,
            query_keys = ctx.query.len(),
            body_len = ctx.body.len(),
            "Request reached route"
        );
        Decision::Allow
    }

    fn name(&self) -> &str {
        "tracing"
    }
}

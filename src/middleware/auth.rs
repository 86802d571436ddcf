use super::{Decision, Middleware};
use crate::dispatcher::RequestContext;

/// Shared-secret check against a query parameter.
///
/// Denies with `401` when the parameter is missing or does not equal the
/// configured token. On success the parameter name is recorded in the
/// request state under `"auth.via"` so later steps can tell how the request
/// was admitted.
pub struct QueryTokenMiddleware {
    param: String,
    token: String,
}

impl QueryTokenMiddleware {
    #[must_use]
    pub fn new(param: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            param: param.into(),
            token: token.into(),
        }
    }
}

impl Middleware for QueryTokenMiddleware {
    fn check(&self, ctx: &mut RequestContext<'_>) -> Decision {
        match ctx.query.get(&self.param) {
            Some(t) if t == self.token => {
                ctx.state.set("auth.via", self.param.as_str());
                Decision::Allow
            }
            _ => Decision::Deny(401),
        }
    }

    fn name(&self) -> &str {
        "query_token"
    }
}

/// Denies unless an earlier step stored `key` in the request state.
///
/// Useful for splitting authentication (sets the key) from authorization
/// (requires it) across two steps.
pub struct RequireStateMiddleware {
    key: String,
    status: u16,
}

impl RequireStateMiddleware {
    #[must_use]
    pub fn new(key: impl Into<String>, status: u16) -> Self {
        Self {
            key: key.into(),
            status,
        }
    }
}

impl Middleware for RequireStateMiddleware {
    fn check(&self, ctx: &mut RequestContext<'_>) -> Decision {
        if ctx.state.contains(&self.key) {
            Decision::Allow
        } else {
            Decision::Deny(self.status)
        }
    }

    fn name(&self) -> &str {
        "require_state"
    }
}

//! # Middleware Module
//!
//! Access-control steps attached to individual routes.
//!
//! Each step inspects the [`RequestContext`](crate::dispatcher::RequestContext)
//! and returns a [`Decision`]. The steps of a route form a
//! [`MiddlewareChain`]: evaluated in registration order, stopping at the
//! first [`Decision::Deny`]. Any closure of the right shape is a middleware:
//!
//! ```rust
//! use routegate::dispatcher::RequestContext;
//! use routegate::middleware::Decision;
//!
//! let admin_only = |ctx: &mut RequestContext<'_>| {
//!     if ctx.state.get_str("role") == Some("admin") {
//!         Decision::Allow
//!     } else {
//!         Decision::Deny(403)
//!     }
//! };
//! # let _ = admin_only;
//! ```

mod auth;
mod chain;
mod core;
mod tracing;

pub use auth::{QueryTokenMiddleware, RequireStateMiddleware};
pub use chain::MiddlewareChain;
pub use self::core::{from_fn, Decision, Middleware};
pub use self::tracing::TracingMiddleware;

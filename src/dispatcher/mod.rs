//! # Dispatcher Module
//!
//! Ties the route table to the middleware chain and the action.
//!
//! ## Request Flow
//!
//! 1. The method is uppercased and its bucket looked up
//! 2. Routes in the bucket are tried in registration order; the first whose
//!    pattern matches wins
//! 3. A fresh [`RequestContext`] is built: route params, parsed query, an
//!    empty [`RequestState`], the body and the response sink
//! 4. The route's middleware run in order; the first denial ends the dispatch
//! 5. Otherwise the action runs
//!
//! ## Outcomes
//!
//! [`Dispatcher::dispatch`] returns a [`DispatchOutcome`]; nothing in this
//! path is an error. Rendering a 404 for [`DispatchOutcome::Unmatched`] or an
//! access-denied body for [`DispatchOutcome::Denied`] is the caller's job
//! (see [`Server`](crate::server::Server)).
//!
//! ## Example
//!
//! ```rust
//! use std::sync::Arc;
//! use routegate::dispatcher::{BufferedResponse, DispatchOutcome, Dispatcher, RequestContext};
//! use routegate::middleware::{self, Decision};
//!
//! let dispatcher = Dispatcher::new();
//! dispatcher.register(
//!     "GET",
//!     "/x",
//!     vec![
//!         middleware::from_fn(|ctx| {
//!             ctx.state.set("foo", "bar");
//!             Decision::Allow
//!         }),
//!         middleware::from_fn(|_ctx| Decision::Deny(401)),
//!     ],
//!     |ctx: &mut RequestContext<'_>| ctx.write("never"),
//! );
//!
//! let mut response = BufferedResponse::new();
//! let outcome = dispatcher.dispatch("get", "/x", "", b"", &mut response);
//! assert_eq!(outcome, DispatchOutcome::Denied { status: 401 });
//! assert!(response.body.is_empty());
//! ```
//!
//! ## Concurrency
//!
//! The route table lock is held only while the bucket is scanned. Middleware
//! and actions run unlocked, so a slow action never blocks registration or
//! other dispatches.

mod context;
mod core;
mod metrics;
mod query;
mod response;
mod state;

pub use self::core::{DispatchOutcome, Dispatcher, DEFAULT_SLOW_DISPATCH};
pub use context::RequestContext;
pub use metrics::{DispatchMetrics, MetricsSnapshot};
pub use query::QueryParams;
pub use response::{BufferedResponse, HeaderVec, ResponseSink, MAX_INLINE_HEADERS};
pub use state::RequestState;

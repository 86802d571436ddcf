//! # routegate
//!
//! **routegate** is an in-process HTTP request router: a method-keyed route
//! table, a segment-based path matcher with named wildcards and a trailing
//! catch-all, and a per-route middleware chain that can deny a request
//! before its action runs.
//!
//! ## Overview
//!
//! Routes are registered at runtime from any thread. A dispatch picks the
//! first route (in registration order) whose pattern matches the request
//! path, runs the route's middleware with a fresh per-request state, and
//! then runs the action. Nothing here listens on a socket: a transport
//! adapter builds a [`server::RawRequest`] and hands it to
//! [`server::Server::handle`].
//!
//! ## Architecture
//!
//! - **[`router`]** - Path patterns, captured parameters and the route table
//! - **[`dispatcher`]** - Request context, per-request state, query parsing,
//!   dispatch outcomes and metrics
//! - **[`middleware`]** - The middleware trait, chains and built-in steps
//! - **[`server`]** - Boundary adapter rendering 404 and access-denied bodies
//! - **[`manifest`]** - TOML route manifests for the CLI
//! - **[`config`]** - Router settings from TOML and environment
//! - **[`logging`]** - `tracing` subscriber setup
//! - **[`ids`]** - ULID dispatch identifiers
//! - **[`cli`]** - The `routegate` command line
//!
//! ### Dispatch Flow
//!
//! ```mermaid
//! sequenceDiagram
//!     participant T as Transport
//!     participant S as Server
//!     participant D as Dispatcher
//!     participant R as RouteTable
//!     participant M as MiddlewareChain
//!     participant A as Action
//!
//!     T->>S: RawRequest
//!     S->>D: dispatch_with_id(id, method, path, query, body)
//!     D->>R: find(METHOD, path)
//!     R-->>D: Arc<Route> + RouteParams
//!     D->>M: evaluate(&mut ctx)
//!     alt denied
//!         M-->>D: Deny(status)
//!         D-->>S: Denied { status }
//!         S-->>T: status + "Access denied"
//!     else allowed
//!         D->>A: call(&mut ctx)
//!         A-->>D: response written
//!         D-->>S: Executed
//!         S-->>T: response
//!     end
//! ```
//!
//! ## Quick Start
//!
//! ```rust
//! use routegate::dispatcher::RequestContext;
//! use routegate::server::{RawRequest, Server};
//!
//! let server = Server::new();
//! server.register_route("GET", "/users/{id}", vec![], |ctx: &mut RequestContext<'_>| {
//!     let id = ctx.param("id").unwrap_or_default().to_string();
//!     ctx.write(format!("user {id}"));
//! });
//!
//! let response = server.handle(&RawRequest::from_target("GET", "/users/7", Vec::new()));
//! assert_eq!(response.status, 200);
//! assert_eq!(response.body_string(), "user 7");
//!
//! let response = server.handle(&RawRequest::from_target("GET", "/users", Vec::new()));
//! assert_eq!(response.status, 404);
//! ```

pub mod cli;
pub mod config;
pub mod dispatcher;
pub mod ids;
pub mod logging;
pub mod manifest;
pub mod middleware;
pub mod router;
pub mod server;

pub use config::RouterConfig;
pub use dispatcher::{DispatchOutcome, Dispatcher, RequestContext};
pub use middleware::{Decision, Middleware};
pub use router::{match_path, RouteParams, RouteTable};
pub use server::{RawRequest, Server};

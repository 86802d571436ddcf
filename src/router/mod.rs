//! # Router Module
//!
//! Path patterns, the route table and path matching.
//!
//! ## Overview
//!
//! The router is responsible for:
//! - Parsing registered patterns once into tagged segments
//! - Keeping routes per method, in registration order
//! - Finding the first route whose pattern matches a concrete path
//! - Extracting wildcard and catch-all parameters
//!
//! ## Matching rules
//!
//! Patterns and paths are split on `/` and compared segment by segment.
//! Literal segments compare verbatim, `{name}` segments capture one
//! non-empty segment, and a trailing `:` captures the rest of the path under
//! [`CATCH_ALL_KEY`]. Within a method, the first registered route that
//! matches wins; there is no specificity ranking.
//!
//! ```rust
//! use routegate::dispatcher::RequestContext;
//! use routegate::router::RouteTable;
//!
//! let table = RouteTable::new();
//! table.register("GET|PUT", "/pets/{id}", vec![], |ctx: &mut RequestContext<'_>| {
//!     let id = ctx.param("id").unwrap_or_default().to_string();
//!     ctx.write(id);
//! });
//!
//! let m = table.find("PUT", "/pets/42").unwrap();
//! assert_eq!(m.params.get("id"), Some("42"));
//! assert!(table.find("GET", "/pets/").is_none());
//! ```
//!
//! ## Concurrency
//!
//! [`RouteTable`] can be shared across threads (`Arc<RouteTable>` or inside
//! an `Arc<Dispatcher>`). Registration and lookup may interleave freely;
//! lookups return `Arc` snapshots that outlive a concurrent
//! [`RouteTable::reset`].

mod core;
mod params;
mod pattern;
mod route;

pub use self::core::{normalize_methods, RouteMatch, RouteTable};
pub use params::{ParamVec, RouteParams, MAX_INLINE_PARAMS};
pub use pattern::{match_path, PathPattern, PatternError, Segment, CATCH_ALL_KEY, CATCH_ALL_MARKER};
pub use route::{Action, Route};

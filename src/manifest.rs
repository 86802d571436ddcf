//! # Route Manifest
//!
//! Declarative route list in TOML, used by the `routegate` CLI to try out a
//! routing table without writing Rust.
//!
//! ```toml
//! [[route]]
//! name = "get_pet"
//! methods = "GET|PUT"
//! pattern = "/pets/{id}"
//! middleware = [
//!     { kind = "query_token", param = "token", token = "s3cret" },
//!     { kind = "require_state", key = "auth.via", status = 403 },
//! ]
//!
//! [[route]]
//! name = "files"
//! methods = "GET"
//! pattern = "/files/:"
//! ```
//!
//! Every installed route gets an action that answers with a JSON description
//! of what was resolved: route name, pattern, captured params, query and
//! request state.

use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::dispatcher::{Dispatcher, RequestContext};
use crate::middleware::{
    self, Decision, Middleware, QueryTokenMiddleware, RequireStateMiddleware, TracingMiddleware,
};

/// One middleware step as written in a manifest.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MiddlewareEntry {
    Tracing,
    QueryToken { param: String, token: String },
    RequireState { key: String, status: u16 },
    SetState { key: String, value: String },
    Deny { status: u16 },
}

impl MiddlewareEntry {
    #[must_use]
    pub fn build(&self) -> Arc<dyn Middleware> {
        match self {
            MiddlewareEntry::Tracing => Arc::new(TracingMiddleware),
            MiddlewareEntry::QueryToken { param, token } => {
                Arc::new(QueryTokenMiddleware::new(param.as_str(), token.as_str()))
            }
            MiddlewareEntry::RequireState { key, status } => {
                Arc::new(RequireStateMiddleware::new(key.as_str(), *status))
            }
            MiddlewareEntry::SetState { key, value } => {
                let (key, value) = (key.clone(), value.clone());
                middleware::from_fn(move |ctx| {
                    ctx.state.set(key.as_str(), value.as_str());
                    Decision::Allow
                })
            }
            MiddlewareEntry::Deny { status } => {
                let status = *status;
                middleware::from_fn(move |_ctx| Decision::Deny(status))
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RouteEntry {
    pub name: String,
    /// `|`-separated method list
    pub methods: String,
    pub pattern: String,
    #[serde(default)]
    pub middleware: Vec<MiddlewareEntry>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct RouteManifest {
    #[serde(default, rename = "route")]
    pub routes: Vec<RouteEntry>,
}

impl RouteManifest {
    /// # Errors
    ///
    /// Fails if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read route manifest {}", path.display()))?;
        Self::from_toml(&raw)
            .with_context(|| format!("invalid route manifest {}", path.display()))
    }

    /// # Errors
    ///
    /// Fails if `raw` is not a valid manifest.
    pub fn from_toml(raw: &str) -> Result<Self> {
        toml::from_str(raw).context("failed to parse route manifest")
    }

    /// Register every route, in manifest order.
    ///
    /// Returns the number of routes installed.
    ///
    /// # Errors
    ///
    /// Stops at the first malformed pattern. Routes before it stay registered.
    pub fn install(&self, dispatcher: &Dispatcher) -> Result<usize> {
        for entry in &self.routes {
            let middleware = entry.middleware.iter().map(MiddlewareEntry::build).collect();
            let name = entry.name.clone();
            dispatcher
                .try_register(&entry.methods, &entry.pattern, middleware, move |ctx| {
                    describe_resolution(&name, ctx);
                })
                .with_context(|| format!("route `{}` has a malformed pattern", entry.name))?;
        }
        Ok(self.routes.len())
    }
}

fn describe_resolution(name: &str, ctx: &mut RequestContext<'_>) {
    let params = ctx.route_params.to_map();
    let query: BTreeMap<&str, &[String]> = ctx
        .query
        .keys()
        .map(|k| (k, ctx.query.get_all(k)))
        .collect();
    let state: BTreeMap<&str, &Value> = ctx.state.iter().collect();
    let body: Value = json!({
        "route": name,
        "pattern": ctx.pattern.as_ref(),
        "method": ctx.method,
        "path": ctx.path,
        "params": params,
        "query": query,
        "state": state,
        "body_len": ctx.body.len(),
    });
    ctx.write_json(200, &body);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dispatcher::{BufferedResponse, DispatchOutcome};

    const MANIFEST: &str = r#"
[[route]]
name = "get_pet"
methods = "get|put"
pattern = "/pets/{id}"

[[route]]
name = "secret"
methods = "GET"
pattern = "/secret"
middleware = [
    { kind = "query_token", param = "token", token = "s3cret" },
    { kind = "require_state", key = "auth.via", status = 403 },
]

[[route]]
name = "locked"
methods = "GET"
pattern = "/locked"
middleware = [{ kind = "set_state", key = "foo", value = "bar" }, { kind = "deny", status = 401 }]
"#;

    #[test]
    fn test_parse_manifest() {
        let manifest = RouteManifest::from_toml(MANIFEST).unwrap();
        assert_eq!(manifest.routes.len(), 3);
        assert_eq!(manifest.routes[1].middleware.len(), 2);
        assert_eq!(
            manifest.routes[2].middleware[1],
            MiddlewareEntry::Deny { status: 401 }
        );
    }

    #[test]
    fn test_install_and_resolve() {
        let dispatcher = Dispatcher::new();
        let installed = RouteManifest::from_toml(MANIFEST)
            .unwrap()
            .install(&dispatcher)
            .unwrap();
        assert_eq!(installed, 3);

        let mut resp = BufferedResponse::new();
        let outcome = dispatcher.dispatch("PUT", "/pets/7", "", b"", &mut resp);
        assert_eq!(outcome, DispatchOutcome::Executed);
        let body: Value = serde_json::from_slice(&resp.body).unwrap();
        assert_eq!(body["route"], "get_pet");
        assert_eq!(body["params"]["id"], "7");

        let mut resp = BufferedResponse::new();
        let outcome = dispatcher.dispatch("GET", "/secret", "token=s3cret", b"", &mut resp);
        assert_eq!(outcome, DispatchOutcome::Executed);

        let mut resp = BufferedResponse::new();
        let outcome = dispatcher.dispatch("GET", "/secret", "token=nope", b"", &mut resp);
        assert_eq!(outcome, DispatchOutcome::Denied { status: 401 });

        let mut resp = BufferedResponse::new();
        let outcome = dispatcher.dispatch("GET", "/locked", "", b"", &mut resp);
        assert_eq!(outcome.into_parts(), (false, 401, true));
    }

    #[test]
    fn test_malformed_pattern_rejected() {
        let manifest = RouteManifest::from_toml(
            "[[route]]\nname = \"bad\"\nmethods = \"GET\"\npattern = \"/a/:/b\"\n",
        )
        .unwrap();
        let err = manifest.install(&Dispatcher::new()).unwrap_err();
        assert!(format!("{err:#}").contains("route `bad` has a malformed pattern"));
    }

    #[test]
    fn test_unknown_middleware_kind_is_an_error() {
        let raw = "[[route]]\nname = \"x\"\nmethods = \"GET\"\npattern = \"/\"\nmiddleware = [{ kind = \"teleport\" }]\n";
        assert!(RouteManifest::from_toml(raw).is_err());
    }
}

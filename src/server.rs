//! # Boundary Server
//!
//! Turns a raw request into a dispatch and renders the outcome, the way a
//! transport adapter would. No sockets are involved: whatever accepts
//! connections and frames HTTP builds a [`RawRequest`], calls
//! [`Server::handle`] and writes the returned [`BufferedResponse`].
//!
//! | Outcome                         | Response                                                   |
//! |---------------------------------|------------------------------------------------------------|
//! | [`DispatchOutcome::Unmatched`]  | `404` `{"success": false, "message": "Could not find <path>"}` |
//! | [`DispatchOutcome::Denied`]     | deny status, `{"success": false, "message": "Access denied"}`  |
//! | [`DispatchOutcome::Executed`]   | whatever the action wrote                                  |

use std::sync::Arc;

use http::StatusCode;
use serde_json::json;
use tracing::debug;

use crate::config::RouterConfig;
use crate::dispatcher::{
    BufferedResponse, DispatchOutcome, Dispatcher, RequestContext, ResponseSink,
};
use crate::ids::DispatchId;
use crate::middleware::Middleware;
use crate::router::Route;

/// Request as handed over by the transport layer.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawRequest {
    pub method: String,
    pub path: String,
    /// Query string without the leading `?`
    pub query: String,
    pub body: Vec<u8>,
    /// Upstream correlation id (e.g. an `x-request-id` header), if any
    pub request_id: Option<String>,
}

impl RawRequest {
    /// Build a request from a request target such as `/all?foo=bar`.
    #[must_use]
    pub fn from_target(method: &str, target: &str, body: impl Into<Vec<u8>>) -> Self {
        let (path, query) = match target.split_once('?') {
            Some((path, query)) => (path, query),
            None => (target, ""),
        };
        Self {
            method: method.to_string(),
            path: path.to_string(),
            query: query.to_string(),
            body: body.into(),
            request_id: None,
        }
    }

    #[must_use]
    pub fn with_request_id(mut self, id: impl Into<String>) -> Self {
        self.request_id = Some(id.into());
        self
    }
}

/// Dispatcher plus outcome rendering.
#[derive(Clone)]
pub struct Server {
    dispatcher: Arc<Dispatcher>,
}

impl Default for Server {
    fn default() -> Self {
        Self::new()
    }
}

impl Server {
    #[must_use]
    pub fn new() -> Self {
        Self::from_dispatcher(Arc::new(Dispatcher::new()))
    }

    #[must_use]
    pub fn with_config(config: &RouterConfig) -> Self {
        Self::from_dispatcher(Arc::new(Dispatcher::with_config(config)))
    }

    #[must_use]
    pub fn from_dispatcher(dispatcher: Arc<Dispatcher>) -> Self {
        Self { dispatcher }
    }

    #[must_use]
    pub fn dispatcher(&self) -> &Arc<Dispatcher> {
        &self.dispatcher
    }

    /// See [`Dispatcher::register`].
    pub fn register_route<F>(
        &self,
        methods: &str,
        pattern: &str,
        middleware: Vec<Arc<dyn Middleware>>,
        action: F,
    ) -> Arc<Route>
    where
        F: Fn(&mut RequestContext<'_>) + Send + Sync + 'static,
    {
        self.dispatcher.register(methods, pattern, middleware, action)
    }

    /// Dispatch `request` and render the outcome.
    #[must_use]
    pub fn handle(&self, request: &RawRequest) -> BufferedResponse {
        let mut response = BufferedResponse::new();
        let dispatch_id = DispatchId::from_upstream_or_new(request.request_id.as_deref());
        let outcome = self.dispatcher.dispatch_with_id(
            dispatch_id,
            &request.method,
            &request.path,
            &request.query,
            &request.body,
            &mut response,
        );

        match outcome {
            DispatchOutcome::Executed => {}
            DispatchOutcome::Unmatched => {
                debug!(%dispatch_id, path = %request.path, "Rendering not found");
                response = render_envelope(
                    StatusCode::NOT_FOUND.as_u16(),
                    &format!("Could not find {}", request.path),
                );
            }
            DispatchOutcome::Denied { status } => {
                debug!(%dispatch_id, status, "Rendering access denied");
                response = render_envelope(status, "Access denied");
            }
        }
        response
    }
}

/// `{"success": false, "message": ...}` with the given status. Anything an
/// action or middleware already wrote is discarded.
fn render_envelope(status: u16, message: &str) -> BufferedResponse {
    let mut response = BufferedResponse::new();
    response.set_status(status);
    response.set_header("content-type", "application/json".to_string());
    let body = json!({ "success": false, "message": message });
    response.write(body.to_string().as_bytes());
    response
}

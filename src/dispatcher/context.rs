use std::sync::Arc;

use super::query::QueryParams;
use super::response::ResponseSink;
use super::state::RequestState;
use crate::ids::DispatchId;
use crate::router::RouteParams;

/// Everything a middleware step or an action sees about the request in
/// flight.
///
/// One context is built per matched dispatch and lives only as long as that
/// dispatch. Middleware receive it mutably so they can record state for the
/// steps after them.
pub struct RequestContext<'a> {
    /// Identifier of this dispatch, also recorded on its tracing span
    pub dispatch_id: DispatchId,
    /// Normalized (uppercase) method
    pub method: &'a str,
    /// Concrete request path
    pub path: &'a str,
    /// Pattern of the route that matched
    pub pattern: Arc<str>,
    /// Wildcard and catch-all captures
    pub route_params: RouteParams,
    pub query: QueryParams,
    pub state: RequestState,
    /// Raw request body
    pub body: &'a [u8],
    pub response: &'a mut dyn ResponseSink,
}

impl RequestContext<'_> {
    /// Shorthand for `route_params.get(name)`.
    #[inline]
    #[must_use]
    pub fn param(&self, name: &str) -> Option<&str> {
        self.route_params.get(name)
    }

    /// Shorthand for `route_params.catch_all()`.
    #[inline]
    #[must_use]
    pub fn catch_all(&self) -> Option<&str> {
        self.route_params.catch_all()
    }

    /// Body as UTF-8, if it is valid UTF-8.
    #[must_use]
    pub fn body_str(&self) -> Option<&str> {
        std::str::from_utf8(self.body).ok()
    }

    /// Append bytes to the response body.
    pub fn write(&mut self, bytes: impl AsRef<[u8]>) {
        self.response.write(bytes.as_ref());
    }

    /// Write a JSON body with the given status and content type.
    pub fn write_json(&mut self, status: u16, body: &serde_json::Value) {
        self.response.set_status(status);
        self.response
            .set_header("content-type", "application/json".to_string());
        self.response.write(body.to_string().as_bytes());
    }
}

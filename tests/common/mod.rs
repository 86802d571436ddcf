#![allow(dead_code)]

use routegate::dispatcher::{BufferedResponse, DispatchOutcome, Dispatcher, RequestContext};

/// Action that writes `name` so tests can tell which route ran.
pub fn named(name: &'static str) -> impl Fn(&mut RequestContext<'_>) + Send + Sync + 'static {
    move |ctx: &mut RequestContext<'_>| ctx.write(name)
}

/// Dispatch with an empty query and body, returning the outcome and the
/// response body as a string.
pub fn dispatch(dispatcher: &Dispatcher, method: &str, path: &str) -> (DispatchOutcome, String) {
    dispatch_with_query(dispatcher, method, path, "")
}

pub fn dispatch_with_query(
    dispatcher: &Dispatcher,
    method: &str,
    path: &str,
    query: &str,
) -> (DispatchOutcome, String) {
    let mut response = BufferedResponse::new();
    let outcome = dispatcher.dispatch(method, path, query, b"", &mut response);
    (outcome, response.body_string())
}

use std::sync::{Arc, Mutex};

use routegate::dispatcher::{DispatchOutcome, Dispatcher, RequestContext};
use routegate::middleware::{
    self, Decision, Middleware, MiddlewareChain, QueryTokenMiddleware, RequireStateMiddleware,
    TracingMiddleware,
};

mod common;
use common::{dispatch, dispatch_with_query, named};

/// Records its label into a shared log and returns a fixed decision.
struct Recorder {
    label: &'static str,
    log: Arc<Mutex<Vec<&'static str>>>,
    decision: Decision,
}

impl Middleware for Recorder {
    fn check(&self, _ctx: &mut RequestContext<'_>) -> Decision {
        self.log.lock().unwrap().push(self.label);
        self.decision
    }

    fn name(&self) -> &str {
        self.label
    }
}

fn recorder(
    label: &'static str,
    log: &Arc<Mutex<Vec<&'static str>>>,
    decision: Decision,
) -> Arc<dyn Middleware> {
    Arc::new(Recorder {
        label,
        log: Arc::clone(log),
        decision,
    })
}

#[test]
fn test_middleware_runs_in_order() {
    let log = Arc::new(Mutex::new(Vec::new()));
    let dispatcher = Dispatcher::new();
    let action_log = Arc::clone(&log);
    dispatcher.register(
        "GET",
        "/",
        vec![
            recorder("first", &log, Decision::Allow),
            recorder("second", &log, Decision::Allow),
            recorder("third", &log, Decision::Allow),
        ],
        move |_ctx: &mut RequestContext<'_>| action_log.lock().unwrap().push("action"),
    );

    let (outcome, _) = dispatch(&dispatcher, "GET", "/");
    assert_eq!(outcome, DispatchOutcome::Executed);
    assert_eq!(*log.lock().unwrap(), vec!["first", "second", "third", "action"]);
}

#[test]
fn test_first_denial_short_circuits() {
    let log = Arc::new(Mutex::new(Vec::new()));
    let dispatcher = Dispatcher::new();
    let action_log = Arc::clone(&log);
    dispatcher.register(
        "GET",
        "/",
        vec![
            recorder("first", &log, Decision::Allow),
            recorder("gate", &log, Decision::Deny(418)),
            recorder("never", &log, Decision::Allow),
        ],
        move |_ctx: &mut RequestContext<'_>| action_log.lock().unwrap().push("action"),
    );

    let (outcome, _) = dispatch(&dispatcher, "GET", "/");
    assert_eq!(outcome, DispatchOutcome::Denied { status: 418 });
    assert_eq!(*log.lock().unwrap(), vec!["first", "gate"]);
}

#[test]
fn test_state_flows_to_later_steps_and_action() {
    let dispatcher = Dispatcher::new();
    dispatcher.register(
        "GET",
        "/me",
        vec![
            middleware::from_fn(|ctx| {
                ctx.state.set("user", serde_json::json!({ "name": "ada", "admin": true }));
                Decision::Allow
            }),
            middleware::from_fn(|ctx| {
                let admin = ctx
                    .state
                    .get("user")
                    .and_then(|u| u["admin"].as_bool())
                    .unwrap_or(false);
                if admin {
                    ctx.state.set("role", "admin");
                    Decision::Allow
                } else {
                    Decision::Deny(403)
                }
            }),
        ],
        |ctx: &mut RequestContext<'_>| {
            let role = ctx.state.get_str("role").unwrap_or("none").to_string();
            ctx.write(role);
        },
    );

    let (outcome, body) = dispatch(&dispatcher, "GET", "/me");
    assert_eq!(outcome, DispatchOutcome::Executed);
    assert_eq!(body, "admin");
}

#[test]
fn test_query_token_middleware() {
    let dispatcher = Dispatcher::new();
    dispatcher.register(
        "GET",
        "/secret",
        vec![Arc::new(QueryTokenMiddleware::new("token", "s3cret"))],
        |ctx: &mut RequestContext<'_>| {
            let via = ctx.state.get_str("auth.via").unwrap_or_default().to_string();
            ctx.write(via);
        },
    );

    let (outcome, body) = dispatch_with_query(&dispatcher, "GET", "/secret", "token=s3cret");
    assert_eq!(outcome, DispatchOutcome::Executed);
    assert_eq!(body, "token");

    let (outcome, _) = dispatch_with_query(&dispatcher, "GET", "/secret", "token=wrong");
    assert_eq!(outcome, DispatchOutcome::Denied { status: 401 });

    let (outcome, _) = dispatch(&dispatcher, "GET", "/secret");
    assert_eq!(outcome, DispatchOutcome::Denied { status: 401 });
}

#[test]
fn test_require_state_middleware() {
    let dispatcher = Dispatcher::new();
    dispatcher.register(
        "GET",
        "/open",
        vec![
            middleware::from_fn(|ctx| {
                ctx.state.set("session", "abc");
                Decision::Allow
            }),
            Arc::new(RequireStateMiddleware::new("session", 403)),
        ],
        named("open"),
    );
    dispatcher.register(
        "GET",
        "/closed",
        vec![Arc::new(RequireStateMiddleware::new("session", 403))],
        named("closed"),
    );

    assert_eq!(dispatch(&dispatcher, "GET", "/open").1, "open");
    assert_eq!(
        dispatch(&dispatcher, "GET", "/closed").0,
        DispatchOutcome::Denied { status: 403 }
    );
}

#[test]
fn test_tracing_middleware_always_allows() {
    let dispatcher = Dispatcher::new();
    dispatcher.register("GET", "/t", vec![Arc::new(TracingMiddleware)], named("t"));
    let (outcome, body) = dispatch(&dispatcher, "GET", "/t");
    assert_eq!(outcome, DispatchOutcome::Executed);
    assert_eq!(body, "t");
}

#[test]
fn test_chain_debug_lists_names() {
    let chain = MiddlewareChain::new(vec![
        Arc::new(QueryTokenMiddleware::new("t", "x")),
        Arc::new(RequireStateMiddleware::new("k", 403)),
    ]);
    assert_eq!(chain.len(), 2);
    assert_eq!(format!("{chain:?}"), r#"["query_token", "require_state"]"#);
}

#[test]
fn test_decision_conversions() {
    assert_eq!(Decision::from((true, 500)), Decision::Allow);
    assert_eq!(Decision::from((false, 401)), Decision::Deny(401));
    assert_eq!(Decision::Deny(403).into_parts(), (false, 403));
    assert!(Decision::Allow.is_allowed());
}

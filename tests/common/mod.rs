//! Test utilities shared by the integration tests
//!
//! Provides route fixtures, a router factory, and recording guards and
//! middleware for asserting execution order.

#![allow(dead_code)]

use parking_lot::Mutex;
use shell_navigator::*;
use std::sync::Arc;

/// Marker stored in [`Extra`] by tests that act as a signed-in user.
#[derive(Debug, Clone)]
pub struct Session {
    pub user: String,
}

/// Shared event log written by recording guards and middleware.
pub type EventLog = Arc<Mutex<Vec<String>>>;

pub fn event_log() -> EventLog {
    Arc::new(Mutex::new(Vec::new()))
}

pub fn events(log: &EventLog) -> Vec<String> {
    log.lock().clone()
}

/// Route env_logger output through the test harness. Safe to call repeatedly.
pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// The route table most tests run against.
///
/// ```text
/// /                       home
/// /login                  login
/// /users                  users
/// /users/:userId          userProfile
/// /users/:userId/posts/:postId  userPost
/// /profile                profile (requires a Session extra)
/// /dashboard              dashboard
/// /dashboard/settings
/// /dashboard/settings/theme
/// /dashboard/stats
/// ```
pub fn app_routes() -> Vec<Route> {
    vec![
        Route::new("/").name("home"),
        Route::new("/login").name("login"),
        Route::new("/users").name("users").child(
            Route::new(":userId")
                .name("userProfile")
                .child(Route::new("posts/:postId").name("userPost")),
        ),
        Route::new("/profile").name("profile").guard(AuthGuard::new(
            |ctx| ctx.extra::<Session>().is_some(),
            "/login",
        )),
        Route::new("/dashboard")
            .name("dashboard")
            .child(Route::new("settings").child(Route::new("theme")))
            .child(Route::new("stats")),
    ]
}

pub fn app_router() -> Router {
    init_logging();
    Router::new(app_routes(), RouterConfig::default())
}

pub fn app_router_with(config: RouterConfig) -> Router {
    init_logging();
    Router::new(app_routes(), config)
}

/// A config whose failure listener records every error it is told about.
pub fn recording_config() -> (RouterConfig, Arc<Mutex<Vec<NavigationError>>>) {
    let errors = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&errors);
    let config = RouterConfig::new().on_error(move |err| sink.lock().push(err.clone()));
    (config, errors)
}

/// Guard that records `label` and allows.
pub fn recording_guard(log: &EventLog, label: &'static str) -> impl RouteGuard {
    let log = Arc::clone(log);
    guard_fn(move |_| {
        log.lock().push(label.to_string());
        GuardOutcome::Allow
    })
    .named(label)
}

/// Middleware that records `label` before and `label:after` after activation.
pub fn recording_middleware(log: &EventLog, label: &'static str) -> impl RouteMiddleware {
    let before = Arc::clone(log);
    let after = Arc::clone(log);
    middleware_fn(
        move |_| {
            before.lock().push(label.to_string());
            MiddlewareOutcome::Proceed
        },
        move |_| after.lock().push(format!("{label}:after")),
    )
    .named(label)
}

pub fn params<const N: usize>(pairs: [(&str, &str); N]) -> RouteParams {
    pairs.into_iter().collect()
}

pub fn query<const N: usize>(pairs: [(&str, &str); N]) -> QueryParams {
    pairs.into_iter().collect()
}

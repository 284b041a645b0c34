//! Guard and middleware execution

use crate::common::*;
use shell_navigator::*;

fn users_router(log: &EventLog) -> Router {
    init_logging();
    Router::new(
        vec![
            Route::new("/"),
            Route::new("/login"),
            Route::new("/users")
                .guard(recording_guard(log, "parent"))
                .middleware(recording_middleware(log, "mw-parent"))
                .child(
                    Route::new(":userId")
                        .guard(recording_guard(log, "child"))
                        .middleware(recording_middleware(log, "mw-child")),
                ),
            Route::new("/settings"),
        ],
        RouterConfig::default(),
    )
}

// ============================================================================
// Guard outcomes
// ============================================================================

#[tokio::test]
async fn test_auth_guard_redirects_anonymous_user() {
    let router = app_router();

    let ctx = router.go("/profile", None).await.unwrap();

    assert_eq!(ctx.full_path, "/login");
    assert_eq!(router.current_path(), "/login");
    assert_eq!(router.navigation_stack(), vec!["/login"]);
}

#[tokio::test]
async fn test_auth_guard_allows_signed_in_user() {
    let router = app_router();
    let session = Extra::new(Session {
        user: "ada".to_string(),
    });

    let ctx = router.go("/profile", Some(session)).await.unwrap();

    assert_eq!(ctx.full_path, "/profile");
    assert_eq!(ctx.extra::<Session>().map(|s| s.user.as_str()), Some("ada"));
}

#[tokio::test]
async fn test_denying_guard_keeps_location() {
    let (config, errors) = recording_config();
    let router = Router::new(
        vec![
            Route::new("/"),
            Route::new("/vault").guard(guard_fn(|_| GuardOutcome::deny("locked")).named("vault")),
        ],
        config,
    );

    let err = router.go("/vault", None).await.unwrap_err();

    assert!(err.is_rejected());
    assert!(err.to_string().contains("locked"));
    assert_eq!(router.current_path(), "/");
    assert_eq!(router.navigation_stack(), vec!["/"]);
    assert_eq!(errors.lock().len(), 1);
}

#[tokio::test]
async fn test_access_predicate_false_rejects() {
    let router = Router::new(
        vec![
            Route::new("/"),
            Route::new("/admin").access_guard(|ctx| ctx.query("token").is_some()),
        ],
        RouterConfig::default(),
    );

    let err = router.go("/admin", None).await.unwrap_err();
    match err {
        NavigationError::GuardRejected { path, reason } => {
            assert_eq!(path, "/admin");
            assert_eq!(reason, "Access denied");
        }
        other => panic!("expected rejection, got {:?}", other),
    }

    router.go("/admin?token=abc", None).await.unwrap();
    assert_eq!(router.current_path(), "/admin?token=abc");
}

#[tokio::test]
async fn test_access_predicate_runs_before_route_guards() {
    let log = event_log();
    let router = Router::new(
        vec![
            Route::new("/"),
            Route::new("/admin")
                .access_guard(|_| false)
                .guard(recording_guard(&log, "route")),
        ],
        RouterConfig::default(),
    );

    assert!(router.go("/admin", None).await.is_err());
    assert!(events(&log).is_empty());
}

#[tokio::test]
async fn test_guard_error_is_reported() {
    let router = Router::new(
        vec![
            Route::new("/"),
            Route::new("/broken").guard(
                guard_fn(|_| GuardOutcome::error("backend unavailable")).named("backend"),
            ),
        ],
        RouterConfig::default(),
    );

    let err = router.go("/broken", None).await.unwrap_err();

    match &err {
        NavigationError::GuardError { guard, .. } => assert_eq!(guard, "backend"),
        other => panic!("expected guard error, got {:?}", other),
    }
    assert!(std::error::Error::source(&err).is_some());
}

#[tokio::test]
async fn test_panicking_guard_becomes_error() {
    let router = Router::new(
        vec![
            Route::new("/"),
            Route::new("/panics").guard(guard_fn(|_| panic!("guard exploded")).named("explosive")),
            Route::new("/fine"),
        ],
        RouterConfig::default(),
    );

    let err = router.go("/panics", None).await.unwrap_err();

    assert!(matches!(err, NavigationError::GuardError { .. }));
    assert!(err.to_string().contains("guard exploded"));
    assert_eq!(router.current_path(), "/");

    router.go("/fine", None).await.unwrap();
    assert_eq!(router.current_path(), "/fine");
}

#[tokio::test]
async fn test_allow_with_rewrites_context() {
    let router = Router::new(
        vec![
            Route::new("/"),
            Route::new("/items/:id").guard(guard_fn(|ctx| {
                GuardOutcome::AllowWith(ctx.clone().with_param("checked", "yes"))
            })),
        ],
        RouterConfig::default(),
    );

    let ctx = router.go("/items/5", None).await.unwrap();

    assert_eq!(ctx.param("id"), Some("5"));
    assert_eq!(ctx.param("checked"), Some("yes"));
    assert_eq!(router.current_context().param("checked"), Some("yes"));
}

#[tokio::test]
async fn test_composite_and_negated_guards() {
    let router = Router::new(
        vec![
            Route::new("/"),
            Route::new("/guests").guard(NotGuard::new(guard_fn(|ctx| {
                if ctx.extra::<Session>().is_some() {
                    GuardOutcome::Allow
                } else {
                    GuardOutcome::deny("anonymous")
                }
            }))),
            Route::new("/both").guard(
                Guards::builder()
                    .guard(guard_fn(|_| GuardOutcome::Allow))
                    .guard(guard_fn(|_| GuardOutcome::deny("second")))
                    .build(),
            ),
        ],
        RouterConfig::default(),
    );

    router.go("/guests", None).await.unwrap();
    assert_eq!(router.current_path(), "/guests");

    let signed_in = Extra::new(Session {
        user: "ada".to_string(),
    });
    assert!(router.go("/guests", Some(signed_in)).await.is_err());

    let err = router.go("/both", None).await.unwrap_err();
    assert!(err.to_string().contains("second"));
}

#[tokio::test]
async fn test_async_trait_guard() {
    struct SlowAllow;

    #[async_trait]
    impl RouteGuard for SlowAllow {
        async fn check(&self, _ctx: &NavigationContext) -> GuardOutcome {
            futures::future::ready(()).await;
            GuardOutcome::Allow
        }

        fn name(&self) -> &str {
            "SlowAllow"
        }
    }

    let router = Router::new(
        vec![Route::new("/"), Route::new("/slow").guard(SlowAllow)],
        RouterConfig::default(),
    );

    router.go("/slow", None).await.unwrap();
    assert_eq!(router.current_path(), "/slow");
}

// ============================================================================
// Ordering and registry scopes
// ============================================================================

#[tokio::test]
async fn test_guard_order_registry_then_chain() {
    let log = event_log();
    let router = users_router(&log);
    router.add_guard("*", recording_guard(&log, "global"));
    router.add_guard("users/*", recording_guard(&log, "scoped"));

    router.go("/users/7", None).await.unwrap();

    let guards: Vec<String> = events(&log)
        .into_iter()
        .filter(|e| !e.starts_with("mw-"))
        .collect();
    assert_eq!(guards, vec!["global", "scoped", "parent", "child"]);
}

#[tokio::test]
async fn test_scoped_guard_skips_other_paths() {
    let log = event_log();
    let router = users_router(&log);
    router.add_guard("users/*", recording_guard(&log, "scoped"));
    router.add_guard("/settings", recording_guard(&log, "exact"));

    router.go("/settings", None).await.unwrap();

    assert_eq!(events(&log), vec!["exact"]);
}

#[tokio::test]
async fn test_removed_guards_no_longer_run() {
    let log = event_log();
    let router = users_router(&log);
    router.add_guard("*", recording_guard(&log, "global"));
    assert_eq!(router.remove_guards("*"), 1);

    router.go("/settings", None).await.unwrap();

    assert!(events(&log).is_empty());
}

#[tokio::test]
async fn test_middleware_runs_after_guards_then_activation() {
    let log = event_log();
    let router = users_router(&log);
    router.add_middleware("*", recording_middleware(&log, "mw-global"));

    router.go("/users/7", None).await.unwrap();

    assert_eq!(
        events(&log),
        vec![
            "parent",
            "child",
            "mw-global",
            "mw-parent",
            "mw-child",
            "mw-global:after",
            "mw-parent:after",
            "mw-child:after",
        ]
    );
}

#[tokio::test]
async fn test_remove_middleware() {
    let log = event_log();
    let router = users_router(&log);
    router.add_middleware("settings", recording_middleware(&log, "mw-settings"));
    assert_eq!(router.remove_middleware("settings"), 1);

    router.go("/settings", None).await.unwrap();

    assert!(events(&log).is_empty());
}

// ============================================================================
// Middleware outcomes
// ============================================================================

#[tokio::test]
async fn test_middleware_redirect() {
    let router = app_router();
    router.add_middleware(
        "dashboard/*",
        middleware_fn(|_| MiddlewareOutcome::redirect("/login"), |_| {}),
    );

    router.go("/dashboard/stats", None).await.unwrap();

    assert_eq!(router.current_path(), "/login");
}

#[tokio::test]
async fn test_middleware_modifies_context() {
    let router = app_router();
    router.add_middleware(
        "*",
        middleware_fn(
            |ctx| MiddlewareOutcome::Modified(ctx.clone().with_param("seen", "1")),
            |_| {},
        ),
    );

    let ctx = router.go("/users", None).await.unwrap();

    assert_eq!(ctx.param("seen"), Some("1"));
}

#[tokio::test]
async fn test_middleware_error_skips_activation() {
    let log = event_log();
    let router = users_router(&log);
    router.add_middleware(
        "*",
        middleware_fn(|_| MiddlewareOutcome::error("quota exceeded"), |_| {}).named("quota"),
    );

    let err = router.go("/users/7", None).await.unwrap_err();

    match err {
        NavigationError::MiddlewareError { middleware, .. } => assert_eq!(middleware, "quota"),
        other => panic!("expected middleware error, got {:?}", other),
    }
    assert!(events(&log).iter().all(|e| !e.ends_with(":after")));
    assert_eq!(router.current_path(), "/");
}

#[tokio::test]
async fn test_denied_navigation_skips_middleware() {
    let log = event_log();
    let router = users_router(&log);
    router.add_guard("users/*", guard_fn(|_| GuardOutcome::deny("no")));

    assert!(router.go("/users/7", None).await.is_err());

    assert!(events(&log).is_empty());
}

#[tokio::test]
async fn test_failing_activation_hook_is_ignored() {
    struct FailingAfter;

    #[async_trait]
    impl RouteMiddleware for FailingAfter {
        async fn handle(&self, _ctx: &NavigationContext) -> MiddlewareOutcome {
            MiddlewareOutcome::Proceed
        }

        async fn on_activated(&self, _ctx: &NavigationContext) -> Result<(), BoxError> {
            Err("analytics offline".into())
        }
    }

    let router = app_router();
    router.add_middleware("*", FailingAfter);

    let ctx = router.go("/users", None).await.unwrap();

    assert_eq!(ctx.full_path, "/users");
    assert!(!router.current_context().has_error());
}

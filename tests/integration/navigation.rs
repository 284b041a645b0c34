//! Go / push / pop, named routes and deep links

use crate::common::*;
use futures::channel::oneshot;
use parking_lot::Mutex;
use shell_navigator::*;
use std::sync::Arc;

// ============================================================================
// go / push / pop
// ============================================================================

#[tokio::test]
async fn test_go_extracts_parameters() {
    let router = app_router();

    let ctx = router.go("/users/42", None).await.unwrap();

    assert_eq!(ctx.param("userId"), Some("42"));
    assert_eq!(ctx.path_parameters.len(), 1);
    assert_eq!(ctx.route_name.as_deref(), Some("userProfile"));
    assert_eq!(router.current_path(), "/users/42");
}

#[tokio::test]
async fn test_go_parses_query() {
    let router = app_router();

    let ctx = router.go("/users?page=2&sort=name", None).await.unwrap();

    assert_eq!(ctx.path(), "/users");
    assert_eq!(ctx.query("page"), Some("2"));
    assert_eq!(ctx.query("sort"), Some("name"));
    assert_eq!(router.current_path(), "/users?page=2&sort=name");
}

#[tokio::test]
async fn test_go_keeps_stack_length() {
    let router = app_router();
    router.push("/users", None).await.unwrap();
    assert_eq!(router.navigation_stack().len(), 2);

    router.go("/dashboard", None).await.unwrap();

    assert_eq!(router.navigation_stack(), vec!["/", "/dashboard"]);
}

#[tokio::test]
async fn test_push_adds_one_entry() {
    let router = app_router();

    router.push("/users", None).await.unwrap();
    let ctx = router.push("/users/7", None).await.unwrap();

    assert_eq!(router.navigation_stack(), vec!["/", "/users", "/users/7"]);
    assert_eq!(ctx.navigation_stack, router.navigation_stack());
    assert!(router.can_pop());
}

#[tokio::test]
async fn test_pop_returns_to_previous_entry() {
    let router = app_router();
    router.push("/users", None).await.unwrap();
    router.push("/users/7", None).await.unwrap();

    let ctx = router.pop().await.unwrap();

    assert_eq!(ctx.full_path, "/users");
    assert_eq!(router.current_path(), "/users");
    assert_eq!(router.navigation_stack(), vec!["/", "/users"]);
}

#[tokio::test]
async fn test_pop_single_entry_is_noop() {
    let router = app_router();
    let before = router.current_context();

    let ctx = router.pop().await.unwrap();

    assert_eq!(ctx.full_path, before.full_path);
    assert_eq!(router.navigation_stack(), vec!["/"]);
    assert!(!router.can_pop());
}

#[tokio::test]
async fn test_extra_payload_reaches_context() {
    let router = app_router();

    let ctx = router
        .go("/dashboard", Some(Extra::new(42_u32)))
        .await
        .unwrap();

    assert_eq!(ctx.extra::<u32>(), Some(&42));
    assert_eq!(router.current_context().extra::<u32>(), Some(&42));
}

#[tokio::test]
async fn test_path_normalized_before_matching() {
    let router = app_router();

    let ctx = router.go("dashboard//settings/", None).await.unwrap();

    assert_eq!(ctx.full_path, "/dashboard/settings/");
    assert_eq!(router.depth(), 2);
}

#[tokio::test]
async fn test_query_slashes_survive_normalization() {
    let router = app_router();

    let ctx = router
        .go("//login?next=https://example.com/x", None)
        .await
        .unwrap();

    assert_eq!(ctx.full_path, "/login?next=https://example.com/x");
    assert_eq!(ctx.query("next"), Some("https://example.com/x"));
    assert_eq!(router.navigation_stack(), vec!["/login?next=https://example.com/x"]);
}

#[tokio::test]
async fn test_redirect_target_keeps_query_slashes() {
    init_logging();
    let router = Router::new(
        vec![
            Route::new("/"),
            Route::new("/cb"),
            Route::new("/old").redirect(|_| Some("cb?next=a//b".to_string())),
        ],
        RouterConfig::default(),
    );

    let ctx = router.go("/old", None).await.unwrap();

    assert_eq!(ctx.full_path, "/cb?next=a//b");
    assert_eq!(ctx.query("next"), Some("a//b"));
}

// ============================================================================
// Failure handling
// ============================================================================

#[tokio::test]
async fn test_unknown_path_rolls_back() {
    let (config, errors) = recording_config();
    let router = app_router_with(config);
    router.go("/dashboard", None).await.unwrap();

    let err = router.go("/nowhere", None).await.unwrap_err();

    assert!(err.is_not_found());
    assert_eq!(router.current_path(), "/dashboard");
    assert_eq!(router.navigation_stack(), vec!["/dashboard"]);
    assert!(router.current_context().has_error());
    assert_eq!(errors.lock().len(), 1);
    assert!(matches!(router.resolve_view(), RouteView::Error { .. }));
}

#[tokio::test]
async fn test_success_clears_previous_error() {
    let router = app_router();
    let _ = router.go("/nowhere", None).await;
    assert!(router.current_context().has_error());

    router.go("/users", None).await.unwrap();

    assert!(!router.current_context().has_error());
    assert!(matches!(router.resolve_view(), RouteView::Matched { .. }));
}

#[tokio::test]
async fn test_error_view_uses_error_builder() {
    let router = app_router_with(
        RouterConfig::new().error_builder(|_, err| RenderHandle::new(err.to_string())),
    );
    let _ = router.go("/nowhere", None).await;

    match router.resolve_view() {
        RouteView::Error { error, render } => {
            assert!(error.is_not_found());
            let text = render.unwrap();
            assert!(text.downcast_ref::<String>().unwrap().contains("/nowhere"));
        }
        other => panic!("expected error view, got {:?}", other),
    }
}

// ============================================================================
// Named routes
// ============================================================================

#[tokio::test]
async fn test_go_named_equals_go() {
    let by_name = app_router();
    let by_path = app_router();

    let named = by_name
        .go_named("userProfile", &params([("userId", "7")]), &QueryParams::new())
        .await
        .unwrap();
    let direct = by_path.go("/users/7", None).await.unwrap();

    assert_eq!(named.full_path, direct.full_path);
    assert_eq!(named.path_parameters, direct.path_parameters);
    assert_eq!(by_name.navigation_stack(), by_path.navigation_stack());
}

#[tokio::test]
async fn test_push_named_with_query() {
    let router = app_router();

    let ctx = router
        .push_named(
            "userPost",
            &params([("userId", "7"), ("postId", "3")]),
            &query([("highlight", "yes")]),
        )
        .await
        .unwrap();

    assert_eq!(ctx.full_path, "/users/7/posts/3?highlight=yes");
    assert_eq!(ctx.param("postId"), Some("3"));
    assert_eq!(ctx.query("highlight"), Some("yes"));
    assert_eq!(router.navigation_stack().len(), 2);
}

#[tokio::test]
async fn test_go_named_unknown_name() {
    let (config, errors) = recording_config();
    let router = app_router_with(config);

    let err = router
        .go_named("nope", &RouteParams::new(), &QueryParams::new())
        .await
        .unwrap_err();

    assert!(err.is_not_found());
    assert!(matches!(err, NavigationError::UnknownRouteName { ref name } if name == "nope"));
    assert_eq!(router.current_path(), "/");
    assert_eq!(errors.lock().len(), 1);
}

#[test]
fn test_url_for_missing_param_keeps_token() {
    let router = app_router();
    assert_eq!(
        router
            .url_for("userPost", &params([("userId", "7")]), &QueryParams::new())
            .as_deref(),
        Some("/users/7/posts/:postId")
    );
}

// ============================================================================
// Deep links
// ============================================================================

#[tokio::test]
async fn test_deep_link_custom_scheme() {
    let router = app_router();

    let ctx = router
        .handle_deep_link("myapp://open/users/9?tab=posts")
        .await
        .unwrap();

    assert_eq!(ctx.param("userId"), Some("9"));
    assert_eq!(ctx.query("tab"), Some("posts"));
}

#[tokio::test]
async fn test_deep_link_with_url_in_query() {
    let router = app_router();

    let ctx = router
        .handle_deep_link("myapp://open/login?next=https://example.com/x")
        .await
        .unwrap();

    assert_eq!(ctx.full_path, "/login?next=https://example.com/x");
    assert_eq!(ctx.query("next"), Some("https://example.com/x"));
}

#[tokio::test]
async fn test_deep_link_without_path_goes_home() {
    let router = app_router();
    router.go("/users", None).await.unwrap();

    router.handle_deep_link("https://example.com").await.unwrap();

    assert_eq!(router.current_path(), "/");
}

// ============================================================================
// Location queries
// ============================================================================

#[tokio::test]
async fn test_breadcrumbs_for_nested_location() {
    let router = app_router();
    router.go("/dashboard/settings/theme", None).await.unwrap();

    assert_eq!(
        router.breadcrumbs(),
        vec![
            "/",
            "/dashboard",
            "/dashboard/settings",
            "/dashboard/settings/theme"
        ]
    );
    assert_eq!(router.parent_path().as_deref(), Some("/dashboard/settings"));
    assert_eq!(router.depth(), 3);
}

#[tokio::test]
async fn test_match_stack_outermost_first() {
    let router = app_router();
    router.go("/users/7/posts/3", None).await.unwrap();

    let stack = router.match_stack();
    let patterns: Vec<String> = stack.iter().map(|m| m.pattern.to_string()).collect();

    assert_eq!(
        patterns,
        vec!["/users", "/users/:userId", "/users/:userId/posts/:postId"]
    );
    assert_eq!(stack[1].remaining_path, "posts/3");
    assert_eq!(stack[2].path_parameters.get("postId"), Some("3"));
}

#[tokio::test]
async fn test_child_routes_of_current_location() {
    let router = app_router();
    router.go("/dashboard", None).await.unwrap();

    assert_eq!(
        router.child_routes(),
        vec!["/dashboard/settings", "/dashboard/stats"]
    );
}

// ============================================================================
// Concurrency
// ============================================================================

#[tokio::test]
async fn test_superseded_navigation_does_not_commit() {
    init_logging();
    let (release, wait) = oneshot::channel::<()>();
    let wait = Arc::new(Mutex::new(Some(wait)));

    let router = Router::new(
        vec![
            Route::new("/"),
            Route::new("/slow").guard(async_guard_fn(move |_| {
                let wait = wait.lock().take();
                async move {
                    if let Some(wait) = wait {
                        let _ = wait.await;
                    }
                    GuardOutcome::Allow
                }
            })),
            Route::new("/fast"),
        ],
        RouterConfig::default(),
    );

    let slow = router.go("/slow", None);
    let fast = async {
        let result = router.go("/fast", None).await;
        let _ = release.send(());
        result
    };
    let (slow, fast) = futures::join!(slow, fast);

    assert!(fast.is_ok());
    assert!(slow.unwrap_err().is_superseded());
    assert_eq!(router.current_path(), "/fast");
    assert_eq!(router.navigation_stack(), vec!["/fast"]);
    assert!(!router.current_context().has_error());
}

#[tokio::test]
async fn test_sequential_navigations_are_serialized() {
    let router = app_router();

    for id in 0..10 {
        router.push(&format!("/users/{id}"), None).await.unwrap();
    }

    assert_eq!(router.navigation_stack().len(), 11);
    assert_eq!(router.current_path(), "/users/9");
}

#[cfg(feature = "cache")]
#[tokio::test]
async fn test_repeated_navigation_hits_cache() {
    let router = app_router();

    router.go("/users/1", None).await.unwrap();
    router.go("/users/1", None).await.unwrap();

    assert!(router.cache_stats().hits >= 1);
}

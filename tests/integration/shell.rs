//! Stateful shell branches

use crate::common::*;
use shell_navigator::*;

/// Two-tab shell: `/home` (with `/home/:id` details) and `/search`,
/// plus a `/login` route outside the shell.
fn tabs_router(initial: &str) -> Router {
    init_logging();
    Router::new(
        vec![
            Route::new("/login"),
            Route::stateful_shell(vec![
                ShellBranch::new(vec![Route::new("/home")
                    .name("home")
                    .child(Route::new(":id").name("homeItem"))])
                .named("home"),
                ShellBranch::new(vec![Route::new("/search").child(Route::new("results"))])
                    .initial_location("/search")
                    .named("search"),
            ]),
        ],
        RouterConfig::new().initial_route(initial),
    )
}

fn stack(items: &[&str]) -> Option<Vec<String>> {
    Some(items.iter().map(|s| s.to_string()).collect())
}

// ============================================================================
// Construction
// ============================================================================

#[test]
fn test_branch_initial_state() {
    let router = tabs_router("/home");
    let shell = router.shell();

    assert_eq!(shell.branch_count(), 2);
    assert_eq!(shell.current_branch_index(), Some(0));
    assert_eq!(shell.branch_stack(0), stack(&["/home"]));
    assert_eq!(shell.branch_stack(1), stack(&["/search"]));
    assert_eq!(shell.branch_stack(2), None);
}

#[test]
fn test_initial_route_activates_its_branch() {
    let router = tabs_router("/search/results");
    let shell = router.shell();

    assert_eq!(shell.current_branch_index(), Some(1));
    assert_eq!(shell.branch_stack(1), stack(&["/search/results"]));
}

#[test]
fn test_branch_of() {
    let router = tabs_router("/home");
    let shell = router.shell();

    assert_eq!(shell.branch_of("/home/3"), Some(0));
    assert_eq!(shell.branch_of("/search/results"), Some(1));
    assert_eq!(shell.branch_of("/login"), None);
}

#[test]
fn test_router_without_shell() {
    let router = app_router();
    let shell = router.shell();

    assert_eq!(shell.branch_count(), 0);
    assert_eq!(shell.current_branch_index(), None);
}

// ============================================================================
// Branch switching
// ============================================================================

#[tokio::test]
async fn test_branch_stack_preserved_across_switches() {
    let router = tabs_router("/home");
    let shell = router.shell();

    shell.push("/home/1").await.unwrap();
    shell.go_branch(1, false).await.unwrap();
    assert_eq!(router.current_path(), "/search");
    assert_eq!(shell.current_branch_index(), Some(1));

    let ctx = shell.go_branch(0, false).await.unwrap();

    assert_eq!(ctx.full_path, "/home/1");
    assert_eq!(ctx.param("id"), Some("1"));
    assert_eq!(shell.branch_stack(0), stack(&["/home", "/home/1"]));
    assert_eq!(shell.branch_stack(1), stack(&["/search"]));
}

#[tokio::test]
async fn test_go_branch_with_reset() {
    let router = tabs_router("/home");
    let shell = router.shell();
    shell.push("/home/1").await.unwrap();
    shell.push("/home/2").await.unwrap();
    shell.go_branch(1, false).await.unwrap();

    shell.go_branch(0, true).await.unwrap();

    assert_eq!(router.current_path(), "/home");
    assert_eq!(shell.branch_stack(0), stack(&["/home"]));
}

#[tokio::test]
async fn test_go_branch_out_of_range() {
    let (config, errors) = recording_config();
    let router = Router::new(
        vec![Route::stateful_shell(vec![ShellBranch::new(vec![
            Route::new("/only"),
        ])])],
        config.initial_route("/only"),
    );

    let err = router.shell().go_branch(3, false).await.unwrap_err();

    assert!(matches!(err, NavigationError::InvalidBranch { index: 3, count: 1 }));
    assert_eq!(router.current_path(), "/only");
    assert_eq!(errors.lock().len(), 1);
}

#[tokio::test]
async fn test_go_branch_runs_guards() {
    init_logging();
    let router = Router::new(
        vec![
            Route::new("/login"),
            Route::stateful_shell(vec![
                ShellBranch::new(vec![Route::new("/feed")]),
                ShellBranch::new(vec![Route::new("/account").guard(AuthGuard::new(
                    |ctx| ctx.extra::<Session>().is_some(),
                    "/login",
                ))]),
            ]),
        ],
        RouterConfig::new().initial_route("/feed"),
    );
    let shell = router.shell();

    shell.go_branch(1, false).await.unwrap();

    assert_eq!(router.current_path(), "/login");
    // The redirect target lands on the requested branch's stack.
    assert_eq!(shell.current_branch_index(), Some(1));
}

// ============================================================================
// Navigation within a branch
// ============================================================================

#[tokio::test]
async fn test_shell_go_replaces_branch_stack() {
    let router = tabs_router("/home");
    let shell = router.shell();
    shell.push("/home/1").await.unwrap();

    shell.go("/home/9").await.unwrap();

    assert_eq!(shell.branch_stack(0), stack(&["/home/9"]));
}

#[tokio::test]
async fn test_shell_pop_within_branch() {
    let router = tabs_router("/home");
    let shell = router.shell();
    shell.push("/home/1").await.unwrap();
    shell.push("/home/2").await.unwrap();

    let ctx = shell.pop().await.unwrap();

    assert_eq!(ctx.full_path, "/home/1");
    assert_eq!(shell.branch_stack(0), stack(&["/home", "/home/1"]));
    assert_eq!(router.navigation_stack(), vec!["/home", "/home/1"]);
}

#[tokio::test]
async fn test_shell_pop_single_entry_is_noop() {
    let router = tabs_router("/home");
    let shell = router.shell();

    let ctx = shell.pop().await.unwrap();

    assert_eq!(ctx.full_path, "/home");
    assert_eq!(shell.branch_stack(0), stack(&["/home"]));
}

#[tokio::test]
async fn test_shell_routes_are_plain_routes() {
    let router = tabs_router("/login");

    let ctx = router
        .go_named("homeItem", &params([("id", "4")]), &QueryParams::new())
        .await
        .unwrap();

    assert_eq!(ctx.full_path, "/home/4");
    // Plain navigation leaves branch stacks alone.
    assert_eq!(router.shell().branch_stack(0), stack(&["/home"]));
}

#[tokio::test]
async fn test_only_first_shell_keeps_branches() {
    init_logging();
    let router = Router::new(
        vec![
            Route::stateful_shell(vec![ShellBranch::new(vec![Route::new("/one")])]),
            Route::stateful_shell(vec![
                ShellBranch::new(vec![Route::new("/two")]),
                ShellBranch::new(vec![Route::new("/three")]),
            ]),
        ],
        RouterConfig::new().initial_route("/one"),
    );

    assert_eq!(router.shell().branch_count(), 1);
    router.go("/three", None).await.unwrap();
    assert_eq!(router.current_path(), "/three");
}

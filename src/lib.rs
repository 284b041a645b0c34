//! Declarative client-side router.
//!
//! `shell-navigator` maps locations such as `/users/42?tab=posts` to a tree
//! of declared [`Route`]s and drives navigation through an async pipeline:
//!
//! - **Matching.** Literal and `:param` segments, nested children, first
//!   registered match wins ([`RoutePattern`], [`FlatRouteIndex`]).
//! - **Redirects.** Router-level, per-route, and from guards or middleware,
//!   all bounded by one redirect limit ([`RouterConfig::redirect_limit`]).
//! - **Guards and middleware.** Async checks that allow, deny, redirect or
//!   rewrite the [`NavigationContext`] ([`RouteGuard`], [`RouteMiddleware`]),
//!   attached to routes or registered by path scope on the [`Router`].
//! - **Stacks.** `go` replaces the current entry, `push` adds one, `pop`
//!   returns ([`Router`]).
//! - **Stateful shells.** Per-branch stacks that survive branch switches
//!   ([`ShellHandle`]).
//!
//! # Quick start
//!
//! ```
//! use shell_navigator::{QueryParams, Route, RouteParams, Router, RouterConfig};
//!
//! # pollster::block_on(async {
//! let router = Router::new(
//!     vec![
//!         Route::new("/"),
//!         Route::new("/users").child(Route::new(":userId").name("userProfile")),
//!     ],
//!     RouterConfig::default(),
//! );
//!
//! let params: RouteParams = [("userId", "7")].into_iter().collect();
//! router
//!     .push_named("userProfile", &params, &QueryParams::new())
//!     .await
//!     .unwrap();
//!
//! assert_eq!(router.current_path(), "/users/7");
//! assert_eq!(router.navigation_stack(), vec!["/", "/users/7"]);
//! assert_eq!(router.breadcrumbs(), vec!["/", "/users", "/users/7"]);
//! # });
//! ```
//!
//! # Feature flags
//!
//! | Feature   | Default | Description                                   |
//! |-----------|---------|-----------------------------------------------|
//! | `log`     | yes     | Log through the `log` crate                   |
//! | `tracing` | no      | Log through the `tracing` crate instead       |
//! | `cache`   | yes     | LRU cache of path-to-route resolutions        |

#![cfg_attr(docsrs, feature(doc_cfg))]

#[macro_use]
mod logging;

#[cfg(feature = "cache")]
#[cfg_attr(docsrs, doc(cfg(feature = "cache")))]
pub mod cache;
mod config;
mod context;
mod error;
mod guards;
mod middleware;
pub mod nested;
mod params;
mod path;
mod pattern;
pub mod pipeline;
mod route;
mod router;
mod shell;
mod state;
mod tree;

pub use config::{ErrorListener, RouterConfig};
pub use context::{Extra, NavigationContext};
pub use error::{BoxError, ErrorBuilder, ErrorHandlers, NavigationError, NotFoundBuilder, SharedError};
pub use guards::{
    async_guard_fn, guard_fn, AsyncFnGuard, AuthCheckFn, AuthGuard, FnGuard, GuardBuilder,
    GuardOutcome, Guards, NotGuard, RouteGuard,
};
pub use middleware::{middleware_fn, FnMiddleware, MiddlewareOutcome, RouteMiddleware};
pub use params::{QueryParams, RouteParams};
pub use path::{
    build_breadcrumbs, is_parameter_segment, join_paths, normalize_location, normalize_path,
    parent_path, path_depth, split_query, split_segments,
};
pub use pattern::{MatchMode, PatternError, PatternMatch, RoutePattern, Segment};
pub use pipeline::{scope_matches, GuardRegistry, MiddlewareRegistry, Pipeline};
pub use route::{AccessPredicate, RedirectFn, RenderHandle, Route, ShellBranch};
pub use router::{RouteView, Router};
pub use shell::ShellHandle;
pub use state::{BranchEffect, NavigationState, StackOp};
pub use tree::{BranchInfo, FlatRoute, FlatRouteIndex, RouteMatch};

/// Re-export of [`async_trait`] for implementing [`RouteGuard`] and
/// [`RouteMiddleware`] without adding the dependency yourself.
pub use async_trait::async_trait;

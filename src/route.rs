//! Route definitions.
//!
//! A [`Route`] is built once at configuration time with a fluent builder and
//! is immutable afterwards. Child patterns are relative to their parent:
//!
//! ```
//! use shell_navigator::{AuthGuard, Route};
//!
//! let dashboard = Route::new("/dashboard")
//!     .name("dashboard")
//!     .guard(AuthGuard::new(|_ctx| true, "/login"))
//!     .children(vec![
//!         Route::new("settings").name("settings"),
//!         Route::new("users/:userId").name("dashboardUser"),
//!     ]);
//!
//! assert_eq!(dashboard.get_children().len(), 2);
//! ```
//!
//! A stateful shell groups several independent branches, each with its own
//! routes and navigation stack:
//!
//! ```
//! use shell_navigator::{Route, ShellBranch};
//!
//! let shell = Route::stateful_shell(vec![
//!     ShellBranch::new(vec![Route::new("/home")]),
//!     ShellBranch::new(vec![Route::new("/search")]).initial_location("/search?q="),
//! ]);
//! assert!(shell.is_shell());
//! ```

use crate::context::NavigationContext;
use crate::guards::RouteGuard;
use crate::middleware::RouteMiddleware;
use crate::pattern::{PatternError, RoutePattern};
use crate::warn_log;
use std::any::Any;
use std::fmt;
use std::sync::Arc;

/// Route-level redirect: returns a new location or `None` to stay.
pub type RedirectFn = Arc<dyn Fn(&NavigationContext) -> Option<String> + Send + Sync>;

/// Legacy single-predicate access check. `false` denies the navigation.
pub type AccessPredicate = Arc<dyn Fn(&NavigationContext) -> bool + Send + Sync>;

// ============================================================================
// RenderHandle
// ============================================================================

/// Opaque handle handed to the rendering layer.
///
/// The router never looks inside; the host stores whatever it needs to
/// build a view (a component factory, a view id, ...) and reads it back with
/// a checked downcast.
#[derive(Clone)]
pub struct RenderHandle(Arc<dyn Any + Send + Sync>);

impl RenderHandle {
    /// Wrap a value.
    pub fn new<T: Any + Send + Sync>(value: T) -> Self {
        Self(Arc::new(value))
    }

    /// Borrow the handle as `T`, if that is what it holds.
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.0.downcast_ref::<T>()
    }

    /// `true` if both handles point at the same value.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl fmt::Debug for RenderHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("RenderHandle(..)")
    }
}

// ============================================================================
// Route
// ============================================================================

/// A route definition: a pattern plus everything attached to it.
#[derive(Clone)]
pub struct Route {
    pattern: RoutePattern,
    name: Option<String>,
    children: Vec<Arc<Route>>,
    branches: Vec<ShellBranch>,
    redirect: Option<RedirectFn>,
    access_guard: Option<AccessPredicate>,
    guards: Vec<Arc<dyn RouteGuard>>,
    middleware: Vec<Arc<dyn RouteMiddleware>>,
    render: Option<RenderHandle>,
}

impl Route {
    /// Create a route for `path`.
    ///
    /// A malformed pattern is logged and parsed leniently (see
    /// [`RoutePattern::parse_lossy`]); use [`try_new`](Self::try_new) to get
    /// the error instead.
    pub fn new(path: impl AsRef<str>) -> Self {
        let path = path.as_ref();
        let pattern = match RoutePattern::parse(path) {
            Ok(pattern) => pattern,
            Err(err) => {
                warn_log!("{}; keeping first occurrence", err);
                RoutePattern::parse_lossy(path)
            }
        };
        Self::from_pattern(pattern)
    }

    /// Create a route, rejecting malformed patterns.
    pub fn try_new(path: impl AsRef<str>) -> Result<Self, PatternError> {
        RoutePattern::parse(path.as_ref()).map(Self::from_pattern)
    }

    /// Create a stateful shell holding `branches`.
    ///
    /// The shell itself is never a navigation target; its branches' routes
    /// are registered as if they were top-level routes.
    pub fn stateful_shell(branches: Vec<ShellBranch>) -> Self {
        let mut route = Self::from_pattern(RoutePattern::parse_lossy("/"));
        route.branches = branches;
        route
    }

    fn from_pattern(pattern: RoutePattern) -> Self {
        Self {
            pattern,
            name: None,
            children: Vec::new(),
            branches: Vec::new(),
            redirect: None,
            access_guard: None,
            guards: Vec::new(),
            middleware: Vec::new(),
            render: None,
        }
    }

    // ------------------------------------------------------------------------
    // Builder
    // ------------------------------------------------------------------------

    /// Name the route for [`go_named`](crate::Router::go_named) and
    /// [`url_for`](crate::Router::url_for).
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Add one child route.
    pub fn child(mut self, child: Route) -> Self {
        self.children.push(Arc::new(child));
        self
    }

    /// Add several child routes, in order.
    pub fn children(mut self, children: Vec<Route>) -> Self {
        self.children.extend(children.into_iter().map(Arc::new));
        self
    }

    /// Redirect away from this route when `redirect` returns a location.
    pub fn redirect<F>(mut self, redirect: F) -> Self
    where
        F: Fn(&NavigationContext) -> Option<String> + Send + Sync + 'static,
    {
        self.redirect = Some(Arc::new(redirect));
        self
    }

    /// Deny navigation when `predicate` returns `false`.
    pub fn access_guard<F>(mut self, predicate: F) -> Self
    where
        F: Fn(&NavigationContext) -> bool + Send + Sync + 'static,
    {
        self.access_guard = Some(Arc::new(predicate));
        self
    }

    /// Attach a guard. Guards on a route also protect its children.
    pub fn guard<G: RouteGuard>(mut self, guard: G) -> Self {
        self.guards.push(Arc::new(guard));
        self
    }

    /// Attach middleware. Middleware on a route also run for its children.
    pub fn middleware<M: RouteMiddleware>(mut self, middleware: M) -> Self {
        self.middleware.push(Arc::new(middleware));
        self
    }

    /// Attach the handle the rendering layer uses to build this route's view.
    pub fn render(mut self, handle: RenderHandle) -> Self {
        self.render = Some(handle);
        self
    }

    // ------------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------------

    /// The route's own (relative) pattern.
    pub fn pattern(&self) -> &RoutePattern {
        &self.pattern
    }

    /// The route's name, if any.
    pub fn get_name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Child routes, in registration order.
    pub fn get_children(&self) -> &[Arc<Route>] {
        &self.children
    }

    /// Shell branches; empty for ordinary routes.
    pub fn branches(&self) -> &[ShellBranch] {
        &self.branches
    }

    /// `true` for routes built with [`stateful_shell`](Self::stateful_shell).
    pub fn is_shell(&self) -> bool {
        !self.branches.is_empty()
    }

    /// The route-level redirect function.
    pub fn get_redirect(&self) -> Option<&RedirectFn> {
        self.redirect.as_ref()
    }

    /// The legacy access predicate.
    pub fn get_access_guard(&self) -> Option<&AccessPredicate> {
        self.access_guard.as_ref()
    }

    /// Guards attached to this route.
    pub fn get_guards(&self) -> &[Arc<dyn RouteGuard>] {
        &self.guards
    }

    /// Middleware attached to this route.
    pub fn get_middleware(&self) -> &[Arc<dyn RouteMiddleware>] {
        &self.middleware
    }

    /// The render handle, if one was attached.
    pub fn get_render(&self) -> Option<&RenderHandle> {
        self.render.as_ref()
    }
}

impl fmt::Debug for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Route")
            .field("pattern", &self.pattern.as_str())
            .field("name", &self.name)
            .field("children", &self.children.len())
            .field("branches", &self.branches.len())
            .field("guards", &self.guards.len())
            .field("middleware", &self.middleware.len())
            .finish_non_exhaustive()
    }
}

// ============================================================================
// ShellBranch
// ============================================================================

/// One branch of a stateful shell.
#[derive(Clone, Debug)]
pub struct ShellBranch {
    routes: Vec<Arc<Route>>,
    initial_location: Option<String>,
    name: Option<String>,
}

impl ShellBranch {
    /// Create a branch from its routes.
    pub fn new(routes: Vec<Route>) -> Self {
        Self {
            routes: routes.into_iter().map(Arc::new).collect(),
            initial_location: None,
            name: None,
        }
    }

    /// Where the branch starts. Defaults to the first route's pattern.
    pub fn initial_location(mut self, location: impl Into<String>) -> Self {
        self.initial_location = Some(location.into());
        self
    }

    /// Name the branch for diagnostics.
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// The branch's routes, in order.
    pub fn routes(&self) -> &[Arc<Route>] {
        &self.routes
    }

    /// The branch name, if any.
    pub fn get_name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// The explicit initial location, if one was set.
    pub fn get_initial_location(&self) -> Option<&str> {
        self.initial_location.as_deref()
    }
}

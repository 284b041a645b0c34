//! The navigation state machine.
//!
//! A [`Router`] owns the flattened route tree, the guard and middleware
//! registries, and the [`NavigationState`]. Every navigation request
//! (`go`, `push`, `pop`, named and deep-link variants, shell branch
//! operations) runs through the same pipeline:
//!
//! 1. **Resolve.** The router-level redirect and the matched route's own
//!    redirect are applied until neither asks for another hop.
//! 2. **Match.** The first route (in registration order) whose pattern
//!    completely matches the path wins. No match fails with
//!    [`NavigationError::RouteNotFound`].
//! 3. **Echo.** The target is shown as the current path while gating runs.
//! 4. **Guard.** Registry guards for the path, then each route of the
//!    matched chain (outermost first) with its access predicate and guards.
//! 5. **Middleware.** Same order as guards.
//! 6. **Commit.** The navigation stack and branch stacks are updated and
//!    the after-activation hooks run.
//!
//! Guard and middleware redirects restart the pipeline at step 1. Every hop
//! from any source counts toward the configured redirect limit.
//!
//! A failure rolls `current_path` back to the last committed location and
//! attaches the error to the current context. Attempts overtaken by a newer
//! navigation return [`NavigationError::Superseded`] and leave state alone.
//!
//! # Example
//!
//! ```
//! use shell_navigator::{AuthGuard, Route, Router, RouterConfig};
//!
//! # pollster::block_on(async {
//! let router = Router::new(
//!     vec![
//!         Route::new("/"),
//!         Route::new("/login"),
//!         Route::new("/users/:userId").name("userProfile"),
//!         Route::new("/profile").guard(AuthGuard::new(|_| false, "/login")),
//!     ],
//!     RouterConfig::default(),
//! );
//!
//! let ctx = router.go("/users/42", None).await.unwrap();
//! assert_eq!(ctx.param("userId"), Some("42"));
//!
//! router.go("/profile", None).await.unwrap();
//! assert_eq!(router.current_path(), "/login");
//! # });
//! ```

use crate::config::RouterConfig;
use crate::context::{Extra, NavigationContext};
use crate::error::NavigationError;
use crate::guards::RouteGuard;
use crate::middleware::RouteMiddleware;
use crate::nested::find_child_routes;
use crate::params::{QueryParams, RouteParams};
use crate::path::{build_breadcrumbs, normalize_location, parent_path, path_depth, split_query};
use crate::pipeline::{AccessGuard, Gate, Pipeline};
use crate::route::{RenderHandle, Route};
use crate::shell::ShellHandle;
use crate::state::{BranchEffect, NavigationState, StackOp};
use crate::tree::{FlatRouteIndex, RouteMatch};
use crate::{debug_log, diag_log, error_log, info_log, warn_log};
use parking_lot::RwLock;
use std::fmt;
use std::sync::Arc;

#[cfg(feature = "cache")]
use crate::cache::{CacheStats, RouteCache};
#[cfg(feature = "cache")]
use crate::pattern::MatchMode;
#[cfg(feature = "cache")]
use parking_lot::Mutex;

/// What should be rendered for the current location.
#[derive(Debug, Clone)]
pub enum RouteView {
    /// A route matched; `render` is its render handle, if it has one.
    Matched {
        route: RouteMatch,
        render: Option<RenderHandle>,
    },
    /// Nothing matches the current path.
    NotFound {
        path: String,
        render: Option<RenderHandle>,
    },
    /// The last navigation failed.
    Error {
        error: NavigationError,
        render: Option<RenderHandle>,
    },
}

/// Declarative router.
///
/// All navigation methods take `&self`; share the router behind an `Arc` to
/// navigate from several tasks.
pub struct Router {
    index: FlatRouteIndex,
    config: RouterConfig,
    state: RwLock<NavigationState>,
    pipeline: RwLock<Pipeline>,
    #[cfg(feature = "cache")]
    cache: Mutex<RouteCache>,
}

impl Router {
    /// Build a router over `routes`.
    ///
    /// The initial route is matched without running guards or middleware.
    /// If it belongs to a shell branch, that branch starts active with the
    /// initial route on its stack.
    pub fn new(routes: Vec<Route>, config: RouterConfig) -> Self {
        let routes: Vec<Arc<Route>> = routes.into_iter().map(Arc::new).collect();
        let index = FlatRouteIndex::new(&routes);

        let initial = normalize_location(config.get_initial_route()).into_owned();
        let matched = index.find(split_query(&initial).0);
        let mut ctx = NavigationContext::new(initial.clone());
        match &matched {
            Some(m) => {
                ctx = ctx.with_match(
                    m.matched_path.clone(),
                    m.path_parameters.clone(),
                    m.route.get_name().map(str::to_string),
                );
            }
            None => {
                warn_log!("Initial route '{}' matches no route", initial);
                ctx = ctx.with_error(NavigationError::RouteNotFound {
                    path: initial.clone(),
                });
            }
        }

        let branch_initials = index
            .branches()
            .iter()
            .map(|b| normalize_location(&b.initial_location).into_owned())
            .collect();
        let mut state = NavigationState::new(ctx, branch_initials);
        let initial_branch = matched
            .as_ref()
            .and_then(|m| index.get(m.index))
            .and_then(|entry| entry.branch);
        if let Some(branch) = initial_branch {
            state.activate_branch(branch, &initial);
        }

        info_log!(
            "Router created with {} routes, initial route '{}'",
            index.len(),
            initial
        );

        Self {
            #[cfg(feature = "cache")]
            cache: Mutex::new(RouteCache::with_capacity(config.get_cache_capacity())),
            index,
            config,
            state: RwLock::new(state),
            pipeline: RwLock::new(Pipeline::new()),
        }
    }

    // ========================================================================
    // Navigation
    // ========================================================================

    /// Navigate to `location`, replacing the top of the navigation stack.
    pub async fn go(
        &self,
        location: &str,
        extra: Option<Extra>,
    ) -> Result<NavigationContext, NavigationError> {
        self.navigate(location, extra, StackOp::Replace, BranchEffect::None)
            .await
    }

    /// Navigate to `location`, pushing it onto the navigation stack.
    pub async fn push(
        &self,
        location: &str,
        extra: Option<Extra>,
    ) -> Result<NavigationContext, NavigationError> {
        self.navigate(location, extra, StackOp::Push, BranchEffect::None)
            .await
    }

    /// Return to the previous stack entry.
    ///
    /// With a single entry on the stack this does nothing and returns the
    /// current context.
    pub async fn pop(&self) -> Result<NavigationContext, NavigationError> {
        let target = self
            .state
            .read()
            .navigation_stack()
            .iter()
            .rev()
            .nth(1)
            .cloned();
        match target {
            Some(target) => {
                self.navigate(&target, None, StackOp::Pop, BranchEffect::None)
                    .await
            }
            None => {
                debug_log!("pop() ignored: navigation stack has a single entry");
                Ok(self.current_context())
            }
        }
    }

    /// [`go`](Self::go) to the route registered under `name`.
    pub async fn go_named(
        &self,
        name: &str,
        path_params: &RouteParams,
        query_params: &QueryParams,
    ) -> Result<NavigationContext, NavigationError> {
        let location = self.named_location(name, path_params, query_params)?;
        self.go(&location, None).await
    }

    /// [`push`](Self::push) the route registered under `name`.
    pub async fn push_named(
        &self,
        name: &str,
        path_params: &RouteParams,
        query_params: &QueryParams,
    ) -> Result<NavigationContext, NavigationError> {
        let location = self.named_location(name, path_params, query_params)?;
        self.push(&location, None).await
    }

    /// Navigate to the path (and query) of an incoming URL.
    ///
    /// Scheme and host are ignored, so `myapp://open/users/7` and
    /// `https://example.com/users/7` both lead to `/users/7`. Input that is
    /// not an absolute URL is treated as a path.
    pub async fn handle_deep_link(
        &self,
        link: &str,
    ) -> Result<NavigationContext, NavigationError> {
        let location = deep_link_location(link);
        debug_log!("Deep link '{}' -> '{}'", link, location);
        self.go(&location, None).await
    }

    /// Shell branch operations.
    pub fn shell(&self) -> ShellHandle<'_> {
        ShellHandle::new(self)
    }

    fn named_location(
        &self,
        name: &str,
        path_params: &RouteParams,
        query_params: &QueryParams,
    ) -> Result<String, NavigationError> {
        match self.index.url_for(name, path_params, query_params) {
            Some(location) => {
                debug_log!("Named route '{}' -> '{}'", name, location);
                Ok(location)
            }
            None => {
                warn_log!("Named route '{}' not found", name);
                let error = NavigationError::UnknownRouteName {
                    name: name.to_string(),
                };
                self.report_error(&error);
                Err(error)
            }
        }
    }

    // ========================================================================
    // Pipeline
    // ========================================================================

    pub(crate) async fn navigate(
        &self,
        location: &str,
        extra: Option<Extra>,
        op: StackOp,
        effect: BranchEffect,
    ) -> Result<NavigationContext, NavigationError> {
        let nav_id = self.state.read().start_navigation();
        let location = normalize_location(location).into_owned();
        info_log!("Navigation #{} {:?}: '{}'", nav_id, op, location);

        match self.attempt(nav_id, location, extra, op, effect).await {
            Ok(ctx) => {
                info_log!("Navigation #{} complete: '{}'", nav_id, ctx.full_path);
                Ok(ctx)
            }
            Err(error) if error.is_superseded() => {
                debug_log!("Navigation #{} superseded", nav_id);
                Err(error)
            }
            Err(error) => self.fail(nav_id, error),
        }
    }

    async fn attempt(
        &self,
        nav_id: usize,
        mut location: String,
        extra: Option<Extra>,
        op: StackOp,
        effect: BranchEffect,
    ) -> Result<NavigationContext, NavigationError> {
        let diagnostics = self.config.diagnostics();
        let mut redirects = 0;

        loop {
            let matched = self.resolve(&mut location, &mut redirects, extra.as_ref())?;
            diag_log!(
                diagnostics,
                "Matched '{}' against '{}'",
                location,
                matched.pattern
            );

            let stack = self.state.read().navigation_stack().to_vec();
            let ctx = NavigationContext::new(location.clone())
                .with_match(
                    matched.matched_path.clone(),
                    matched.path_parameters.clone(),
                    matched.route.get_name().map(str::to_string),
                )
                .with_extra(extra.clone())
                .with_stack(stack);

            {
                let mut state = self.state.write();
                if !state.is_navigation_current(nav_id) {
                    return Err(NavigationError::Superseded { path: location });
                }
                state.echo(&location, ctx.clone());
            }

            let chain = self.index.chain(matched.index);

            let guards = self.collect_guards(&location, &chain);
            let ctx = match Pipeline::run_guards(&guards, ctx, diagnostics).await {
                Gate::Pass(ctx) => ctx,
                Gate::Redirect(to) => {
                    self.hop(&mut location, &mut redirects, &to, "guard")?;
                    continue;
                }
                Gate::Reject(error) => return Err(error),
            };

            let middleware = self.collect_middleware(&location, &chain);
            let ctx = match Pipeline::run_middleware(&middleware, ctx, diagnostics).await {
                Gate::Pass(ctx) => ctx,
                Gate::Redirect(to) => {
                    self.hop(&mut location, &mut redirects, &to, "middleware")?;
                    continue;
                }
                Gate::Reject(error) => return Err(error),
            };

            let committed = {
                let mut state = self.state.write();
                if !state.is_navigation_current(nav_id) {
                    return Err(NavigationError::Superseded { path: location });
                }
                state.commit(&location, ctx, op, effect)
            };
            diag_log!(
                diagnostics,
                "Committed '{}' (stack depth {})",
                committed.full_path,
                committed.navigation_stack.len()
            );

            Pipeline::notify_activated(&middleware, &committed, diagnostics).await;
            return Ok(committed);
        }
    }

    /// Apply the router-level and route-level redirects until neither asks
    /// for another hop, then match.
    fn resolve(
        &self,
        location: &mut String,
        redirects: &mut usize,
        extra: Option<&Extra>,
    ) -> Result<RouteMatch, NavigationError> {
        loop {
            let candidate = NavigationContext::new(location.clone()).with_extra(extra.cloned());
            if let Some(redirect) = self.config.get_redirect() {
                if let Some(next) = redirect(&candidate) {
                    self.hop(location, redirects, &next, "router")?;
                    continue;
                }
            }

            let path = split_query(location.as_str()).0.to_string();
            let Some(matched) = self.lookup(&path) else {
                return Err(NavigationError::RouteNotFound {
                    path: location.clone(),
                });
            };

            if let Some(redirect) = matched.route.get_redirect() {
                let candidate = candidate.with_match(
                    matched.matched_path.clone(),
                    matched.path_parameters.clone(),
                    matched.route.get_name().map(str::to_string),
                );
                if let Some(next) = redirect(&candidate) {
                    self.hop(location, redirects, &next, "route")?;
                    continue;
                }
            }

            return Ok(matched);
        }
    }

    /// Count one redirect and move `location` to `to`.
    fn hop(
        &self,
        location: &mut String,
        redirects: &mut usize,
        to: &str,
        source: &str,
    ) -> Result<(), NavigationError> {
        *redirects += 1;
        let limit = self.config.get_redirect_limit();
        if *redirects >= limit {
            warn_log!(
                "Redirect limit ({}) reached at '{}' -> '{}'",
                limit,
                location,
                to
            );
            return Err(NavigationError::RedirectLoop { count: *redirects });
        }
        let next = normalize_location(to).into_owned();
        diag_log!(
            self.config.diagnostics(),
            "Redirect #{} ({}): '{}' -> '{}'",
            redirects,
            source,
            location,
            next
        );
        *location = next;
        Ok(())
    }

    fn collect_guards(&self, location: &str, chain: &[usize]) -> Vec<Arc<dyn RouteGuard>> {
        let mut guards = self.pipeline.read().guards.collect(location);
        for entry in chain.iter().filter_map(|&i| self.index.get(i)) {
            if let Some(predicate) = entry.route.get_access_guard() {
                guards.push(Arc::new(AccessGuard::new(Arc::clone(predicate))));
            }
            guards.extend(entry.route.get_guards().iter().cloned());
        }
        guards
    }

    fn collect_middleware(
        &self,
        location: &str,
        chain: &[usize],
    ) -> Vec<Arc<dyn RouteMiddleware>> {
        let mut middleware = self.pipeline.read().middleware.collect(location);
        for entry in chain.iter().filter_map(|&i| self.index.get(i)) {
            middleware.extend(entry.route.get_middleware().iter().cloned());
        }
        middleware
    }

    fn fail(
        &self,
        nav_id: usize,
        error: NavigationError,
    ) -> Result<NavigationContext, NavigationError> {
        {
            let mut state = self.state.write();
            if !state.is_navigation_current(nav_id) {
                debug_log!("Navigation #{} failed after being superseded", nav_id);
                return Err(NavigationError::Superseded {
                    path: state.current_path().to_string(),
                });
            }
            state.rollback(error.clone());
        }
        self.report_error(&error);
        Err(error)
    }

    pub(crate) fn report_error(&self, error: &NavigationError) {
        match self.config.get_on_error() {
            Some(listener) => listener(error),
            None => {
                error_log!("Navigation failed: {}", error);
            }
        }
    }

    fn lookup(&self, path: &str) -> Option<RouteMatch> {
        #[cfg(feature = "cache")]
        {
            let cached = self.cache.lock().get(path);
            let index = match cached {
                Some(index) => index,
                None => {
                    let index = self.index.find_index(path);
                    self.cache.lock().insert(path.to_string(), index);
                    index
                }
            };
            index.and_then(|i| self.index.match_at(i, path, MatchMode::Exact))
        }
        #[cfg(not(feature = "cache"))]
        {
            self.index.find(path)
        }
    }

    // ========================================================================
    // Guard and middleware registries
    // ========================================================================

    /// Register `guard` for `scope`: `"*"` for every navigation, an exact
    /// path, or a prefix ending in `*` such as `"admin/*"`.
    pub fn add_guard<G: RouteGuard>(&self, scope: impl Into<String>, guard: G) {
        self.pipeline.write().guards.add(scope, Arc::new(guard));
    }

    /// Remove every guard registered for `scope`. Returns how many were removed.
    pub fn remove_guards(&self, scope: &str) -> usize {
        self.pipeline.write().guards.remove(scope)
    }

    /// Register `middleware` for `scope`. Scopes work as for guards.
    pub fn add_middleware<M: RouteMiddleware>(&self, scope: impl Into<String>, middleware: M) {
        self.pipeline
            .write()
            .middleware
            .add(scope, Arc::new(middleware));
    }

    /// Remove every middleware registered for `scope`.
    pub fn remove_middleware(&self, scope: &str) -> usize {
        self.pipeline.write().middleware.remove(scope)
    }

    // ========================================================================
    // Queries
    // ========================================================================

    /// Current location, query string included.
    pub fn current_path(&self) -> String {
        self.state.read().current_path().to_string()
    }

    /// Context of the current location.
    pub fn current_context(&self) -> NavigationContext {
        self.state.read().current_context().clone()
    }

    /// Navigation stack, oldest first.
    pub fn navigation_stack(&self) -> Vec<String> {
        self.state.read().navigation_stack().to_vec()
    }

    /// `true` if [`pop`](Self::pop) would navigate.
    pub fn can_pop(&self) -> bool {
        self.state.read().navigation_stack().len() > 1
    }

    /// Route matching the current location.
    pub fn current_route(&self) -> Option<RouteMatch> {
        let current = self.current_path();
        self.lookup(split_query(&current).0)
    }

    /// The current route and its ancestors, outermost first.
    pub fn match_stack(&self) -> Vec<RouteMatch> {
        let current = self.current_path();
        let path = split_query(&current).0;
        match self.lookup(path) {
            Some(m) => self.index.match_stack(m.index, path),
            None => Vec::new(),
        }
    }

    /// Decide what to render for the current location.
    pub fn resolve_view(&self) -> RouteView {
        let ctx = self.current_context();
        let handlers = self.config.error_handlers();
        if let Some(error) = &ctx.error {
            return RouteView::Error {
                render: handlers.render_error(&ctx, error),
                error: error.clone(),
            };
        }
        match self.lookup(ctx.path()) {
            Some(route) => RouteView::Matched {
                render: route.route.get_render().cloned(),
                route,
            },
            None => RouteView::NotFound {
                render: handlers.render_not_found(&ctx),
                path: ctx.full_path,
            },
        }
    }

    /// Breadcrumb trail of the current location.
    pub fn breadcrumbs(&self) -> Vec<String> {
        build_breadcrumbs(split_query(&self.current_path()).0)
    }

    /// Parent of the current location; `None` at root.
    pub fn parent_path(&self) -> Option<String> {
        parent_path(split_query(&self.current_path()).0)
    }

    /// Number of segments in the current location.
    pub fn depth(&self) -> usize {
        path_depth(split_query(&self.current_path()).0)
    }

    /// Registered route patterns one segment below the current location.
    pub fn child_routes(&self) -> Vec<String> {
        let current = self.current_path();
        find_child_routes(
            split_query(&current).0,
            self.index.iter().map(|r| r.pattern.as_str()),
        )
        .into_iter()
        .map(str::to_string)
        .collect()
    }

    /// Location of the route named `name`, or `None` if no route has it.
    ///
    /// Parameter values are written verbatim, but the query of the resulting
    /// location is form-decoded when it is navigated to. A value holding `+`,
    /// `%`, `&` or `=` must be percent-encoded by the caller to read back
    /// unchanged from [`NavigationContext::query`].
    pub fn url_for(
        &self,
        name: &str,
        path_params: &RouteParams,
        query_params: &QueryParams,
    ) -> Option<String> {
        self.index.url_for(name, path_params, query_params)
    }

    /// Flattened route table.
    pub fn routes(&self) -> &FlatRouteIndex {
        &self.index
    }

    /// Router configuration.
    pub fn config(&self) -> &RouterConfig {
        &self.config
    }

    /// Route cache counters.
    #[cfg(feature = "cache")]
    pub fn cache_stats(&self) -> CacheStats {
        self.cache.lock().stats().clone()
    }

    pub(crate) fn with_state<R>(&self, f: impl FnOnce(&NavigationState) -> R) -> R {
        f(&self.state.read())
    }
}

impl fmt::Debug for Router {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Router")
            .field("routes", &self.index.len())
            .field("current_path", &self.current_path())
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

/// Path and query of a deep link. Falls back to treating the input as a
/// path when it does not parse as an absolute URL.
fn deep_link_location(link: &str) -> String {
    match url::Url::parse(link) {
        Ok(url) if !url.cannot_be_a_base() => {
            let mut location = match url.path() {
                "" => "/".to_string(),
                path => path.to_string(),
            };
            if let Some(query) = url.query().filter(|q| !q.is_empty()) {
                location.push('?');
                location.push_str(query);
            }
            location
        }
        _ => normalize_location(link).into_owned(),
    }
}

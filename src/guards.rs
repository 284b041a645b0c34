//! Route guards for authentication, authorization, and validation.
//!
//! Guards are checked **before** middleware and before anything is committed.
//! They decide whether a navigation should be allowed, allowed with a
//! modified context, denied, redirected elsewhere, or failed with an error.
//!
//! Guards are **async**: a check may suspend, for example to ask a remote
//! service for a permission. The router awaits each guard fully before it
//! invokes the next one, so guards never run in parallel.
//!
//! # Built-in guards
//!
//! | Guard | Purpose |
//! |-------|---------|
//! | [`AuthGuard`] | Checks authentication via a user-provided predicate |
//! | [`FnGuard`] | Wraps a synchronous closure (see [`guard_fn`]) |
//! | [`AsyncFnGuard`] | Wraps a closure returning a future (see [`async_guard_fn`]) |
//!
//! # Composition
//!
//! | Combinator | Logic |
//! |------------|-------|
//! | [`Guards`] | AND: all guards must allow, in the order they were added |
//! | [`NotGuard`] | Invert: allow becomes deny, deny becomes allow |
//!
//! # Example
//!
//! ```
//! use shell_navigator::{guard_fn, AuthGuard, GuardOutcome, Guards};
//!
//! let guard = Guards::builder()
//!     .guard(AuthGuard::new(|_ctx| true, "/login"))
//!     .guard(guard_fn(|ctx| {
//!         if ctx.param("id") == Some("0") {
//!             GuardOutcome::deny("id 0 is reserved")
//!         } else {
//!             GuardOutcome::Allow
//!         }
//!     }))
//!     .build();
//! # let _ = guard;
//! ```

use crate::context::NavigationContext;
use crate::error::{BoxError, SharedError};
use async_trait::async_trait;
use std::future::Future;
use std::sync::Arc;

// ============================================================================
// GuardOutcome
// ============================================================================

/// Decision returned by a [`RouteGuard`].
#[derive(Debug, Clone)]
pub enum GuardOutcome {
    /// Continue with the context unchanged.
    Allow,

    /// Continue, but later guards and middleware see this context instead.
    AllowWith(NavigationContext),

    /// Abort the navigation.
    Deny {
        /// Human-readable reason for denying navigation.
        reason: String,
    },

    /// Abort and restart the navigation at another path.
    Redirect {
        /// Path to redirect to.
        to: String,
    },

    /// Abort with an error.
    Error(SharedError),
}

impl GuardOutcome {
    /// Deny with a human-readable reason.
    pub fn deny(reason: impl Into<String>) -> Self {
        Self::Deny {
            reason: reason.into(),
        }
    }

    /// Redirect to a different path.
    pub fn redirect(to: impl Into<String>) -> Self {
        Self::Redirect { to: to.into() }
    }

    /// Fail with an error.
    pub fn error(error: impl Into<BoxError>) -> Self {
        Self::Error(Arc::from(error.into()))
    }

    /// Check if this outcome lets navigation continue.
    pub fn is_allow(&self) -> bool {
        matches!(self, Self::Allow | Self::AllowWith(_))
    }

    /// Check if this outcome denies navigation.
    pub fn is_deny(&self) -> bool {
        matches!(self, Self::Deny { .. })
    }

    /// Check if this outcome redirects navigation.
    pub fn is_redirect(&self) -> bool {
        matches!(self, Self::Redirect { .. })
    }

    /// Get the redirect path, if this is a redirect.
    pub fn redirect_path(&self) -> Option<&str> {
        match self {
            Self::Redirect { to } => Some(to.as_str()),
            _ => None,
        }
    }
}

// ============================================================================
// RouteGuard trait
// ============================================================================

/// Trait for route guards that control access to routes.
///
/// # Example
///
/// ```
/// use async_trait::async_trait;
/// use shell_navigator::{GuardOutcome, NavigationContext, RouteGuard};
///
/// struct SessionGuard {
///     redirect_to: String,
/// }
///
/// #[async_trait]
/// impl RouteGuard for SessionGuard {
///     async fn check(&self, ctx: &NavigationContext) -> GuardOutcome {
///         if ctx.query("token").is_some() {
///             GuardOutcome::Allow
///         } else {
///             GuardOutcome::redirect(&self.redirect_to)
///         }
///     }
///
///     fn name(&self) -> &str {
///         "SessionGuard"
///     }
/// }
/// ```
#[async_trait]
pub trait RouteGuard: Send + Sync + 'static {
    /// Decide whether the navigation described by `ctx` may continue.
    async fn check(&self, ctx: &NavigationContext) -> GuardOutcome;

    /// Guard name for diagnostics and error messages.
    fn name(&self) -> &str {
        "RouteGuard"
    }
}

// ============================================================================
// guard_fn helpers
// ============================================================================

/// Create a guard from a synchronous closure.
///
/// ```
/// use shell_navigator::{guard_fn, GuardOutcome};
///
/// let guard = guard_fn(|ctx| {
///     if ctx.path().starts_with("/admin") {
///         GuardOutcome::redirect("/login")
///     } else {
///         GuardOutcome::Allow
///     }
/// });
/// # let _ = guard;
/// ```
pub const fn guard_fn<F>(f: F) -> FnGuard<F>
where
    F: Fn(&NavigationContext) -> GuardOutcome + Send + Sync + 'static,
{
    FnGuard { f, name: None }
}

/// Guard created from a synchronous closure.
pub struct FnGuard<F> {
    f: F,
    name: Option<String>,
}

impl<F> FnGuard<F> {
    /// Give the guard a name for diagnostics.
    #[must_use]
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }
}

#[async_trait]
impl<F> RouteGuard for FnGuard<F>
where
    F: Fn(&NavigationContext) -> GuardOutcome + Send + Sync + 'static,
{
    async fn check(&self, ctx: &NavigationContext) -> GuardOutcome {
        (self.f)(ctx)
    }

    fn name(&self) -> &str {
        self.name.as_deref().unwrap_or("FnGuard")
    }
}

/// Create a guard from a closure returning a future.
///
/// The closure receives its own copy of the context so the future does not
/// borrow from the router.
///
/// ```
/// use shell_navigator::{async_guard_fn, GuardOutcome};
///
/// let guard = async_guard_fn(|ctx| async move {
///     if ctx.param("id").is_some() {
///         GuardOutcome::Allow
///     } else {
///         GuardOutcome::deny("missing id")
///     }
/// });
/// # let _ = guard;
/// ```
pub const fn async_guard_fn<F, Fut>(f: F) -> AsyncFnGuard<F>
where
    F: Fn(NavigationContext) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = GuardOutcome> + Send + 'static,
{
    AsyncFnGuard { f, name: None }
}

/// Guard created from an async closure via [`async_guard_fn`].
pub struct AsyncFnGuard<F> {
    f: F,
    name: Option<String>,
}

impl<F> AsyncFnGuard<F> {
    /// Give the guard a name for diagnostics.
    #[must_use]
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }
}

#[async_trait]
impl<F, Fut> RouteGuard for AsyncFnGuard<F>
where
    F: Fn(NavigationContext) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = GuardOutcome> + Send + 'static,
{
    async fn check(&self, ctx: &NavigationContext) -> GuardOutcome {
        (self.f)(ctx.clone()).await
    }

    fn name(&self) -> &str {
        self.name.as_deref().unwrap_or("AsyncFnGuard")
    }
}

// ============================================================================
// AuthGuard
// ============================================================================

/// Predicate type for authentication checks.
///
/// Receives the navigation context and returns `true` if the user is
/// authenticated.
pub type AuthCheckFn = Box<dyn Fn(&NavigationContext) -> bool + Send + Sync>;

/// Authentication guard that redirects anonymous users.
///
/// ```
/// use shell_navigator::{AuthGuard, Route};
///
/// let route = Route::new("/profile")
///     .guard(AuthGuard::new(|_ctx| false, "/login"));
/// # let _ = route;
/// ```
pub struct AuthGuard {
    check_fn: AuthCheckFn,
    redirect_path: String,
}

impl AuthGuard {
    /// Create a new auth guard with a check predicate and redirect path.
    pub fn new<F>(check_fn: F, redirect_path: impl Into<String>) -> Self
    where
        F: Fn(&NavigationContext) -> bool + Send + Sync + 'static,
    {
        Self {
            check_fn: Box::new(check_fn),
            redirect_path: redirect_path.into(),
        }
    }

    /// Create an auth guard that always allows access (for testing/development).
    #[cfg(debug_assertions)]
    #[must_use]
    pub fn allow_all() -> Self {
        Self::new(|_| true, "/login")
    }

    /// Create an auth guard that always redirects (for testing/development).
    #[cfg(debug_assertions)]
    pub fn deny_all(redirect_path: impl Into<String>) -> Self {
        Self::new(|_| false, redirect_path)
    }
}

#[async_trait]
impl RouteGuard for AuthGuard {
    async fn check(&self, ctx: &NavigationContext) -> GuardOutcome {
        if (self.check_fn)(ctx) {
            GuardOutcome::Allow
        } else {
            GuardOutcome::redirect(&self.redirect_path)
        }
    }

    fn name(&self) -> &str {
        "AuthGuard"
    }
}

// ============================================================================
// Guard Composition
// ============================================================================

/// Combines multiple guards with AND logic.
///
/// Guards run in the order they were added. An [`AllowWith`](GuardOutcome::AllowWith)
/// result replaces the context seen by the following guards, and the final
/// modified context is returned. The first deny, redirect, or error result
/// is returned immediately.
pub struct Guards {
    guards: Vec<Arc<dyn RouteGuard>>,
}

impl Guards {
    /// Create a new AND composition.
    #[must_use]
    pub fn new(guards: Vec<Arc<dyn RouteGuard>>) -> Self {
        Self { guards }
    }

    /// Start building a guard composition.
    pub fn builder() -> GuardBuilder {
        GuardBuilder::new()
    }

    /// Number of composed guards.
    pub fn len(&self) -> usize {
        self.guards.len()
    }

    /// `true` if no guards were added.
    pub fn is_empty(&self) -> bool {
        self.guards.is_empty()
    }
}

#[async_trait]
impl RouteGuard for Guards {
    async fn check(&self, ctx: &NavigationContext) -> GuardOutcome {
        let mut modified: Option<NavigationContext> = None;

        for guard in &self.guards {
            let current = modified.as_ref().unwrap_or(ctx);
            match guard.check(current).await {
                GuardOutcome::Allow => {}
                GuardOutcome::AllowWith(next) => modified = Some(next),
                other => return other,
            }
        }

        modified.map_or(GuardOutcome::Allow, GuardOutcome::AllowWith)
    }

    fn name(&self) -> &str {
        "Guards"
    }
}

/// Builder for [`Guards`] with fluent API.
#[must_use]
#[derive(Default)]
pub struct GuardBuilder {
    guards: Vec<Arc<dyn RouteGuard>>,
}

impl GuardBuilder {
    /// Create a new builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a guard to the composition.
    pub fn guard<G: RouteGuard>(mut self, guard: G) -> Self {
        self.guards.push(Arc::new(guard));
        self
    }

    /// Build the final [`Guards`].
    #[must_use]
    pub fn build(self) -> Guards {
        Guards::new(self.guards)
    }
}

// ============================================================================
// NotGuard
// ============================================================================

/// Inverts a guard result.
///
/// - `Allow` / `AllowWith` become `Deny`
/// - `Deny` becomes `Allow`
/// - `Redirect` and `Error` are preserved as-is
///
/// ```
/// use shell_navigator::{AuthGuard, NotGuard};
///
/// // Only anonymous users may open the login page.
/// let guard = NotGuard::new(AuthGuard::new(|_| true, "/login"));
/// # let _ = guard;
/// ```
pub struct NotGuard {
    guard: Box<dyn RouteGuard>,
}

impl NotGuard {
    /// Create a new NOT guard wrapping the given guard.
    pub fn new<G: RouteGuard>(guard: G) -> Self {
        Self {
            guard: Box::new(guard),
        }
    }
}

#[async_trait]
impl RouteGuard for NotGuard {
    async fn check(&self, ctx: &NavigationContext) -> GuardOutcome {
        match self.guard.check(ctx).await {
            GuardOutcome::Allow | GuardOutcome::AllowWith(_) => {
                GuardOutcome::deny(format!("Inverted: {} allowed", self.guard.name()))
            }
            GuardOutcome::Deny { .. } => GuardOutcome::Allow,
            other => other,
        }
    }

    fn name(&self) -> &str {
        "NotGuard"
    }
}

// ============================================================================
// Tests
// ============================================================================

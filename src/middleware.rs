//! Route middleware for cross-cutting navigation concerns.
//!
//! Middleware runs after every guard has allowed a navigation. Unlike guards
//! (which decide *if* navigation happens), middleware prepares the context:
//! loading data, attaching values, logging, or sending the user elsewhere.
//!
//! Each middleware has two hooks:
//!
//! - [`handle`](RouteMiddleware::handle) runs before the commit and gates it.
//!   Its [`MiddlewareOutcome`] can replace the context seen by the next
//!   middleware, redirect, or abort with an error.
//! - [`on_activated`](RouteMiddleware::on_activated) runs after the commit.
//!   It is a best-effort notification; an error here is logged and does not
//!   undo the navigation.
//!
//! Middleware run strictly one after another, in registration order, for both
//! hooks.
//!
//! # Creating middleware
//!
//! | Approach | When to use |
//! |----------|-------------|
//! | Implement [`RouteMiddleware`] | Full control, async, named |
//! | [`middleware_fn`] | Quick one-off from two closures |
//!
//! # Example
//!
//! ```
//! use async_trait::async_trait;
//! use shell_navigator::{MiddlewareOutcome, NavigationContext, RouteMiddleware};
//!
//! struct LocaleMiddleware;
//!
//! #[async_trait]
//! impl RouteMiddleware for LocaleMiddleware {
//!     async fn handle(&self, ctx: &NavigationContext) -> MiddlewareOutcome {
//!         if ctx.query("lang").is_none() {
//!             MiddlewareOutcome::Modified(ctx.clone().with_param("lang", "en"))
//!         } else {
//!             MiddlewareOutcome::Proceed
//!         }
//!     }
//!
//!     fn name(&self) -> &str {
//!         "LocaleMiddleware"
//!     }
//! }
//! ```

use crate::context::NavigationContext;
use crate::error::{BoxError, SharedError};
use async_trait::async_trait;
use std::sync::Arc;

// ============================================================================
// MiddlewareOutcome
// ============================================================================

/// Decision returned by [`RouteMiddleware::handle`].
#[derive(Debug, Clone)]
pub enum MiddlewareOutcome {
    /// Continue with the context unchanged.
    Proceed,

    /// Continue; the following middleware and the commit use this context.
    Modified(NavigationContext),

    /// Abort and restart the navigation at another path.
    Redirect(String),

    /// Abort with an error.
    Error(SharedError),
}

impl MiddlewareOutcome {
    /// Redirect to a different path.
    pub fn redirect(to: impl Into<String>) -> Self {
        Self::Redirect(to.into())
    }

    /// Fail with an error.
    pub fn error(error: impl Into<BoxError>) -> Self {
        Self::Error(Arc::from(error.into()))
    }

    /// Check if this outcome lets navigation continue.
    pub fn is_proceed(&self) -> bool {
        matches!(self, Self::Proceed | Self::Modified(_))
    }
}

// ============================================================================
// RouteMiddleware trait
// ============================================================================

/// Middleware that processes navigation contexts.
#[async_trait]
pub trait RouteMiddleware: Send + Sync + 'static {
    /// Called before the navigation is committed.
    async fn handle(&self, ctx: &NavigationContext) -> MiddlewareOutcome;

    /// Called after the navigation was committed.
    async fn on_activated(&self, _ctx: &NavigationContext) -> Result<(), BoxError> {
        Ok(())
    }

    /// Middleware name for diagnostics.
    fn name(&self) -> &str {
        "RouteMiddleware"
    }
}

// ============================================================================
// middleware_fn helper
// ============================================================================

/// Create middleware from two closures (handle and after-activation).
///
/// The two closures can be **different types**.
///
/// ```
/// use shell_navigator::{middleware_fn, MiddlewareOutcome};
///
/// let mw = middleware_fn(
///     |ctx| {
///         println!("Before: {}", ctx.full_path);
///         MiddlewareOutcome::Proceed
///     },
///     |ctx| {
///         println!("After: {}", ctx.full_path);
///     },
/// );
/// # let _ = mw;
/// ```
pub const fn middleware_fn<B, A>(before: B, after: A) -> FnMiddleware<B, A>
where
    B: Fn(&NavigationContext) -> MiddlewareOutcome + Send + Sync + 'static,
    A: Fn(&NavigationContext) + Send + Sync + 'static,
{
    FnMiddleware {
        before,
        after,
        name: None,
    }
}

/// Middleware created from two closures via [`middleware_fn`].
pub struct FnMiddleware<B, A> {
    before: B,
    after: A,
    name: Option<String>,
}

impl<B, A> FnMiddleware<B, A> {
    /// Give the middleware a name for diagnostics.
    #[must_use]
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }
}

#[async_trait]
impl<B, A> RouteMiddleware for FnMiddleware<B, A>
where
    B: Fn(&NavigationContext) -> MiddlewareOutcome + Send + Sync + 'static,
    A: Fn(&NavigationContext) + Send + Sync + 'static,
{
    async fn handle(&self, ctx: &NavigationContext) -> MiddlewareOutcome {
        (self.before)(ctx)
    }

    async fn on_activated(&self, ctx: &NavigationContext) -> Result<(), BoxError> {
        (self.after)(ctx);
        Ok(())
    }

    fn name(&self) -> &str {
        self.name.as_deref().unwrap_or("FnMiddleware")
    }
}

// ============================================================================
// Tests
// ============================================================================

//! Error handling for the router.
//!
//! This module defines the types produced when a navigation attempt cannot
//! complete successfully:
//!
//! - [`NavigationError`]: a detailed error variant (route not found, guard
//!   rejected, redirect loop, etc.).
//! - [`ErrorHandlers`]: a builder for registering custom not-found and error
//!   view builders used by the rendering layer.
//!
//! Every failed navigation attaches its error to the router's current
//! [`NavigationContext`](crate::NavigationContext), so the rendering layer
//! can pick it up through [`Router::resolve_view`](crate::Router::resolve_view).
//!
//! # Examples
//!
//! ```
//! use shell_navigator::NavigationError;
//!
//! let error = NavigationError::RedirectLoop { count: 5 };
//! assert_eq!(error.to_string(), "Redirect loop detected after 5 redirects");
//! assert!(error.is_redirect_loop());
//! ```

use crate::context::NavigationContext;
use crate::route::RenderHandle;
use std::collections::HashMap;
use std::error::Error;
use std::fmt;
use std::sync::Arc;

/// Shared, cloneable error produced by a guard or middleware.
pub type SharedError = Arc<dyn Error + Send + Sync>;

/// Boxed error accepted from host guard and middleware code.
pub type BoxError = Box<dyn Error + Send + Sync>;

// ============================================================================
// NavigationError
// ============================================================================

/// Detailed error variants that can occur during navigation.
///
/// Implements [`std::error::Error`] and [`Display`](std::fmt::Display) for
/// idiomatic error handling.
#[derive(Debug, Clone)]
pub enum NavigationError {
    /// No registered route matched the path.
    RouteNotFound { path: String },

    /// Reserved for structural parameter validation; never raised today.
    InvalidParameters { params: HashMap<String, String> },

    /// Redirect resolution hit the configured limit.
    RedirectLoop { count: usize },

    /// A guard denied the navigation.
    GuardRejected { path: String, reason: String },

    /// A guard returned an error or panicked.
    GuardError { guard: String, source: SharedError },

    /// A middleware returned an error or panicked.
    MiddlewareError {
        middleware: String,
        source: SharedError,
    },

    /// `go_named` / `push_named` was given a name no route carries.
    UnknownRouteName { name: String },

    /// A shell branch index outside the configured branches.
    InvalidBranch { index: usize, count: usize },

    /// A newer navigation started before this one finished.
    Superseded { path: String },
}

impl NavigationError {
    /// Wrap an error returned by the named guard.
    pub fn guard(guard: impl Into<String>, source: impl Into<BoxError>) -> Self {
        Self::GuardError {
            guard: guard.into(),
            source: Arc::from(source.into()),
        }
    }

    /// Wrap an error returned by the named middleware.
    pub fn middleware(middleware: impl Into<String>, source: impl Into<BoxError>) -> Self {
        Self::MiddlewareError {
            middleware: middleware.into(),
            source: Arc::from(source.into()),
        }
    }

    /// `true` for [`RouteNotFound`](Self::RouteNotFound) and
    /// [`UnknownRouteName`](Self::UnknownRouteName).
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::RouteNotFound { .. } | Self::UnknownRouteName { .. }
        )
    }

    /// `true` for [`RedirectLoop`](Self::RedirectLoop).
    pub fn is_redirect_loop(&self) -> bool {
        matches!(self, Self::RedirectLoop { .. })
    }

    /// `true` for [`GuardRejected`](Self::GuardRejected).
    pub fn is_rejected(&self) -> bool {
        matches!(self, Self::GuardRejected { .. })
    }

    /// `true` for [`Superseded`](Self::Superseded).
    pub fn is_superseded(&self) -> bool {
        matches!(self, Self::Superseded { .. })
    }
}

impl fmt::Display for NavigationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NavigationError::RouteNotFound { path } => {
                write!(f, "Route not found: {}", path)
            }
            NavigationError::InvalidParameters { params } => {
                let mut keys: Vec<_> = params.keys().map(String::as_str).collect();
                keys.sort_unstable();
                write!(f, "Invalid parameters: {}", keys.join(", "))
            }
            NavigationError::RedirectLoop { count } => {
                write!(f, "Redirect loop detected after {} redirects", count)
            }
            NavigationError::GuardRejected { path, reason } => {
                write!(f, "Navigation to {} rejected: {}", path, reason)
            }
            NavigationError::GuardError { guard, source } => {
                write!(f, "Guard '{}' failed: {}", guard, source)
            }
            NavigationError::MiddlewareError { middleware, source } => {
                write!(f, "Middleware '{}' failed: {}", middleware, source)
            }
            NavigationError::UnknownRouteName { name } => {
                write!(f, "No route named '{}'", name)
            }
            NavigationError::InvalidBranch { index, count } => {
                write!(f, "Branch index {} out of range ({} branches)", index, count)
            }
            NavigationError::Superseded { path } => {
                write!(f, "Navigation to {} superseded by a newer navigation", path)
            }
        }
    }
}

impl Error for NavigationError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            NavigationError::GuardError { source, .. }
            | NavigationError::MiddlewareError { source, .. } => Some(source.as_ref()),
            _ => None,
        }
    }
}

// ============================================================================
// Error Handlers
// ============================================================================

/// Builder for the view shown when the current context carries an error.
pub type ErrorBuilder =
    Arc<dyn Fn(&NavigationContext, &NavigationError) -> RenderHandle + Send + Sync>;

/// Builder for the view shown when no route matches the current path.
pub type NotFoundBuilder = Arc<dyn Fn(&NavigationContext) -> RenderHandle + Send + Sync>;

/// Custom not-found and error view builders.
///
/// # Examples
///
/// ```
/// use shell_navigator::{ErrorHandlers, NavigationContext, NavigationError, RenderHandle};
///
/// let handlers = ErrorHandlers::new()
///     .on_not_found(|ctx| RenderHandle::new(format!("404: {}", ctx.path())))
///     .on_error(|_ctx, err| RenderHandle::new(format!("Error: {err}")));
///
/// let ctx = NavigationContext::new("/missing");
/// let view = handlers.render_not_found(&ctx).unwrap();
/// assert_eq!(view.downcast_ref::<String>().map(String::as_str), Some("404: /missing"));
/// ```
#[derive(Clone, Default)]
pub struct ErrorHandlers {
    /// Builder for not-found views
    pub not_found: Option<NotFoundBuilder>,

    /// Builder for general navigation error views
    pub error: Option<ErrorBuilder>,
}

impl ErrorHandlers {
    /// Create new empty error handlers
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the not-found builder
    pub fn on_not_found<F>(mut self, handler: F) -> Self
    where
        F: Fn(&NavigationContext) -> RenderHandle + Send + Sync + 'static,
    {
        self.not_found = Some(Arc::new(handler));
        self
    }

    /// Set the general error builder
    pub fn on_error<F>(mut self, handler: F) -> Self
    where
        F: Fn(&NavigationContext, &NavigationError) -> RenderHandle + Send + Sync + 'static,
    {
        self.error = Some(Arc::new(handler));
        self
    }

    /// Build a not-found view
    pub fn render_not_found(&self, ctx: &NavigationContext) -> Option<RenderHandle> {
        self.not_found.as_ref().map(|handler| handler(ctx))
    }

    /// Build an error view
    pub fn render_error(
        &self,
        ctx: &NavigationContext,
        error: &NavigationError,
    ) -> Option<RenderHandle> {
        self.error.as_ref().map(|handler| handler(ctx, error))
    }
}

impl fmt::Debug for ErrorHandlers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ErrorHandlers")
            .field("not_found", &self.not_found.is_some())
            .field("error", &self.error.is_some())
            .finish()
    }
}

// ============================================================================
// Tests
// ============================================================================

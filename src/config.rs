//! Router configuration.
//!
//! ```
//! use shell_navigator::RouterConfig;
//!
//! let config = RouterConfig::new()
//!     .initial_route("/home")
//!     .redirect_limit(3)
//!     .debug_log_diagnostics(true)
//!     .redirect(|ctx| (ctx.path() == "/").then(|| "/home".to_string()));
//!
//! assert_eq!(config.get_initial_route(), "/home");
//! assert_eq!(config.get_redirect_limit(), 3);
//! ```

use crate::context::NavigationContext;
use crate::error::{ErrorHandlers, NavigationError};
use crate::route::{RedirectFn, RenderHandle};
use std::fmt;
use std::sync::Arc;

/// Listener told about every failed navigation.
pub type ErrorListener = Arc<dyn Fn(&NavigationError) + Send + Sync>;

/// Options recognized by [`Router::new`](crate::Router::new).
#[derive(Clone)]
pub struct RouterConfig {
    initial_route: String,
    redirect_limit: usize,
    debug_log_diagnostics: bool,
    redirect: Option<RedirectFn>,
    error_handlers: ErrorHandlers,
    on_error: Option<ErrorListener>,
    #[cfg(feature = "cache")]
    cache_capacity: usize,
}

impl RouterConfig {
    /// Default number of redirects before a navigation fails.
    pub const DEFAULT_REDIRECT_LIMIT: usize = 5;

    /// Defaults: initial route `/`, redirect limit 5, diagnostics off.
    pub fn new() -> Self {
        Self {
            initial_route: "/".to_string(),
            redirect_limit: Self::DEFAULT_REDIRECT_LIMIT,
            debug_log_diagnostics: false,
            redirect: None,
            error_handlers: ErrorHandlers::new(),
            on_error: None,
            #[cfg(feature = "cache")]
            cache_capacity: 1000,
        }
    }

    /// Location the router starts at.
    pub fn initial_route(mut self, route: impl Into<String>) -> Self {
        self.initial_route = route.into();
        self
    }

    /// Maximum redirects per navigation. Zero is raised to one.
    pub fn redirect_limit(mut self, limit: usize) -> Self {
        self.redirect_limit = limit.max(1);
        self
    }

    /// Log every navigation step at `info` level instead of `trace`.
    pub fn debug_log_diagnostics(mut self, enabled: bool) -> Self {
        self.debug_log_diagnostics = enabled;
        self
    }

    /// Router-level redirect, evaluated before route matching on every hop.
    pub fn redirect<F>(mut self, redirect: F) -> Self
    where
        F: Fn(&NavigationContext) -> Option<String> + Send + Sync + 'static,
    {
        self.redirect = Some(Arc::new(redirect));
        self
    }

    /// Builder for the view shown when the current context carries an error.
    pub fn error_builder<F>(mut self, builder: F) -> Self
    where
        F: Fn(&NavigationContext, &NavigationError) -> RenderHandle + Send + Sync + 'static,
    {
        self.error_handlers = self.error_handlers.on_error(builder);
        self
    }

    /// Builder for the view shown when no route matches.
    pub fn not_found_builder<F>(mut self, builder: F) -> Self
    where
        F: Fn(&NavigationContext) -> RenderHandle + Send + Sync + 'static,
    {
        self.error_handlers = self.error_handlers.on_not_found(builder);
        self
    }

    /// Listener told about every failed navigation. Without one, failures
    /// are logged at `error` level.
    pub fn on_error<F>(mut self, listener: F) -> Self
    where
        F: Fn(&NavigationError) + Send + Sync + 'static,
    {
        self.on_error = Some(Arc::new(listener));
        self
    }

    /// Capacity of the route resolution cache.
    #[cfg(feature = "cache")]
    pub fn cache_capacity(mut self, capacity: usize) -> Self {
        self.cache_capacity = capacity;
        self
    }

    // ------------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------------

    /// Location the router starts at.
    pub fn get_initial_route(&self) -> &str {
        &self.initial_route
    }

    /// Maximum redirects per navigation.
    pub fn get_redirect_limit(&self) -> usize {
        self.redirect_limit
    }

    /// Whether diagnostics are promoted to `info`.
    pub fn diagnostics(&self) -> bool {
        self.debug_log_diagnostics
    }

    /// Router-level redirect.
    pub fn get_redirect(&self) -> Option<&RedirectFn> {
        self.redirect.as_ref()
    }

    /// Not-found and error view builders.
    pub fn error_handlers(&self) -> &ErrorHandlers {
        &self.error_handlers
    }

    /// Failure listener.
    pub fn get_on_error(&self) -> Option<&ErrorListener> {
        self.on_error.as_ref()
    }

    /// Capacity of the route resolution cache.
    #[cfg(feature = "cache")]
    pub fn get_cache_capacity(&self) -> usize {
        self.cache_capacity
    }
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for RouterConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RouterConfig")
            .field("initial_route", &self.initial_route)
            .field("redirect_limit", &self.redirect_limit)
            .field("debug_log_diagnostics", &self.debug_log_diagnostics)
            .field("redirect", &self.redirect.is_some())
            .field("error_handlers", &self.error_handlers)
            .field("on_error", &self.on_error.is_some())
            .finish_non_exhaustive()
    }
}

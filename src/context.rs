//! The value threaded through guards and middleware.
//!
//! A [`NavigationContext`] describes one navigation step: where it is going,
//! what the matched route extracted from the path, the query string, an
//! optional typed payload, and a snapshot of the navigation stack. Contexts
//! are never changed in place by the router; every step that alters one
//! produces a modified copy with the `with_*` methods.
//!
//! # Example
//!
//! ```
//! use shell_navigator::{Extra, NavigationContext};
//!
//! #[derive(Debug, PartialEq)]
//! struct Draft { id: u32 }
//!
//! let ctx = NavigationContext::new("/editor?mode=split")
//!     .with_extra(Extra::new(Draft { id: 9 }));
//!
//! assert_eq!(ctx.path(), "/editor");
//! assert_eq!(ctx.query("mode"), Some("split"));
//! assert_eq!(ctx.extra::<Draft>(), Some(&Draft { id: 9 }));
//! ```

use crate::error::NavigationError;
use crate::params::{QueryParams, RouteParams};
use crate::path::split_query;
use std::any::Any;
use std::fmt;
use std::sync::Arc;

// ============================================================================
// Extra payload
// ============================================================================

/// Typed opaque payload attached to a navigation.
///
/// The payload is type-erased but can only be read back through a checked
/// downcast, so a consumer asking for the wrong type gets `None` instead of
/// a crash. Cloning is cheap (shared `Arc`).
#[derive(Clone)]
pub struct Extra(Arc<dyn Any + Send + Sync>);

impl Extra {
    /// Wrap a value.
    pub fn new<T: Any + Send + Sync>(value: T) -> Self {
        Self(Arc::new(value))
    }

    /// Borrow the payload as `T`, if that is what it holds.
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.0.downcast_ref::<T>()
    }

    /// Check the payload type without borrowing it.
    pub fn is<T: Any>(&self) -> bool {
        self.0.is::<T>()
    }
}

impl fmt::Debug for Extra {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Extra(..)")
    }
}

// ============================================================================
// NavigationContext
// ============================================================================

/// Snapshot of a single navigation step.
#[derive(Debug, Clone, Default)]
pub struct NavigationContext {
    /// Normalized target location, including any query string.
    pub full_path: String,

    /// The portion of the path consumed by the matched route pattern.
    pub matched_path: String,

    /// Parameters extracted from `:name` segments.
    pub path_parameters: RouteParams,

    /// Parameters parsed from the query string.
    pub query_parameters: QueryParams,

    /// Payload supplied by the caller of `go`/`push`.
    pub extra: Option<Extra>,

    /// Name of the matched route, if it has one.
    pub route_name: Option<String>,

    /// Navigation stack as it was when this context was built.
    pub navigation_stack: Vec<String>,

    /// Set when the navigation this context describes failed.
    pub error: Option<NavigationError>,
}

impl NavigationContext {
    /// Create a context for `full_path`, parsing its query string.
    pub fn new(full_path: impl Into<String>) -> Self {
        let full_path = full_path.into();
        let query_parameters = split_query(&full_path)
            .1
            .map(QueryParams::from_query_string)
            .unwrap_or_default();
        Self {
            full_path,
            query_parameters,
            ..Self::default()
        }
    }

    /// The path part of [`full_path`](Self::full_path), without the query.
    pub fn path(&self) -> &str {
        split_query(&self.full_path).0
    }

    /// Shortcut for `path_parameters.get(name)`.
    pub fn param(&self, name: &str) -> Option<&str> {
        self.path_parameters.get(name)
    }

    /// Shortcut for `query_parameters.get(name)`.
    pub fn query(&self, name: &str) -> Option<&str> {
        self.query_parameters.get(name)
    }

    /// Borrow the extra payload as `T`.
    pub fn extra<T: Any>(&self) -> Option<&T> {
        self.extra.as_ref()?.downcast_ref::<T>()
    }

    /// Copy with the match results of a route applied.
    pub fn with_match(
        mut self,
        matched_path: impl Into<String>,
        path_parameters: RouteParams,
        route_name: Option<String>,
    ) -> Self {
        self.matched_path = matched_path.into();
        self.path_parameters = path_parameters;
        self.route_name = route_name;
        self
    }

    /// Copy with a different extra payload.
    pub fn with_extra(mut self, extra: impl Into<Option<Extra>>) -> Self {
        self.extra = extra.into();
        self
    }

    /// Copy with a navigation stack snapshot.
    pub fn with_stack(mut self, stack: Vec<String>) -> Self {
        self.navigation_stack = stack;
        self
    }

    /// Copy with an extra path parameter.
    pub fn with_param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.path_parameters.insert(key, value);
        self
    }

    /// Copy with an error attached.
    pub fn with_error(mut self, error: NavigationError) -> Self {
        self.error = Some(error);
        self
    }

    /// `true` if an error is attached.
    pub fn has_error(&self) -> bool {
        self.error.is_some()
    }
}

//! Guard and middleware registries, and the executor that runs them.
//!
//! Guards and middleware are registered under a **scope**:
//!
//! | Scope | Matches |
//! |-------|---------|
//! | `"*"` | every path (global) |
//! | `"admin/*"` | `admin/` followed by anything, including nothing |
//! | `"/profile"` | exactly that path |
//!
//! Leading slashes are ignored on both sides, so `"admin/*"` and
//! `"/admin/*"` are the same scope. For a given path the global entries run
//! first, in registration order, followed by every matching scoped entry in
//! registration order.
//!
//! The executor awaits each guard (then each middleware) fully before
//! invoking the next. The first deny, redirect, or error short-circuits the
//! rest. A guard or middleware that panics is treated exactly like one that
//! returned an error.
//!
//! ```
//! use shell_navigator::pipeline::scope_matches;
//!
//! assert!(scope_matches("admin/*", "admin/dashboard"));
//! assert!(scope_matches("admin/*", "/admin/users/5"));
//! assert!(!scope_matches("admin/*", "profile"));
//! assert!(scope_matches("*", "/anything"));
//! ```

use crate::context::NavigationContext;
use crate::error::NavigationError;
use crate::guards::{GuardOutcome, RouteGuard};
use crate::middleware::{MiddlewareOutcome, RouteMiddleware};
use crate::path::split_query;
use crate::route::AccessPredicate;
use crate::{diag_log, warn_log};
use async_trait::async_trait;
use futures::FutureExt;
use std::any::Any;
use std::fmt;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;

/// Scope under which global guards and middleware are registered.
pub const GLOBAL_SCOPE: &str = "*";

/// Check whether `scope` covers `path`.
pub fn scope_matches(scope: &str, path: &str) -> bool {
    if scope == GLOBAL_SCOPE {
        return true;
    }
    let path = split_query(path).0.trim_start_matches('/');
    let scope = scope.trim_start_matches('/');
    match scope.find('*') {
        Some(star) => path.starts_with(&scope[..star]),
        None => path == scope,
    }
}

// ============================================================================
// Registry
// ============================================================================

/// Ordered mapping from scope to the items registered under it.
pub struct Registry<T: ?Sized> {
    entries: Vec<(String, Vec<Arc<T>>)>,
}

/// Registry of guards.
pub type GuardRegistry = Registry<dyn RouteGuard>;

/// Registry of middleware.
pub type MiddlewareRegistry = Registry<dyn RouteMiddleware>;

impl<T: ?Sized> Registry<T> {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Append `item` to the list registered under `scope`.
    pub fn add(&mut self, scope: impl Into<String>, item: Arc<T>) {
        let scope = scope.into();
        if let Some((_, items)) = self.entries.iter_mut().find(|(s, _)| *s == scope) {
            items.push(item);
        } else {
            self.entries.push((scope, vec![item]));
        }
    }

    /// Remove everything registered under `scope`; returns how many items
    /// were removed.
    pub fn remove(&mut self, scope: &str) -> usize {
        let mut removed = 0;
        self.entries.retain(|(s, items)| {
            if s == scope {
                removed += items.len();
                false
            } else {
                true
            }
        });
        removed
    }

    /// Items that apply to `path`: global first, then matching scopes.
    pub fn collect(&self, path: &str) -> Vec<Arc<T>> {
        let global = self
            .entries
            .iter()
            .filter(|(scope, _)| scope == GLOBAL_SCOPE);
        let scoped = self
            .entries
            .iter()
            .filter(|(scope, _)| scope != GLOBAL_SCOPE && scope_matches(scope, path));

        global
            .chain(scoped)
            .flat_map(|(_, items)| items.iter().cloned())
            .collect()
    }

    /// Registered scopes, in registration order.
    pub fn scopes(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(scope, _)| scope.as_str())
    }

    /// Total number of registered items.
    pub fn len(&self) -> usize {
        self.entries.iter().map(|(_, items)| items.len()).sum()
    }

    /// `true` if nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<T: ?Sized> Default for Registry<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: ?Sized> Clone for Registry<T> {
    fn clone(&self) -> Self {
        Self {
            entries: self.entries.clone(),
        }
    }
}

impl<T: ?Sized> fmt::Debug for Registry<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(self.entries.iter().map(|(scope, items)| (scope, items.len())))
            .finish()
    }
}

// ============================================================================
// Access predicates as guards
// ============================================================================

/// Adapts a route's legacy access predicate to the guard contract.
pub(crate) struct AccessGuard {
    predicate: AccessPredicate,
}

impl AccessGuard {
    pub(crate) fn new(predicate: AccessPredicate) -> Self {
        Self { predicate }
    }
}

#[async_trait]
impl RouteGuard for AccessGuard {
    async fn check(&self, ctx: &NavigationContext) -> GuardOutcome {
        if (self.predicate)(ctx) {
            GuardOutcome::Allow
        } else {
            GuardOutcome::deny("Access denied")
        }
    }

    fn name(&self) -> &str {
        "AccessGuard"
    }
}

// ============================================================================
// Executor
// ============================================================================

/// Result of running a gate (all guards, or all middleware).
#[derive(Debug)]
pub enum Gate {
    /// Everything allowed; continue with this context.
    Pass(NavigationContext),
    /// Restart the navigation at this location.
    Redirect(String),
    /// Abort with this error.
    Reject(NavigationError),
}

#[derive(Debug)]
struct PanicError(String);

impl fmt::Display for PanicError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "panicked: {}", self.0)
    }
}

impl std::error::Error for PanicError {}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic payload".to_string()
    }
}

/// The registries consulted on every navigation, plus the executor.
#[derive(Debug, Clone, Default)]
pub struct Pipeline {
    /// Guards by scope.
    pub guards: GuardRegistry,
    /// Middleware by scope.
    pub middleware: MiddlewareRegistry,
}

impl Pipeline {
    /// Create empty registries.
    pub fn new() -> Self {
        Self::default()
    }

    /// Run `guards` in order against `ctx`.
    ///
    /// An [`AllowWith`](GuardOutcome::AllowWith) replaces the context for the
    /// guards that follow and for the result.
    pub async fn run_guards(
        guards: &[Arc<dyn RouteGuard>],
        mut ctx: NavigationContext,
        diagnostics: bool,
    ) -> Gate {
        for guard in guards {
            let outcome = AssertUnwindSafe(guard.check(&ctx)).catch_unwind().await;
            let outcome = match outcome {
                Ok(outcome) => outcome,
                Err(payload) => {
                    warn_log!("Guard '{}' panicked", guard.name());
                    GuardOutcome::error(PanicError(panic_message(payload.as_ref())))
                }
            };
            diag_log!(
                diagnostics,
                "Guard '{}' on '{}' -> {:?}",
                guard.name(),
                ctx.full_path,
                outcome
            );

            match outcome {
                GuardOutcome::Allow => {}
                GuardOutcome::AllowWith(next) => ctx = next,
                GuardOutcome::Deny { reason } => {
                    return Gate::Reject(NavigationError::GuardRejected {
                        path: ctx.full_path,
                        reason,
                    });
                }
                GuardOutcome::Redirect { to } => return Gate::Redirect(to),
                GuardOutcome::Error(source) => {
                    return Gate::Reject(NavigationError::GuardError {
                        guard: guard.name().to_string(),
                        source,
                    });
                }
            }
        }
        Gate::Pass(ctx)
    }

    /// Run the `handle` hook of `middleware` in order against `ctx`.
    pub async fn run_middleware(
        middleware: &[Arc<dyn RouteMiddleware>],
        mut ctx: NavigationContext,
        diagnostics: bool,
    ) -> Gate {
        for mw in middleware {
            let outcome = AssertUnwindSafe(mw.handle(&ctx)).catch_unwind().await;
            let outcome = match outcome {
                Ok(outcome) => outcome,
                Err(payload) => {
                    warn_log!("Middleware '{}' panicked", mw.name());
                    MiddlewareOutcome::error(PanicError(panic_message(payload.as_ref())))
                }
            };
            diag_log!(
                diagnostics,
                "Middleware '{}' on '{}' -> {:?}",
                mw.name(),
                ctx.full_path,
                outcome
            );

            match outcome {
                MiddlewareOutcome::Proceed => {}
                MiddlewareOutcome::Modified(next) => ctx = next,
                MiddlewareOutcome::Redirect(to) => return Gate::Redirect(to),
                MiddlewareOutcome::Error(source) => {
                    return Gate::Reject(NavigationError::MiddlewareError {
                        middleware: mw.name().to_string(),
                        source,
                    });
                }
            }
        }
        Gate::Pass(ctx)
    }

    /// Invoke every post-activation hook. Failures are logged, never raised.
    pub async fn notify_activated(
        middleware: &[Arc<dyn RouteMiddleware>],
        ctx: &NavigationContext,
        diagnostics: bool,
    ) {
        for mw in middleware {
            match AssertUnwindSafe(mw.on_activated(ctx)).catch_unwind().await {
                Ok(Ok(())) => {
                    diag_log!(
                        diagnostics,
                        "Middleware '{}' activated '{}'",
                        mw.name(),
                        ctx.full_path
                    );
                }
                Ok(Err(err)) => {
                    warn_log!(
                        "Middleware '{}' after-activation hook failed: {}",
                        mw.name(),
                        err
                    );
                }
                Err(payload) => {
                    warn_log!(
                        "Middleware '{}' after-activation hook panicked: {}",
                        mw.name(),
                        panic_message(payload.as_ref())
                    );
                }
            }
        }
    }
}

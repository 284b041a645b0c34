//! Logging abstraction layer.
//!
//! Provides macros that dispatch to either the [`log`](https://docs.rs/log)
//! or [`tracing`](https://docs.rs/tracing) crate depending on which feature
//! is enabled. The two features are **mutually exclusive**; enable at most one.
//!
//! | Feature    | Backend         | Default |
//! |------------|-----------------|---------|
//! | `log`      | `log` crate     | yes     |
//! | `tracing`  | `tracing` crate | no      |
//!
//! # Available macros
//!
//! - `trace_log!`: finest-grained diagnostic output.
//! - `debug_log!`: information useful for debugging.
//! - `info_log!`: general informational messages.
//! - `warn_log!`: potentially harmful situations.
//! - `error_log!`: error events that might still allow the app to continue.
//! - `diag_log!`: navigation diagnostics, promoted from `trace` to `info`
//!   when the router was configured with
//!   [`debug_log_diagnostics`](crate::RouterConfig::debug_log_diagnostics).
//!
//! All macros accept `format!`-style arguments and expand to a `()` block,
//! so they also work as match arms and closure bodies:
//!
//! ```ignore
//! use shell_navigator::{debug_log, diag_log, error_log};
//!
//! debug_log!("Navigating to route: {}", path);
//! let report = |err: &str| error_log!("navigation failed: {}", err);
//! diag_log!(config.debug_log_diagnostics, "redirect #{} -> '{}'", count, next);
//! ```

/// Emit a **trace**-level log message.
///
/// Used for cache hits and misses and exact-match shortcuts. Navigation
/// diagnostics also land here while `debug_log_diagnostics` is off.
#[macro_export]
macro_rules! trace_log {
    ($($arg:tt)*) => {{
        #[cfg(feature = "tracing")]
        ::tracing::trace!($($arg)*);
        #[cfg(feature = "log")]
        ::log::trace!($($arg)*);
    }};
}

/// Emit a **debug**-level log message.
///
/// Used when a deep link or route name resolves to a location, and for
/// navigations that end without a state change.
#[macro_export]
macro_rules! debug_log {
    ($($arg:tt)*) => {{
        #[cfg(feature = "tracing")]
        ::tracing::debug!($($arg)*);
        #[cfg(feature = "log")]
        ::log::debug!($($arg)*);
    }};
}

/// Emit an **info**-level log message.
///
/// One line when a navigation starts and one when it commits.
#[macro_export]
macro_rules! info_log {
    ($($arg:tt)*) => {{
        #[cfg(feature = "tracing")]
        ::tracing::info!($($arg)*);
        #[cfg(feature = "log")]
        ::log::info!($($arg)*);
    }};
}

/// Emit a **warn**-level log message.
///
/// Covers problems in the route configuration and redirect loops. A guard
/// or middleware that panics is reported here too.
#[macro_export]
macro_rules! warn_log {
    ($($arg:tt)*) => {{
        #[cfg(feature = "tracing")]
        ::tracing::warn!($($arg)*);
        #[cfg(feature = "log")]
        ::log::warn!($($arg)*);
    }};
}

/// Emit an **error**-level log message.
///
/// The fallback channel for failed navigations when no `on_error`
/// listener is configured.
#[macro_export]
macro_rules! error_log {
    ($($arg:tt)*) => {{
        #[cfg(feature = "tracing")]
        ::tracing::error!($($arg)*);
        #[cfg(feature = "log")]
        ::log::error!($($arg)*);
    }};
}

/// Emit a navigation diagnostic.
///
/// The first argument is the router's `debug_log_diagnostics` flag. When it
/// is `true` the message is logged at **info** level so that every step of a
/// navigation shows up with default filters; otherwise it is logged at
/// **trace** level.
#[macro_export]
macro_rules! diag_log {
    ($enabled:expr, $($arg:tt)*) => {{
        if $enabled {
            $crate::info_log!($($arg)*);
        } else {
            $crate::trace_log!($($arg)*);
        }
    }};
}

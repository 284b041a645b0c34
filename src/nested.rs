//! Nested route resolution
//!
//! Navigation itself resolves targets through the flat index in
//! [`tree`](crate::tree). This module answers hierarchy questions on top of
//! it, working on **string paths** rather than the shape of the route tree:
//! which candidate best matches a path inside a shell branch, which routes
//! are direct children of a path, and the parent/depth/breadcrumbs of the
//! location the user is currently on.
//!
//! # Matching
//!
//! [`find_best_match`] is deliberately conservative: an exact string match
//! wins, otherwise the first candidate whose pattern has the **same number
//! of segments** as the path (literal equality or `:param` wildcard). It is
//! the same matcher navigation uses, in [`MatchMode::Exact`].
//!
//! ```
//! use shell_navigator::nested::{find_best_match, find_child_routes};
//! use shell_navigator::RoutePattern;
//!
//! let candidates = [
//!     RoutePattern::parse("/users/:id").unwrap(),
//!     RoutePattern::parse("/users/me").unwrap(),
//! ];
//! let (position, params) = find_best_match("/users/me", &candidates).unwrap();
//! assert_eq!(position, 1);
//! assert!(params.is_empty());
//!
//! let routes = ["/dashboard", "/dashboard/settings", "/dashboard/settings/theme"];
//! assert_eq!(find_child_routes("/dashboard", routes), vec!["/dashboard/settings"]);
//! ```

use crate::params::RouteParams;
use crate::path::{build_breadcrumbs as crumbs, normalize_path, parent_path, path_depth, split_segments};
use crate::pattern::{MatchMode, RoutePattern};
use crate::trace_log;

/// Find the candidate pattern that best matches `path`.
///
/// Returns the candidate's position in `candidates` and the extracted
/// parameters.
pub fn find_best_match<'a, I>(path: &str, candidates: I) -> Option<(usize, RouteParams)>
where
    I: IntoIterator<Item = &'a RoutePattern>,
    I::IntoIter: Clone,
{
    let normalized = normalize_path(path);
    let wanted = split_segments(&normalized).join("/");
    let candidates = candidates.into_iter();

    let exact = candidates
        .clone()
        .position(|p| p.as_str().trim_start_matches('/') == wanted);
    if let Some(position) = exact {
        trace_log!("find_best_match: exact string match for '{}'", path);
        return Some((position, RouteParams::new()));
    }

    candidates.enumerate().find_map(|(position, pattern)| {
        pattern
            .match_path(&normalized, MatchMode::Exact)
            .map(|m| (position, m.params))
    })
}

/// `true` if `child_path` is exactly one segment below `parent_path`.
///
/// ```
/// use shell_navigator::nested::is_child_route;
///
/// assert!(is_child_route("/users/42", "/users"));
/// assert!(is_child_route("/users", "/"));
/// assert!(!is_child_route("/users/42/posts", "/users"));
/// assert!(!is_child_route("/users", "/users"));
/// ```
pub fn is_child_route(child_path: &str, parent_path: &str) -> bool {
    let child = normalize_path(child_path);
    let parent = normalize_path(parent_path);
    let child_segments = split_segments(&child);
    let parent_segments = split_segments(&parent);

    child_segments.len() == parent_segments.len() + 1
        && child_segments.starts_with(&parent_segments)
}

/// Every route path that is a direct child of `parent_path`.
pub fn find_child_routes<'a, I>(parent_path: &str, routes: I) -> Vec<&'a str>
where
    I: IntoIterator<Item = &'a str>,
{
    routes
        .into_iter()
        .filter(|route| is_child_route(route, parent_path))
        .collect()
}

/// Parent of the current location; `None` at root.
pub fn get_parent_path(current_path: &str) -> Option<String> {
    parent_path(current_path)
}

/// Breadcrumb trail for the current location.
pub fn build_breadcrumbs(current_path: &str) -> Vec<String> {
    crumbs(current_path)
}

/// Depth of the current location. Root is 0.
pub fn get_route_depth(current_path: &str) -> usize {
    path_depth(current_path)
}

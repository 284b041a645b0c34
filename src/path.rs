//! Path string utilities.
//!
//! Every other module works on paths that went through [`normalize_path`]
//! first. The rules are:
//!
//! 1. **Empty paths** become `"/"` (root)
//! 2. **Leading slash** is ensured (`"dashboard"` → `"/dashboard"`)
//! 3. **Repeated slashes** collapse into one (`"//a///b"` → `"/a/b"`)
//! 4. **Trailing slashes** are kept (`"/a/"` stays `"/a/"`); only a root made
//!    of repeated slashes collapses to `"/"`
//!
//! Segment splitting ignores leading and trailing slashes, so `"/a/"` and
//! `"/a"` always split into the same segments.

use std::borrow::Cow;

/// Normalize a path for consistent comparison.
///
/// Returns `Cow<str>` to avoid allocation when the path is already normalized.
///
/// # Examples
///
/// ```
/// use shell_navigator::normalize_path;
///
/// assert_eq!(normalize_path(""), "/");
/// assert_eq!(normalize_path("dashboard"), "/dashboard");
/// assert_eq!(normalize_path("//users///42"), "/users/42");
/// assert_eq!(normalize_path("/users/"), "/users/");
/// assert_eq!(normalize_path("///"), "/");
/// ```
#[must_use]
pub fn normalize_path(path: &str) -> Cow<'_, str> {
    if path.is_empty() {
        return Cow::Borrowed("/");
    }

    if path.starts_with('/') && !path.contains("//") {
        return Cow::Borrowed(path);
    }

    let mut out = String::with_capacity(path.len() + 1);
    out.push('/');
    for ch in path.chars() {
        if ch == '/' && out.ends_with('/') {
            continue;
        }
        out.push(ch);
    }
    Cow::Owned(out)
}

/// Normalize the path part of a location, leaving any `?query` or
/// `#fragment` untouched.
///
/// Query values may carry their own slashes (a return URL, for instance),
/// so only the text before the first `?` or `#` goes through
/// [`normalize_path`].
///
/// ```
/// use shell_navigator::normalize_location;
///
/// assert_eq!(normalize_location("cb//x?next=https://a.io/b"), "/cb/x?next=https://a.io/b");
/// assert_eq!(normalize_location("?tab=1"), "/?tab=1");
/// assert_eq!(normalize_location("/users/7"), "/users/7");
/// ```
#[must_use]
pub fn normalize_location(location: &str) -> Cow<'_, str> {
    let end = location.find(|c| c == '?' || c == '#').unwrap_or(location.len());
    let (path, rest) = location.split_at(end);
    match normalize_path(path) {
        Cow::Borrowed(normalized) if normalized == path => Cow::Borrowed(location),
        normalized => Cow::Owned(format!("{normalized}{rest}")),
    }
}

/// Split a path into its segments.
///
/// Leading and trailing slashes are discarded; interior empty segments are
/// kept so that a matcher can observe them.
///
/// # Examples
///
/// ```
/// use shell_navigator::split_segments;
///
/// assert_eq!(split_segments("/users/123"), vec!["users", "123"]);
/// assert_eq!(split_segments("/users/"), vec!["users"]);
/// assert_eq!(split_segments("/"), Vec::<&str>::new());
/// assert_eq!(split_segments("a//b"), vec!["a", "", "b"]);
/// ```
pub fn split_segments(path: &str) -> Vec<&str> {
    let trimmed = path.trim_matches('/');
    if trimmed.is_empty() {
        Vec::new()
    } else {
        trimmed.split('/').collect()
    }
}

/// Check if a pattern segment is a `:name` parameter placeholder.
#[inline]
pub fn is_parameter_segment(segment: &str) -> bool {
    segment.starts_with(':')
}

/// Number of segments in a path. Root is depth 0.
pub fn path_depth(path: &str) -> usize {
    split_segments(&normalize_path(path)).len()
}

/// The path with its last segment removed.
///
/// Root has no parent; a single-segment path has root as its parent.
///
/// ```
/// use shell_navigator::parent_path;
///
/// assert_eq!(parent_path("/"), None);
/// assert_eq!(parent_path("/users"), Some("/".to_string()));
/// assert_eq!(parent_path("/users/42/posts"), Some("/users/42".to_string()));
/// ```
pub fn parent_path(path: &str) -> Option<String> {
    let normalized = normalize_path(path);
    let segments = split_segments(&normalized);
    match segments.len() {
        0 => None,
        1 => Some("/".to_string()),
        n => Some(format!("/{}", segments[..n - 1].join("/"))),
    }
}

/// Root followed by every successive prefix of `path`, ending at `path`.
///
/// ```
/// use shell_navigator::build_breadcrumbs;
///
/// assert_eq!(
///     build_breadcrumbs("/products/electronics/phones"),
///     vec!["/", "/products", "/products/electronics", "/products/electronics/phones"],
/// );
/// assert_eq!(build_breadcrumbs("/"), vec!["/"]);
/// ```
pub fn build_breadcrumbs(path: &str) -> Vec<String> {
    let normalized = normalize_path(path);
    let segments = split_segments(&normalized);

    let mut crumbs = Vec::with_capacity(segments.len() + 1);
    crumbs.push("/".to_string());
    let mut current = String::new();
    for segment in segments {
        current.push('/');
        current.push_str(segment);
        crumbs.push(current.clone());
    }
    crumbs
}

/// Split a location into its path and query parts.
///
/// Any `#fragment` is dropped; fragments never take part in routing.
///
/// ```
/// use shell_navigator::split_query;
///
/// assert_eq!(split_query("/search?q=rust#top"), ("/search", Some("q=rust")));
/// assert_eq!(split_query("/search"), ("/search", None));
/// ```
pub fn split_query(location: &str) -> (&str, Option<&str>) {
    let without_fragment = location.split_once('#').map_or(location, |(head, _)| head);
    match without_fragment.split_once('?') {
        Some((path, query)) if !query.is_empty() => (path, Some(query)),
        Some((path, _)) => (path, None),
        None => (without_fragment, None),
    }
}

/// Join a parent pattern and a child pattern into one absolute pattern.
///
/// Child patterns are relative to their parent. An empty child (an index
/// route) yields the parent itself.
///
/// ```
/// use shell_navigator::join_paths;
///
/// assert_eq!(join_paths("/dashboard", "settings"), "/dashboard/settings");
/// assert_eq!(join_paths("/", "users/:id"), "/users/:id");
/// assert_eq!(join_paths("/dashboard", ""), "/dashboard");
/// ```
pub fn join_paths(parent: &str, child: &str) -> String {
    let parent = parent.trim_matches('/');
    let child = child.trim_matches('/');
    match (parent.is_empty(), child.is_empty()) {
        (true, true) => "/".to_string(),
        (true, false) => format!("/{child}"),
        (false, true) => format!("/{parent}"),
        (false, false) => format!("/{parent}/{child}"),
    }
}

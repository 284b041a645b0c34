//! Segment-based route pattern matching.
//!
//! A [`RoutePattern`] is parsed once from a pattern string such as
//! `/users/:userId/posts` and is immutable afterwards. Matching a concrete
//! path against it yields a [`PatternMatch`] with the extracted parameters
//! and the matched/remaining split of the path.
//!
//! # Design
//!
//! - Split pattern and path by `/` into segments
//! - Literal segments must be byte-equal (case-sensitive, no decoding)
//! - `:param` segments capture the request segment as-is, even when empty
//! - The root pattern `/` only ever matches the root path
//! - [`MatchMode::Prefix`] lets the path be longer than the pattern (used to
//!   find ancestors of nested routes); [`MatchMode::Exact`] requires equal
//!   segment counts

use crate::params::RouteParams;
use crate::path::{is_parameter_segment, split_segments};
use std::fmt;

/// One segment of a parsed pattern.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Segment {
    /// Must equal the request segment exactly.
    Literal(String),
    /// Captures the request segment under this name.
    Param(String),
}

/// How much of the request path a pattern has to account for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchMode {
    /// The request may carry extra trailing segments, reported as
    /// [`PatternMatch::remaining_path`].
    Prefix,
    /// The request must have exactly as many segments as the pattern.
    Exact,
}

/// Error raised when a pattern string is malformed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PatternError {
    /// The same `:name` appears twice in one pattern.
    DuplicateParameter { pattern: String, name: String },
    /// A bare `:` with no parameter name.
    EmptyParameterName { pattern: String },
}

impl fmt::Display for PatternError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PatternError::DuplicateParameter { pattern, name } => {
                write!(f, "Duplicate parameter ':{}' in pattern '{}'", name, pattern)
            }
            PatternError::EmptyParameterName { pattern } => {
                write!(f, "Empty parameter name in pattern '{}'", pattern)
            }
        }
    }
}

impl std::error::Error for PatternError {}

/// Result of matching a path against a pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatternMatch {
    /// One entry per parameter declared in the pattern.
    pub params: RouteParams,
    /// The first `pattern.len()` request segments, joined with a leading `/`.
    pub matched_path: String,
    /// The request segments after the matched prefix, or `""` if none.
    pub remaining_path: String,
}

/// A parsed, immutable route pattern.
///
/// # Examples
///
/// ```
/// use shell_navigator::{MatchMode, RoutePattern};
///
/// let pattern = RoutePattern::parse("/users/:id").unwrap();
/// let m = pattern.match_path("/users/123/profile", MatchMode::Prefix).unwrap();
///
/// assert_eq!(m.params.get("id"), Some("123"));
/// assert_eq!(m.matched_path, "/users/123");
/// assert_eq!(m.remaining_path, "profile");
///
/// assert!(pattern.match_path("/users/123/profile", MatchMode::Exact).is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RoutePattern {
    raw: String,
    segments: Vec<Segment>,
}

impl RoutePattern {
    /// Parse a pattern string.
    ///
    /// Parameter names must be unique within the pattern.
    pub fn parse(pattern: &str) -> Result<Self, PatternError> {
        Self::parse_segments(pattern, true)
    }

    /// Parse a pattern string, tolerating malformed parameters.
    ///
    /// A repeated `:name` keeps the value captured by its first occurrence
    /// and a bare `:` captures under the empty name. Never fails.
    pub fn parse_lossy(pattern: &str) -> Self {
        match Self::parse_segments(pattern, false) {
            Ok(parsed) => parsed,
            Err(_) => Self {
                raw: "/".to_string(),
                segments: Vec::new(),
            },
        }
    }

    fn parse_segments(pattern: &str, strict: bool) -> Result<Self, PatternError> {
        let mut segments = Vec::new();
        let mut names: Vec<&str> = Vec::new();

        for seg in split_segments(pattern) {
            if is_parameter_segment(seg) {
                let name = &seg[1..];
                if strict && name.is_empty() {
                    return Err(PatternError::EmptyParameterName {
                        pattern: pattern.to_string(),
                    });
                }
                if strict && names.contains(&name) {
                    return Err(PatternError::DuplicateParameter {
                        pattern: pattern.to_string(),
                        name: name.to_string(),
                    });
                }
                names.push(name);
                segments.push(Segment::Param(name.to_string()));
            } else {
                segments.push(Segment::Literal(seg.to_string()));
            }
        }

        let raw = if segments.is_empty() {
            "/".to_string()
        } else {
            format!("/{}", split_segments(pattern).join("/"))
        };

        Ok(Self { raw, segments })
    }

    /// The canonical pattern string (leading `/`, no trailing `/`).
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Parsed segments, in order.
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Number of segments. The root pattern has zero.
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    /// `true` for the root pattern `/`.
    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    /// Names of all `:param` placeholders, in order.
    pub fn param_names(&self) -> impl Iterator<Item = &str> {
        self.segments.iter().filter_map(|s| match s {
            Segment::Param(name) => Some(name.as_str()),
            Segment::Literal(_) => None,
        })
    }

    /// Match a concrete path against this pattern.
    ///
    /// Captured values are not validated or decoded.
    pub fn match_path(&self, path: &str, mode: MatchMode) -> Option<PatternMatch> {
        let request = split_segments(path);

        // The root pattern only ever matches the root request.
        if self.segments.is_empty() {
            return request.is_empty().then(|| PatternMatch {
                params: RouteParams::new(),
                matched_path: "/".to_string(),
                remaining_path: String::new(),
            });
        }

        if request.len() < self.segments.len() {
            return None;
        }
        if mode == MatchMode::Exact && request.len() != self.segments.len() {
            return None;
        }

        let mut params = RouteParams::new();
        for (pattern_seg, request_seg) in self.segments.iter().zip(request.iter()) {
            match pattern_seg {
                Segment::Literal(literal) => {
                    if literal.as_str() != *request_seg {
                        return None;
                    }
                }
                Segment::Param(name) => {
                    if !params.contains(name) {
                        params.insert(name.as_str(), *request_seg);
                    }
                }
            }
        }

        let consumed = self.segments.len();
        Some(PatternMatch {
            params,
            matched_path: format!("/{}", request[..consumed].join("/")),
            remaining_path: request[consumed..].join("/"),
        })
    }

    /// Substitute `:param` tokens with values from `params`.
    ///
    /// Values are inserted verbatim. A parameter with no supplied value keeps
    /// its literal `:name` token.
    ///
    /// ```
    /// use shell_navigator::{RouteParams, RoutePattern};
    ///
    /// let pattern = RoutePattern::parse("/users/:userId/posts/:postId").unwrap();
    /// let params: RouteParams = [("userId", "7")].into_iter().collect();
    /// assert_eq!(pattern.substitute(&params), "/users/7/posts/:postId");
    /// ```
    pub fn substitute(&self, params: &RouteParams) -> String {
        if self.segments.is_empty() {
            return "/".to_string();
        }
        let mut out = String::new();
        for segment in &self.segments {
            out.push('/');
            match segment {
                Segment::Literal(literal) => out.push_str(literal),
                Segment::Param(name) => match params.get(name) {
                    Some(value) => out.push_str(value),
                    None => {
                        out.push(':');
                        out.push_str(name);
                    }
                },
            }
        }
        out
    }
}

impl fmt::Display for RoutePattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

//! Flattened route index.
//!
//! The route tree is flattened once, at router construction, into an ordered
//! list. Children follow their parent (depth-first, registration order) and
//! carry absolute patterns built with [`join_paths`]. Shell branches are
//! expanded in branch order and remember which branch they belong to.
//!
//! Lookups walk the list in order and return the first complete match, so
//! overlapping patterns resolve by registration order only:
//!
//! ```
//! use shell_navigator::{FlatRouteIndex, Route};
//!
//! let index = FlatRouteIndex::new(&[
//!     Route::new("/users/:id").name("user").into(),
//!     Route::new("/users/active").into(),
//! ]);
//!
//! let m = index.find("/users/active").unwrap();
//! assert_eq!(m.route.get_name(), Some("user"));
//! assert_eq!(m.path_parameters.get("id"), Some("active"));
//! ```

use crate::params::{QueryParams, RouteParams};
use crate::path::join_paths;
use crate::pattern::{MatchMode, RoutePattern};
use crate::route::Route;
use crate::{debug_log, warn_log};
use std::collections::HashMap;
use std::sync::Arc;

/// A route matched against a concrete path.
#[derive(Debug, Clone)]
pub struct RouteMatch {
    /// The matched route definition.
    pub route: Arc<Route>,
    /// The route's absolute pattern.
    pub pattern: RoutePattern,
    /// Parameters extracted from the path.
    pub path_parameters: RouteParams,
    /// Portion of the path consumed by the pattern.
    pub matched_path: String,
    /// Request segments after the matched portion, or `""`.
    pub remaining_path: String,
    /// Position of the route in the flat index.
    pub index: usize,
}

/// One entry of the flat index.
#[derive(Debug, Clone)]
pub struct FlatRoute {
    /// The route definition.
    pub route: Arc<Route>,
    /// Absolute pattern (parent patterns joined in).
    pub pattern: RoutePattern,
    /// Index of the parent route, if nested.
    pub parent: Option<usize>,
    /// Shell branch the route belongs to, if any.
    pub branch: Option<usize>,
}

/// A shell branch as seen by the index.
#[derive(Debug, Clone)]
pub struct BranchInfo {
    /// Where the branch's stack starts.
    pub initial_location: String,
    /// Branch name, if any.
    pub name: Option<String>,
    /// Indices of every route (children included) belonging to the branch.
    pub routes: Vec<usize>,
}

/// Ordered, flattened view over a route tree.
#[derive(Debug, Clone, Default)]
pub struct FlatRouteIndex {
    routes: Vec<FlatRoute>,
    names: HashMap<String, usize>,
    branches: Vec<BranchInfo>,
}

impl FlatRouteIndex {
    /// Flatten `routes`.
    ///
    /// Route names are unique: the first route registered under a name keeps
    /// it and later duplicates are ignored with a warning. Only the first
    /// stateful shell drives branch state; routes of later shells are still
    /// routable.
    pub fn new(routes: &[Arc<Route>]) -> Self {
        let mut index = Self::default();
        let mut shell_seen = false;
        for route in routes {
            index.flatten(route, "/", None, None, &mut shell_seen);
        }
        debug_log!(
            "Flattened {} routes ({} named, {} branches)",
            index.routes.len(),
            index.names.len(),
            index.branches.len()
        );
        index
    }

    fn flatten(
        &mut self,
        route: &Arc<Route>,
        parent_path: &str,
        parent: Option<usize>,
        branch: Option<usize>,
        shell_seen: &mut bool,
    ) {
        if route.is_shell() {
            let owns_branches = !*shell_seen;
            if *shell_seen {
                warn_log!("Only the first stateful shell keeps branch state; ignoring branches of a later shell");
            }
            *shell_seen = true;

            for shell_branch in route.branches() {
                let branch_index = owns_branches.then(|| {
                    self.branches.push(BranchInfo {
                        initial_location: String::new(),
                        name: shell_branch.get_name().map(str::to_string),
                        routes: Vec::new(),
                    });
                    self.branches.len() - 1
                });
                let start = self.routes.len();
                for branch_route in shell_branch.routes() {
                    self.flatten(branch_route, parent_path, parent, branch_index, shell_seen);
                }
                if let Some(b) = branch_index {
                    let initial = shell_branch
                        .get_initial_location()
                        .map(str::to_string)
                        .or_else(|| {
                            self.routes
                                .get(start)
                                .map(|r| r.pattern.as_str().to_string())
                        })
                        .unwrap_or_else(|| "/".to_string());
                    self.branches[b].initial_location = initial;
                }
            }
            return;
        }

        let full = join_paths(parent_path, route.pattern().as_str());
        let position = self.routes.len();
        self.routes.push(FlatRoute {
            route: Arc::clone(route),
            pattern: RoutePattern::parse_lossy(&full),
            parent,
            branch,
        });
        if let Some(b) = branch {
            self.branches[b].routes.push(position);
        }

        if let Some(name) = route.get_name() {
            if let Some(&existing) = self.names.get(name) {
                warn_log!(
                    "Route name '{}' already used by '{}'; ignoring it on '{}'",
                    name,
                    self.routes[existing].pattern,
                    full
                );
            } else {
                self.names.insert(name.to_string(), position);
            }
        }

        for child in route.get_children() {
            self.flatten(child, &full, Some(position), branch, shell_seen);
        }
    }

    // ------------------------------------------------------------------------
    // Lookup
    // ------------------------------------------------------------------------

    /// Number of routes in the index.
    pub fn len(&self) -> usize {
        self.routes.len()
    }

    /// `true` if no routes were registered.
    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    /// All entries, in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &FlatRoute> {
        self.routes.iter()
    }

    /// Entry at `index`.
    pub fn get(&self, index: usize) -> Option<&FlatRoute> {
        self.routes.get(index)
    }

    /// Index of the first route whose pattern completely matches `path`.
    pub fn find_index(&self, path: &str) -> Option<usize> {
        self.routes
            .iter()
            .position(|r| r.pattern.match_path(path, MatchMode::Exact).is_some())
    }

    /// First route whose pattern completely matches `path`.
    pub fn find(&self, path: &str) -> Option<RouteMatch> {
        self.find_index(path)
            .and_then(|index| self.match_at(index, path, MatchMode::Exact))
    }

    /// Match the route at `index` against `path`.
    pub fn match_at(&self, index: usize, path: &str, mode: MatchMode) -> Option<RouteMatch> {
        let entry = self.routes.get(index)?;
        let m = entry.pattern.match_path(path, mode)?;
        Some(RouteMatch {
            route: Arc::clone(&entry.route),
            pattern: entry.pattern.clone(),
            path_parameters: m.params,
            matched_path: m.matched_path,
            remaining_path: m.remaining_path,
            index,
        })
    }

    /// Indices of the route at `index` and its ancestors, outermost first.
    pub fn chain(&self, index: usize) -> Vec<usize> {
        let mut chain = Vec::new();
        let mut cursor = Some(index);
        while let Some(i) = cursor {
            chain.push(i);
            cursor = self.routes.get(i).and_then(|r| r.parent);
        }
        chain.reverse();
        chain
    }

    /// Prefix matches for the route at `index` and each of its ancestors,
    /// outermost first. Used by layouts that render one level per entry.
    pub fn match_stack(&self, index: usize, path: &str) -> Vec<RouteMatch> {
        self.chain(index)
            .into_iter()
            .filter_map(|i| self.match_at(i, path, MatchMode::Prefix))
            .collect()
    }

    // ------------------------------------------------------------------------
    // Names
    // ------------------------------------------------------------------------

    /// Entry registered under `name`.
    pub fn by_name(&self, name: &str) -> Option<&FlatRoute> {
        self.names.get(name).and_then(|&i| self.routes.get(i))
    }

    /// Build the location of the route named `name`.
    ///
    /// `:param` tokens are replaced with values from `path_params` verbatim;
    /// a missing value leaves the token in place. Query parameters are
    /// appended as `?k=v&...`, also verbatim, while
    /// [`QueryParams::from_query_string`] decodes them. Encode `+` and `%`
    /// in values before passing them here.
    ///
    /// ```
    /// use shell_navigator::{FlatRouteIndex, QueryParams, Route, RouteParams};
    ///
    /// let index = FlatRouteIndex::new(&[
    ///     Route::new("/users/:userId").name("userProfile").into(),
    /// ]);
    /// let params: RouteParams = [("userId", "7")].into_iter().collect();
    /// let query: QueryParams = [("tab", "posts")].into_iter().collect();
    ///
    /// assert_eq!(
    ///     index.url_for("userProfile", &params, &query).as_deref(),
    ///     Some("/users/7?tab=posts"),
    /// );
    /// assert_eq!(index.url_for("missing", &params, &query), None);
    /// ```
    pub fn url_for(
        &self,
        name: &str,
        path_params: &RouteParams,
        query_params: &QueryParams,
    ) -> Option<String> {
        let entry = self.by_name(name)?;
        let mut url = entry.pattern.substitute(path_params);
        if !query_params.is_empty() {
            url.push('?');
            url.push_str(&query_params.to_query_string());
        }
        Some(url)
    }

    // ------------------------------------------------------------------------
    // Branches
    // ------------------------------------------------------------------------

    /// Shell branches, in order.
    pub fn branches(&self) -> &[BranchInfo] {
        &self.branches
    }
}

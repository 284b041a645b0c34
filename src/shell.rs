//! Stateful shell branches.
//!
//! A router built with a [`Route::stateful_shell`](crate::Route::stateful_shell)
//! keeps one navigation stack per branch. Switching branches preserves each
//! branch's stack, so returning to a tab shows where the user left it.
//!
//! [`ShellHandle`] is borrowed from [`Router::shell`]. Every operation is a
//! regular navigation (redirects, guards and middleware all apply) whose
//! commit also updates the branch stacks.
//!
//! ```
//! use shell_navigator::{Route, Router, RouterConfig, ShellBranch};
//!
//! # pollster::block_on(async {
//! let router = Router::new(
//!     vec![Route::stateful_shell(vec![
//!         ShellBranch::new(vec![Route::new("/home").child(Route::new(":id"))]),
//!         ShellBranch::new(vec![Route::new("/search")]),
//!     ])],
//!     RouterConfig::new().initial_route("/home"),
//! );
//!
//! let shell = router.shell();
//! shell.push("/home/1").await.unwrap();
//! shell.go_branch(1, false).await.unwrap();
//! shell.go_branch(0, false).await.unwrap();
//!
//! assert_eq!(router.current_path(), "/home/1");
//! assert_eq!(shell.branch_stack(0), Some(vec!["/home".to_string(), "/home/1".to_string()]));
//! # });
//! ```

use crate::context::NavigationContext;
use crate::error::NavigationError;
use crate::nested::find_best_match;
use crate::router::Router;
use crate::state::{BranchEffect, StackOp};
use crate::{debug_log, warn_log};

/// Branch operations of a router's stateful shell.
///
/// Without a shell, [`go`](Self::go) and [`push`](Self::push) behave like
/// their [`Router`] counterparts and [`go_branch`](Self::go_branch) fails
/// with [`NavigationError::InvalidBranch`].
#[derive(Debug, Clone, Copy)]
pub struct ShellHandle<'a> {
    router: &'a Router,
}

impl<'a> ShellHandle<'a> {
    pub(crate) fn new(router: &'a Router) -> Self {
        Self { router }
    }

    /// Activate branch `index`.
    ///
    /// The branch's top entry becomes the current location. With `reset`,
    /// its stack is first truncated to the initial location.
    pub async fn go_branch(
        &self,
        index: usize,
        reset: bool,
    ) -> Result<NavigationContext, NavigationError> {
        let target = self.router.with_state(|state| {
            state.branch_stack(index).and_then(|stack| {
                if reset {
                    stack.first().cloned()
                } else {
                    stack.last().cloned()
                }
            })
        });

        let Some(target) = target else {
            let error = NavigationError::InvalidBranch {
                index,
                count: self.branch_count(),
            };
            warn_log!("{}", error);
            self.router.report_error(&error);
            return Err(error);
        };

        debug_log!("Switching to branch {} at '{}' (reset: {})", index, target, reset);
        self.router
            .navigate(
                &target,
                None,
                StackOp::Replace,
                BranchEffect::Switch { index, reset },
            )
            .await
    }

    /// Navigate within the active branch, replacing its stack.
    pub async fn go(&self, location: &str) -> Result<NavigationContext, NavigationError> {
        self.router
            .navigate(location, None, StackOp::Replace, BranchEffect::ReplaceStack)
            .await
    }

    /// Push onto the active branch's stack.
    pub async fn push(&self, location: &str) -> Result<NavigationContext, NavigationError> {
        self.router
            .navigate(location, None, StackOp::Push, BranchEffect::Push)
            .await
    }

    /// Return to the previous entry of the active branch.
    ///
    /// Does nothing when the branch stack holds a single entry. Without a
    /// shell this is [`Router::pop`].
    pub async fn pop(&self) -> Result<NavigationContext, NavigationError> {
        let target = self.router.with_state(|state| {
            state
                .current_branch_index()
                .map(|i| state.branch_stack(i).and_then(|s| s.iter().rev().nth(1).cloned()))
        });

        match target {
            None => self.router.pop().await,
            Some(None) => {
                debug_log!("Shell pop ignored: active branch has a single entry");
                Ok(self.router.current_context())
            }
            Some(Some(target)) => {
                self.router
                    .navigate(&target, None, StackOp::Pop, BranchEffect::Pop)
                    .await
            }
        }
    }

    /// Active branch, if the router has a shell.
    pub fn current_branch_index(&self) -> Option<usize> {
        self.router.with_state(|state| state.current_branch_index())
    }

    /// Copy of branch `index`'s stack, oldest first.
    pub fn branch_stack(&self, index: usize) -> Option<Vec<String>> {
        self.router
            .with_state(|state| state.branch_stack(index).map(<[String]>::to_vec))
    }

    /// Number of branches.
    pub fn branch_count(&self) -> usize {
        self.router.with_state(|state| state.branch_count())
    }

    /// Branch whose routes contain `path`.
    pub fn branch_of(&self, path: &str) -> Option<usize> {
        let index = self.router.routes();
        index.branches().iter().position(|branch| {
            let candidates = branch
                .routes
                .iter()
                .filter_map(|&i| index.get(i))
                .map(|entry| &entry.pattern);
            find_best_match(path, candidates).is_some()
        })
    }
}

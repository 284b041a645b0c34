//! Navigation state management
//!
//! [`NavigationState`] is owned by the [`Router`](crate::Router) and only ever
//! changed by it. Every change replaces whole fields at once, under the
//! router's write lock, once a navigation decision is final. Readers never
//! observe a half-applied commit.
//!
//! Each navigation attempt takes a fresh navigation id from
//! [`start_navigation`](NavigationState::start_navigation). The optimistic
//! echo, the commit, and the failure rollback all check
//! [`is_navigation_current`](NavigationState::is_navigation_current) first, so
//! an attempt that was overtaken by a newer one never writes over it.

use crate::context::NavigationContext;
use crate::error::NavigationError;
use std::sync::atomic::{AtomicUsize, Ordering};

/// How a successful navigation changes the navigation stack.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StackOp {
    /// Overwrite the last entry (or start a singleton stack).
    Replace,
    /// Append a new entry.
    Push,
    /// Drop the last entry, then overwrite the new last entry.
    Pop,
}

/// How a successful navigation changes the shell branch stacks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BranchEffect {
    /// Branch stacks are untouched.
    None,
    /// Activate `index`, truncating its stack to the initial entry first
    /// when `reset` is set. The branch's top entry becomes the final path.
    Switch { index: usize, reset: bool },
    /// The active branch's stack becomes the final path alone.
    ReplaceStack,
    /// The final path is appended to the active branch's stack.
    Push,
    /// The active branch's last entry is dropped and the new top becomes
    /// the final path.
    Pop,
}

/// Router state
#[derive(Debug)]
pub struct NavigationState {
    current_path: String,
    current_context: NavigationContext,
    /// Context of the last successful commit, restored on failure
    committed_context: NavigationContext,
    /// Navigation history stack; never empty
    navigation_stack: Vec<String>,
    current_branch_index: Option<usize>,
    branch_stacks: Vec<Vec<String>>,
    /// Navigation id counter; each attempt increments it so stale
    /// attempts can tell they were superseded
    navigation_id: AtomicUsize,
}

impl NavigationState {
    /// Create the state for a router that starts at `initial_context`.
    ///
    /// `branch_initials` holds one initial location per shell branch; the
    /// first branch is active when there is at least one.
    pub fn new(initial_context: NavigationContext, branch_initials: Vec<String>) -> Self {
        let path = initial_context.full_path.clone();
        let current_branch_index = (!branch_initials.is_empty()).then_some(0);
        let branch_stacks = branch_initials.into_iter().map(|p| vec![p]).collect();
        let navigation_stack = vec![path.clone()];
        let current_context = initial_context.with_stack(navigation_stack.clone());
        Self {
            current_path: path,
            committed_context: current_context.clone(),
            current_context,
            navigation_stack,
            current_branch_index,
            branch_stacks,
            navigation_id: AtomicUsize::new(0),
        }
    }

    // ------------------------------------------------------------------------
    // Generation counter
    // ------------------------------------------------------------------------

    /// Get current navigation ID
    pub fn navigation_id(&self) -> usize {
        self.navigation_id.load(Ordering::SeqCst)
    }

    /// Start a new navigation and return its ID
    pub fn start_navigation(&self) -> usize {
        self.navigation_id.fetch_add(1, Ordering::SeqCst) + 1
    }

    /// Check if a navigation is still the latest one
    pub fn is_navigation_current(&self, nav_id: usize) -> bool {
        self.navigation_id() == nav_id
    }

    // ------------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------------

    /// Get current path
    pub fn current_path(&self) -> &str {
        &self.current_path
    }

    /// Get current context
    pub fn current_context(&self) -> &NavigationContext {
        &self.current_context
    }

    /// Navigation stack, oldest first; the last entry is the current path
    /// once no navigation is in flight.
    pub fn navigation_stack(&self) -> &[String] {
        &self.navigation_stack
    }

    /// Active shell branch, if the router has a shell.
    pub fn current_branch_index(&self) -> Option<usize> {
        self.current_branch_index
    }

    /// Stack of branch `index`.
    pub fn branch_stack(&self, index: usize) -> Option<&[String]> {
        self.branch_stacks.get(index).map(Vec::as_slice)
    }

    /// Number of shell branches.
    pub fn branch_count(&self) -> usize {
        self.branch_stacks.len()
    }

    // ------------------------------------------------------------------------
    // Mutation
    // ------------------------------------------------------------------------

    /// Show the intended target early, before gating completes.
    pub(crate) fn echo(&mut self, path: &str, ctx: NavigationContext) {
        self.current_path = path.to_string();
        self.current_context = ctx;
    }

    /// Restore the last committed path and context, with `error` attached
    /// to the context.
    pub(crate) fn rollback(&mut self, error: NavigationError) {
        self.current_path = self.committed_context.full_path.clone();
        self.current_context = self.committed_context.clone().with_error(error);
    }

    /// Make `index` the active branch without navigating.
    pub(crate) fn activate_branch(&mut self, index: usize, path: &str) {
        if let Some(stack) = self.branch_stacks.get_mut(index) {
            replace_top(stack, path);
            self.current_branch_index = Some(index);
        }
    }

    /// Apply a successful navigation. Returns the committed context, whose
    /// stack snapshot reflects the new stack.
    pub(crate) fn commit(
        &mut self,
        path: &str,
        ctx: NavigationContext,
        op: StackOp,
        effect: BranchEffect,
    ) -> NavigationContext {
        let mut stack = self.navigation_stack.clone();
        match op {
            StackOp::Replace => replace_top(&mut stack, path),
            StackOp::Push => stack.push(path.to_string()),
            StackOp::Pop => {
                if stack.len() > 1 {
                    stack.pop();
                }
                replace_top(&mut stack, path);
            }
        }
        self.apply_branch_effect(effect, path);

        let mut ctx = ctx.with_stack(stack.clone());
        ctx.error = None;
        self.navigation_stack = stack;
        self.current_path = path.to_string();
        self.current_context = ctx.clone();
        self.committed_context = ctx.clone();
        ctx
    }

    fn apply_branch_effect(&mut self, effect: BranchEffect, path: &str) {
        if let BranchEffect::Switch { index, reset } = effect {
            if let Some(stack) = self.branch_stacks.get_mut(index) {
                if reset {
                    stack.truncate(1);
                }
                replace_top(stack, path);
                self.current_branch_index = Some(index);
            }
            return;
        }

        let Some(stack) = self
            .current_branch_index
            .and_then(|i| self.branch_stacks.get_mut(i))
        else {
            return;
        };
        match effect {
            BranchEffect::ReplaceStack => *stack = vec![path.to_string()],
            BranchEffect::Push => stack.push(path.to_string()),
            BranchEffect::Pop => {
                if stack.len() > 1 {
                    stack.pop();
                }
                replace_top(stack, path);
            }
            BranchEffect::None | BranchEffect::Switch { .. } => {}
        }
    }
}

fn replace_top(stack: &mut Vec<String>, path: &str) {
    match stack.last_mut() {
        Some(top) => *top = path.to_string(),
        None => stack.push(path.to_string()),
    }
}

//! Integration tests
//!
//! End-to-end navigation scenarios driven through [`Router`] and its
//! shell handle.
//!
//! [`Router`]: shell_navigator::Router

#[path = "../common/mod.rs"]
mod common;

mod guards_middleware;
mod navigation;
mod shell;

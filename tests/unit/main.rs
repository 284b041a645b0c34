//! Unit tests
//!
//! Matching and lookup behavior exercised through the public API, without
//! running any navigation.

#[path = "../common/mod.rs"]
mod common;

//! Core types and trait definitions for the Rollcall attendance service.
//!
//! This crate is deliberately free of HTTP and database dependencies.
//! All other crates depend on it; it depends on nothing proprietary.

// We intentionally use native `async fn` in traits (stabilised in Rust 1.75).
// Suppress the advisory lint about `Send` bounds on the returned futures.
#![allow(async_fn_in_trait)]

pub mod attendance;
pub mod error;
pub mod lecture;
pub mod reconcile;
pub mod risk;
pub mod roster;
pub mod store;
pub mod student;
pub mod week;

pub use error::{Error, Result};

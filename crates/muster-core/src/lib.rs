//! Core types and trait definitions for the Muster attendance register.
//!
//! This crate is deliberately free of HTTP and database dependencies.
//! Every other crate depends on it; storage backends implement
//! [`store::MusterStore`].

// We intentionally use native `async fn` in traits (stabilised in Rust 1.75).
// Suppress the advisory lint about `Send` bounds on the returned futures.
#![allow(async_fn_in_trait)]

pub mod attendance;
pub mod employee;
pub mod error;
pub mod stats;
pub mod store;
pub mod validate;

pub use error::{Classify, Error, ErrorKind, Result};

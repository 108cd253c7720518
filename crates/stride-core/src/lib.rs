//! Core types and trait definitions for the Stride weekly log compiler.
//!
//! This crate is deliberately free of HTTP and database dependencies.
//! Storage backends implement [`store::EntryStore`], text generation backends
//! implement [`summarize::Summarizer`], and [`compiler::WeeklyLogCompiler`]
//! glues the two together.

// We intentionally use native `async fn` in traits (stabilised in Rust 1.75).
// Suppress the advisory lint about `Send` bounds on the returned futures.
#![allow(async_fn_in_trait)]

pub mod compiler;
pub mod error;
pub mod log;
pub mod prompt;
pub mod store;
pub mod summarize;
pub mod week;

pub use compiler::{CompileReport, WeeklyLogCompiler};
pub use error::{CompileError, Result};

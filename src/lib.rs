#![forbid(unsafe_code)]
//! weft: code synthesis from visual block graphs
//!
//! A block editor produces a graph of nodes (statements chained by `next`, values plugged into named
//! slots). This crate walks that graph once and renders source text for a target language, inserting
//! only the parentheses the target's precedence rules require and emitting each support routine once.
//!
//! - [`backend`] is the target-independent engine: passes, naming, helpers, index arithmetic.
//! - [`zig`] is the bundled target and its emitter catalog.
//! - [`cli`] is the `weft` command-line tool.
//!
//! ## Panic Policy
//!
//! This codebase follows explicit error handling:
//!
//! - **Production code**: Use `Result` or `Option` with `?` / `ok_or` / `map_err`. The `cli` and `backend` modules
//!   enforce `#![deny(clippy::unwrap_used)]`.
//!
//! - **Test code**: `.unwrap()` and `.expect()` are acceptable in tests.
//!
//! - **Generated code**: Emitters produce Zig `try`/`catch` as *string literals*. They are output text, not control
//!   flow in the engine.

pub mod backend;
pub mod cli;
pub mod version;
pub mod zig;

pub use backend::{EmitError, Generator, GeneratorConfig};
pub use weft_graph::{Node, Workspace};
pub use zig::ZigTarget;

//! weft code synthesis engine
//!
//! This module turns a node graph into source text. It is target-independent: everything specific to
//! one output language lives behind the [`Target`] trait (see [`crate::zig`] for the bundled target).
//!
//! The pipeline is:
//! 1. [`Generator::new`] builds the target's [`EmitterTable`] once.
//! 2. [`Generator::generate`] starts a fresh [`Pass`], lets the target declare variables, then renders
//!    every top-level stack.
//! 3. [`Target::finish`] assembles imports, definitions and the program body; the result is tidied.
//!
//! ## Module Organization
//!
//! - `generator` - `Generator` entry point and the `Target` trait
//! - `pass` - per-run state; expression and statement synthesis, injection points
//! - `emitter` - `Emitter` trait, `Emission` result and the `EmitterTable`
//! - `names` - collision-free identifiers
//! - `helpers` - deduplicated helper routines and the definitions set
//! - `index` - one-based/zero-based index arithmetic and value caching
//! - `text` - quoting, indentation and output cleanup
//! - `config` - `GeneratorConfig`
//! - `errors` - `EmitError`

// Enforce explicit error handling - no panicking in production code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

pub mod config;
pub mod emitter;
pub mod errors;
pub mod generator;
pub mod helpers;
pub mod index;
pub mod names;
pub mod pass;
pub mod text;

pub use config::GeneratorConfig;
pub use emitter::{Emission, Emitter, EmitterTable, SelfInjecting};
pub use errors::{EmitError, EmitResult, Shape};
pub use generator::{Generator, Target};
pub use helpers::{DefinitionKey, Definitions, HELPER_NAME_PLACEHOLDER, HelperTable};
pub use index::{CachedValue, IndexOperand, adjust_index};
pub use names::{NameRegistry, Namespace};
pub use pass::Pass;

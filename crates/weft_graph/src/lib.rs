//! Node graph input contract for the weft code synthesis engine.
//!
//! This crate owns the data the engine consumes: [`Node`]s with fields and slots, [`Workspace`]s of
//! top-level stacks, and JSON loading with id assignment and validation.
//!
//! ## Notes
//! - This crate is intentionally “data-only”: it knows nothing about emitters, ranks, or targets.
//! - The engine never mutates a graph; everything here is plain owned data.
//!
//! ## See also
//! - `weft::backend::Generator` for turning a [`Workspace`] into source text.

pub mod errors;
pub mod node;
pub mod workspace;

pub use errors::GraphError;
pub use node::{FieldValue, Mutation, Node};
pub use workspace::Workspace;

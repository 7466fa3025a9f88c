//! Provide shared, pure vocabulary for the weft code synthesis engine.
//!
//! This crate is intentionally small and dependency-free. It contains deterministic tables and helpers
//! that both the engine (wrapping decisions, name reservation) and individual targets rely on.
//!
//! ## Notes
//!
//! - This is a “vocabulary” crate: **no IO**, no global state, and no graph types.
//! - Current scope: the precedence scale, reserved-word tables, and text-shape helpers.

pub mod lang;
pub mod strings;

//! weft language vocabulary registries.
//!
//! This module is the “front door” for vocabulary shared by the engine and its targets: the precedence
//! scale and the reserved-word tables.
//!
//! ## Notes
//! - Registries are intentionally **pure**: no graph types, no IO, no side effects.
//!
//! ## See also
//! - `cargo run -p weft_core --bin generate_rank_reference` to render the rank table as Markdown.

pub mod precedence;
pub mod zig_keywords;

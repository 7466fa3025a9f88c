//! The bundled Zig target.
//!
//! [`ZigTarget`] supplies everything language-specific: reserved words, quoting, how a stray value
//! becomes a statement, and the final program layout. The emitter catalog is split by block family.
//!
//! ## Runtime model
//!
//! The generated program follows a few fixed conventions so emitters compose:
//! - numbers are `f32`, and workspace variables are declared `var name: f32 = 0;` at file scope;
//! - text is `[]const u8`;
//! - lists are `std.ArrayList(f32)` values; helpers take their `.items` slice;
//! - anything that allocates uses the file-scope `allocator` (the page allocator);
//! - top-level stacks run inside `pub fn main() !void`.
//!
//! ## Module Organization
//!
//! - `logic` - conditionals, comparisons, boolean operators
//! - `loops` - counted, conditional and for-each loops, `break`/`continue`
//! - `math` - numbers, arithmetic, math helpers
//! - `text` - string literals and text operations
//! - `lists` - list construction, indexing, slicing, sorting
//! - `colour` - colour literals and helpers
//! - `variables` - variable get/set
//! - `procedures` - procedure definitions, calls and early returns
//! - `devices` - sensor, message and timer blocks for the device runtime

pub mod colour;
pub mod devices;
pub mod lists;
pub mod logic;
pub mod loops;
pub mod math;
pub mod procedures;
pub mod text;
pub mod variables;

use weft_core::lang::zig_keywords;
use weft_graph::{Node, Workspace};

use crate::backend::text::{QuoteStyle, collapse_blank_lines, prefix_lines};
use crate::backend::{DefinitionKey, EmitError, EmitResult, EmitterTable, Pass, Target};

const STD_IMPORT: &str = "const std = @import(\"std\");";
const ALLOCATOR_IMPORT: &str = "const allocator = std.heap.page_allocator;";

/// Zig code generation.
#[derive(Debug, Clone, Copy, Default)]
pub struct ZigTarget;

impl Target for ZigTarget {
    fn name(&self) -> &'static str {
        "zig"
    }

    fn reserved_words(&self) -> Vec<&'static str> {
        zig_keywords::all_reserved().collect()
    }

    fn quote_style(&self) -> QuoteStyle {
        QuoteStyle::ZIG
    }

    fn emitters(&self) -> EmitterTable {
        let mut table = EmitterTable::new();
        logic::register(&mut table);
        loops::register(&mut table);
        math::register(&mut table);
        text::register(&mut table);
        lists::register(&mut table);
        colour::register(&mut table);
        variables::register(&mut table);
        procedures::register(&mut table);
        devices::register(&mut table);
        table
    }

    fn begin(&self, pass: &mut Pass<'_>, workspace: &Workspace) -> EmitResult<()> {
        let variables = pass.declare_variables(workspace);
        if !variables.is_empty() {
            let block = variables
                .iter()
                .map(|name| format!("var {name}: f32 = 0;"))
                .collect::<Vec<_>>()
                .join("\n");
            pass.definitions_mut().insert(DefinitionKey::Variables, block);
        }

        // Procedures may be called before their definition is rendered.
        let procedures = workspace
            .roots
            .iter()
            .filter(|root| root.kind.starts_with("procedures_def"))
            .filter_map(|root| root.field_text("NAME"));
        for name in procedures {
            pass.procedure_name(name);
        }
        Ok(())
    }

    fn naked_value(&self, code: &str) -> String {
        format!("_ = {code};\n")
    }

    fn cache_declaration(&self, name: &str, code: &str) -> String {
        format!("const {name} = {code};\n")
    }

    fn finish(&self, body: &str, pass: &mut Pass<'_>) -> String {
        let (imports, others) = pass.definitions_mut().drain_sections();
        let mut header = imports.join("\n");
        if !others.is_empty() {
            header.push_str("\n\n");
            header.push_str(&others.join("\n\n"));
        }
        let header = collapse_blank_lines(&header);
        let header = header.trim_matches('\n');

        let mut out = String::new();
        if !header.is_empty() {
            out.push_str(header);
            out.push_str("\n\n\n");
        }
        out.push_str("pub fn main() !void {\n");
        out.push_str(&prefix_lines(body, pass.indent()));
        out.push('}');
        out
    }
}

// ============================================================================
// Shared emitter plumbing
// ============================================================================

/// Require `const std = @import("std");`.
pub(crate) fn require_std(pass: &mut Pass<'_>) {
    pass.require_import("std", STD_IMPORT);
}

/// Require the file-scope allocator (and `std`, which it is built from).
pub(crate) fn require_allocator(pass: &mut Pass<'_>) {
    require_std(pass);
    pass.require_import("allocator", ALLOCATOR_IMPORT);
}

/// Read an enumerated field, faulting when it is missing.
pub(crate) fn option<'n>(node: &'n Node, field: &str) -> EmitResult<&'n str> {
    node.field_text(field)
        .ok_or_else(|| EmitError::unhandled_option(node, field))
}

/// Read an enumerated field that has a documented default.
pub(crate) fn option_or<'n>(node: &'n Node, field: &str, default: &'n str) -> &'n str {
    node.field_text(field).unwrap_or(default)
}

/// Spell a number the way it is written in source: integral values without a fraction.
pub(crate) fn format_number(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        format!("{value}")
    }
}

/// The `ADD0` .. `ADD{n-1}` slot names of a variadic node.
pub(crate) fn item_slots(node: &Node) -> impl Iterator<Item = String> {
    (0..node.mutation.items).map(|i| format!("ADD{i}"))
}

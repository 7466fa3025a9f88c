//! Generate a Markdown reference for the precedence scale and the Zig reserved-word tables.
//!
//! The output lands in `docs/reference/precedence.md`.
//!
//! ## Notes
//! - The generated file is a derived artifact. Update the registries, not the Markdown.
//!
//! ## Examples
//! Run from the workspace root:
//! ```bash
//! cargo run -p weft_core --bin generate_rank_reference
//! ```
//!
//! ## Panics
//! - If the workspace root cannot be resolved.
//! - If output files cannot be written.

use std::fs;
use std::path::{Path, PathBuf};

use weft_core::lang::precedence::{self, RANKS};
use weft_core::lang::zig_keywords;

fn main() {
    let root = workspace_root();

    let out_dir = root.join("docs/reference");
    fs::create_dir_all(&out_dir).expect("create docs/reference/");

    write_reference(&out_dir.join("precedence.md"));
}

fn write_reference(path: &Path) {
    let mut out = String::new();
    out.push_str("# weft precedence reference\n\n");
    out.push_str("> Generated file. Regenerate with `cargo run -p weft_core --bin generate_rank_reference`.\n\n");

    render_ranks_section(&mut out);
    render_overrides_section(&mut out);
    render_reserved_section(&mut out);

    while out.ends_with("\n\n") {
        out.pop();
    }
    fs::write(path, out).expect("write precedence.md");
}

fn render_ranks_section(out: &mut String) {
    out.push_str("## Ranks\n\n");
    out.push_str("Lower levels bind tighter.\n\n");
    out.push_str("| Level | Name | Examples |\n");
    out.push_str("|---|---|---|\n");
    for r in RANKS {
        let examples = r
            .examples
            .iter()
            .map(|e| format!("`{e}`"))
            .collect::<Vec<_>>()
            .join(", ");
        out.push_str(&format!("| {} | {} | {} |\n", r.level, r.name, examples));
    }
    out.push('\n');
}

fn render_overrides_section(out: &mut String) {
    out.push_str("## Same-level pairs that never wrap\n\n");
    out.push_str("| Outer | Inner |\n");
    out.push_str("|---|---|\n");
    for (outer, inner) in precedence::PAREN_OVERRIDES {
        out.push_str(&format!("| {} | {} |\n", outer.name(), inner.name()));
    }
    out.push('\n');
}

fn render_reserved_section(out: &mut String) {
    out.push_str("## Reserved identifiers (Zig)\n\n");
    for (title, words) in [
        ("Keywords", zig_keywords::ZIG_KEYWORDS),
        ("Primitives", zig_keywords::ZIG_PRIMITIVES),
        ("Runtime names", zig_keywords::ZIG_RUNTIME_NAMES),
    ] {
        out.push_str(&format!("### {title}\n\n"));
        let line = words.iter().map(|w| format!("`{w}`")).collect::<Vec<_>>().join(", ");
        out.push_str(&line);
        out.push_str("\n\n");
    }
}

fn workspace_root() -> PathBuf {
    // crates/weft_core -> crates -> workspace root
    let manifest_dir = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    manifest_dir
        .parent()
        .and_then(|p| p.parent())
        .map(|p| p.to_path_buf())
        .expect("workspace root (two levels above crates/weft_core)")
}

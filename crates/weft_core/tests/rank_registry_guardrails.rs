use std::collections::HashSet;
use std::path::{Path, PathBuf};

use weft_core::lang::precedence::{self, RANKS, Rank};
use weft_core::lang::zig_keywords;

#[test]
fn ranks_unique_and_resolvable() {
    let mut names = HashSet::new();
    let mut levels = HashSet::new();

    for info in RANKS {
        assert_eq!(
            precedence::from_name(info.name),
            Some(info.rank),
            "rank name not resolvable: {}",
            info.name
        );
        assert_eq!(info.rank.level(), info.level, "level mismatch for {:?}", info.rank);
        assert!(names.insert(info.name), "duplicate rank name {:?}", info.name);
        assert!(levels.insert(info.level), "duplicate rank level {}", info.level);
    }
}

#[test]
fn every_rank_variant_is_registered() {
    let all = [
        Rank::Atomic,
        Rank::UnaryPostfix,
        Rank::UnaryPrefix,
        Rank::Multiplicative,
        Rank::Additive,
        Rank::Relational,
        Rank::Equality,
        Rank::LogicalAnd,
        Rank::LogicalOr,
        Rank::Conditional,
        Rank::Assignment,
        Rank::None,
    ];
    assert_eq!(all.len(), RANKS.len());
    for rank in all {
        assert!(RANKS.iter().any(|r| r.rank == rank), "{rank:?} missing from RANKS");
    }
}

#[test]
fn overrides_only_pair_equal_levels() {
    for (outer, inner) in precedence::PAREN_OVERRIDES {
        assert_eq!(outer.level(), inner.level(), "override {outer:?}/{inner:?} spans levels");
        assert!(!precedence::needs_parens(*outer, *inner));
    }
}

#[test]
fn reserved_tables_have_no_duplicates() {
    let mut seen = HashSet::new();
    for word in zig_keywords::all_reserved() {
        assert!(seen.insert(word), "duplicate reserved word {word:?}");
    }
}

// -------------------------------------------------------------------------------------------------
// Drift guardrails: rank names are spelled only in the registry.
// -------------------------------------------------------------------------------------------------

fn repo_root() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .parent()
        .and_then(|p| p.parent())
        .expect("repo root missing")
        .to_path_buf()
}

fn collect_rs_files(root: &Path) -> Vec<PathBuf> {
    let mut files = Vec::new();
    let mut stack = vec![root.to_path_buf()];
    while let Some(dir) = stack.pop() {
        let Ok(entries) = std::fs::read_dir(&dir) else {
            continue;
        };
        for entry in entries.flatten() {
            let path = entry.path();
            if path.is_dir() {
                stack.push(path);
            } else if path.extension().and_then(|e| e.to_str()) == Some("rs") {
                files.push(path);
            }
        }
    }
    files
}

#[test]
fn no_rank_name_literals_in_engine_layers() {
    let root = repo_root();
    let mut files = collect_rs_files(&root.join("src/backend"));
    files.extend(collect_rs_files(&root.join("src/zig")));

    let mut hits = Vec::new();
    for path in &files {
        let Ok(content) = std::fs::read_to_string(path) else {
            continue;
        };
        for (idx, line) in content.lines().enumerate() {
            if line.trim_start().starts_with("//") {
                continue;
            }
            for info in RANKS {
                // Single-word names ("none", "additive") are too common to police.
                if !info.name.contains('-') {
                    continue;
                }
                if line.contains(&format!("\"{}\"", info.name)) {
                    hits.push(format!("{}:{}: {}", path.display(), idx + 1, line.trim()));
                }
            }
        }
    }
    assert!(
        hits.is_empty(),
        "rank names must come from weft_core::lang::precedence; found:\n{}",
        hits.join("\n")
    );
}

//! CLI command implementations
//!
//! All command functions return `CliResult<ExitCode>` instead of calling
//! `process::exit`. Error handling and exits happen in the top-level `run()`.

use std::fs;
use std::path::Path;

use weft_graph::Workspace;

use super::{BuildArgs, CliError, CliResult, ExitCode};
use crate::backend::{Generator, GeneratorConfig};

// ============================================================================
// Configuration
// ============================================================================

/// Read `--config` (if any) and apply the command-line overrides on top.
pub fn resolve_config(args: &BuildArgs) -> CliResult<GeneratorConfig> {
    let mut config = match &args.config {
        Some(path) => load_config(path)?,
        None => GeneratorConfig::new(),
    };

    if let Some(width) = args.indent {
        config = config.with_indent_width(width);
    }
    if args.zero_based {
        config = config.with_one_based_indexing(false);
    }
    if let Some(prefix) = &args.statement_prefix {
        config = config.with_statement_prefix(as_statement(prefix));
    }
    if let Some(suffix) = &args.statement_suffix {
        config = config.with_statement_suffix(as_statement(suffix));
    }
    if let Some(trap) = &args.loop_trap {
        config = config.with_loop_trap(as_statement(trap));
    }
    Ok(config.with_reserved_words(args.reserved.iter().cloned()))
}

fn load_config(path: &Path) -> CliResult<GeneratorConfig> {
    let text = fs::read_to_string(path)
        .map_err(|e| CliError::failure(format!("Error reading config `{}`: {}", path.display(), e)))?;
    GeneratorConfig::from_json(&text)
        .map_err(|e| CliError::failure(format!("Invalid config `{}`: {}", path.display(), e)))
}

/// Injection text from the command line is one line of code; give it its line break.
fn as_statement(code: &str) -> String {
    if code.ends_with('\n') {
        code.to_string()
    } else {
        format!("{code}\n")
    }
}

// ============================================================================
// Commands
// ============================================================================

/// `weft build`: generate Zig source and write it to `--output` or stdout.
pub fn build_graph(args: &BuildArgs) -> CliResult<ExitCode> {
    let config = resolve_config(args)?;
    let workspace = Workspace::from_path(&args.graph).map_err(CliError::diagnostic)?;
    let code = Generator::zig_with_config(config)
        .generate(&workspace)
        .map_err(CliError::diagnostic)?;

    match &args.output {
        Some(path) => {
            fs::write(path, &code)
                .map_err(|e| CliError::failure(format!("Error writing `{}`: {}", path.display(), e)))?;
            tracing::info!(output = %path.display(), bytes = code.len(), "wrote generated source");
        }
        None => print!("{code}"),
    }
    Ok(ExitCode::SUCCESS)
}

/// `weft check`: load the graph and report its size.
///
/// Every node kind is also checked against the Zig catalog so unsupported blocks surface before a build.
pub fn check_graph(path: &Path) -> CliResult<ExitCode> {
    let workspace = Workspace::from_path(path).map_err(CliError::diagnostic)?;
    let generator = Generator::zig();

    let mut unknown: Vec<&str> = workspace
        .iter_nodes()
        .map(|n| n.kind.as_str())
        .filter(|kind| !generator.handles(kind))
        .collect();
    unknown.sort_unstable();
    unknown.dedup();

    if !unknown.is_empty() {
        return Err(CliError::failure(format!(
            "{}: unsupported node kinds: {}",
            path.display(),
            unknown.join(", ")
        )));
    }

    println!(
        "{}: {} nodes in {} stacks, {} variables",
        path.display(),
        workspace.node_count(),
        workspace.roots.len(),
        workspace.variables.len()
    );
    Ok(ExitCode::SUCCESS)
}

/// `weft kinds`: one handled node kind per line, sorted.
pub fn list_kinds() -> CliResult<ExitCode> {
    let generator = Generator::zig();
    for kind in generator.emitters().kinds() {
        println!("{kind}");
    }
    Ok(ExitCode::SUCCESS)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn scratch(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("weft_cli_{}_{}", std::process::id(), name))
    }

    #[test]
    fn test_flags_override_defaults() {
        let args = BuildArgs {
            indent: Some(2),
            zero_based: true,
            statement_prefix: Some("highlight(%1);".to_string()),
            reserved: vec!["led".to_string()],
            ..BuildArgs::default()
        };
        let config = resolve_config(&args).unwrap();
        assert_eq!(config.indent_unit, "  ");
        assert!(!config.one_based_indexing);
        assert_eq!(config.statement_prefix.as_deref(), Some("highlight(%1);\n"));
        assert_eq!(config.reserved_words, ["led"]);
    }

    #[test]
    fn test_flags_override_config_file() {
        let path = scratch("config.json");
        fs::write(&path, r#"{ "indent_unit": "\t", "loop_trap": "tick();\n" }"#).unwrap();
        let args = BuildArgs {
            config: Some(path.clone()),
            indent: Some(3),
            ..BuildArgs::default()
        };
        let config = resolve_config(&args).unwrap();
        let _ = fs::remove_file(&path);
        assert_eq!(config.indent_unit, "   ");
        assert_eq!(config.loop_trap.as_deref(), Some("tick();\n"));
    }

    #[test]
    fn test_unknown_config_key_is_rejected() {
        let path = scratch("bad_config.json");
        fs::write(&path, r#"{ "indent": 2 }"#).unwrap();
        let args = BuildArgs {
            config: Some(path.clone()),
            ..BuildArgs::default()
        };
        let err = resolve_config(&args).unwrap_err();
        let _ = fs::remove_file(&path);
        assert!(err.message.starts_with("Invalid config"));
        assert_eq!(err.exit_code, ExitCode::FAILURE);
    }

    #[test]
    fn test_build_writes_output_file() {
        let graph = scratch("graph.json");
        let output = scratch("graph.zig");
        fs::write(
            &graph,
            r#"{ "roots": [{ "kind": "text_print", "inputs": { "TEXT": { "kind": "text", "fields": { "TEXT": "hi" } } } }] }"#,
        )
        .unwrap();
        let args = BuildArgs {
            graph: graph.clone(),
            output: Some(output.clone()),
            ..BuildArgs::default()
        };
        let result = build_graph(&args);
        let code = fs::read_to_string(&output);
        let _ = fs::remove_file(&graph);
        let _ = fs::remove_file(&output);
        assert_eq!(result.unwrap(), ExitCode::SUCCESS);
        assert!(code.unwrap().contains("std.debug.print(\"{s}\\n\", .{ \"hi\" });"));
    }

    #[test]
    fn test_build_reports_unknown_kind() {
        let graph = scratch("unknown.json");
        fs::write(&graph, r#"{ "roots": [{ "id": "x1", "kind": "robot_dance" }] }"#).unwrap();
        let args = BuildArgs {
            graph: graph.clone(),
            ..BuildArgs::default()
        };
        let err = build_graph(&args).unwrap_err();
        let _ = fs::remove_file(&graph);
        assert!(err.message.contains("robot_dance"));
    }

    #[test]
    fn test_check_missing_file_fails() {
        let err = check_graph(&scratch("does_not_exist.json")).unwrap_err();
        assert_eq!(err.exit_code, ExitCode::FAILURE);
    }
}

//! CLI module for weft
//!
//! This module provides the command-line interface for the code generator.
//!
//! ## Commands
//!
//! - `build <graph>` - Generate Zig source from a graph document
//! - `check <graph>` - Load and validate a graph document without generating
//! - `kinds` - List the node kinds the Zig target handles
//!
//! ## Modules
//!
//! - `commands` - Command implementations
//!
//! ## Design
//!
//! The CLI uses clap for argument parsing with derive macros.
//! Command functions return `CliResult<T>` instead of calling `process::exit`.
//! Only the top-level `run()` function handles errors and exits.

// Enforce explicit error handling - no panicking in production code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

pub mod commands;

use std::fmt;
use std::path::PathBuf;
use std::process;

use clap::{Args, Parser, Subcommand};
use miette::Diagnostic;

use crate::version::WEFT_VERSION;

// ============================================================================
// CLI Error handling
// ============================================================================

/// Exit code for CLI operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExitCode(pub i32);

impl ExitCode {
    pub const SUCCESS: ExitCode = ExitCode(0);
    pub const FAILURE: ExitCode = ExitCode(1);
}

/// Error type for CLI operations.
///
/// Contains a user-facing message and an exit code. The CLI entry point
/// catches these errors, prints the message, and exits with the code.
#[derive(Debug)]
pub struct CliError {
    /// User-facing error message (already formatted for display)
    pub message: String,
    /// Exit code to return to the shell
    pub exit_code: ExitCode,
}

impl CliError {
    /// Create a new CLI error with a message and exit code.
    pub fn new(message: impl Into<String>, exit_code: ExitCode) -> Self {
        Self {
            message: message.into(),
            exit_code,
        }
    }

    /// Create a failure error (exit code 1).
    pub fn failure(message: impl Into<String>) -> Self {
        Self::new(message, ExitCode::FAILURE)
    }

    /// Render a diagnostic (graph or emission error) the way miette reports it.
    pub fn diagnostic(err: impl Diagnostic + Send + Sync + 'static) -> Self {
        Self::failure(format!("{:?}", miette::Report::new(err)))
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CliError {}

/// Result type for CLI operations.
pub type CliResult<T> = Result<T, CliError>;

// ============================================================================
// Clap CLI definition
// ============================================================================

/// Generate Zig source from visual block graphs
#[derive(Parser, Debug)]
#[command(name = "weft")]
#[command(version = WEFT_VERSION)]
#[command(about = "Generate Zig source from visual block graphs", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Generate Zig source from a graph document
    Build(BuildArgs),

    /// Load and validate a graph document
    Check {
        /// Graph document (JSON)
        #[arg(value_name = "GRAPH")]
        graph: PathBuf,
    },

    /// List the node kinds the Zig target handles
    Kinds,
}

/// Options for `weft build`. Flags override values read from `--config`.
#[derive(Args, Debug, Default)]
pub struct BuildArgs {
    /// Graph document (JSON)
    #[arg(value_name = "GRAPH")]
    pub graph: PathBuf,

    /// Write the generated source here instead of stdout
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Generator configuration (JSON)
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Indent with this many spaces
    #[arg(long, value_name = "N")]
    pub indent: Option<usize>,

    /// Treat graph indices as zero-based
    #[arg(long)]
    pub zero_based: bool,

    /// Code injected before every statement (`%1` is the node id)
    #[arg(long, value_name = "CODE")]
    pub statement_prefix: Option<String>,

    /// Code injected after every statement (`%1` is the node id)
    #[arg(long, value_name = "CODE")]
    pub statement_suffix: Option<String>,

    /// Code injected at the top of every loop body (`%1` is the node id)
    #[arg(long, value_name = "CODE")]
    pub loop_trap: Option<String>,

    /// Never use WORD as a generated identifier (repeatable)
    #[arg(long = "reserve", value_name = "WORD")]
    pub reserved: Vec<String>,
}

// ============================================================================
// CLI entry point
// ============================================================================

/// Main CLI entry point.
///
/// This is the only place where `process::exit` is called. All command
/// implementations return `CliResult` and errors are handled here.
pub fn run() {
    let cli = Cli::parse();

    match execute(cli) {
        Ok(exit_code) => {
            if exit_code.0 != 0 {
                process::exit(exit_code.0);
            }
        }
        Err(e) => {
            if !e.message.is_empty() {
                eprintln!("{}", e.message);
            }
            process::exit(e.exit_code.0);
        }
    }
}

/// Execute the CLI command and return result.
fn execute(cli: Cli) -> CliResult<ExitCode> {
    match cli.command {
        Command::Build(args) => commands::build_graph(&args),
        Command::Check { graph } => commands::check_graph(&graph),
        Command::Kinds => commands::list_kinds(),
    }
}

// ============================================================================
// Tests
// ============================================================================

//! Define error types for graph → source synthesis.
//!
//! These errors represent *emission* failures: the graph is well-formed JSON, but some node cannot be
//! rendered by the active target.
//!
//! ## Notes
//!
//! - Every variant names the offending node by kind and id so users can find it in the editor.
//! - Missing inputs are never errors. Emitters substitute their documented defaults instead.

use std::fmt;

use miette::Diagnostic;
use thiserror::Error;
use weft_graph::Node;

/// The two shapes a node's emission can take.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shape {
    Value,
    Statement,
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Shape::Value => f.write_str("value"),
            Shape::Statement => f.write_str("statement"),
        }
    }
}

/// Error during synthesis. A pass that hits one produces no output.
#[derive(Debug, Clone, PartialEq, Error, Diagnostic)]
pub enum EmitError {
    #[error("no emitter is registered for node kind `{kind}` (node `{node_id}`)")]
    #[diagnostic(code(weft::emit::unhandled_kind), help("run `weft kinds` to list supported node kinds"))]
    UnhandledKind { kind: String, node_id: String },

    #[error("node `{node_id}` ({kind}) has unknown {field} `{value}`")]
    #[diagnostic(code(weft::emit::unhandled_option))]
    UnhandledOption {
        kind: String,
        node_id: String,
        field: String,
        value: String,
    },

    #[error("node `{node_id}` ({kind}) was used where a {expected} was expected")]
    #[diagnostic(
        code(weft::emit::wrong_shape),
        help("value nodes belong in value slots and statement nodes in statement chains")
    )]
    WrongShape {
        kind: String,
        node_id: String,
        expected: Shape,
    },
}

impl EmitError {
    pub fn unhandled_kind(node: &Node) -> Self {
        EmitError::UnhandledKind {
            kind: node.kind.clone(),
            node_id: node.id.clone(),
        }
    }

    /// An enumerated field (`field`) holds a value the emitter does not know.
    ///
    /// A missing field is reported with an empty `value`.
    pub fn unhandled_option(node: &Node, field: &str) -> Self {
        EmitError::UnhandledOption {
            kind: node.kind.clone(),
            node_id: node.id.clone(),
            field: field.to_string(),
            value: node.field(field).map(|v| v.to_string()).unwrap_or_default(),
        }
    }

    pub fn wrong_shape(node: &Node, expected: Shape) -> Self {
        EmitError::WrongShape {
            kind: node.kind.clone(),
            node_id: node.id.clone(),
            expected,
        }
    }
}

/// Result alias used throughout the engine and emitter catalogs.
pub type EmitResult<T> = Result<T, EmitError>;

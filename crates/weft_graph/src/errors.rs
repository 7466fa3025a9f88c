//! Define errors raised while loading a graph document.

use std::path::PathBuf;

use miette::Diagnostic;
use thiserror::Error;

/// Failure to load or validate a graph document.
#[derive(Debug, Error, Diagnostic)]
pub enum GraphError {
    #[error("graph document is not valid JSON: {source}")]
    #[diagnostic(
        code(weft::graph::json),
        help("expected an object with `variables` and `roots` arrays")
    )]
    Json {
        #[from]
        source: serde_json::Error,
    },

    #[error("cannot read graph document `{}`", .path.display())]
    #[diagnostic(code(weft::graph::io))]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("node id `{id}` is used by more than one node")]
    #[diagnostic(code(weft::graph::duplicate_id), help("node ids must be unique within a workspace"))]
    DuplicateId { id: String },
}

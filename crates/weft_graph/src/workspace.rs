//! Load and validate whole graph documents.
//!
//! A [`Workspace`] is what the engine renders: the declared variable names plus the top-level stacks in
//! display order.
//!
//! ## Notes
//! - Nodes without an `id` receive `n1`, `n2`, … in depth-first pre-order over all roots, skipping any
//!   id the document already uses.
//! - Unknown node kinds are accepted here; the engine reports them when it reaches them.
//!
//! ## Examples
//! ```rust
//! use weft_graph::Workspace;
//!
//! let ws = Workspace::from_json(r#"{
//!     "variables": ["count"],
//!     "roots": [{ "kind": "text_print", "inputs": { "TEXT": { "kind": "text", "fields": { "TEXT": "hi" } } } }]
//! }"#).unwrap();
//!
//! assert_eq!(ws.node_count(), 2);
//! assert_eq!(ws.roots[0].id, "n1");
//! assert_eq!(ws.roots[0].input("TEXT").unwrap().id, "n2");
//! ```

use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::errors::GraphError;
use crate::node::Node;

/// Declared variables plus the top-level stacks of a graph.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Workspace {
    pub variables: Vec<String>,
    pub roots: Vec<Node>,
}

impl Workspace {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_variable(mut self, name: impl Into<String>) -> Self {
        self.variables.push(name.into());
        self
    }

    pub fn with_root(mut self, node: Node) -> Self {
        self.roots.push(node);
        self
    }

    /// Parse a workspace from JSON, assign missing ids and validate id uniqueness.
    ///
    /// ## Errors
    /// - [`GraphError::Json`] if the text is not a workspace document.
    /// - [`GraphError::DuplicateId`] if two nodes share an explicit id.
    #[tracing::instrument(skip_all, fields(bytes = json.len()))]
    pub fn from_json(json: &str) -> Result<Self, GraphError> {
        let workspace: Workspace = serde_json::from_str(json)?;
        let workspace = workspace.normalized()?;
        tracing::debug!(
            roots = workspace.roots.len(),
            nodes = workspace.node_count(),
            "loaded workspace"
        );
        Ok(workspace)
    }

    /// Read and parse a workspace file.
    ///
    /// ## Errors
    /// - [`GraphError::Io`] if the file cannot be read, plus everything [`Workspace::from_json`] raises.
    pub fn from_path(path: &Path) -> Result<Self, GraphError> {
        let text = std::fs::read_to_string(path).map_err(|source| GraphError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&text)
    }

    /// Assign missing ids and check that every id is unique.
    ///
    /// Workspaces built in code (rather than loaded) can call this to get the same guarantees.
    pub fn normalized(mut self) -> Result<Self, GraphError> {
        let mut taken = HashSet::new();
        for node in self.iter_nodes() {
            if node.id.is_empty() {
                continue;
            }
            if !taken.insert(node.id.clone()) {
                return Err(GraphError::DuplicateId { id: node.id.clone() });
            }
        }

        let mut counter = 0usize;
        for root in &mut self.roots {
            root.walk_mut(&mut |node| {
                if !node.id.is_empty() {
                    return;
                }
                let id = loop {
                    counter += 1;
                    let candidate = format!("n{counter}");
                    if !taken.contains(&candidate) {
                        break candidate;
                    }
                };
                taken.insert(id.clone());
                node.id = id;
            });
        }
        Ok(self)
    }

    /// Every node of every root, depth-first pre-order.
    pub fn iter_nodes(&self) -> impl Iterator<Item = &Node> {
        let mut nodes = Vec::new();
        for root in &self.roots {
            root.walk(&mut |n| nodes.push(n));
        }
        nodes.into_iter()
    }

    pub fn node_count(&self) -> usize {
        self.iter_nodes().count()
    }
}

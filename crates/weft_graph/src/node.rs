//! Define the node graph handed to the synthesis engine.
//!
//! A [`Node`] is one visual block: a `kind` that selects an emitter, named field values, named value
//! slots (`inputs`), named statement slots (`statements`) and an optional `next` sibling that continues
//! a statement chain.
//!
//! ## Notes
//! - Nodes are plain data. The engine borrows them immutably for the whole pass.
//! - Slot and field maps are `BTreeMap`s so that traversal order (and thus id assignment) is
//!   deterministic.
//!
//! ## Examples
//! ```rust
//! use weft_graph::{FieldValue, Node};
//!
//! let sum = Node::new("math_arithmetic")
//!     .with_field("OP", "ADD")
//!     .with_input("A", Node::new("math_number").with_field("NUM", 1.0))
//!     .with_input("B", Node::new("math_number").with_field("NUM", 2.0));
//!
//! assert_eq!(sum.field_text("OP"), Some("ADD"));
//! assert_eq!(sum.input("A").and_then(|n| n.field_number("NUM")), Some(1.0));
//! assert!(sum.input("C").is_none());
//! assert_eq!(FieldValue::from(2.0).to_string(), "2");
//! ```

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// A single field value on a node.
///
/// Dropdowns and text inputs arrive as [`FieldValue::Text`], number inputs as [`FieldValue::Number`] and
/// checkboxes as [`FieldValue::Bool`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Bool(bool),
    Number(f64),
    Text(String),
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Bool(b) => write!(f, "{}", if *b { "TRUE" } else { "FALSE" }),
            FieldValue::Number(n) => write!(f, "{n}"),
            FieldValue::Text(s) => f.write_str(s),
        }
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::Text(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::Text(value)
    }
}

impl From<f64> for FieldValue {
    fn from(value: f64) -> Self {
        FieldValue::Number(value)
    }
}

impl From<bool> for FieldValue {
    fn from(value: bool) -> Self {
        FieldValue::Bool(value)
    }
}

/// Shape data that an editor's mutators would normally hold on a block.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Mutation {
    /// Number of variadic value inputs (`ADD0` .. `ADD{items-1}`).
    pub items: usize,
    /// Number of `else if` arms on a conditional (`IF1`/`DO1` ..).
    pub else_if: usize,
    /// Whether a conditional has a trailing `else` arm (`ELSE`).
    pub has_else: bool,
    /// Parameter names of a procedure definition or call (call arguments are `ARG0` ..).
    pub params: Vec<String>,
    /// Whether a conditional return carries a value.
    pub has_return: bool,
}

/// One block in the graph.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Node {
    /// Stable identity. Assigned by the loader when the document leaves it empty.
    pub id: String,
    pub kind: String,
    pub fields: BTreeMap<String, FieldValue>,
    /// Value slots.
    pub inputs: BTreeMap<String, Node>,
    /// Statement slots, each holding the first node of a chain.
    pub statements: BTreeMap<String, Node>,
    pub next: Option<Box<Node>>,
    pub comment: Option<String>,
    pub disabled: bool,
    pub mutation: Mutation,
}

impl Node {
    /// Create a node of the given kind with no id, fields, or children.
    pub fn new(kind: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            ..Self::default()
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    pub fn with_field(mut self, name: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        self.fields.insert(name.into(), value.into());
        self
    }

    pub fn with_input(mut self, slot: impl Into<String>, node: Node) -> Self {
        self.inputs.insert(slot.into(), node);
        self
    }

    pub fn with_statement(mut self, slot: impl Into<String>, node: Node) -> Self {
        self.statements.insert(slot.into(), node);
        self
    }

    /// Attach `node` as the next sibling.
    ///
    /// ## Notes
    /// - Replaces any existing `next`. Use [`Node::chain`] to build longer sequences.
    pub fn with_next(mut self, node: Node) -> Self {
        self.next = Some(Box::new(node));
        self
    }

    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = Some(comment.into());
        self
    }

    pub fn with_mutation(mut self, mutation: Mutation) -> Self {
        self.mutation = mutation;
        self
    }

    pub fn disabled(mut self) -> Self {
        self.disabled = true;
        self
    }

    /// Link `nodes` into a statement chain and return its head.
    ///
    /// ## Returns
    /// - `None` for an empty iterator.
    pub fn chain(nodes: impl IntoIterator<Item = Node>) -> Option<Node> {
        let mut nodes: Vec<Node> = nodes.into_iter().collect();
        let mut head = nodes.pop()?;
        while let Some(prev) = nodes.pop() {
            head = prev.with_next(head);
        }
        Some(head)
    }

    pub fn field(&self, name: &str) -> Option<&FieldValue> {
        self.fields.get(name)
    }

    /// Text of a field, if the field is present and textual.
    pub fn field_text(&self, name: &str) -> Option<&str> {
        match self.fields.get(name)? {
            FieldValue::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Numeric value of a field. Text fields holding a number literal are accepted.
    pub fn field_number(&self, name: &str) -> Option<f64> {
        match self.fields.get(name)? {
            FieldValue::Number(n) => Some(*n),
            FieldValue::Text(s) => s.trim().parse().ok(),
            FieldValue::Bool(_) => None,
        }
    }

    /// Boolean value of a field. Text fields holding `TRUE`/`FALSE` are accepted.
    pub fn field_bool(&self, name: &str) -> Option<bool> {
        match self.fields.get(name)? {
            FieldValue::Bool(b) => Some(*b),
            FieldValue::Text(s) if s.eq_ignore_ascii_case("true") => Some(true),
            FieldValue::Text(s) if s.eq_ignore_ascii_case("false") => Some(false),
            _ => None,
        }
    }

    pub fn input(&self, slot: &str) -> Option<&Node> {
        self.inputs.get(slot)
    }

    pub fn statement(&self, slot: &str) -> Option<&Node> {
        self.statements.get(slot)
    }

    pub fn next_node(&self) -> Option<&Node> {
        self.next.as_deref()
    }

    /// Direct children in traversal order: inputs, then statement slots, then `next`.
    pub fn children(&self) -> impl Iterator<Item = &Node> {
        self.inputs
            .values()
            .chain(self.statements.values())
            .chain(self.next.as_deref())
    }

    /// Visit this node and every descendant in depth-first pre-order.
    pub fn walk<'a>(&'a self, visit: &mut dyn FnMut(&'a Node)) {
        visit(self);
        for child in self.children() {
            child.walk(visit);
        }
    }

    pub(crate) fn walk_mut(&mut self, visit: &mut dyn FnMut(&mut Node)) {
        visit(self);
        for child in self.inputs.values_mut() {
            child.walk_mut(visit);
        }
        for child in self.statements.values_mut() {
            child.walk_mut(visit);
        }
        if let Some(next) = self.next.as_deref_mut() {
            next.walk_mut(visit);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chain_links_in_order() {
        let head = Node::chain([Node::new("a"), Node::new("b"), Node::new("c")]).unwrap();
        let kinds: Vec<&str> = std::iter::successors(Some(&head), |n| n.next_node())
            .map(|n| n.kind.as_str())
            .collect();
        assert_eq!(kinds, ["a", "b", "c"]);
        assert!(Node::chain(Vec::new()).is_none());
    }

    #[test]
    fn test_field_accessors_are_lenient_about_text() {
        let node = Node::new("k")
            .with_field("N", "3.5")
            .with_field("B", "TRUE")
            .with_field("X", 2.0);
        assert_eq!(node.field_number("N"), Some(3.5));
        assert_eq!(node.field_bool("B"), Some(true));
        assert_eq!(node.field_text("X"), None);
        assert_eq!(node.field_number("missing"), None);
    }

    #[test]
    fn test_walk_is_preorder_inputs_statements_next() {
        let tree = Node::new("root")
            .with_input("A", Node::new("input"))
            .with_statement("DO", Node::new("body").with_next(Node::new("body2")))
            .with_next(Node::new("sibling"));
        let mut seen = Vec::new();
        tree.walk(&mut |n| seen.push(n.kind.clone()));
        assert_eq!(seen, ["root", "input", "body", "body2", "sibling"]);
    }

    #[test]
    fn test_field_value_display() {
        assert_eq!(FieldValue::from(true).to_string(), "TRUE");
        assert_eq!(FieldValue::from(1.5).to_string(), "1.5");
        assert_eq!(FieldValue::from("x").to_string(), "x");
    }
}

//! Emitters: the per-kind half of synthesis.
//!
//! An [`Emitter`] renders one node kind. It reads the node's fields, asks the [`Pass`] to render its
//! slots, and returns an [`Emission`]. Targets build an [`EmitterTable`] once; the generator owns it and
//! hands it to every pass.
//!
//! ## Notes
//! - Plain functions `fn(&Node, &mut Pass<'_>) -> EmitResult<Emission>` are emitters.
//! - Emitters that place statement prefix/suffix text themselves (conditionals, procedure definitions,
//!   `break`/`continue`) are registered with [`EmitterTable::register_self_injecting`] so the engine does
//!   not inject a second copy.

use std::collections::HashMap;
use std::sync::Arc;

use weft_core::lang::precedence::Rank;
use weft_graph::Node;

use super::errors::EmitResult;
use super::pass::Pass;

/// What an emitter produced for one node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Emission {
    /// An expression and the rank of its outermost operator.
    Value { code: String, rank: Rank },
    /// Newline-terminated statement text.
    Statement(String),
    /// The node registered its output elsewhere (e.g. a procedure definition).
    Nothing,
}

impl Emission {
    pub fn value(code: impl Into<String>, rank: Rank) -> Self {
        Emission::Value {
            code: code.into(),
            rank,
        }
    }

    pub fn statement(code: impl Into<String>) -> Self {
        Emission::Statement(code.into())
    }
}

/// Renders nodes of one kind.
pub trait Emitter: Send + Sync {
    fn emit(&self, node: &Node, pass: &mut Pass<'_>) -> EmitResult<Emission>;

    /// Whether this emitter places statement prefix/suffix text itself.
    fn manages_injection(&self) -> bool {
        false
    }
}

impl<F> Emitter for F
where
    F: Fn(&Node, &mut Pass<'_>) -> EmitResult<Emission> + Send + Sync,
{
    fn emit(&self, node: &Node, pass: &mut Pass<'_>) -> EmitResult<Emission> {
        self(node, pass)
    }
}

/// Wraps an emitter and marks it as managing its own prefix/suffix injection.
pub struct SelfInjecting<E>(pub E);

impl<E: Emitter> Emitter for SelfInjecting<E> {
    fn emit(&self, node: &Node, pass: &mut Pass<'_>) -> EmitResult<Emission> {
        self.0.emit(node, pass)
    }

    fn manages_injection(&self) -> bool {
        true
    }
}

/// Mapping from node kind to emitter, built once per generator.
#[derive(Default, Clone)]
pub struct EmitterTable {
    emitters: HashMap<String, Arc<dyn Emitter>>,
}

impl EmitterTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `emitter` for `kind`, replacing any previous registration.
    pub fn register(&mut self, kind: &str, emitter: impl Emitter + 'static) -> &mut Self {
        self.emitters.insert(kind.to_string(), Arc::new(emitter));
        self
    }

    /// Register an emitter that places statement prefix/suffix text itself.
    pub fn register_self_injecting(&mut self, kind: &str, emitter: impl Emitter + 'static) -> &mut Self {
        self.register(kind, SelfInjecting(emitter))
    }

    /// Make `alias` render exactly like the already-registered `kind`.
    ///
    /// ## Returns
    /// - `false` (and registers nothing) when `kind` has no emitter.
    pub fn alias(&mut self, alias: &str, kind: &str) -> bool {
        match self.emitters.get(kind).cloned() {
            Some(emitter) => {
                self.emitters.insert(alias.to_string(), emitter);
                true
            }
            None => false,
        }
    }

    pub fn get(&self, kind: &str) -> Option<&dyn Emitter> {
        self.emitters.get(kind).map(|e| e.as_ref())
    }

    pub fn contains(&self, kind: &str) -> bool {
        self.emitters.contains_key(kind)
    }

    /// All registered kinds, sorted.
    pub fn kinds(&self) -> Vec<&str> {
        let mut kinds: Vec<&str> = self.emitters.keys().map(String::as_str).collect();
        kinds.sort_unstable();
        kinds
    }

    pub fn len(&self) -> usize {
        self.emitters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.emitters.is_empty()
    }
}

impl std::fmt::Debug for EmitterTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EmitterTable").field("kinds", &self.kinds()).finish()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn unit(_: &Node, _: &mut Pass<'_>) -> EmitResult<Emission> {
        Ok(Emission::value("{}", Rank::Atomic))
    }

    #[test]
    fn test_register_alias_and_lookup() {
        let mut table = EmitterTable::new();
        table.register("unit", unit);
        assert!(table.alias("unit_again", "unit"));
        assert!(!table.alias("ghost", "missing"));
        assert_eq!(table.kinds(), ["unit", "unit_again"]);
        assert!(table.contains("unit_again"));
        assert!(!table.get("unit").unwrap().manages_injection());
    }

    #[test]
    fn test_self_injecting_flag() {
        let mut table = EmitterTable::new();
        table.register_self_injecting("flow", unit);
        assert!(table.get("flow").unwrap().manages_injection());
        assert_eq!(table.len(), 1);
    }
}

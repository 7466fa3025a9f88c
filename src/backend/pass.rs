//! One synthesis pass over a workspace.
//!
//! A [`Pass`] owns the mutable state of a single generation run: the name registry, the helper table,
//! the definitions set, and the stack of enclosing loops. Emitters receive `&mut Pass` and call back into
//! it to render their slots:
//!
//! - value slots through [`Pass::value`] / [`Pass::value_or`] / [`Pass::render_value`], which wrap the
//!   child in parentheses exactly when the precedence rule requires it;
//! - statement slots through [`Pass::statements`] / [`Pass::loop_body`], which walk the `next` chain,
//!   skip disabled nodes, attach comments, inject the configured prefix/suffix text and indent the
//!   result.
//!
//! ## Notes
//! - A pass is single-use. [`super::Generator::generate`] creates a fresh one per call, so nothing leaks
//!   between runs.
//! - Graphs are only borrowed. Nothing here mutates a [`Node`].

use weft_core::lang::precedence::{self, Rank};
use weft_core::strings::is_word;
use weft_graph::{Node, Workspace};

use super::config::GeneratorConfig;
use super::emitter::{Emission, Emitter, EmitterTable};
use super::errors::{EmitError, EmitResult, Shape};
use super::generator::Target;
use super::helpers::{DefinitionKey, Definitions, HelperTable};
use super::index::{CachedValue, IndexOperand, adjust_index, operand_rank};
use super::names::{NameRegistry, Namespace};
use super::text::{inject_id, multiline_quote, prefix_lines, quote_text};

/// Mutable state of one generation run.
pub struct Pass<'g> {
    config: &'g GeneratorConfig,
    emitters: &'g EmitterTable,
    target: &'g dyn Target,
    names: NameRegistry,
    helpers: HelperTable,
    definitions: Definitions,
    /// Ids of the loops enclosing the node being rendered, innermost last.
    loop_stack: Vec<String>,
}

impl<'g> Pass<'g> {
    pub(crate) fn new(config: &'g GeneratorConfig, emitters: &'g EmitterTable, target: &'g dyn Target) -> Self {
        let mut names = NameRegistry::new();
        names.reserve(target.reserved_words());
        names.reserve(&config.reserved_words);
        Self {
            config,
            emitters,
            target,
            names,
            helpers: HelperTable::new(),
            definitions: Definitions::new(),
            loop_stack: Vec::new(),
        }
    }

    pub fn config(&self) -> &'g GeneratorConfig {
        self.config
    }

    /// One indentation step.
    pub fn indent(&self) -> &'g str {
        &self.config.indent_unit
    }

    pub fn target(&self) -> &'g dyn Target {
        self.target
    }

    pub fn names(&self) -> &NameRegistry {
        &self.names
    }

    pub fn definitions(&self) -> &Definitions {
        &self.definitions
    }

    pub fn definitions_mut(&mut self) -> &mut Definitions {
        &mut self.definitions
    }

    // ========================================================================
    // Expressions
    // ========================================================================

    /// Render a value node for a context that requires `desired`.
    ///
    /// ## Parameters
    /// - `node`: the value node, or `None` for an empty slot.
    /// - `desired`: the rank of the consuming context (usually the consumer's operand rank).
    /// - `fallback`: text used when the slot is empty, disabled, or renders to nothing.
    ///
    /// ## Returns
    /// - The rendered code, wrapped in parentheses when `needs_parens(desired, produced)`.
    ///
    /// ## Errors
    /// - [`EmitError::UnhandledKind`] if no emitter handles `node.kind`.
    /// - [`EmitError::WrongShape`] if the node renders as a statement.
    /// - Anything the node's emitter (or its children's) raises.
    pub fn render_value(&mut self, node: Option<&Node>, desired: Rank, fallback: &str) -> EmitResult<String> {
        let Some(node) = node else {
            return Ok(fallback.to_string());
        };
        if node.disabled {
            return Ok(fallback.to_string());
        }
        let (emission, _) = self.dispatch(node)?;
        match emission {
            Emission::Value { code, .. } if code.is_empty() => Ok(fallback.to_string()),
            Emission::Value { code, rank } => {
                if precedence::needs_parens(desired, rank) {
                    Ok(format!("({code})"))
                } else {
                    Ok(code)
                }
            }
            Emission::Statement(_) | Emission::Nothing => Err(EmitError::wrong_shape(node, Shape::Value)),
        }
    }

    /// Render the value slot `slot` of `node`.
    ///
    /// ## Returns
    /// - `None` when the slot is empty (absent, disabled, or rendered to nothing).
    pub fn value(&mut self, node: &Node, slot: &str, rank: Rank) -> EmitResult<Option<String>> {
        let code = self.render_value(node.input(slot), rank, "")?;
        Ok((!code.is_empty()).then_some(code))
    }

    /// Render the value slot `slot` of `node`, substituting `fallback` when it is empty.
    pub fn value_or(&mut self, node: &Node, slot: &str, rank: Rank, fallback: &str) -> EmitResult<String> {
        self.render_value(node.input(slot), rank, fallback)
    }

    // ========================================================================
    // Statements
    // ========================================================================

    /// Render a statement chain starting at `first`, unindented.
    ///
    /// Disabled nodes are skipped and the chain continues with their `next`.
    ///
    /// ## Errors
    /// - [`EmitError::WrongShape`] if a value node appears in the chain.
    pub fn render_sequence(&mut self, first: Option<&Node>) -> EmitResult<String> {
        let mut out = String::new();
        let mut current = first;
        while let Some(node) = current {
            if !node.disabled {
                let (emission, self_injecting) = self.dispatch(node)?;
                out.push_str(&self.finish_statement(node, emission, self_injecting)?);
            }
            current = node.next_node();
        }
        Ok(out)
    }

    /// Render the statement slot `slot` of `node`, indented by one unit.
    pub fn statements(&mut self, node: &Node, slot: &str) -> EmitResult<String> {
        let code = self.render_sequence(node.statement(slot))?;
        Ok(prefix_lines(&code, self.indent()))
    }

    /// Render the body of a loop: the statement slot `slot` of `node`, with the loop trap and injection
    /// text added and `node` recorded as the surrounding loop while the body renders.
    pub fn loop_body(&mut self, node: &Node, slot: &str) -> EmitResult<String> {
        self.loop_stack.push(node.id.clone());
        let body = self.statements(node, slot);
        self.loop_stack.pop();
        Ok(self.add_loop_trap(body?, node))
    }

    /// Add loop-trap and injection text to an already-indented body.
    ///
    /// The suffix and the trap open the body; the prefix closes it, so the loop header is revisited
    /// before the next iteration.
    pub fn add_loop_trap(&self, body: String, node: &Node) -> String {
        let mut out = String::new();
        let suffix = self.statement_suffix(&node.id);
        if !suffix.is_empty() {
            out.push_str(&prefix_lines(&suffix, self.indent()));
        }
        let trap = self.loop_trap(&node.id);
        if !trap.is_empty() {
            out.push_str(&prefix_lines(&trap, self.indent()));
        }
        out.push_str(&body);
        let prefix = self.statement_prefix(&node.id);
        if !prefix.is_empty() {
            out.push_str(&prefix_lines(&prefix, self.indent()));
        }
        out
    }

    /// Id of the innermost loop enclosing the node being rendered.
    pub fn surrounding_loop(&self) -> Option<&str> {
        self.loop_stack.last().map(String::as_str)
    }

    /// Render one top-level stack.
    ///
    /// A value node standing alone becomes a statement through [`Target::naked_value`].
    pub(crate) fn render_top_level(&mut self, root: &Node) -> EmitResult<String> {
        if root.disabled {
            return self.render_sequence(root.next_node());
        }
        let (emission, self_injecting) = self.dispatch(root)?;
        match emission {
            Emission::Value { code, .. } => {
                if code.is_empty() {
                    return Ok(String::new());
                }
                let mut out = self.comments_for(root);
                out.push_str(&self.statement_prefix(&root.id));
                out.push_str(&self.target.naked_value(&code));
                out.push_str(&self.statement_suffix(&root.id));
                Ok(out)
            }
            emission => {
                let mut out = self.finish_statement(root, emission, self_injecting)?;
                out.push_str(&self.render_sequence(root.next_node())?);
                Ok(out)
            }
        }
    }

    /// Comment lines for a statement: the node's own comment, then the nested comments of each value
    /// input.
    pub fn comments_for(&self, node: &Node) -> String {
        let prefix = self.target.comment_prefix();
        let mut out = String::new();
        if let Some(comment) = node.comment.as_deref().filter(|c| !c.is_empty()) {
            out.push_str(&prefix_lines(&format!("{comment}\n"), prefix));
        }
        for child in node.inputs.values() {
            let mut nested = String::new();
            child.walk(&mut |n| {
                if let Some(c) = n.comment.as_deref().filter(|c| !c.is_empty()) {
                    nested.push_str(c);
                    nested.push('\n');
                }
            });
            if !nested.is_empty() {
                out.push_str(&prefix_lines(&nested, prefix));
            }
        }
        out
    }

    // ========================================================================
    // Injection points
    // ========================================================================

    /// The configured statement prefix for `node_id`, or an empty string.
    pub fn statement_prefix(&self, node_id: &str) -> String {
        self.inject(self.config.statement_prefix.as_deref(), node_id)
    }

    /// The configured statement suffix for `node_id`, or an empty string.
    pub fn statement_suffix(&self, node_id: &str) -> String {
        self.inject(self.config.statement_suffix.as_deref(), node_id)
    }

    /// The configured loop trap for `node_id`, or an empty string.
    pub fn loop_trap(&self, node_id: &str) -> String {
        self.inject(self.config.loop_trap.as_deref(), node_id)
    }

    fn inject(&self, template: Option<&str>, node_id: &str) -> String {
        template
            .map(|t| inject_id(t, node_id, self.target.quote_style()))
            .unwrap_or_default()
    }

    // ========================================================================
    // Names, helpers and definitions
    // ========================================================================

    /// Identifier for a user variable.
    pub fn variable_name(&mut self, logical: &str) -> String {
        self.names.resolve(logical, Namespace::Variable)
    }

    /// Identifier for a user procedure.
    pub fn procedure_name(&mut self, logical: &str) -> String {
        self.names.resolve(logical, Namespace::Procedure)
    }

    /// A throwaway local identifier (loop counters, cached values).
    pub fn fresh_name(&mut self, prefix: &str) -> String {
        self.names.fresh_name(prefix, Namespace::Variable)
    }

    /// Name of the helper realized from `template`, emitting it on first request.
    pub fn provide_helper(&mut self, key: &str, template: &str) -> String {
        self.helpers
            .provide(key, template, &self.config.indent_unit, &mut self.names, &mut self.definitions)
    }

    /// Record that the program needs `statement` (idempotent per `tag`).
    pub fn require_import(&mut self, tag: &str, statement: &str) {
        if self
            .definitions
            .insert_if_absent(DefinitionKey::Import(tag.to_string()), statement)
        {
            tracing::debug!(tag, "required import");
        }
    }

    /// Register a procedure definition. A later definition with the same name replaces it in place.
    pub fn define_procedure(&mut self, name: &str, text: impl Into<String>) {
        self.definitions
            .insert(DefinitionKey::Procedure(name.to_string()), text);
    }

    /// Identifiers reserved or issued for declared workspace variables, in declaration order.
    pub fn declare_variables(&mut self, workspace: &Workspace) -> Vec<String> {
        workspace
            .variables
            .iter()
            .map(|v| self.names.resolve(v, Namespace::Variable))
            .collect()
    }

    // ========================================================================
    // Indices, quoting, caching
    // ========================================================================

    /// Render index slot `slot`, converted from graph indexing to target indexing.
    ///
    /// ## Parameters
    /// - `delta`: constant to add. Under one-based indexing it is lowered by one more.
    /// - `negate`: negate the adjusted index.
    /// - `rank`: the rank of the context the index is substituted into.
    ///
    /// ## Returns
    /// - A folded literal when the slot holds an integer literal, otherwise code (see
    ///   [`super::index::adjust_index`]). An empty slot counts as the first position.
    pub fn adjusted_index(
        &mut self,
        node: &Node,
        slot: &str,
        delta: i64,
        negate: bool,
        rank: Rank,
    ) -> EmitResult<String> {
        let one_based = self.config.one_based_indexing;
        let delta = if one_based { delta - 1 } else { delta };
        let default = if one_based { "1" } else { "0" };
        let raw = self.value_or(node, slot, operand_rank(delta, negate, rank), default)?;
        Ok(adjust_index(IndexOperand::parse(&raw), delta, negate, rank))
    }

    /// Quote `raw` as a target string literal.
    pub fn quote(&self, raw: &str) -> String {
        quote_text(raw, self.target.quote_style())
    }

    /// Quote possibly multi-line `raw` as a target string expression.
    pub fn multiline_quote(&self, raw: &str) -> String {
        multiline_quote(raw, self.target.quote_style())
    }

    /// Make `code` safe to evaluate more than once.
    ///
    /// ## Returns
    /// - `code` itself when it is a single word.
    /// - Otherwise a fresh temporary named after `prefix`, plus the declaration that binds it.
    pub fn cache_value(&mut self, code: &str, prefix: &str) -> CachedValue {
        if is_word(code) {
            return CachedValue::direct(code);
        }
        let name = self.fresh_name(prefix);
        let setup = self.target.cache_declaration(&name, code);
        CachedValue { expr: name, setup }
    }

    // ========================================================================
    // Dispatch
    // ========================================================================

    fn dispatch(&mut self, node: &Node) -> EmitResult<(Emission, bool)> {
        let emitters: &'g EmitterTable = self.emitters;
        let emitter: &'g dyn Emitter = emitters
            .get(&node.kind)
            .ok_or_else(|| EmitError::unhandled_kind(node))?;
        tracing::trace!(kind = %node.kind, id = %node.id, "emit");
        let emission = emitter.emit(node, self)?;
        Ok((emission, emitter.manages_injection()))
    }

    fn finish_statement(&mut self, node: &Node, emission: Emission, self_injecting: bool) -> EmitResult<String> {
        let code = match emission {
            Emission::Statement(code) => code,
            Emission::Nothing => return Ok(String::new()),
            Emission::Value { .. } => return Err(EmitError::wrong_shape(node, Shape::Statement)),
        };
        let mut out = self.comments_for(node);
        if self_injecting {
            out.push_str(&code);
        } else {
            out.push_str(&self.statement_prefix(&node.id));
            out.push_str(&code);
            out.push_str(&self.statement_suffix(&node.id));
        }
        Ok(out)
    }
}

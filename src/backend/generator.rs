//! The engine entry point.
//!
//! A [`Generator`] pairs a [`Target`] with a [`GeneratorConfig`] and the target's [`EmitterTable`]. It is
//! immutable once built, so one generator can serve many passes (including concurrent ones on other
//! threads).
//!
//! ## Examples
//! ```rust
//! use weft::backend::Generator;
//! use weft_graph::{Node, Workspace};
//!
//! let workspace = Workspace::new().with_root(
//!     Node::new("text_print").with_input("TEXT", Node::new("text").with_field("TEXT", "hello")),
//! );
//! let code = Generator::zig().generate(&workspace).unwrap();
//! assert!(code.contains("std.debug.print(\"{s}\\n\", .{ \"hello\" });"));
//! ```

use weft_graph::Workspace;

use super::config::GeneratorConfig;
use super::emitter::EmitterTable;
use super::errors::EmitResult;
use super::pass::Pass;
use super::text::{QuoteStyle, tidy_output};

/// The language-specific half of generation.
pub trait Target: Send + Sync {
    /// Short target name (e.g. `"zig"`).
    fn name(&self) -> &'static str;

    /// Words that must never be issued as identifiers.
    fn reserved_words(&self) -> Vec<&'static str>;

    fn quote_style(&self) -> QuoteStyle;

    /// Line-comment prefix, including any trailing space.
    fn comment_prefix(&self) -> &'static str {
        "// "
    }

    /// Build the kind → emitter mapping. Called once per generator.
    fn emitters(&self) -> EmitterTable;

    /// Prepare a fresh pass (declare variables, pre-resolve names).
    fn begin(&self, pass: &mut Pass<'_>, workspace: &Workspace) -> EmitResult<()>;

    /// Turn a value standing alone at top level into a statement.
    fn naked_value(&self, code: &str) -> String;

    /// Statement binding `name` to `code`, used to cache an expression that is evaluated twice.
    fn cache_declaration(&self, name: &str, code: &str) -> String;

    /// Assemble the final program from the rendered top-level `body` and the pass's definitions.
    fn finish(&self, body: &str, pass: &mut Pass<'_>) -> String;
}

/// Immutable engine: target, configuration and emitter table.
pub struct Generator {
    target: Box<dyn Target>,
    emitters: EmitterTable,
    config: GeneratorConfig,
}

impl Generator {
    pub fn new(target: impl Target + 'static, config: GeneratorConfig) -> Self {
        let emitters = target.emitters();
        Self {
            target: Box::new(target),
            emitters,
            config,
        }
    }

    /// A Zig generator with default configuration.
    pub fn zig() -> Self {
        Self::zig_with_config(GeneratorConfig::default())
    }

    pub fn zig_with_config(config: GeneratorConfig) -> Self {
        Self::new(crate::zig::ZigTarget, config)
    }

    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    pub fn target_name(&self) -> &'static str {
        self.target.name()
    }

    pub fn emitters(&self) -> &EmitterTable {
        &self.emitters
    }

    /// Whether some emitter handles `kind`.
    pub fn handles(&self, kind: &str) -> bool {
        self.emitters.contains(kind)
    }

    /// Start a pass without rendering anything.
    ///
    /// Useful for driving individual emitters (tests, tooling). [`Generator::generate`] is the normal way
    /// to run a whole workspace.
    pub fn pass(&self) -> Pass<'_> {
        Pass::new(&self.config, &self.emitters, self.target.as_ref())
    }

    /// Render a whole workspace.
    ///
    /// ## Errors
    /// - The first [`super::EmitError`] any node raises. No partial output is returned.
    #[tracing::instrument(skip_all, fields(target = self.target.name(), roots = workspace.roots.len()))]
    pub fn generate(&self, workspace: &Workspace) -> EmitResult<String> {
        let mut pass = self.pass();
        self.target.begin(&mut pass, workspace)?;

        let mut stacks = Vec::with_capacity(workspace.roots.len());
        for root in &workspace.roots {
            let code = pass.render_top_level(root)?;
            if !code.is_empty() {
                stacks.push(code);
            }
        }
        let body = stacks.join("\n");
        let program = self.target.finish(&body, &mut pass);
        tracing::debug!(bytes = program.len(), "generated program");
        Ok(tidy_output(&program))
    }
}

impl std::fmt::Debug for Generator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Generator")
            .field("target", &self.target.name())
            .field("config", &self.config)
            .field("emitters", &self.emitters.len())
            .finish()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use weft_graph::Node;

    fn assert_sync<T: Send + Sync>() {}

    #[test]
    fn test_generator_is_shareable() {
        assert_sync::<Generator>();
    }

    #[test]
    fn test_empty_workspace_still_has_entry_point() {
        let code = Generator::zig().generate(&Workspace::new()).unwrap();
        assert_eq!(code, "pub fn main() !void {\n}\n");
    }

    #[test]
    fn test_disabled_roots_produce_nothing() {
        let ws = Workspace::new().with_root(Node::new("text_print").disabled());
        let code = Generator::zig().generate(&ws).unwrap();
        assert_eq!(code, "pub fn main() !void {\n}\n");
    }

    #[test]
    fn test_generate_is_deterministic() {
        let ws = Workspace::new().with_variable("a").with_variable("b").with_root(
            Node::new("variables_set")
                .with_field("VAR", "b")
                .with_input("VALUE", Node::new("math_random_int")),
        );
        let generator = Generator::zig();
        assert_eq!(generator.generate(&ws).unwrap(), generator.generate(&ws).unwrap());
    }
}

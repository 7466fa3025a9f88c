//! Generator configuration.
//!
//! Configuration is read-only during a pass. It can be built in code with the `with_*` methods or
//! deserialized from JSON (every field is optional there).

use serde::{Deserialize, Serialize};

/// Pass-wide generation settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GeneratorConfig {
    /// One indentation step
    pub indent_unit: String,
    /// Extra words that must never be issued as identifiers
    pub reserved_words: Vec<String>,
    /// Injected before every statement (`%1` becomes the quoted node id)
    pub statement_prefix: Option<String>,
    /// Injected after every statement and before early exits
    pub statement_suffix: Option<String>,
    /// Injected at the top of every loop body and procedure body
    pub loop_trap: Option<String>,
    /// Whether graph-level indices count from one
    pub one_based_indexing: bool,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            indent_unit: "    ".to_string(),
            reserved_words: Vec::new(),
            statement_prefix: None,
            statement_suffix: None,
            loop_trap: None,
            one_based_indexing: true,
        }
    }
}

impl GeneratorConfig {
    /// Create a new config with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a config from JSON.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Set the indentation unit
    pub fn with_indent_unit(mut self, unit: impl Into<String>) -> Self {
        self.indent_unit = unit.into();
        self
    }

    /// Set the indentation unit to `width` spaces
    pub fn with_indent_width(self, width: usize) -> Self {
        self.with_indent_unit(" ".repeat(width))
    }

    /// Reserve additional identifiers
    pub fn with_reserved_words<I, S>(mut self, words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.reserved_words.extend(words.into_iter().map(Into::into));
        self
    }

    /// Set the statement prefix template
    pub fn with_statement_prefix(mut self, template: impl Into<String>) -> Self {
        self.statement_prefix = Some(template.into());
        self
    }

    /// Set the statement suffix template
    pub fn with_statement_suffix(mut self, template: impl Into<String>) -> Self {
        self.statement_suffix = Some(template.into());
        self
    }

    /// Set the loop trap template
    pub fn with_loop_trap(mut self, template: impl Into<String>) -> Self {
        self.loop_trap = Some(template.into());
        self
    }

    /// Choose one-based (`true`) or zero-based (`false`) indices
    pub fn with_one_based_indexing(mut self, one_based: bool) -> Self {
        self.one_based_indexing = one_based;
        self
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    // ========================================
    // Default config tests
    // ========================================

    #[test]
    fn test_default_config_indent_unit() {
        let config = GeneratorConfig::default();
        assert_eq!(config.indent_unit, "    ");
    }

    #[test]
    fn test_default_config_is_one_based_without_injection() {
        let config = GeneratorConfig::default();
        assert!(config.one_based_indexing);
        assert!(config.statement_prefix.is_none());
        assert!(config.statement_suffix.is_none());
        assert!(config.loop_trap.is_none());
    }

    #[test]
    fn test_new_equals_default() {
        assert_eq!(GeneratorConfig::new(), GeneratorConfig::default());
    }

    // ========================================
    // Builder tests
    // ========================================

    #[test]
    fn test_builder_chain() {
        let config = GeneratorConfig::new()
            .with_indent_width(2)
            .with_reserved_words(["alpha", "beta"])
            .with_statement_prefix("highlight(%1);\n")
            .with_one_based_indexing(false);
        assert_eq!(config.indent_unit, "  ");
        assert_eq!(config.reserved_words, ["alpha", "beta"]);
        assert_eq!(config.statement_prefix.as_deref(), Some("highlight(%1);\n"));
        assert!(!config.one_based_indexing);
    }

    // ========================================
    // JSON tests
    // ========================================

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config = GeneratorConfig::from_json(r#"{ "loop_trap": "guard();\n" }"#).unwrap();
        assert_eq!(config.loop_trap.as_deref(), Some("guard();\n"));
        assert_eq!(config.indent_unit, "    ");
        assert!(config.one_based_indexing);
    }

    #[test]
    fn test_unknown_json_field_is_rejected() {
        assert!(GeneratorConfig::from_json(r#"{ "indent": 2 }"#).is_err());
    }
}

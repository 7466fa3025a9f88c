//! Shared helper routines and the per-pass definitions set.
//!
//! Some nodes need a small utility routine in the generated program (a prime test, a random list
//! element, …). Emitters request one with a *key* and a *template*; the [`HelperTable`] emits each
//! distinct request exactly once and returns the same name to every call site.
//!
//! The [`Definitions`] set collects everything that is emitted ahead of the program body: imports, the
//! variable block, helpers, and procedure definitions.
//!
//! ## Notes
//! - Templates spell the helper's own name as [`HELPER_NAME_PLACEHOLDER`].
//! - Templates are written with two-space indentation; each two-space step is rewritten to the
//!   configured indent unit.
//! - The same key with a *different* template gets its own helper (`lists_sort`, `lists_sort2`) rather
//!   than silently reusing the first realization.

use std::collections::HashMap;

use indexmap::IndexMap;

use super::names::{NameRegistry, Namespace};

/// Spelling of a helper's own name inside a template.
pub const HELPER_NAME_PLACEHOLDER: &str = "{{HELPER}}";

/// Identity of one entry in the [`Definitions`] set.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum DefinitionKey {
    Import(String),
    Variables,
    Helper(String),
    Procedure(String),
}

impl DefinitionKey {
    pub fn is_import(&self) -> bool {
        matches!(self, DefinitionKey::Import(_))
    }
}

/// Insertion-ordered header material for one pass.
#[derive(Debug, Clone, Default)]
pub struct Definitions {
    entries: IndexMap<DefinitionKey, String>,
}

impl Definitions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace an entry. Replacing keeps the original position.
    pub fn insert(&mut self, key: DefinitionKey, text: impl Into<String>) {
        self.entries.insert(key, text.into());
    }

    /// Insert an entry unless the key is already present.
    ///
    /// ## Returns
    /// - `true` if the entry was inserted.
    pub fn insert_if_absent(&mut self, key: DefinitionKey, text: impl Into<String>) -> bool {
        if self.entries.contains_key(&key) {
            return false;
        }
        self.entries.insert(key, text.into());
        true
    }

    pub fn get(&self, key: &DefinitionKey) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    pub fn contains(&self, key: &DefinitionKey) -> bool {
        self.entries.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&DefinitionKey, &str)> {
        self.entries.iter().map(|(k, v)| (k, v.as_str()))
    }

    /// Empty the set, returning `(imports, everything else)`, each in insertion order.
    pub fn drain_sections(&mut self) -> (Vec<String>, Vec<String>) {
        let mut imports = Vec::new();
        let mut others = Vec::new();
        for (key, text) in self.entries.drain(..) {
            if key.is_import() {
                imports.push(text);
            } else {
                others.push(text);
            }
        }
        (imports, others)
    }
}

/// Deduplicates helper requests for one pass.
#[derive(Debug, Clone, Default)]
pub struct HelperTable {
    realized: HashMap<(String, String), String>,
}

impl HelperTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the helper name for `(key, template)`, realizing it on first request.
    ///
    /// ## Parameters
    /// - `key`: desired helper name.
    /// - `template`: helper source using [`HELPER_NAME_PLACEHOLDER`] for its own name.
    /// - `indent_unit`: replaces each two-space indentation step of the template.
    ///
    /// ## Returns
    /// - The issued helper name. The realized text is stored under [`DefinitionKey::Helper`].
    pub fn provide(
        &mut self,
        key: &str,
        template: &str,
        indent_unit: &str,
        names: &mut NameRegistry,
        definitions: &mut Definitions,
    ) -> String {
        let identity = (key.to_string(), template.to_string());
        if let Some(name) = self.realized.get(&identity) {
            return name.clone();
        }

        let name = names.fresh_name(key, Namespace::Procedure);
        let text = reindent(&template.trim().replace(HELPER_NAME_PLACEHOLDER, &name), indent_unit);
        tracing::debug!(key, helper = %name, "realized helper");
        definitions.insert(DefinitionKey::Helper(name.clone()), text);
        self.realized.insert(identity, name.clone());
        name
    }

    /// Number of distinct helpers realized so far.
    pub fn len(&self) -> usize {
        self.realized.len()
    }

    pub fn is_empty(&self) -> bool {
        self.realized.is_empty()
    }
}

/// Rewrite each leading two-space indentation step to `unit`.
fn reindent(text: &str, unit: &str) -> String {
    if unit == "  " {
        return text.to_string();
    }
    text.split('\n')
        .map(|line| {
            let spaces = line.len() - line.trim_start_matches(' ').len();
            let steps = spaces / 2;
            format!("{}{}", unit.repeat(steps), &line[steps * 2..])
        })
        .collect::<Vec<_>>()
        .join("\n")
}

//! Issue collision-free identifiers for user-visible names.
//!
//! Graph authors name variables and procedures freely (`"my count"`, `"2nd"`, `"wert€"`); the target
//! needs identifiers that are valid, unique across namespaces, and never a reserved word. The
//! [`NameRegistry`] owns that mapping for a single pass.
//!
//! ## Notes
//! - Lookup is case-sensitive: `"X"` and `"x"` are different logical names.
//! - Identifiers are unique across *all* namespaces, so a variable and a procedure that share a
//!   logical name receive different identifiers.
//! - Reserved words survive [`NameRegistry::reset`]; issued identifiers do not.
//!
//! ## Examples
//! ```rust
//! use weft::backend::names::{NameRegistry, Namespace};
//!
//! let mut names = NameRegistry::new();
//! names.reserve(["x"]);
//!
//! let var = names.resolve("x", Namespace::Variable);
//! let proc_ = names.resolve("x", Namespace::Procedure);
//! assert_eq!(var, "x2");
//! assert_eq!(proc_, "x3");
//! assert_eq!(names.resolve("x", Namespace::Variable), "x2");
//! ```

use std::collections::{HashMap, HashSet};

/// Which kind of entity a logical name refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Namespace {
    Variable,
    Procedure,
}

/// Maps `(namespace, logical name)` pairs to identifiers for one pass.
#[derive(Debug, Clone, Default)]
pub struct NameRegistry {
    reserved: HashSet<String>,
    issued: HashSet<String>,
    resolved: HashMap<(Namespace, String), String>,
}

impl NameRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add words that must never be issued. Cumulative.
    pub fn reserve<I, S>(&mut self, words: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.reserved.extend(words.into_iter().map(|w| w.as_ref().to_string()));
    }

    pub fn is_reserved(&self, word: &str) -> bool {
        self.reserved.contains(word)
    }

    /// Return the identifier for `logical` in `namespace`, issuing one on first use.
    ///
    /// ## Returns
    /// - The same identifier for repeated calls with the same pair (until [`NameRegistry::reset`]).
    /// - Otherwise the sanitized name, suffixed with `2`, `3`, … until it collides with nothing
    ///   reserved or already issued.
    pub fn resolve(&mut self, logical: &str, namespace: Namespace) -> String {
        let key = (namespace, logical.to_string());
        if let Some(existing) = self.resolved.get(&key) {
            return existing.clone();
        }
        let name = self.distinct(logical);
        self.resolved.insert(key, name.clone());
        name
    }

    /// The identifier previously issued for a pair, without issuing one.
    pub fn lookup(&self, logical: &str, namespace: Namespace) -> Option<&str> {
        self.resolved
            .get(&(namespace, logical.to_string()))
            .map(String::as_str)
    }

    /// Issue a throwaway identifier derived from `prefix`.
    ///
    /// The identifier is distinct from everything issued so far but is not bound to any logical name,
    /// so a later `resolve(prefix, ..)` gets a different identifier.
    pub fn fresh_name(&mut self, prefix: &str, _namespace: Namespace) -> String {
        self.distinct(prefix)
    }

    /// Forget every issued identifier. Reserved words are kept.
    pub fn reset(&mut self) {
        self.issued.clear();
        self.resolved.clear();
    }

    fn distinct(&mut self, desired: &str) -> String {
        let base = sanitize(desired);
        let mut candidate = base.clone();
        let mut suffix = 1u32;
        while self.issued.contains(&candidate) || self.reserved.contains(&candidate) {
            suffix += 1;
            candidate = format!("{base}{suffix}");
        }
        self.issued.insert(candidate.clone());
        candidate
    }
}

/// Turn an arbitrary display name into a legal identifier.
///
/// ## Notes
/// - Spaces and non-word ASCII characters become `_`.
/// - Each UTF-8 byte of a non-ASCII character becomes `_XX` (uppercase hex).
/// - A leading digit gets the prefix `my_`; an empty name becomes `unnamed`.
pub fn sanitize(name: &str) -> String {
    if name.is_empty() {
        return "unnamed".to_string();
    }
    let mut out = String::with_capacity(name.len());
    for ch in name.chars() {
        if ch.is_ascii_alphanumeric() || ch == '_' {
            out.push(ch);
        } else if ch.is_ascii() {
            out.push('_');
        } else {
            let mut buf = [0u8; 4];
            for byte in ch.encode_utf8(&mut buf).bytes() {
                out.push_str(&format!("_{byte:02X}"));
            }
        }
    }
    if out.starts_with(|c: char| c.is_ascii_digit()) {
        out.insert_str(0, "my_");
    }
    out
}

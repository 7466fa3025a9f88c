//! Precedence vocabulary.
//!
//! This module defines the closed scale of binding strengths ([`Rank`]) used to decide where emitted
//! expressions need parentheses, along with a const metadata table ([`RANKS`]) for docs and tooling.
//!
//! ## Notes
//! - The scale is not tied to one target grammar. It mirrors the operator levels most C-like languages
//!   share (assignment, logical-or, logical-and, equality, relational, additive, multiplicative,
//!   unary prefix, unary postfix, atomic).
//! - A *lower* level binds *tighter*. [`Rank::Atomic`] is the tightest, [`Rank::None`] the loosest.
//! - [`needs_parens`] is the single source of truth for wrapping decisions.
//!
//! ## Examples
//! ```rust
//! use weft_core::lang::precedence::{self, Rank};
//!
//! assert!(Rank::Multiplicative.binds_tighter_than(Rank::Additive));
//! // `a + b` substituted into a `*` operand must be wrapped.
//! assert!(precedence::needs_parens(Rank::Multiplicative, Rank::Additive));
//! // `a * b` substituted into a `+` operand must not.
//! assert!(!precedence::needs_parens(Rank::Additive, Rank::Multiplicative));
//! ```

/// Binding strength of an emitted expression, or the binding context it is substituted into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Rank {
    /// Literals, identifiers, bracketed forms: `0`, `x`, `.{ a, b }`.
    Atomic,
    /// Calls, member access, indexing: `f()`, `a.b`, `a[i]`.
    UnaryPostfix,
    /// `-x`, `!x`.
    UnaryPrefix,
    /// `*`, `/`, `%`.
    Multiplicative,
    /// `+`, `-`, `++`.
    Additive,
    /// `<`, `<=`, `>`, `>=`.
    Relational,
    /// `==`, `!=`.
    Equality,
    /// `and`.
    LogicalAnd,
    /// `or`.
    LogicalOr,
    /// `if (c) a else b` in expression position.
    Conditional,
    /// `x = y`.
    Assignment,
    /// No binding context (a value standing alone, e.g. a call argument).
    None,
}

/// Metadata for a rank.
#[derive(Debug, Clone, Copy)]
pub struct RankInfo {
    pub rank: Rank,
    pub name: &'static str,
    pub level: u8,
    /// Representative spellings at this level, for documentation.
    pub examples: &'static [&'static str],
}

/// Registry of all ranks, tightest first.
pub const RANKS: &[RankInfo] = &[
    info(Rank::Atomic, "atomic", 0, &["0", "x", ".{ a, b }"]),
    info(Rank::UnaryPostfix, "unary-postfix", 1, &["f()", "a.b", "a[i]"]),
    info(Rank::UnaryPrefix, "unary-prefix", 2, &["-x", "!x"]),
    info(Rank::Multiplicative, "multiplicative", 3, &["*", "/", "%"]),
    info(Rank::Additive, "additive", 4, &["+", "-", "++"]),
    info(Rank::Relational, "relational", 5, &["<", "<=", ">", ">="]),
    info(Rank::Equality, "equality", 6, &["==", "!="]),
    info(Rank::LogicalAnd, "logical-and", 7, &["and"]),
    info(Rank::LogicalOr, "logical-or", 8, &["or"]),
    info(Rank::Conditional, "conditional", 9, &["if (c) a else b"]),
    info(Rank::Assignment, "assignment", 10, &["="]),
    info(Rank::None, "none", 99, &[]),
];

/// Rank pairs `(outer, inner)` at the same level that never need parentheses.
///
/// Chained postfix operators (`f().g()`) and chains of the same logical connective (`a and b and c`)
/// evaluate identically under either grouping.
pub const PAREN_OVERRIDES: &[(Rank, Rank)] = &[
    (Rank::UnaryPostfix, Rank::UnaryPostfix),
    (Rank::LogicalAnd, Rank::LogicalAnd),
    (Rank::LogicalOr, Rank::LogicalOr),
];

impl Rank {
    /// Numeric level of this rank. Lower binds tighter.
    pub const fn level(self) -> u8 {
        match self {
            Rank::Atomic => 0,
            Rank::UnaryPostfix => 1,
            Rank::UnaryPrefix => 2,
            Rank::Multiplicative => 3,
            Rank::Additive => 4,
            Rank::Relational => 5,
            Rank::Equality => 6,
            Rank::LogicalAnd => 7,
            Rank::LogicalOr => 8,
            Rank::Conditional => 9,
            Rank::Assignment => 10,
            Rank::None => 99,
        }
    }

    /// Whether `self` binds strictly tighter than `other`.
    pub const fn binds_tighter_than(self, other: Rank) -> bool {
        self.level() < other.level()
    }

    /// Registry name of this rank (e.g. `"additive"`).
    pub fn name(self) -> &'static str {
        info_for(self).name
    }
}

/// Decide whether code of rank `inner` must be wrapped in parentheses when substituted into a context
/// that requires `outer`.
///
/// ## Parameters
/// - `outer`: the rank the consumer asked for (the operand rank of the enclosing operator).
/// - `inner`: the rank the produced code actually has.
///
/// ## Returns
/// - `true` when `inner` does not bind tighter than `outer`, except for the `Atomic`/`Atomic` and
///   `None`/`None` pairs and the [`PAREN_OVERRIDES`].
pub fn needs_parens(outer: Rank, inner: Rank) -> bool {
    if outer.level() > inner.level() {
        return false;
    }
    if outer == inner && matches!(outer, Rank::Atomic | Rank::None) {
        return false;
    }
    !PAREN_OVERRIDES.iter().any(|&(o, i)| o == outer && i == inner)
}

/// Return the full metadata entry for a rank.
///
/// ## Panics
/// - If the registry is missing an entry for `rank` (this indicates a programming error).
pub fn info_for(rank: Rank) -> &'static RankInfo {
    RANKS.iter().find(|r| r.rank == rank).expect("rank info missing")
}

/// Resolve a registry name (e.g. `"logical-and"`) to its rank.
///
/// ## Notes
/// - Matching is **case-sensitive**.
pub fn from_name(name: &str) -> Option<Rank> {
    RANKS.iter().find(|r| r.name == name).map(|r| r.rank)
}

// --- helpers -----------------------------------------------------------------

const fn info(rank: Rank, name: &'static str, level: u8, examples: &'static [&'static str]) -> RankInfo {
    RankInfo {
        rank,
        name,
        level,
        examples,
    }
}

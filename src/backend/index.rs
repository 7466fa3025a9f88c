//! Index arithmetic on rendered operands.
//!
//! Graph authors think in one-based positions by default; targets index from zero. Emitters shift an
//! index by a small constant (`delta`) and sometimes negate it (counting from the end). When the index
//! is a literal integer the arithmetic is folded at synthesis time; otherwise the adjustment is emitted
//! as code and wrapped only when the surrounding context requires it.
//!
//! ## Examples
//! ```rust
//! use weft::backend::index::{IndexOperand, adjust_index};
//! use weft_core::lang::precedence::Rank;
//!
//! assert_eq!(adjust_index(IndexOperand::parse("5"), -1, false, Rank::None), "4");
//! assert_eq!(adjust_index(IndexOperand::parse("n"), -1, false, Rank::None), "n - 1");
//! assert_eq!(adjust_index(IndexOperand::parse("n"), 1, true, Rank::None), "-(n + 1)");
//! assert_eq!(adjust_index(IndexOperand::parse("n"), 2, false, Rank::Multiplicative), "(n + 2)");
//! ```

use weft_core::lang::precedence::{self, Rank};
use weft_core::strings::parse_int_literal;

/// An index as rendered by an emitter: either a compile-time integer or opaque code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IndexOperand {
    Literal(i64),
    Expr(String),
}

impl IndexOperand {
    /// Classify rendered code. Plain integer literals fold; anything else stays an expression.
    pub fn parse(code: &str) -> Self {
        match parse_int_literal(code) {
            Some(n) => IndexOperand::Literal(n),
            None => IndexOperand::Expr(code.to_string()),
        }
    }
}

/// The rank an index operand must be rendered at so that [`adjust_index`] can append its arithmetic.
pub fn operand_rank(delta: i64, negate: bool, fallback: Rank) -> Rank {
    if delta != 0 {
        Rank::Additive
    } else if negate {
        Rank::UnaryPrefix
    } else {
        fallback
    }
}

/// Add `delta` to an index and optionally negate it.
///
/// ## Parameters
/// - `raw`: the index operand. Expressions must already be rendered at [`operand_rank`].
/// - `delta`: constant to add (may be negative).
/// - `negate`: negate the adjusted index.
/// - `fallback`: the rank of the context the result is substituted into.
///
/// ## Returns
/// - For literals, the folded integer `-(raw + delta)` or `raw + delta`.
/// - For expressions, `raw + d`, `raw - d`, `-raw`, or `-(raw ± d)`, parenthesized when an adjustment was
///   emitted and `fallback` binds at least as tightly as the adjustment.
pub fn adjust_index(raw: IndexOperand, delta: i64, negate: bool, fallback: Rank) -> String {
    match raw {
        IndexOperand::Literal(n) => {
            let adjusted = n.saturating_add(delta);
            let adjusted = if negate { adjusted.saturating_neg() } else { adjusted };
            adjusted.to_string()
        }
        IndexOperand::Expr(code) => {
            let mut at = code;
            let mut produced = None;
            if delta > 0 {
                at = format!("{at} + {delta}");
                produced = Some(Rank::Additive);
            } else if delta < 0 {
                at = format!("{at} - {}", delta.unsigned_abs());
                produced = Some(Rank::Additive);
            }
            if negate {
                at = if delta != 0 { format!("-({at})") } else { format!("-{at}") };
                produced = Some(Rank::UnaryPrefix);
            }
            match produced {
                Some(rank) if precedence::needs_parens(fallback, rank) => format!("({at})"),
                _ => at,
            }
        }
    }
}

/// An expression that has been made safe to evaluate more than once.
///
/// `setup` is the statement text (possibly empty) that must run before `expr` is used.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CachedValue {
    pub expr: String,
    pub setup: String,
}

impl CachedValue {
    /// An expression that needs no caching.
    pub fn direct(expr: impl Into<String>) -> Self {
        Self {
            expr: expr.into(),
            setup: String::new(),
        }
    }

    pub fn is_cached(&self) -> bool {
        !self.setup.is_empty()
    }
}

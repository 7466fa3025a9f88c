//! Define shared text-shape helpers (pure, deterministic).
//!
//! Emitters use these to decide whether an already-rendered fragment is simple enough to reuse
//! verbatim (and therefore safe to evaluate twice) or is a compile-time integer that can be folded.
//!
//! ## Notes
//! - These helpers inspect rendered *text*. They never parse target-language grammar beyond the
//!   shapes documented on each function.

/// Check whether `code` is a single word (`[A-Za-z0-9_]+`).
///
/// ## Notes
/// - Words may be evaluated more than once without side effects, so emitters skip caching them.
///
/// ## Examples
/// ```rust
/// use weft_core::strings::is_word;
///
/// assert!(is_word("my_list"));
/// assert!(is_word("42"));
/// assert!(!is_word("f(x)"));
/// assert!(!is_word(""));
/// ```
pub fn is_word(code: &str) -> bool {
    !code.is_empty() && code.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Check whether `code` is a word, optionally wrapped in the given quote delimiter.
///
/// ## Examples
/// ```rust
/// use weft_core::strings::is_word_or_quoted_word;
///
/// assert!(is_word_or_quoted_word("\"abc\"", '"'));
/// assert!(is_word_or_quoted_word("abc", '"'));
/// assert!(!is_word_or_quoted_word("\"a b\"", '"'));
/// ```
pub fn is_word_or_quoted_word(code: &str, delimiter: char) -> bool {
    let inner = code.strip_prefix(delimiter).unwrap_or(code);
    let inner = inner.strip_suffix(delimiter).unwrap_or(inner);
    is_word(inner)
}

/// Parse `code` as a plain integer literal (`-?[0-9]+`, surrounding whitespace allowed).
///
/// ## Returns
/// - `Some(value)` for literal integers that fit in `i64`.
/// - `None` for anything else, including decimals and expressions.
///
/// ## Examples
/// ```rust
/// use weft_core::strings::parse_int_literal;
///
/// assert_eq!(parse_int_literal("5"), Some(5));
/// assert_eq!(parse_int_literal(" -3 "), Some(-3));
/// assert_eq!(parse_int_literal("2.5"), None);
/// assert_eq!(parse_int_literal("n"), None);
/// ```
pub fn parse_int_literal(code: &str) -> Option<i64> {
    let trimmed = code.trim();
    let digits = trimmed.strip_prefix('-').unwrap_or(trimmed);
    if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    trimmed.parse().ok()
}

/// Check whether `code` is a numeric literal (`-?[0-9]+(\.[0-9]+)?`).
pub fn is_number_literal(code: &str) -> bool {
    let trimmed = code.trim();
    let unsigned = trimmed.strip_prefix('-').unwrap_or(trimmed);
    let mut parts = unsigned.splitn(2, '.');
    let whole = parts.next().unwrap_or("");
    let whole_ok = !whole.is_empty() && whole.chars().all(|c| c.is_ascii_digit());
    match parts.next() {
        None => whole_ok,
        Some(frac) => whole_ok && !frac.is_empty() && frac.chars().all(|c| c.is_ascii_digit()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_word_rejects_operators_and_spaces() {
        assert!(!is_word("a + b"));
        assert!(!is_word("a.b"));
        assert!(!is_word("-1"));
    }

    #[test]
    fn test_parse_int_literal_edge_cases() {
        assert_eq!(parse_int_literal("0"), Some(0));
        assert_eq!(parse_int_literal("-"), None);
        assert_eq!(parse_int_literal("--1"), None);
        assert_eq!(parse_int_literal("99999999999999999999"), None);
    }

    #[test]
    fn test_is_number_literal() {
        assert!(is_number_literal("3"));
        assert!(is_number_literal("-3.25"));
        assert!(!is_number_literal("3."));
        assert!(!is_number_literal(".5"));
        assert!(!is_number_literal("1e5"));
    }
}

//! Text utilities shared by the engine and emitter catalogs.
//!
//! Everything here operates on already-rendered source text. Nothing parses the target language.
//!
//! ## Notes
//! - [`prefix_lines`] never prefixes after a trailing newline, so indenting a newline-terminated
//!   fragment keeps it newline-terminated.
//! - [`quote_text`] escapes the characters that would break a string literal and leaves everything else
//!   (including non-ASCII text) untouched.

/// How a target spells string literals.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuoteStyle {
    /// Literal delimiter, e.g. `"`.
    pub delimiter: char,
    /// Concatenation operator used to join quoted lines, e.g. `++`.
    pub concat: &'static str,
}

impl QuoteStyle {
    /// Double-quoted literals joined with `++`.
    pub const ZIG: QuoteStyle = QuoteStyle {
        delimiter: '"',
        concat: "++",
    };
}

/// Indent every line of `text` with `prefix`.
///
/// ## Examples
/// ```rust
/// use weft::backend::text::prefix_lines;
///
/// assert_eq!(prefix_lines("a;\nb;\n", "  "), "  a;\n  b;\n");
/// assert_eq!(prefix_lines("", "  "), "");
/// ```
pub fn prefix_lines(text: &str, prefix: &str) -> String {
    let mut out = String::with_capacity(text.len() + prefix.len() * 4);
    for line in text.split_inclusive('\n') {
        out.push_str(prefix);
        out.push_str(line);
    }
    out
}

/// Render `raw` as a single string literal in `style`.
///
/// ## Examples
/// ```rust
/// use weft::backend::text::{QuoteStyle, quote_text};
///
/// assert_eq!(quote_text("say \"hi\"\n", QuoteStyle::ZIG), r#""say \"hi\"\n""#);
/// ```
pub fn quote_text(raw: &str, style: QuoteStyle) -> String {
    let mut out = String::with_capacity(raw.len() + 2);
    out.push(style.delimiter);
    for ch in raw.chars() {
        match ch {
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if c == style.delimiter => {
                out.push('\\');
                out.push(c);
            }
            c if c.is_ascii_control() => out.push_str(&format!("\\x{:02x}", c as u32)),
            c => out.push(c),
        }
    }
    out.push(style.delimiter);
    out
}

/// Render possibly multi-line `raw` as quoted lines joined by the concatenation operator and a newline
/// literal.
///
/// ## Returns
/// - A single literal when `raw` has no newline, otherwise one quoted line per source line.
///
/// ## Examples
/// ```rust
/// use weft::backend::text::{QuoteStyle, multiline_quote};
///
/// assert_eq!(multiline_quote("a\nb", QuoteStyle::ZIG), "\"a\" ++ \"\\n\" ++\n\"b\"");
/// assert_eq!(multiline_quote("a", QuoteStyle::ZIG), "\"a\"");
/// ```
pub fn multiline_quote(raw: &str, style: QuoteStyle) -> String {
    let newline = quote_text("\n", style);
    let joiner = format!(" {concat} {newline} {concat}\n", concat = style.concat);
    raw.split('\n')
        .map(|line| quote_text(line, style))
        .collect::<Vec<_>>()
        .join(&joiner)
}

/// Replace every `%1` in an injection template with the quoted node id.
pub fn inject_id(template: &str, node_id: &str, style: QuoteStyle) -> String {
    if !template.contains("%1") {
        return template.to_string();
    }
    template.replace("%1", &quote_text(node_id, style))
}

/// Final cleanup of a whole generated program.
///
/// Removes leading blank lines and trailing whitespace on every line, and ends the text with exactly one
/// newline (or nothing, for empty output).
pub fn tidy_output(code: &str) -> String {
    let mut lines: Vec<&str> = code.lines().map(str::trim_end).collect();
    while lines.first().is_some_and(|l| l.is_empty()) {
        lines.remove(0);
    }
    while lines.last().is_some_and(|l| l.is_empty()) {
        lines.pop();
    }
    if lines.is_empty() {
        return String::new();
    }
    let mut out = lines.join("\n");
    out.push('\n');
    out
}

/// Collapse runs of two or more blank lines into a single blank line.
pub fn collapse_blank_lines(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut newlines = 0usize;
    for ch in text.chars() {
        if ch == '\n' {
            newlines += 1;
            if newlines > 2 {
                continue;
            }
        } else {
            newlines = 0;
        }
        out.push(ch);
    }
    out
}

/// Line up the `//` trailing comments of every line after the first.
///
/// Lines without a comment are left alone. The first line is never moved.
///
/// ## Examples
/// ```rust
/// use weft::backend::text::align_comments;
///
/// let lines = ["call(  // head", "  a,  // one", "  long_arg,  // two"];
/// assert_eq!(
///     align_comments(&lines),
///     ["call(  // head", "  a,         // one", "  long_arg,  // two"]
/// );
/// ```
pub fn align_comments<S: AsRef<str>>(lines: &[S]) -> Vec<String> {
    let column = lines
        .iter()
        .skip(1)
        .filter_map(|l| l.as_ref().find("//"))
        .max();
    let Some(column) = column else {
        return lines.iter().map(|l| l.as_ref().to_string()).collect();
    };

    lines
        .iter()
        .enumerate()
        .map(|(i, line)| {
            let line = line.as_ref();
            match line.find("//") {
                Some(at) if i > 0 => format!("{}{}{}", &line[..at], " ".repeat(column - at), &line[at..]),
                _ => line.to_string(),
            }
        })
        .collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_prefix_lines_prefixes_blank_inner_lines() {
        assert_eq!(prefix_lines("a\n\nb", "> "), "> a\n> \n> b");
    }

    #[test]
    fn test_quote_text_escapes_controls() {
        assert_eq!(quote_text("a\\b", QuoteStyle::ZIG), "\"a\\\\b\"");
        assert_eq!(quote_text("\t\r", QuoteStyle::ZIG), "\"\\t\\r\"");
        assert_eq!(quote_text("\u{1b}", QuoteStyle::ZIG), "\"\\x1b\"");
        assert_eq!(quote_text("é'", QuoteStyle::ZIG), "\"é'\"");
    }

    #[test]
    fn test_inject_id() {
        assert_eq!(inject_id("hit(%1);\n", "b", QuoteStyle::ZIG), "hit(\"b\");\n");
        assert_eq!(inject_id("tick();\n", "b", QuoteStyle::ZIG), "tick();\n");
    }

    #[test]
    fn test_tidy_output() {
        assert_eq!(tidy_output("\n\n  \nfn x() {  \n}\n\n\n"), "fn x() {\n}\n");
        assert_eq!(tidy_output("\n \n"), "");
    }

    #[test]
    fn test_collapse_blank_lines() {
        assert_eq!(collapse_blank_lines("a\n\n\n\nb\n"), "a\n\nb\n");
        assert_eq!(collapse_blank_lines("a\nb"), "a\nb");
    }

    #[test]
    fn test_align_comments_without_comments_is_identity() {
        let lines = ["a", "b"];
        assert_eq!(align_comments(&lines), ["a", "b"]);
    }
}

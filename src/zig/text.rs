//! Text literals and text operations.
//!
//! Text is `[]const u8`. Operations that build new text allocate from the file-scope `allocator` and
//! are therefore `try` expressions.

use weft_core::lang::precedence::Rank;
use weft_core::strings::is_word_or_quoted_word;
use weft_graph::Node;

use super::{item_slots, option, option_or, require_allocator, require_std, variables};
use crate::backend::{EmitError, EmitResult, Emission, EmitterTable, Pass};

pub(crate) fn register(table: &mut EmitterTable) {
    table.register("text", text);
    table.register("text_multiline", text_multiline);
    table.register("text_join", text_join);
    table.register("text_append", text_append);
    table.register("text_length", text_length);
    table.register("text_isEmpty", text_is_empty);
    table.register("text_indexOf", text_index_of);
    table.register("text_charAt", text_char_at);
    table.register("text_getSubstring", text_get_substring);
    table.register("text_changeCase", text_change_case);
    table.register("text_trim", text_trim);
    table.register("text_print", text_print);
    table.register("text_prompt_ext", text_prompt);
    table.alias("text_prompt", "text_prompt_ext");
    table.register("text_count", text_count);
    table.register("text_replace", text_replace);
    table.register("text_reverse", text_reverse);
}

const EMPTY: &str = "\"\"";

fn text(node: &Node, pass: &mut Pass<'_>) -> EmitResult<Emission> {
    let raw = node.field_text("TEXT").unwrap_or_default();
    Ok(Emission::value(pass.quote(raw), Rank::Atomic))
}

/// Multi-line text becomes quoted lines joined with `++`.
fn text_multiline(node: &Node, pass: &mut Pass<'_>) -> EmitResult<Emission> {
    let raw = node.field_text("TEXT").unwrap_or_default();
    let code = pass.multiline_quote(raw);
    let rank = if code.contains('\n') { Rank::Additive } else { Rank::Atomic };
    Ok(Emission::value(code, rank))
}

/// `allocPrint` with one `{any}` per argument.
fn format_call(arguments: &[String]) -> String {
    let pattern = "{any}".repeat(arguments.len());
    format!(
        "try std.fmt.allocPrint(allocator, \"{pattern}\", .{{ {} }})",
        arguments.join(", ")
    )
}

/// Concatenate the `ADD*` items. No items is `""`; empty items are `""`.
fn text_join(node: &Node, pass: &mut Pass<'_>) -> EmitResult<Emission> {
    if node.mutation.items == 0 {
        return Ok(Emission::value(EMPTY, Rank::Atomic));
    }
    let mut parts = Vec::with_capacity(node.mutation.items);
    for slot in item_slots(node) {
        parts.push(pass.value_or(node, &slot, Rank::None, EMPTY)?);
    }
    require_allocator(pass);
    Ok(Emission::value(format_call(&parts), Rank::UnaryPrefix))
}

/// `x = x ++ text` as a formatted allocation. Empty text is `""`.
fn text_append(node: &Node, pass: &mut Pass<'_>) -> EmitResult<Emission> {
    let name = variables::variable(node, pass)?;
    let value = pass.value_or(node, "TEXT", Rank::None, EMPTY)?;
    require_allocator(pass);
    Ok(Emission::statement(format!(
        "{name} = {};\n",
        format_call(&[name.clone(), value])
    )))
}

fn text_length(node: &Node, pass: &mut Pass<'_>) -> EmitResult<Emission> {
    let text = pass.value_or(node, "VALUE", Rank::UnaryPostfix, EMPTY)?;
    Ok(Emission::value(format!("{text}.len"), Rank::UnaryPostfix))
}

fn text_is_empty(node: &Node, pass: &mut Pass<'_>) -> EmitResult<Emission> {
    let text = pass.value_or(node, "VALUE", Rank::UnaryPostfix, EMPTY)?;
    Ok(Emission::value(format!("{text}.len == 0"), Rank::Equality))
}

const INDEX_OF: &str = r#"
fn {{HELPER}}(text: []const u8, sub: []const u8) f32 {
  const found = std.mem.indexOf(u8, text, sub) orelse return -1;
  return @floatFromInt(found);
}
"#;

const LAST_INDEX_OF: &str = r#"
fn {{HELPER}}(text: []const u8, sub: []const u8) f32 {
  const found = std.mem.lastIndexOf(u8, text, sub) orelse return -1;
  return @floatFromInt(found);
}
"#;

/// Position of `FIND` in `VALUE`, counted the configured way. Not found is `0` one-based, `-1`
/// zero-based.
fn text_index_of(node: &Node, pass: &mut Pass<'_>) -> EmitResult<Emission> {
    let (key, template) = match option(node, "END")? {
        "FIRST" => ("text_indexOf", INDEX_OF),
        "LAST" => ("text_lastIndexOf", LAST_INDEX_OF),
        _ => return Err(EmitError::unhandled_option(node, "END")),
    };
    let sub = pass.value_or(node, "FIND", Rank::None, EMPTY)?;
    let text = pass.value_or(node, "VALUE", Rank::None, EMPTY)?;
    require_std(pass);
    let helper = pass.provide_helper(key, template);
    let code = format!("{helper}({text}, {sub})");
    if pass.config().one_based_indexing {
        Ok(Emission::value(format!("{code} + 1"), Rank::Additive))
    } else {
        Ok(Emission::value(code, Rank::UnaryPostfix))
    }
}

const GET_FROM_END: &str = r#"
fn {{HELPER}}(text: []const u8, x: usize) []const u8 {
  return text[text.len - x ..][0..1];
}
"#;

const RANDOM_LETTER: &str = r#"
fn {{HELPER}}(text: []const u8) []const u8 {
  const x = std.crypto.random.uintLessThan(usize, text.len);
  return text[x..][0..1];
}
"#;

/// One character (as a one-byte slice) of `VALUE`. Empty text is `""`, an empty index is the first
/// position.
fn text_char_at(node: &Node, pass: &mut Pass<'_>) -> EmitResult<Emission> {
    let position = option_or(node, "WHERE", "FROM_START");
    let text_rank = match position {
        "FIRST" | "FROM_START" => Rank::UnaryPostfix,
        _ => Rank::None,
    };
    let text = pass.value_or(node, "VALUE", text_rank, EMPTY)?;
    let code = match position {
        "FIRST" => format!("{text}[0..1]"),
        "FROM_START" => {
            let at = pass.adjusted_index(node, "AT", 0, false, Rank::None)?;
            format!("{text}[{at}..][0..1]")
        }
        "LAST" | "FROM_END" => {
            let at = if position == "LAST" {
                "1".to_string()
            } else {
                pass.adjusted_index(node, "AT", 1, false, Rank::None)?
            };
            let helper = pass.provide_helper("text_get_from_end", GET_FROM_END);
            format!("{helper}({text}, {at})")
        }
        "RANDOM" => {
            require_std(pass);
            let helper = pass.provide_helper("text_random_letter", RANDOM_LETTER);
            format!("{helper}({text})")
        }
        _ => return Err(EmitError::unhandled_option(node, "WHERE")),
    };
    Ok(Emission::value(code, Rank::UnaryPostfix))
}

const GET_SUBSTRING: &str = r#"
fn {{HELPER}}(text: []const u8, where1: []const u8, at1: usize, where2: []const u8, at2: usize) []const u8 {
  var start = at1;
  if (std.mem.eql(u8, where1, "FROM_END")) {
    start = text.len - 1 - at1;
  } else if (std.mem.eql(u8, where1, "FIRST")) {
    start = 0;
  }
  var end = at2;
  if (std.mem.eql(u8, where2, "FROM_END")) {
    end = text.len - 1 - at2;
  } else if (std.mem.eql(u8, where2, "LAST")) {
    end = text.len - 1;
  }
  return text[start .. end + 1];
}
"#;

/// A slice of `STRING` between two positions.
///
/// Simple operands slice in place; a computed text whose length would be needed twice goes through a
/// helper instead.
fn text_get_substring(node: &Node, pass: &mut Pass<'_>) -> EmitResult<Emission> {
    let where1 = option_or(node, "WHERE1", "FROM_START");
    let where2 = option_or(node, "WHERE2", "FROM_START");
    if !matches!(where1, "FROM_START" | "FROM_END" | "FIRST") {
        return Err(EmitError::unhandled_option(node, "WHERE1"));
    }
    if !matches!(where2, "FROM_START" | "FROM_END" | "LAST") {
        return Err(EmitError::unhandled_option(node, "WHERE2"));
    }
    if where1 == "FIRST" && where2 == "LAST" {
        let text = pass.value_or(node, "STRING", Rank::None, EMPTY)?;
        return Ok(Emission::value(text, Rank::None));
    }

    let text = pass.value_or(node, "STRING", Rank::UnaryPostfix, EMPTY)?;
    let delimiter = pass.target().quote_style().delimiter;
    if is_word_or_quoted_word(&text, delimiter) || (where1 != "FROM_END" && where2 == "FROM_START") {
        let start = match where1 {
            "FROM_START" => pass.adjusted_index(node, "AT1", 0, false, Rank::None)?,
            "FROM_END" => {
                let at = pass.adjusted_index(node, "AT1", 1, false, Rank::Additive)?;
                format!("{text}.len - {at}")
            }
            _ => "0".to_string(),
        };
        let code = match where2 {
            "FROM_START" => {
                let end = pass.adjusted_index(node, "AT2", 1, false, Rank::None)?;
                format!("{text}[{start}..{end}]")
            }
            "FROM_END" => {
                let at = pass.adjusted_index(node, "AT2", 0, false, Rank::Additive)?;
                format!("{text}[{start}..{text}.len - {at}]")
            }
            _ => format!("{text}[{start}..]"),
        };
        return Ok(Emission::value(code, Rank::UnaryPostfix));
    }

    require_std(pass);
    let at1 = pass.adjusted_index(node, "AT1", 0, false, Rank::None)?;
    let at2 = pass.adjusted_index(node, "AT2", 0, false, Rank::None)?;
    let helper = pass.provide_helper("text_get_substring", GET_SUBSTRING);
    let (where1, where2) = (pass.quote(where1), pass.quote(where2));
    Ok(Emission::value(
        format!("{helper}({text}, {where1}, {at1}, {where2}, {at2})"),
        Rank::UnaryPostfix,
    ))
}

const TITLE_CASE: &str = r#"
fn {{HELPER}}(text: []const u8) ![]u8 {
  const out = try allocator.alloc(u8, text.len);
  var start_of_word = true;
  for (text, 0..) |ch, i| {
    out[i] = if (start_of_word) std.ascii.toUpper(ch) else std.ascii.toLower(ch);
    start_of_word = std.ascii.isWhitespace(ch);
  }
  return out;
}
"#;

fn text_change_case(node: &Node, pass: &mut Pass<'_>) -> EmitResult<Emission> {
    let case = option(node, "CASE")?;
    if !matches!(case, "UPPERCASE" | "LOWERCASE" | "TITLECASE") {
        return Err(EmitError::unhandled_option(node, "CASE"));
    }
    let text = pass.value_or(node, "TEXT", Rank::None, EMPTY)?;
    require_allocator(pass);
    let code = match case {
        "UPPERCASE" => format!("try std.ascii.allocUpperString(allocator, {text})"),
        "LOWERCASE" => format!("try std.ascii.allocLowerString(allocator, {text})"),
        _ => {
            let helper = pass.provide_helper("text_toTitleCase", TITLE_CASE);
            format!("try {helper}({text})")
        }
    };
    Ok(Emission::value(code, Rank::UnaryPrefix))
}

fn text_trim(node: &Node, pass: &mut Pass<'_>) -> EmitResult<Emission> {
    let function = match option(node, "MODE")? {
        "LEFT" => "trimLeft",
        "RIGHT" => "trimRight",
        "BOTH" => "trim",
        _ => return Err(EmitError::unhandled_option(node, "MODE")),
    };
    let text = pass.value_or(node, "TEXT", Rank::None, EMPTY)?;
    require_std(pass);
    Ok(Emission::value(
        format!("std.mem.{function}(u8, {text}, \" \")"),
        Rank::UnaryPostfix,
    ))
}

/// Whether `node` evaluates to a `[]const u8`.
fn produces_text(node: &Node) -> bool {
    match node.kind.as_str() {
        "text" | "text_multiline" | "text_join" | "text_charAt" | "text_getSubstring" | "text_changeCase"
        | "text_trim" | "text_replace" | "text_reverse" => true,
        "colour_picker" | "colour_random" | "colour_rgb" | "colour_blend" => true,
        "text_prompt" | "text_prompt_ext" => node.field_text("TYPE") != Some("NUMBER"),
        _ => false,
    }
}

/// Print to standard error. Empty text is `""`.
///
/// Text-producing inputs print with `{s}`; anything else (numbers, variables) with `{any}`.
fn text_print(node: &Node, pass: &mut Pass<'_>) -> EmitResult<Emission> {
    let specifier = match node.input("TEXT") {
        Some(input) if !produces_text(input) => "{any}",
        _ => "{s}",
    };
    let message = pass.value_or(node, "TEXT", Rank::None, EMPTY)?;
    require_std(pass);
    Ok(Emission::statement(format!(
        "std.debug.print(\"{specifier}\\n\", .{{ {message} }});\n"
    )))
}

const PROMPT: &str = r#"
fn {{HELPER}}(message: []const u8) ![]const u8 {
  std.debug.print("{s}", .{ message });
  const line = try std.io.getStdIn().reader().readUntilDelimiterAlloc(allocator, '\n', 1024);
  return std.mem.trimRight(u8, line, "\r");
}
"#;

/// Read a line from standard input, optionally parsed as a number.
///
/// `text_prompt` carries its message in the `TEXT` field, `text_prompt_ext` in the `TEXT` slot (empty:
/// `""`).
fn text_prompt(node: &Node, pass: &mut Pass<'_>) -> EmitResult<Emission> {
    let number = match option_or(node, "TYPE", "TEXT") {
        "TEXT" => false,
        "NUMBER" => true,
        _ => return Err(EmitError::unhandled_option(node, "TYPE")),
    };
    let message = if node.kind == "text_prompt" {
        pass.quote(node.field_text("TEXT").unwrap_or_default())
    } else {
        pass.value_or(node, "TEXT", Rank::None, EMPTY)?
    };
    require_allocator(pass);
    let helper = pass.provide_helper("text_prompt", PROMPT);
    let code = if number {
        format!("try std.fmt.parseFloat(f32, try {helper}({message}))")
    } else {
        format!("try {helper}({message})")
    };
    Ok(Emission::value(code, Rank::UnaryPrefix))
}

const COUNT: &str = r#"
fn {{HELPER}}(haystack: []const u8, needle: []const u8) f32 {
  if (needle.len == 0) {
    return @floatFromInt(haystack.len + 1);
  }
  return @floatFromInt(std.mem.count(u8, haystack, needle));
}
"#;

fn text_count(node: &Node, pass: &mut Pass<'_>) -> EmitResult<Emission> {
    let text = pass.value_or(node, "TEXT", Rank::None, EMPTY)?;
    let sub = pass.value_or(node, "SUB", Rank::None, EMPTY)?;
    require_std(pass);
    let helper = pass.provide_helper("text_count", COUNT);
    Ok(Emission::value(format!("{helper}({text}, {sub})"), Rank::UnaryPostfix))
}

fn text_replace(node: &Node, pass: &mut Pass<'_>) -> EmitResult<Emission> {
    let text = pass.value_or(node, "TEXT", Rank::None, EMPTY)?;
    let from = pass.value_or(node, "FROM", Rank::None, EMPTY)?;
    let to = pass.value_or(node, "TO", Rank::None, EMPTY)?;
    require_allocator(pass);
    Ok(Emission::value(
        format!("try std.mem.replaceOwned(u8, allocator, {text}, {from}, {to})"),
        Rank::UnaryPrefix,
    ))
}

const REVERSE: &str = r#"
fn {{HELPER}}(text: []const u8) ![]u8 {
  const out = try allocator.dupe(u8, text);
  std.mem.reverse(u8, out);
  return out;
}
"#;

fn text_reverse(node: &Node, pass: &mut Pass<'_>) -> EmitResult<Emission> {
    let text = pass.value_or(node, "TEXT", Rank::None, EMPTY)?;
    require_allocator(pass);
    let helper = pass.provide_helper("text_reverse", REVERSE);
    Ok(Emission::value(format!("try {helper}({text})"), Rank::UnaryPrefix))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::backend::{Generator, GeneratorConfig};
    use weft_graph::Mutation;

    fn text_node(raw: &str) -> Node {
        Node::new("text").with_field("TEXT", raw)
    }

    fn var(name: &str) -> Node {
        Node::new("variables_get").with_field("VAR", name)
    }

    fn number(n: f64) -> Node {
        Node::new("math_number").with_field("NUM", n)
    }

    fn render_with(generator: &Generator, node: &Node) -> String {
        let mut pass = generator.pass();
        pass.render_value(Some(node), Rank::None, "").unwrap()
    }

    fn render(node: &Node) -> String {
        render_with(&Generator::zig(), node)
    }

    #[test]
    fn test_literals_are_escaped() {
        assert_eq!(render(&text_node("say \"hi\"")), "\"say \\\"hi\\\"\"");
        let multi = Node::new("text_multiline").with_field("TEXT", "a\nb");
        assert_eq!(render(&multi), "\"a\" ++ \"\\n\" ++\n\"b\"");
    }

    #[test]
    fn test_join_formats_every_item() {
        let join = Node::new("text_join")
            .with_mutation(Mutation {
                items: 2,
                ..Mutation::default()
            })
            .with_input("ADD0", text_node("n = "));
        assert_eq!(
            render(&join),
            "try std.fmt.allocPrint(allocator, \"{any}{any}\", .{ \"n = \", \"\" })"
        );
        assert_eq!(render(&Node::new("text_join")), "\"\"");
    }

    #[test]
    fn test_length_of_call_result_is_wrapped() {
        let reversed = Node::new("text_reverse").with_input("TEXT", var("s"));
        let length = Node::new("text_length").with_input("VALUE", reversed);
        assert_eq!(render(&length), "(try text_reverse(s)).len");
    }

    #[test]
    fn test_index_of_follows_indexing_mode() {
        let node = Node::new("text_indexOf")
            .with_field("END", "FIRST")
            .with_input("VALUE", var("s"))
            .with_input("FIND", text_node("x"));
        assert_eq!(render(&node), "text_indexOf(s, \"x\") + 1");
        let zero_based = Generator::zig_with_config(GeneratorConfig::new().with_one_based_indexing(false));
        assert_eq!(render_with(&zero_based, &node), "text_indexOf(s, \"x\")");
    }

    #[test]
    fn test_char_at_positions() {
        let at = |position: &str| {
            Node::new("text_charAt")
                .with_field("WHERE", position)
                .with_input("VALUE", var("s"))
                .with_input("AT", number(3.0))
        };
        assert_eq!(render(&at("FROM_START")), "s[2..][0..1]");
        assert_eq!(render(&at("FIRST")), "s[0..1]");
        assert_eq!(render(&at("FROM_END")), "text_get_from_end(s, 3)");
        assert_eq!(render(&at("LAST")), "text_get_from_end(s, 1)");
    }

    #[test]
    fn test_substring_simple_and_helper_paths() {
        let simple = Node::new("text_getSubstring")
            .with_field("WHERE1", "FROM_START")
            .with_field("WHERE2", "FROM_START")
            .with_input("STRING", var("s"))
            .with_input("AT1", number(2.0))
            .with_input("AT2", number(4.0));
        assert_eq!(render(&simple), "s[1..4]");

        let computed = Node::new("text_reverse").with_input("TEXT", var("s"));
        let helper = Node::new("text_getSubstring")
            .with_field("WHERE1", "FROM_END")
            .with_field("WHERE2", "LAST")
            .with_input("STRING", computed)
            .with_input("AT1", number(2.0));
        assert_eq!(
            render(&helper),
            "text_get_substring((try text_reverse(s)), \"FROM_END\", 1, \"LAST\", 0)"
        );
    }

    #[test]
    fn test_substring_rejects_unknown_position() {
        let generator = Generator::zig();
        let mut pass = generator.pass();
        let node = Node::new("text_getSubstring").with_field("WHERE2", "FIRST");
        assert!(pass.render_value(Some(&node), Rank::None, "").is_err());
    }

    #[test]
    fn test_print_statement() {
        let generator = Generator::zig();
        let mut pass = generator.pass();
        let node = Node::new("text_print").with_input("TEXT", var("s"));
        assert_eq!(
            pass.render_sequence(Some(&node)).unwrap(),
            "std.debug.print(\"{any}\\n\", .{ s });\n"
        );
    }

    #[test]
    fn test_print_formats_text_as_string() {
        let generator = Generator::zig();
        let mut pass = generator.pass();
        let reversed = Node::new("text_reverse").with_input("TEXT", var("s"));
        let node = Node::new("text_print").with_input("TEXT", reversed);
        assert_eq!(
            pass.render_sequence(Some(&node)).unwrap(),
            "std.debug.print(\"{s}\\n\", .{ try text_reverse(s) });\n"
        );
        let empty = Node::new("text_print");
        assert_eq!(
            pass.render_sequence(Some(&empty)).unwrap(),
            "std.debug.print(\"{s}\\n\", .{ \"\" });\n"
        );
        let numeric = Node::new("text_print").with_input("TEXT", number(2.0));
        assert_eq!(
            pass.render_sequence(Some(&numeric)).unwrap(),
            "std.debug.print(\"{any}\\n\", .{ 2 });\n"
        );
    }

    #[test]
    fn test_prompt_number_parses() {
        let node = Node::new("text_prompt")
            .with_field("TYPE", "NUMBER")
            .with_field("TEXT", "Age?");
        assert_eq!(render(&node), "try std.fmt.parseFloat(f32, try text_prompt(\"Age?\"))");
    }

    #[test]
    fn test_change_case_and_trim() {
        let upper = Node::new("text_changeCase")
            .with_field("CASE", "UPPERCASE")
            .with_input("TEXT", var("s"));
        assert_eq!(render(&upper), "try std.ascii.allocUpperString(allocator, s)");
        let title = Node::new("text_changeCase")
            .with_field("CASE", "TITLECASE")
            .with_input("TEXT", var("s"));
        assert_eq!(render(&title), "try text_toTitleCase(s)");
        let trim = Node::new("text_trim").with_field("MODE", "BOTH").with_input("TEXT", var("s"));
        assert_eq!(render(&trim), "std.mem.trim(u8, s, \" \")");
    }
}

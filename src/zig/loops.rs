//! Loops and loop exits.
//!
//! Every loop body goes through [`Pass::loop_body`], which adds the loop trap and records the loop so a
//! nested `break`/`continue` can re-run the loop's statement prefix.

use weft_core::lang::precedence::Rank;
use weft_core::strings::is_number_literal;
use weft_graph::Node;

use super::{format_number, option, option_or};
use crate::backend::{CachedValue, EmitError, EmitResult, Emission, EmitterTable, Pass};

pub(crate) fn register(table: &mut EmitterTable) {
    table.register("controls_repeat_ext", controls_repeat);
    table.alias("controls_repeat", "controls_repeat_ext");
    table.register("controls_whileUntil", controls_while_until);
    table.register("controls_for", controls_for);
    table.register("controls_forEach", controls_for_each);
    table.register_self_injecting("controls_flow_statements", controls_flow_statements);
}

/// Literals and words are evaluated once by construction; anything else gets a `const`.
fn cache_bound(pass: &mut Pass<'_>, code: &str, prefix: &str) -> CachedValue {
    if is_number_literal(code) {
        CachedValue::direct(code)
    } else {
        pass.cache_value(code, prefix)
    }
}

fn literal(code: &str) -> Option<f64> {
    is_number_literal(code).then(|| code.trim().parse().ok()).flatten()
}

/// Repeat a body N times with a fresh counter. `controls_repeat` reads N from its `TIMES` field,
/// `controls_repeat_ext` from its `TIMES` slot (empty: `0`).
fn controls_repeat(node: &Node, pass: &mut Pass<'_>) -> EmitResult<Emission> {
    let times = match node.input("TIMES") {
        None if node.kind == "controls_repeat" => format_number(node.field_number("TIMES").unwrap_or(0.0)),
        _ => pass.value_or(node, "TIMES", Rank::Relational, "0")?,
    };
    let body = pass.loop_body(node, "DO")?;
    let counter = pass.fresh_name("count");
    let bound = cache_bound(pass, &times, "repeat_end");

    let mut code = bound.setup;
    code.push_str(&format!("var {counter}: f32 = 0;\n"));
    code.push_str(&format!(
        "while ({counter} < {end}) : ({counter} += 1) {{\n{body}}}\n",
        end = bound.expr
    ));
    Ok(Emission::statement(code))
}

/// `while (c)` or, in `UNTIL` mode, `while (!c)`. An empty condition is `false`.
fn controls_while_until(node: &Node, pass: &mut Pass<'_>) -> EmitResult<Emission> {
    let until = match option_or(node, "MODE", "WHILE") {
        "WHILE" => false,
        "UNTIL" => true,
        _ => return Err(EmitError::unhandled_option(node, "MODE")),
    };
    let rank = if until { Rank::UnaryPrefix } else { Rank::None };
    let condition = pass.value_or(node, "BOOL", rank, "false")?;
    let body = pass.loop_body(node, "DO")?;
    let condition = if until { format!("!{condition}") } else { condition };
    Ok(Emission::statement(format!("while ({condition}) {{\n{body}}}\n")))
}

/// Count a variable from `FROM` to `TO` by `BY` (defaults `0`, `0`, `1`).
///
/// Literal bounds produce a fixed direction. Otherwise the bounds are cached and the direction is
/// decided at run time.
fn controls_for(node: &Node, pass: &mut Pass<'_>) -> EmitResult<Emission> {
    let variable = pass.variable_name(option(node, "VAR")?);
    let from = pass.value_or(node, "FROM", Rank::Assignment, "0")?;
    let to = pass.value_or(node, "TO", Rank::Assignment, "0")?;
    let step = pass.value_or(node, "BY", Rank::Assignment, "1")?;
    let body = pass.loop_body(node, "DO")?;

    let literals = (literal(&from), literal(&to), literal(&step));
    if let (Some(start), Some(end), Some(increment)) = literals {
        let up = start <= end;
        let (compare, update) = if up { ("<=", "+=") } else { (">=", "-=") };
        let increment = format_number(increment.abs());
        return Ok(Emission::statement(format!(
            "{variable} = {from};\nwhile ({variable} {compare} {to}) : ({variable} {update} {increment}) {{\n{body}}}\n"
        )));
    }

    let start = cache_bound(pass, &from, &format!("{variable}_start"));
    let end = cache_bound(pass, &to, &format!("{variable}_end"));
    let increment = pass.fresh_name(&format!("{variable}_inc"));
    let indent = pass.indent();

    let mut code = start.setup;
    code.push_str(&end.setup);
    match literal(&step) {
        Some(n) => code.push_str(&format!("var {increment}: f32 = {};\n", format_number(n.abs()))),
        None => code.push_str(&format!("var {increment}: f32 = @abs({step});\n")),
    }
    code.push_str(&format!(
        "if ({s} > {e}) {{\n{indent}{increment} = -{increment};\n}}\n",
        s = start.expr,
        e = end.expr
    ));
    code.push_str(&format!(
        "{variable} = {s};\nwhile (if ({increment} >= 0) {variable} <= {e} else {variable} >= {e}) : ({variable} += {increment}) {{\n{body}}}\n",
        s = start.expr,
        e = end.expr
    ));
    Ok(Emission::statement(code))
}

/// Visit every list item, assigning it to the loop variable.
///
/// Zig forbids shadowing, so the capture gets a fresh name and is copied into the variable. An empty
/// list slot iterates nothing.
fn controls_for_each(node: &Node, pass: &mut Pass<'_>) -> EmitResult<Emission> {
    let variable = pass.variable_name(option(node, "VAR")?);
    let items = match pass.value(node, "LIST", Rank::UnaryPostfix)? {
        Some(list) => format!("{list}.items"),
        None => "&[_]f32{}".to_string(),
    };
    let body = pass.loop_body(node, "DO")?;
    let capture = pass.fresh_name(&format!("{variable}_item"));
    let indent = pass.indent();
    Ok(Emission::statement(format!(
        "for ({items}) |{capture}| {{\n{indent}{variable} = {capture};\n{body}}}\n"
    )))
}

/// `break;` / `continue;`, preceded by this node's injection text and the surrounding loop's prefix.
fn controls_flow_statements(node: &Node, pass: &mut Pass<'_>) -> EmitResult<Emission> {
    let keyword = match option(node, "FLOW")? {
        "BREAK" => "break;\n",
        "CONTINUE" => "continue;\n",
        _ => return Err(EmitError::unhandled_option(node, "FLOW")),
    };
    let mut code = pass.statement_prefix(&node.id);
    code.push_str(&pass.statement_suffix(&node.id));
    if let Some(loop_id) = pass.surrounding_loop() {
        code.push_str(&pass.statement_prefix(loop_id));
    }
    code.push_str(keyword);
    Ok(Emission::statement(code))
}

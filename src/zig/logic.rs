//! Conditionals and boolean expressions.
//!
//! ## Notes
//! - `controls_if` places its own injection text: the prefix once before the chain, the suffix at the top
//!   of every branch. A configured suffix forces an `else` branch so it runs on every path.
//! - Zig has no chained comparisons, so comparison operands are parenthesized at their own level.

use weft_core::lang::precedence::Rank;
use weft_graph::Node;

use super::option;
use crate::backend::text::prefix_lines;
use crate::backend::{EmitError, EmitResult, Emission, EmitterTable, Pass};

pub(crate) fn register(table: &mut EmitterTable) {
    table.register_self_injecting("controls_if", controls_if);
    table.alias("controls_ifelse", "controls_if");
    table.register("logic_compare", logic_compare);
    table.register("logic_operation", logic_operation);
    table.register("logic_negate", logic_negate);
    table.register("logic_boolean", logic_boolean);
    table.register("logic_null", logic_null);
    table.register("logic_ternary", logic_ternary);
}

/// `if (c) { … } else if (d) { … } else { … }`. An empty condition is `false`.
fn controls_if(node: &Node, pass: &mut Pass<'_>) -> EmitResult<Emission> {
    let suffix = pass.statement_suffix(&node.id);
    let branch_suffix = prefix_lines(&suffix, pass.indent());
    let has_else =
        node.mutation.has_else || node.kind == "controls_ifelse" || node.statement("ELSE").is_some();

    let mut code = pass.statement_prefix(&node.id);
    for n in 0..=node.mutation.else_if {
        let condition = pass.value_or(node, &format!("IF{n}"), Rank::None, "false")?;
        let branch = pass.statements(node, &format!("DO{n}"))?;
        if n > 0 {
            code.push_str(" else ");
        }
        code.push_str(&format!("if ({condition}) {{\n{branch_suffix}{branch}}}"));
    }
    if has_else || !suffix.is_empty() {
        let branch = pass.statements(node, "ELSE")?;
        code.push_str(&format!(" else {{\n{branch_suffix}{branch}}}"));
    }
    code.push('\n');
    Ok(Emission::statement(code))
}

/// `a == b` and friends. Empty operands are `0`.
fn logic_compare(node: &Node, pass: &mut Pass<'_>) -> EmitResult<Emission> {
    let (operator, rank) = match option(node, "OP")? {
        "EQ" => ("==", Rank::Equality),
        "NEQ" => ("!=", Rank::Equality),
        "LT" => ("<", Rank::Relational),
        "LTE" => ("<=", Rank::Relational),
        "GT" => (">", Rank::Relational),
        "GTE" => (">=", Rank::Relational),
        _ => return Err(EmitError::unhandled_option(node, "OP")),
    };
    // All six operators share one non-associative level in Zig, so any comparison operand is wrapped.
    let a = pass.value_or(node, "A", Rank::Relational, "0")?;
    let b = pass.value_or(node, "B", Rank::Relational, "0")?;
    Ok(Emission::value(format!("{a} {operator} {b}"), rank))
}

/// `a and b` / `a or b`.
///
/// With one operand missing it is replaced by the operator's identity (`true` for `and`, `false` for
/// `or`); with both missing the result is `false`.
fn logic_operation(node: &Node, pass: &mut Pass<'_>) -> EmitResult<Emission> {
    let (operator, rank, identity) = match option(node, "OP")? {
        "AND" => ("and", Rank::LogicalAnd, "true"),
        "OR" => ("or", Rank::LogicalOr, "false"),
        _ => return Err(EmitError::unhandled_option(node, "OP")),
    };
    let a = pass.value(node, "A", rank)?;
    let b = pass.value(node, "B", rank)?;
    let (a, b) = match (a, b) {
        (None, None) => ("false".to_string(), "false".to_string()),
        (a, b) => (
            a.unwrap_or_else(|| identity.to_string()),
            b.unwrap_or_else(|| identity.to_string()),
        ),
    };
    Ok(Emission::value(format!("{a} {operator} {b}"), rank))
}

/// `!x`. An empty operand is `true`.
fn logic_negate(node: &Node, pass: &mut Pass<'_>) -> EmitResult<Emission> {
    let operand = pass.value_or(node, "BOOL", Rank::UnaryPrefix, "true")?;
    Ok(Emission::value(format!("!{operand}"), Rank::UnaryPrefix))
}

fn logic_boolean(node: &Node, _pass: &mut Pass<'_>) -> EmitResult<Emission> {
    let code = match node.field_bool("BOOL") {
        Some(true) => "true",
        Some(false) => "false",
        None => return Err(EmitError::unhandled_option(node, "BOOL")),
    };
    Ok(Emission::value(code, Rank::Atomic))
}

fn logic_null(_node: &Node, _pass: &mut Pass<'_>) -> EmitResult<Emission> {
    Ok(Emission::value("null", Rank::Atomic))
}

/// `if (c) a else b` in expression position. Defaults: `false`, `null`, `null`.
fn logic_ternary(node: &Node, pass: &mut Pass<'_>) -> EmitResult<Emission> {
    let condition = pass.value_or(node, "IF", Rank::None, "false")?;
    let then = pass.value_or(node, "THEN", Rank::Conditional, "null")?;
    let otherwise = pass.value_or(node, "ELSE", Rank::Conditional, "null")?;
    Ok(Emission::value(
        format!("if ({condition}) {then} else {otherwise}"),
        Rank::Conditional,
    ))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::backend::{Generator, GeneratorConfig};
    use weft_graph::Mutation;

    fn var(name: &str) -> Node {
        Node::new("variables_get").with_field("VAR", name)
    }

    fn set(name: &str, value: f64) -> Node {
        Node::new("variables_set")
            .with_field("VAR", name)
            .with_input("VALUE", Node::new("math_number").with_field("NUM", value))
    }

    fn compare(op: &str, a: Node, b: Node) -> Node {
        Node::new("logic_compare")
            .with_field("OP", op)
            .with_input("A", a)
            .with_input("B", b)
    }

    fn render(node: &Node) -> String {
        let generator = Generator::zig();
        let mut pass = generator.pass();
        pass.render_value(Some(node), Rank::None, "").unwrap()
    }

    fn render_statements(generator: &Generator, node: &Node) -> String {
        let mut pass = generator.pass();
        pass.render_sequence(Some(node)).unwrap()
    }

    // ========================================
    // Expressions
    // ========================================

    #[test]
    fn test_compare_defaults_and_operators() {
        assert_eq!(render(&Node::new("logic_compare").with_field("OP", "GTE")), "0 >= 0");
        assert_eq!(render(&compare("NEQ", var("a"), var("b"))), "a != b");
    }

    #[test]
    fn test_nested_comparison_is_parenthesized() {
        let inner = compare("LT", var("a"), var("b"));
        let outer = compare("EQ", inner, Node::new("logic_boolean").with_field("BOOL", "TRUE"));
        assert_eq!(render(&outer), "(a < b) == true");
    }

    #[test]
    fn test_comparisons_never_chain() {
        let equal = compare("EQ", var("a"), var("b"));
        assert_eq!(render(&compare("LT", equal, var("x"))), "(a == b) < x");
        let unequal = compare("NEQ", var("a"), var("b"));
        assert_eq!(render(&compare("EQ", var("p"), unequal)), "p == (a != b)");
        let positive = Node::new("math_number_property")
            .with_field("PROPERTY", "POSITIVE")
            .with_input("NUMBER_TO_CHECK", var("n"));
        assert_eq!(render(&compare("NEQ", positive, var("q"))), "(n > 0) != q");
        let sum = Node::new("math_arithmetic")
            .with_field("OP", "ADD")
            .with_input("A", var("a"))
            .with_input("B", var("b"));
        assert_eq!(render(&compare("GTE", sum, var("x"))), "a + b >= x");
    }

    #[test]
    fn test_unknown_operator_is_a_fault() {
        let generator = Generator::zig();
        let mut pass = generator.pass();
        let node = Node::new("logic_compare").with_id("c").with_field("OP", "LIKE");
        let err = pass.render_value(Some(&node), Rank::None, "").unwrap_err();
        assert!(matches!(err, EmitError::UnhandledOption { ref value, .. } if value == "LIKE"));
    }

    #[test]
    fn test_operation_identity_defaults() {
        let and = Node::new("logic_operation").with_field("OP", "AND").with_input("A", var("p"));
        assert_eq!(render(&and), "p and true");
        let or = Node::new("logic_operation").with_field("OP", "OR").with_input("B", var("q"));
        assert_eq!(render(&or), "false or q");
        assert_eq!(render(&Node::new("logic_operation").with_field("OP", "AND")), "false and false");
    }

    #[test]
    fn test_same_connective_chains_without_parens() {
        let inner = Node::new("logic_operation")
            .with_field("OP", "OR")
            .with_input("A", var("a"))
            .with_input("B", var("b"));
        let outer = Node::new("logic_operation")
            .with_field("OP", "OR")
            .with_input("A", inner.clone())
            .with_input("B", var("d"));
        assert_eq!(render(&outer), "a or b or d");

        let mixed = Node::new("logic_operation")
            .with_field("OP", "AND")
            .with_input("A", inner)
            .with_input("B", var("d"));
        assert_eq!(render(&mixed), "(a or b) and d");
    }

    #[test]
    fn test_negate_and_ternary() {
        assert_eq!(render(&Node::new("logic_negate")), "!true");
        let negated_compare = Node::new("logic_negate").with_input("BOOL", compare("EQ", var("a"), var("b")));
        assert_eq!(render(&negated_compare), "!(a == b)");
        let ternary = Node::new("logic_ternary")
            .with_input("IF", var("d"))
            .with_input("THEN", var("a"));
        assert_eq!(render(&ternary), "if (d) a else null");
        assert_eq!(render(&Node::new("logic_null")), "null");
    }

    // ========================================
    // Conditionals
    // ========================================

    #[test]
    fn test_if_elseif_else_chain() {
        let node = Node::new("controls_if")
            .with_mutation(Mutation {
                else_if: 1,
                has_else: true,
                ..Mutation::default()
            })
            .with_input("IF0", var("a"))
            .with_statement("DO0", set("x", 1.0))
            .with_input("IF1", var("b"))
            .with_statement("DO1", set("x", 2.0))
            .with_statement("ELSE", set("x", 3.0));
        assert_eq!(
            render_statements(&Generator::zig(), &node),
            "if (a) {\n    x = 1;\n} else if (b) {\n    x = 2;\n} else {\n    x = 3;\n}\n"
        );
    }

    #[test]
    fn test_ifelse_kind_always_has_else() {
        let node = Node::new("controls_ifelse").with_statement("DO0", set("x", 1.0));
        assert_eq!(
            render_statements(&Generator::zig(), &node),
            "if (false) {\n    x = 1;\n} else {\n}\n"
        );
    }

    #[test]
    fn test_suffix_runs_on_every_branch() {
        let generator = Generator::zig_with_config(
            GeneratorConfig::new()
                .with_statement_prefix("pre(%1);\n")
                .with_statement_suffix("post(%1);\n"),
        );
        let node = Node::new("controls_if").with_id("i").with_input("IF0", var("a"));
        assert_eq!(
            render_statements(&generator, &node),
            "pre(\"i\");\nif (a) {\n    post(\"i\");\n} else {\n    post(\"i\");\n}\n"
        );
    }
}

//! Procedures.
//!
//! A definition is emitted as a file-scope `fn` and contributes nothing to `main`. Parameters and
//! results are numbers; every procedure can fail, so calls are `try`.

use weft_core::lang::precedence::Rank;
use weft_graph::Node;

use super::option;
use crate::backend::text::prefix_lines;
use crate::backend::{EmitResult, Emission, EmitterTable, Pass};

pub(crate) fn register(table: &mut EmitterTable) {
    table.register_self_injecting("procedures_defreturn", procedures_def);
    table.alias("procedures_defnoreturn", "procedures_defreturn");
    table.register("procedures_callreturn", procedures_callreturn);
    table.register("procedures_callnoreturn", procedures_callnoreturn);
    table.register_self_injecting("procedures_ifreturn", procedures_ifreturn);
}

/// Define a procedure.
///
/// The body opens with the node's injection text and loop trap. When a returning procedure has both a
/// body and a result, the injection text is repeated before the `return` so it runs after the body.
fn procedures_def(node: &Node, pass: &mut Pass<'_>) -> EmitResult<Emission> {
    let name = pass.procedure_name(option(node, "NAME")?);
    let indent = pass.indent();

    let mut xfix = pass.statement_prefix(&node.id);
    xfix.push_str(&pass.statement_suffix(&node.id));
    let xfix = prefix_lines(&xfix, indent);
    let trap = prefix_lines(&pass.loop_trap(&node.id), indent);

    let branch = pass.statements(node, "STACK")?;
    let result = pass.value(node, "RETURN", Rank::None)?;
    let closing = match &result {
        Some(value) if !branch.is_empty() => format!("{xfix}{indent}return {value};\n"),
        Some(value) => format!("{indent}return {value};\n"),
        None => String::new(),
    };

    let params = node
        .mutation
        .params
        .iter()
        .map(|p| format!("{}: f32", pass.variable_name(p)))
        .collect::<Vec<_>>()
        .join(", ");
    let returns = if result.is_some() { "!f32" } else { "!void" };

    let mut code = pass.comments_for(node);
    code.push_str(&format!("fn {name}({params}) {returns} {{\n{xfix}{trap}{branch}{closing}}}"));
    tracing::debug!(procedure = %name, "defined procedure");
    pass.define_procedure(&name, code);
    Ok(Emission::Nothing)
}

fn arguments(node: &Node, pass: &mut Pass<'_>) -> EmitResult<String> {
    let mut args = Vec::with_capacity(node.mutation.params.len());
    for i in 0..node.mutation.params.len() {
        args.push(pass.value_or(node, &format!("ARG{i}"), Rank::None, "null")?);
    }
    Ok(args.join(", "))
}

/// `try name(args)`. Empty arguments are `null`.
fn procedures_callreturn(node: &Node, pass: &mut Pass<'_>) -> EmitResult<Emission> {
    let name = pass.procedure_name(option(node, "NAME")?);
    let args = arguments(node, pass)?;
    Ok(Emission::value(format!("try {name}({args})"), Rank::UnaryPrefix))
}

fn procedures_callnoreturn(node: &Node, pass: &mut Pass<'_>) -> EmitResult<Emission> {
    let name = pass.procedure_name(option(node, "NAME")?);
    let args = arguments(node, pass)?;
    Ok(Emission::statement(format!("try {name}({args});\n")))
}

/// `if (c) { return v; }` inside a procedure body. An empty condition is `false`.
///
/// The prefix runs before the test; the suffix runs only on the returning path.
fn procedures_ifreturn(node: &Node, pass: &mut Pass<'_>) -> EmitResult<Emission> {
    let condition = pass.value_or(node, "CONDITION", Rank::None, "false")?;
    let indent = pass.indent();
    let mut code = pass.statement_prefix(&node.id);
    code.push_str(&format!("if ({condition}) {{\n"));
    code.push_str(&prefix_lines(&pass.statement_suffix(&node.id), indent));
    if node.mutation.has_return || node.input("VALUE").is_some() {
        let value = pass.value_or(node, "VALUE", Rank::None, "null")?;
        code.push_str(&format!("{indent}return {value};\n"));
    } else {
        code.push_str(&format!("{indent}return;\n"));
    }
    code.push_str("}\n");
    Ok(Emission::statement(code))
}

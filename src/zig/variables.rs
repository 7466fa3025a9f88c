//! Variable access.
//!
//! The `_dynamic` kinds come from untyped workspaces and render exactly like their typed counterparts.

use weft_core::lang::precedence::Rank;
use weft_graph::Node;

use super::option;
use crate::backend::{EmitResult, Emission, EmitterTable, Pass};

pub(crate) fn register(table: &mut EmitterTable) {
    table.register("variables_get", variables_get);
    table.register("variables_set", variables_set);
    table.alias("variables_get_dynamic", "variables_get");
    table.alias("variables_set_dynamic", "variables_set");
}

/// The identifier of the variable named by the node's `VAR` field.
pub(crate) fn variable(node: &Node, pass: &mut Pass<'_>) -> EmitResult<String> {
    Ok(pass.variable_name(option(node, "VAR")?))
}

fn variables_get(node: &Node, pass: &mut Pass<'_>) -> EmitResult<Emission> {
    Ok(Emission::value(variable(node, pass)?, Rank::Atomic))
}

/// `name = value;`. An empty value is `0`.
fn variables_set(node: &Node, pass: &mut Pass<'_>) -> EmitResult<Emission> {
    let value = pass.value_or(node, "VALUE", Rank::Assignment, "0")?;
    let name = variable(node, pass)?;
    Ok(Emission::statement(format!("{name} = {value};\n")))
}

//! Numbers and arithmetic.
//!
//! Numbers are `f32` in the generated program. Builtins (`@sqrt`, `@mod`, `@min`, …) are calls and rank
//! as postfix expressions; `std.math` constants and functions need the `std` import.
//!
//! ## Notes
//! - Infinity and NaN literals become `std.math.inf(f32)` / `std.math.nan(f32)`.
//! - Trigonometry blocks work in degrees; the conversion is emitted around the builtin.
//! - List aggregates go through helpers that take the list's `.items` slice.

use weft_core::lang::precedence::Rank;
use weft_graph::Node;

use super::lists::items_or_empty;
use super::{format_number, option, require_allocator, require_std, variables};
use crate::backend::{EmitError, EmitResult, Emission, EmitterTable, Pass};

pub(crate) fn register(table: &mut EmitterTable) {
    table.register("math_number", math_number);
    table.register("math_arithmetic", math_arithmetic);
    table.register("math_single", math_single);
    table.alias("math_round", "math_single");
    table.alias("math_trig", "math_single");
    table.register("math_constant", math_constant);
    table.register("math_number_property", math_number_property);
    table.register("math_change", math_change);
    table.register("math_on_list", math_on_list);
    table.register("math_modulo", math_modulo);
    table.register("math_constrain", math_constrain);
    table.register("math_random_int", math_random_int);
    table.register("math_random_float", math_random_float);
    table.register("math_atan2", math_atan2);
}

/// A numeric literal. A missing `NUM` field is `0`.
fn math_number(node: &Node, pass: &mut Pass<'_>) -> EmitResult<Emission> {
    let value = node.field_number("NUM").unwrap_or(0.0);
    if value.is_nan() {
        require_std(pass);
        return Ok(Emission::value("std.math.nan(f32)", Rank::UnaryPostfix));
    }
    if value.is_infinite() {
        require_std(pass);
        return Ok(if value > 0.0 {
            Emission::value("std.math.inf(f32)", Rank::UnaryPostfix)
        } else {
            Emission::value("-std.math.inf(f32)", Rank::UnaryPrefix)
        });
    }
    let rank = if value < 0.0 { Rank::UnaryPrefix } else { Rank::Atomic };
    Ok(Emission::value(format_number(value), rank))
}

/// Binary arithmetic. Empty operands are `0`.
fn math_arithmetic(node: &Node, pass: &mut Pass<'_>) -> EmitResult<Emission> {
    let (operator, rank) = match option(node, "OP")? {
        "ADD" => ("+", Rank::Additive),
        "MINUS" => ("-", Rank::Additive),
        "MULTIPLY" => ("*", Rank::Multiplicative),
        "DIVIDE" => ("/", Rank::Multiplicative),
        "POWER" => {
            require_std(pass);
            let base = pass.value_or(node, "A", Rank::None, "0")?;
            let exponent = pass.value_or(node, "B", Rank::None, "0")?;
            return Ok(Emission::value(
                format!("std.math.pow(f32, {base}, {exponent})"),
                Rank::UnaryPostfix,
            ));
        }
        _ => return Err(EmitError::unhandled_option(node, "OP")),
    };
    let a = pass.value_or(node, "A", rank, "0")?;
    let b = pass.value_or(node, "B", rank, "0")?;
    Ok(Emission::value(format!("{a} {operator} {b}"), rank))
}

/// Single-operand functions, rounding and trigonometry (in degrees). An empty operand is `0`.
fn math_single(node: &Node, pass: &mut Pass<'_>) -> EmitResult<Emission> {
    let operator = option(node, "OP")?;
    if operator == "NEG" {
        let operand = pass.value_or(node, "NUM", Rank::UnaryPrefix, "0")?;
        // `--x` would read as two operators.
        let operand = if operand.starts_with('-') { format!(" {operand}") } else { operand };
        return Ok(Emission::value(format!("-{operand}"), Rank::UnaryPrefix));
    }

    let builtin = match operator {
        "ABS" => Some("@abs"),
        "ROOT" => Some("@sqrt"),
        "LN" => Some("@log"),
        "LOG10" => Some("@log10"),
        "EXP" => Some("@exp"),
        "ROUND" => Some("@round"),
        "ROUNDUP" => Some("@ceil"),
        "ROUNDDOWN" => Some("@floor"),
        _ => None,
    };
    if let Some(builtin) = builtin {
        let operand = pass.value_or(node, "NUM", Rank::None, "0")?;
        return Ok(Emission::value(format!("{builtin}({operand})"), Rank::UnaryPostfix));
    }

    require_std(pass);
    match operator {
        "POW10" => {
            let operand = pass.value_or(node, "NUM", Rank::None, "0")?;
            Ok(Emission::value(format!("std.math.pow(f32, 10, {operand})"), Rank::UnaryPostfix))
        }
        "SIN" | "COS" | "TAN" => {
            let operand = pass.value_or(node, "NUM", Rank::Multiplicative, "0")?;
            let builtin = operator.to_ascii_lowercase();
            Ok(Emission::value(
                format!("@{builtin}({operand} / 180 * std.math.pi)"),
                Rank::UnaryPostfix,
            ))
        }
        "ASIN" | "ACOS" | "ATAN" => {
            let operand = pass.value_or(node, "NUM", Rank::None, "0")?;
            let function = operator.to_ascii_lowercase();
            Ok(Emission::value(
                format!("std.math.{function}({operand}) / std.math.pi * 180"),
                Rank::Multiplicative,
            ))
        }
        _ => Err(EmitError::unhandled_option(node, "OP")),
    }
}

fn math_constant(node: &Node, pass: &mut Pass<'_>) -> EmitResult<Emission> {
    let code = match option(node, "CONSTANT")? {
        "PI" => "std.math.pi",
        "E" => "std.math.e",
        "GOLDEN_RATIO" => "std.math.phi",
        "SQRT2" => "std.math.sqrt2",
        "SQRT1_2" => "std.math.sqrt1_2",
        "INFINITY" => "std.math.inf(f32)",
        _ => return Err(EmitError::unhandled_option(node, "CONSTANT")),
    };
    require_std(pass);
    Ok(Emission::value(code, Rank::UnaryPostfix))
}

const IS_PRIME: &str = r#"
fn {{HELPER}}(n: f32) bool {
  if (n == 2 or n == 3) {
    return true;
  }
  if (std.math.isNan(n) or n <= 1 or @mod(n, 1) != 0 or @mod(n, 2) == 0 or @mod(n, 3) == 0) {
    return false;
  }
  var x: f32 = 6;
  while (x <= @sqrt(n) + 1) : (x += 6) {
    if (@mod(n, x - 1) == 0 or @mod(n, x + 1) == 0) {
      return false;
    }
  }
  return true;
}
"#;

/// Even/odd/prime/whole/positive/negative/divisible-by tests. An empty number is `0`.
///
/// Divisibility by a literal `0` is `false` without evaluating anything.
fn math_number_property(node: &Node, pass: &mut Pass<'_>) -> EmitResult<Emission> {
    let property = option(node, "PROPERTY")?;
    let (code, rank) = match property {
        "EVEN" | "ODD" | "WHOLE" => {
            let number = pass.value_or(node, "NUMBER_TO_CHECK", Rank::None, "0")?;
            let test = match property {
                "EVEN" => "@mod({n}, 2) == 0",
                "ODD" => "@mod({n}, 2) == 1",
                _ => "@mod({n}, 1) == 0",
            };
            (test.replace("{n}", &number), Rank::Equality)
        }
        "POSITIVE" | "NEGATIVE" => {
            let number = pass.value_or(node, "NUMBER_TO_CHECK", Rank::Relational, "0")?;
            let operator = if property == "POSITIVE" { ">" } else { "<" };
            (format!("{number} {operator} 0"), Rank::Relational)
        }
        "DIVISIBLE_BY" => {
            let divisor = pass.value_or(node, "DIVISOR", Rank::None, "0")?;
            if divisor == "0" {
                return Ok(Emission::value("false", Rank::Atomic));
            }
            let number = pass.value_or(node, "NUMBER_TO_CHECK", Rank::None, "0")?;
            (format!("@mod({number}, {divisor}) == 0"), Rank::Equality)
        }
        "PRIME" => {
            require_std(pass);
            let helper = pass.provide_helper("math_isPrime", IS_PRIME);
            let number = pass.value_or(node, "NUMBER_TO_CHECK", Rank::None, "0")?;
            (format!("{helper}({number})"), Rank::UnaryPostfix)
        }
        _ => return Err(EmitError::unhandled_option(node, "PROPERTY")),
    };
    Ok(Emission::value(code, rank))
}

/// `x = x + delta;`. An empty delta is `0`.
fn math_change(node: &Node, pass: &mut Pass<'_>) -> EmitResult<Emission> {
    let delta = pass.value_or(node, "DELTA", Rank::Additive, "0")?;
    let name = variables::variable(node, pass)?;
    Ok(Emission::statement(format!("{name} = {name} + {delta};\n")))
}

const SUM: &str = r#"
fn {{HELPER}}(values: []const f32) f32 {
  var total: f32 = 0;
  for (values) |v| {
    total += v;
  }
  return total;
}
"#;

const MIN: &str = r#"
fn {{HELPER}}(values: []const f32) f32 {
  if (values.len == 0) {
    return 0;
  }
  return std.mem.min(f32, values);
}
"#;

const MAX: &str = r#"
fn {{HELPER}}(values: []const f32) f32 {
  if (values.len == 0) {
    return 0;
  }
  return std.mem.max(f32, values);
}
"#;

const MEAN: &str = r#"
fn {{HELPER}}(values: []const f32) f32 {
  if (values.len == 0) {
    return 0;
  }
  var total: f32 = 0;
  for (values) |v| {
    total += v;
  }
  return total / @as(f32, @floatFromInt(values.len));
}
"#;

const MEDIAN: &str = r#"
fn {{HELPER}}(values: []const f32) !f32 {
  if (values.len == 0) {
    return 0;
  }
  const sorted = try allocator.dupe(f32, values);
  defer allocator.free(sorted);
  std.mem.sort(f32, sorted, {}, std.sort.asc(f32));
  const mid = sorted.len / 2;
  if (sorted.len % 2 == 0) {
    return (sorted[mid - 1] + sorted[mid]) / 2;
  }
  return sorted[mid];
}
"#;

const MODES: &str = r#"
fn {{HELPER}}(values: []const f32) !std.ArrayList(f32) {
  var modes = std.ArrayList(f32).init(allocator);
  var best: usize = 0;
  for (values) |candidate| {
    var count: usize = 0;
    for (values) |v| {
      if (v == candidate) {
        count += 1;
      }
    }
    if (count > best) {
      best = count;
      modes.clearRetainingCapacity();
    }
    if (count == best and std.mem.indexOfScalar(f32, modes.items, candidate) == null) {
      try modes.append(candidate);
    }
  }
  return modes;
}
"#;

const STANDARD_DEVIATION: &str = r#"
fn {{HELPER}}(values: []const f32) f32 {
  if (values.len == 0) {
    return 0;
  }
  const n: f32 = @floatFromInt(values.len);
  var mean: f32 = 0;
  for (values) |v| {
    mean += v;
  }
  mean /= n;
  var variance: f32 = 0;
  for (values) |v| {
    variance += (v - mean) * (v - mean);
  }
  return @sqrt(variance / n);
}
"#;

const RANDOM_ITEM: &str = r#"
fn {{HELPER}}(values: []const f32) f32 {
  return values[std.crypto.random.uintLessThan(usize, values.len)];
}
"#;

/// Aggregate a list. An empty list slot is an empty slice.
fn math_on_list(node: &Node, pass: &mut Pass<'_>) -> EmitResult<Emission> {
    let (key, template, fallible) = match option(node, "OP")? {
        "SUM" => ("math_sum", SUM, false),
        "MIN" => ("math_min", MIN, false),
        "MAX" => ("math_max", MAX, false),
        "AVERAGE" => ("math_mean", MEAN, false),
        "MEDIAN" => ("math_median", MEDIAN, true),
        "MODE" => ("math_modes", MODES, true),
        "STD_DEV" => ("math_standard_deviation", STANDARD_DEVIATION, false),
        "RANDOM" => ("math_random_item", RANDOM_ITEM, false),
        _ => return Err(EmitError::unhandled_option(node, "OP")),
    };
    if fallible {
        require_allocator(pass);
    } else {
        require_std(pass);
    }
    let helper = pass.provide_helper(key, template);
    let items = items_or_empty(node, "LIST", pass)?;
    Ok(if fallible {
        Emission::value(format!("try {helper}({items})"), Rank::UnaryPrefix)
    } else {
        Emission::value(format!("{helper}({items})"), Rank::UnaryPostfix)
    })
}

/// `@mod(a, b)`. Empty operands are `0`.
fn math_modulo(node: &Node, pass: &mut Pass<'_>) -> EmitResult<Emission> {
    let dividend = pass.value_or(node, "DIVIDEND", Rank::None, "0")?;
    let divisor = pass.value_or(node, "DIVISOR", Rank::None, "0")?;
    Ok(Emission::value(format!("@mod({dividend}, {divisor})"), Rank::UnaryPostfix))
}

/// Clamp a value. Defaults: value `0`, low `0`, high infinity.
fn math_constrain(node: &Node, pass: &mut Pass<'_>) -> EmitResult<Emission> {
    let value = pass.value_or(node, "VALUE", Rank::None, "0")?;
    let low = pass.value_or(node, "LOW", Rank::None, "0")?;
    let high = match pass.value(node, "HIGH", Rank::None)? {
        Some(high) => high,
        None => {
            require_std(pass);
            "std.math.inf(f32)".to_string()
        }
    };
    Ok(Emission::value(format!("@min(@max({value}, {low}), {high})"), Rank::UnaryPostfix))
}

const RANDOM_INT: &str = r#"
fn {{HELPER}}(a: f32, b: f32) f32 {
  const low: i32 = @intFromFloat(@min(a, b));
  const high: i32 = @intFromFloat(@max(a, b));
  return @floatFromInt(std.crypto.random.intRangeAtMost(i32, low, high));
}
"#;

/// A random integer between two bounds, inclusive. Empty bounds are `0`.
fn math_random_int(node: &Node, pass: &mut Pass<'_>) -> EmitResult<Emission> {
    require_std(pass);
    let helper = pass.provide_helper("math_random_int", RANDOM_INT);
    let from = pass.value_or(node, "FROM", Rank::None, "0")?;
    let to = pass.value_or(node, "TO", Rank::None, "0")?;
    Ok(Emission::value(format!("{helper}({from}, {to})"), Rank::UnaryPostfix))
}

fn math_random_float(_node: &Node, pass: &mut Pass<'_>) -> EmitResult<Emission> {
    require_std(pass);
    Ok(Emission::value("std.crypto.random.float(f32)", Rank::UnaryPostfix))
}

/// The angle of the point `(X, Y)` in degrees. Empty coordinates are `0`.
fn math_atan2(node: &Node, pass: &mut Pass<'_>) -> EmitResult<Emission> {
    require_std(pass);
    let x = pass.value_or(node, "X", Rank::None, "0")?;
    let y = pass.value_or(node, "Y", Rank::None, "0")?;
    Ok(Emission::value(
        format!("std.math.atan2({y}, {x}) / std.math.pi * 180"),
        Rank::Multiplicative,
    ))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::backend::{DefinitionKey, Generator};
    use weft_graph::Workspace;

    fn number(n: f64) -> Node {
        Node::new("math_number").with_field("NUM", n)
    }

    fn var(name: &str) -> Node {
        Node::new("variables_get").with_field("VAR", name)
    }

    fn arithmetic(op: &str, a: Node, b: Node) -> Node {
        Node::new("math_arithmetic")
            .with_field("OP", op)
            .with_input("A", a)
            .with_input("B", b)
    }

    fn render(node: &Node) -> String {
        let generator = Generator::zig();
        let mut pass = generator.pass();
        pass.render_value(Some(node), Rank::None, "").unwrap()
    }

    // ========================================
    // Literals
    // ========================================

    #[test]
    fn test_number_normalization() {
        assert_eq!(render(&number(42.0)), "42");
        assert_eq!(render(&number(0.25)), "0.25");
        assert_eq!(render(&number(f64::INFINITY)), "std.math.inf(f32)");
        assert_eq!(render(&number(f64::NEG_INFINITY)), "-std.math.inf(f32)");
        assert_eq!(render(&number(f64::NAN)), "std.math.nan(f32)");
        assert_eq!(render(&Node::new("math_number").with_field("NUM", "Infinity")), "std.math.inf(f32)");
    }

    #[test]
    fn test_infinity_requires_std() {
        let ws = Workspace::new().with_root(number(f64::INFINITY));
        let code = Generator::zig().generate(&ws).unwrap();
        assert!(code.starts_with("const std = @import(\"std\");\n"));
    }

    // ========================================
    // Precedence
    // ========================================

    #[test]
    fn test_weaker_child_is_wrapped() {
        let sum = arithmetic("ADD", var("a"), var("b"));
        assert_eq!(render(&arithmetic("MULTIPLY", sum, var("d"))), "(a + b) * d");
    }

    #[test]
    fn test_stronger_child_is_not_wrapped() {
        let product = arithmetic("MULTIPLY", var("a"), var("b"));
        assert_eq!(render(&arithmetic("ADD", product, var("d"))), "a * b + d");
    }

    #[test]
    fn test_right_operand_at_same_level_is_wrapped() {
        let difference = arithmetic("MINUS", var("b"), var("d"));
        assert_eq!(render(&arithmetic("MINUS", var("a"), difference)), "a - (b - d)");
    }

    #[test]
    fn test_negative_literal_operand() {
        assert_eq!(render(&arithmetic("MULTIPLY", number(-2.0), var("x"))), "-2 * x");
        let negate = Node::new("math_single").with_field("OP", "NEG").with_input("NUM", number(-2.0));
        assert_eq!(render(&negate), "-(-2)");
    }

    #[test]
    fn test_power_uses_std() {
        let power = arithmetic("POWER", arithmetic("ADD", var("a"), number(1.0)), number(2.0));
        assert_eq!(render(&power), "std.math.pow(f32, a + 1, 2)");
    }

    // ========================================
    // Functions
    // ========================================

    #[test]
    fn test_single_and_trig() {
        let root = Node::new("math_single").with_field("OP", "ROOT").with_input("NUM", var("x"));
        assert_eq!(render(&root), "@sqrt(x)");
        let round = Node::new("math_round").with_field("OP", "ROUNDUP").with_input("NUM", var("x"));
        assert_eq!(render(&round), "@ceil(x)");
        let sin = Node::new("math_trig")
            .with_field("OP", "SIN")
            .with_input("NUM", arithmetic("ADD", var("a"), var("b")));
        assert_eq!(render(&sin), "@sin((a + b) / 180 * std.math.pi)");
        let atan = Node::new("math_trig").with_field("OP", "ATAN").with_input("NUM", var("x"));
        assert_eq!(render(&atan), "std.math.atan(x) / std.math.pi * 180");
    }

    #[test]
    fn test_divisible_by_zero_literal_is_false() {
        let node = Node::new("math_number_property")
            .with_field("PROPERTY", "DIVISIBLE_BY")
            .with_input("NUMBER_TO_CHECK", var("x"))
            .with_input("DIVISOR", number(0.0));
        assert_eq!(render(&node), "false");
    }

    #[test]
    fn test_number_properties() {
        let even = Node::new("math_number_property")
            .with_field("PROPERTY", "EVEN")
            .with_input("NUMBER_TO_CHECK", var("x"));
        assert_eq!(render(&even), "@mod(x, 2) == 0");
        let negative = Node::new("math_number_property")
            .with_field("PROPERTY", "NEGATIVE")
            .with_input("NUMBER_TO_CHECK", arithmetic("MINUS", var("a"), var("b")));
        assert_eq!(render(&negative), "a - b < 0");
    }

    #[test]
    fn test_prime_helper_is_emitted_once() {
        let generator = Generator::zig();
        let mut pass = generator.pass();
        let prime = |n: &str| {
            Node::new("math_number_property")
                .with_field("PROPERTY", "PRIME")
                .with_input("NUMBER_TO_CHECK", var(n))
        };
        let a = pass.render_value(Some(&prime("a")), Rank::None, "").unwrap();
        let b = pass.render_value(Some(&prime("b")), Rank::None, "").unwrap();
        assert_eq!(a, "math_isPrime(a)");
        assert_eq!(b, "math_isPrime(b)");
        let helpers = pass
            .definitions()
            .iter()
            .filter(|(key, _)| matches!(key, DefinitionKey::Helper(_)))
            .count();
        assert_eq!(helpers, 1);
    }

    #[test]
    fn test_change_adds_delta() {
        let generator = Generator::zig();
        let mut pass = generator.pass();
        let node = Node::new("math_change").with_field("VAR", "n").with_input("DELTA", number(2.0));
        assert_eq!(pass.render_sequence(Some(&node)).unwrap(), "n = n + 2;\n");
    }

    #[test]
    fn test_on_list_median_is_fallible() {
        let node = Node::new("math_on_list").with_field("OP", "MEDIAN").with_input("LIST", var("xs"));
        assert_eq!(render(&node), "try math_median(xs.items)");
        let sum = Node::new("math_on_list").with_field("OP", "SUM");
        assert_eq!(render(&sum), "math_sum(&[_]f32{})");
    }

    #[test]
    fn test_constrain_defaults_high_to_infinity() {
        let node = Node::new("math_constrain").with_input("VALUE", var("v"));
        assert_eq!(render(&node), "@min(@max(v, 0), std.math.inf(f32))");
    }

    #[test]
    fn test_atan2_is_multiplicative() {
        let node = Node::new("math_atan2").with_input("X", var("x")).with_input("Y", var("y"));
        assert_eq!(render(&node), "std.math.atan2(y, x) / std.math.pi * 180");
    }
}

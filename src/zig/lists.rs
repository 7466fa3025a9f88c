//! Lists.
//!
//! Lists are `std.ArrayList(f32)` values. Reads go through `.items`; mutation uses the `ArrayList`
//! methods (`append`, `insert`, `orderedRemove`, `pop`). Helpers take the `.items` slice and return a
//! fresh list when they build one.
//!
//! ## Notes
//! - A list expression that would be evaluated twice (counting from the end, removing a random item) is
//!   cached in a `const` first, unless it is a plain identifier.
//! - `lists_sort` realizes one helper per direction, so ascending and descending sorts in the same
//!   program get distinct helpers.

use weft_core::lang::precedence::Rank;
use weft_core::strings::is_word;
use weft_graph::Node;

use super::{item_slots, option, option_or, require_allocator, require_std};
use crate::backend::{CachedValue, EmitError, EmitResult, Emission, EmitterTable, Pass};

pub(crate) fn register(table: &mut EmitterTable) {
    table.register("lists_create_empty", lists_create_empty);
    table.register("lists_create_with", lists_create_with);
    table.register("lists_repeat", lists_repeat);
    table.register("lists_length", lists_length);
    table.register("lists_isEmpty", lists_is_empty);
    table.register("lists_indexOf", lists_index_of);
    table.register("lists_getIndex", lists_get_index);
    table.register("lists_setIndex", lists_set_index);
    table.register("lists_getSublist", lists_get_sublist);
    table.register("lists_sort", lists_sort);
    table.register("lists_split", lists_split);
    table.register("lists_reverse", lists_reverse);
}

const EMPTY_LIST: &str = "std.ArrayList(f32).init(allocator)";

/// The list in `slot`, rendered for a postfix position. An empty slot is a new empty list.
fn list_or_empty(node: &Node, slot: &str, pass: &mut Pass<'_>) -> EmitResult<String> {
    match pass.value(node, slot, Rank::UnaryPostfix)? {
        Some(list) => Ok(list),
        None => {
            require_allocator(pass);
            Ok(EMPTY_LIST.to_string())
        }
    }
}

/// The item slice of the list in `slot`. An empty slot is an empty slice.
pub(crate) fn items_or_empty(node: &Node, slot: &str, pass: &mut Pass<'_>) -> EmitResult<String> {
    Ok(match pass.value(node, slot, Rank::UnaryPostfix)? {
        Some(list) => format!("{list}.items"),
        None => "&[_]f32{}".to_string(),
    })
}

fn lists_create_empty(_node: &Node, pass: &mut Pass<'_>) -> EmitResult<Emission> {
    require_allocator(pass);
    Ok(Emission::value(EMPTY_LIST, Rank::UnaryPostfix))
}

const CREATE_WITH: &str = r#"
fn {{HELPER}}(values: []const f32) !std.ArrayList(f32) {
  var list = std.ArrayList(f32).init(allocator);
  try list.appendSlice(values);
  return list;
}
"#;

/// A new list owning a copy of `values`.
fn copy_into_list(pass: &mut Pass<'_>, values: &str) -> String {
    require_allocator(pass);
    let helper = pass.provide_helper("lists_create_with", CREATE_WITH);
    format!("try {helper}({values})")
}

/// A list of the `ADD*` items. Empty items are `0`.
fn lists_create_with(node: &Node, pass: &mut Pass<'_>) -> EmitResult<Emission> {
    let mut elements = Vec::with_capacity(node.mutation.items);
    for slot in item_slots(node) {
        elements.push(pass.value_or(node, &slot, Rank::None, "0")?);
    }
    let values = if elements.is_empty() {
        "&[_]f32{}".to_string()
    } else {
        format!("&[_]f32{{ {} }}", elements.join(", "))
    };
    Ok(Emission::value(copy_into_list(pass, &values), Rank::UnaryPrefix))
}

const REPEAT: &str = r#"
fn {{HELPER}}(value: f32, n: f32) !std.ArrayList(f32) {
  var list = std.ArrayList(f32).init(allocator);
  try list.appendNTimes(value, @intFromFloat(n));
  return list;
}
"#;

/// `ITEM` repeated `NUM` times. Defaults: `0`, `0`.
fn lists_repeat(node: &Node, pass: &mut Pass<'_>) -> EmitResult<Emission> {
    let item = pass.value_or(node, "ITEM", Rank::None, "0")?;
    let times = pass.value_or(node, "NUM", Rank::None, "0")?;
    require_allocator(pass);
    let helper = pass.provide_helper("lists_repeat", REPEAT);
    Ok(Emission::value(format!("try {helper}({item}, {times})"), Rank::UnaryPrefix))
}

fn lists_length(node: &Node, pass: &mut Pass<'_>) -> EmitResult<Emission> {
    let list = list_or_empty(node, "VALUE", pass)?;
    Ok(Emission::value(format!("{list}.items.len"), Rank::UnaryPostfix))
}

fn lists_is_empty(node: &Node, pass: &mut Pass<'_>) -> EmitResult<Emission> {
    let list = list_or_empty(node, "VALUE", pass)?;
    Ok(Emission::value(format!("{list}.items.len == 0"), Rank::Equality))
}

const INDEX_OF: &str = r#"
fn {{HELPER}}(values: []const f32, item: f32) f32 {
  const found = std.mem.indexOfScalar(f32, values, item) orelse return -1;
  return @floatFromInt(found);
}
"#;

const LAST_INDEX_OF: &str = r#"
fn {{HELPER}}(values: []const f32, item: f32) f32 {
  const found = std.mem.lastIndexOfScalar(f32, values, item) orelse return -1;
  return @floatFromInt(found);
}
"#;

/// Position of `FIND` in the list, counted the configured way. An empty item is `0`.
fn lists_index_of(node: &Node, pass: &mut Pass<'_>) -> EmitResult<Emission> {
    let (key, template) = match option(node, "END")? {
        "FIRST" => ("lists_indexOf", INDEX_OF),
        "LAST" => ("lists_lastIndexOf", LAST_INDEX_OF),
        _ => return Err(EmitError::unhandled_option(node, "END")),
    };
    let item = pass.value_or(node, "FIND", Rank::None, "0")?;
    let items = items_or_empty(node, "VALUE", pass)?;
    require_std(pass);
    let helper = pass.provide_helper(key, template);
    let code = format!("{helper}({items}, {item})");
    if pass.config().one_based_indexing {
        Ok(Emission::value(format!("{code} + 1"), Rank::Additive))
    } else {
        Ok(Emission::value(code, Rank::UnaryPostfix))
    }
}

const GET_FROM_END: &str = r#"
fn {{HELPER}}(values: []const f32, x: usize) f32 {
  return values[values.len - x];
}
"#;

const REMOVE_FROM_END: &str = r#"
fn {{HELPER}}(list: *std.ArrayList(f32), x: usize) f32 {
  return list.orderedRemove(list.items.len - x);
}
"#;

const GET_RANDOM_ITEM: &str = r#"
fn {{HELPER}}(values: []const f32) f32 {
  return values[std.crypto.random.uintLessThan(usize, values.len)];
}
"#;

const REMOVE_RANDOM_ITEM: &str = r#"
fn {{HELPER}}(list: *std.ArrayList(f32)) f32 {
  return list.orderedRemove(std.crypto.random.uintLessThan(usize, list.items.len));
}
"#;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Get,
    GetRemove,
    Remove,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Position {
    First,
    Last,
    FromStart,
    FromEnd,
    Random,
}

fn position(node: &Node, field: &str) -> EmitResult<Position> {
    match option_or(node, field, "FROM_START") {
        "FIRST" => Ok(Position::First),
        "LAST" => Ok(Position::Last),
        "FROM_START" => Ok(Position::FromStart),
        "FROM_END" => Ok(Position::FromEnd),
        "RANDOM" => Ok(Position::Random),
        _ => Err(EmitError::unhandled_option(node, field)),
    }
}

/// Statement binding a random index into `list` to a fresh temporary.
fn random_index(pass: &mut Pass<'_>, list: &str) -> (String, String) {
    require_std(pass);
    let index = pass.fresh_name("tmp_x");
    let setup = format!("const {index} = std.crypto.random.uintLessThan(usize, {list}.items.len);\n");
    (index, setup)
}

/// Read and/or remove one item. `GET`/`GET_REMOVE` are values; `REMOVE` is a statement.
///
/// Defaults: mode `GET`, position `FROM_START`, an empty list is a new empty list, an empty index is
/// the first position.
fn lists_get_index(node: &Node, pass: &mut Pass<'_>) -> EmitResult<Emission> {
    let mode = match option_or(node, "MODE", "GET") {
        "GET" => Mode::Get,
        "GET_REMOVE" => Mode::GetRemove,
        "REMOVE" => Mode::Remove,
        _ => return Err(EmitError::unhandled_option(node, "MODE")),
    };
    let position = position(node, "WHERE")?;
    let list = list_or_empty(node, "VALUE", pass)?;

    let evaluated_twice = position == Position::FromEnd || (position == Position::Random && mode == Mode::Remove);
    if evaluated_twice && !is_word(&list) {
        return get_index_of_expression(node, pass, mode, position, &list);
    }

    let value = |code: String| Ok(Emission::value(code, Rank::UnaryPostfix));
    let statement = |code: String| Ok(Emission::statement(format!("_ = {code};\n")));
    match (position, mode) {
        (Position::First, Mode::Get) => value(format!("{list}.items[0]")),
        (Position::First, Mode::GetRemove) => value(format!("{list}.orderedRemove(0)")),
        (Position::First, Mode::Remove) => statement(format!("{list}.orderedRemove(0)")),
        (Position::Last, Mode::Get) => value(format!("{list}.getLast()")),
        (Position::Last, Mode::GetRemove) => value(format!("{list}.pop()")),
        (Position::Last, Mode::Remove) => statement(format!("{list}.pop()")),
        (Position::FromStart, mode) => {
            let at = pass.adjusted_index(node, "AT", 0, false, Rank::None)?;
            match mode {
                Mode::Get => value(format!("{list}.items[{at}]")),
                Mode::GetRemove => value(format!("{list}.orderedRemove({at})")),
                Mode::Remove => statement(format!("{list}.orderedRemove({at})")),
            }
        }
        (Position::FromEnd, mode) => {
            let at = pass.adjusted_index(node, "AT", 1, false, Rank::Additive)?;
            match mode {
                Mode::Get => value(format!("{list}.items[{list}.items.len - {at}]")),
                Mode::GetRemove => value(format!("{list}.orderedRemove({list}.items.len - {at})")),
                Mode::Remove => statement(format!("{list}.orderedRemove({list}.items.len - {at})")),
            }
        }
        (Position::Random, Mode::Remove) => {
            let (index, setup) = random_index(pass, &list);
            Ok(Emission::statement(format!("{setup}_ = {list}.orderedRemove({index});\n")))
        }
        (Position::Random, mode) => {
            require_std(pass);
            if mode == Mode::Get {
                let helper = pass.provide_helper("lists_get_random_item", GET_RANDOM_ITEM);
                value(format!("{helper}({list}.items)"))
            } else {
                let helper = pass.provide_helper("lists_remove_random_item", REMOVE_RANDOM_ITEM);
                value(format!("{helper}(&{list})"))
            }
        }
    }
}

/// The `lists_getIndex` forms whose list operand is a computed expression used twice.
fn get_index_of_expression(
    node: &Node,
    pass: &mut Pass<'_>,
    mode: Mode,
    position: Position,
    list: &str,
) -> EmitResult<Emission> {
    if position == Position::Random {
        let cached = pass.cache_value(list, "tmp_list");
        let (index, setup) = random_index(pass, &cached.expr);
        return Ok(Emission::statement(format!(
            "{}{setup}_ = {}.orderedRemove({index});\n",
            cached.setup, cached.expr
        )));
    }

    match mode {
        Mode::Remove => {
            let at = pass.adjusted_index(node, "AT", 1, false, Rank::Additive)?;
            let cached = pass.cache_value(list, "tmp_list");
            Ok(Emission::statement(format!(
                "{setup}_ = {l}.orderedRemove({l}.items.len - {at});\n",
                setup = cached.setup,
                l = cached.expr
            )))
        }
        Mode::Get => {
            let at = pass.adjusted_index(node, "AT", 1, false, Rank::None)?;
            let helper = pass.provide_helper("lists_get_from_end", GET_FROM_END);
            Ok(Emission::value(format!("{helper}({list}.items, {at})"), Rank::UnaryPostfix))
        }
        Mode::GetRemove => {
            let at = pass.adjusted_index(node, "AT", 1, false, Rank::None)?;
            let helper = pass.provide_helper("lists_remove_from_end", REMOVE_FROM_END);
            Ok(Emission::value(format!("{helper}(&{list}, {at})"), Rank::UnaryPostfix))
        }
    }
}

/// Replace or insert one item. Defaults: mode `SET`, position `FROM_START`, value `0`.
fn lists_set_index(node: &Node, pass: &mut Pass<'_>) -> EmitResult<Emission> {
    let insert = match option_or(node, "MODE", "SET") {
        "SET" => false,
        "INSERT" => true,
        _ => return Err(EmitError::unhandled_option(node, "MODE")),
    };
    let position = position(node, "WHERE")?;
    let list = list_or_empty(node, "LIST", pass)?;
    let value = pass.value_or(node, "TO", Rank::Assignment, "0")?;

    let (setup, list) = match position {
        Position::Last if !insert => split(pass.cache_value(&list, "tmp_list")),
        Position::FromEnd | Position::Random => split(pass.cache_value(&list, "tmp_list")),
        _ => (String::new(), list),
    };

    let code = match position {
        Position::First if insert => format!("try {list}.insert(0, {value});\n"),
        Position::First => format!("{list}.items[0] = {value};\n"),
        Position::Last if insert => format!("try {list}.append({value});\n"),
        Position::Last => format!("{list}.items[{list}.items.len - 1] = {value};\n"),
        Position::FromStart => {
            let at = pass.adjusted_index(node, "AT", 0, false, Rank::None)?;
            if insert {
                format!("try {list}.insert({at}, {value});\n")
            } else {
                format!("{list}.items[{at}] = {value};\n")
            }
        }
        Position::FromEnd => {
            let at = pass.adjusted_index(node, "AT", 1, false, Rank::Additive)?;
            if insert {
                format!("try {list}.insert({list}.items.len - {at}, {value});\n")
            } else {
                format!("{list}.items[{list}.items.len - {at}] = {value};\n")
            }
        }
        Position::Random => {
            let (index, random) = random_index(pass, &list);
            if insert {
                format!("{random}try {list}.insert({index}, {value});\n")
            } else {
                format!("{random}{list}.items[{index}] = {value};\n")
            }
        }
    };
    Ok(Emission::statement(format!("{setup}{code}")))
}

fn split(cached: CachedValue) -> (String, String) {
    (cached.setup, cached.expr)
}

const GET_SUBLIST: &str = r#"
fn {{HELPER}}(values: []const f32, where1: []const u8, at1: usize, where2: []const u8, at2: usize) !std.ArrayList(f32) {
  var start = at1;
  if (std.mem.eql(u8, where1, "FROM_END")) {
    start = values.len - 1 - at1;
  } else if (std.mem.eql(u8, where1, "FIRST")) {
    start = 0;
  }
  var end = at2;
  if (std.mem.eql(u8, where2, "FROM_END")) {
    end = values.len - 1 - at2;
  } else if (std.mem.eql(u8, where2, "LAST")) {
    end = values.len - 1;
  }
  var list = std.ArrayList(f32).init(allocator);
  try list.appendSlice(values[start .. end + 1]);
  return list;
}
"#;

/// A copy of part of a list.
fn lists_get_sublist(node: &Node, pass: &mut Pass<'_>) -> EmitResult<Emission> {
    let where1 = option_or(node, "WHERE1", "FROM_START");
    let where2 = option_or(node, "WHERE2", "FROM_START");
    if !matches!(where1, "FROM_START" | "FROM_END" | "FIRST") {
        return Err(EmitError::unhandled_option(node, "WHERE1"));
    }
    if !matches!(where2, "FROM_START" | "FROM_END" | "LAST") {
        return Err(EmitError::unhandled_option(node, "WHERE2"));
    }
    let list = list_or_empty(node, "LIST", pass)?;

    if is_word(&list) || (where1 != "FROM_END" && where2 == "FROM_START") {
        let start = match where1 {
            "FROM_START" => pass.adjusted_index(node, "AT1", 0, false, Rank::None)?,
            "FROM_END" => {
                let at = pass.adjusted_index(node, "AT1", 1, false, Rank::Additive)?;
                format!("{list}.items.len - {at}")
            }
            _ => "0".to_string(),
        };
        let slice = match where2 {
            "FROM_START" => {
                let end = pass.adjusted_index(node, "AT2", 1, false, Rank::None)?;
                format!("{list}.items[{start}..{end}]")
            }
            "FROM_END" => {
                let at = pass.adjusted_index(node, "AT2", 0, false, Rank::Additive)?;
                format!("{list}.items[{start}..{list}.items.len - {at}]")
            }
            _ => format!("{list}.items[{start}..]"),
        };
        return Ok(Emission::value(copy_into_list(pass, &slice), Rank::UnaryPrefix));
    }

    require_allocator(pass);
    let at1 = pass.adjusted_index(node, "AT1", 0, false, Rank::None)?;
    let at2 = pass.adjusted_index(node, "AT2", 0, false, Rank::None)?;
    let helper = pass.provide_helper("lists_get_sublist", GET_SUBLIST);
    let (where1, where2) = (pass.quote(where1), pass.quote(where2));
    Ok(Emission::value(
        format!("try {helper}({list}.items, {where1}, {at1}, {where2}, {at2})"),
        Rank::UnaryPrefix,
    ))
}

const SORT: &str = r#"
fn {{HELPER}}(values: []const f32) !std.ArrayList(f32) {
  var list = std.ArrayList(f32).init(allocator);
  try list.appendSlice(values);
  std.mem.sort(f32, list.items, {}, std.sort.{{ORDER}}(f32));
  return list;
}
"#;

/// A sorted copy of a list.
///
/// Lists hold numbers, so every sort type orders by value. The direction is part of the helper text,
/// so each direction gets its own helper.
fn lists_sort(node: &Node, pass: &mut Pass<'_>) -> EmitResult<Emission> {
    if !matches!(option(node, "TYPE")?, "NUMERIC" | "TEXT" | "IGNORE_CASE") {
        return Err(EmitError::unhandled_option(node, "TYPE"));
    }
    let order = match node.field_number("DIRECTION") {
        Some(d) if d == 1.0 => "asc",
        Some(d) if d == -1.0 => "desc",
        _ => return Err(EmitError::unhandled_option(node, "DIRECTION")),
    };
    let items = items_or_empty(node, "LIST", pass)?;
    require_allocator(pass);
    let helper = pass.provide_helper("lists_sort", &SORT.replace("{{ORDER}}", order));
    Ok(Emission::value(format!("try {helper}({items})"), Rank::UnaryPrefix))
}

const SPLIT: &str = r#"
fn {{HELPER}}(text: []const u8, delimiter: []const u8) !std.ArrayList([]const u8) {
  var parts = std.ArrayList([]const u8).init(allocator);
  var it = std.mem.splitSequence(u8, text, delimiter);
  while (it.next()) |part| {
    try parts.append(part);
  }
  return parts;
}
"#;

/// Split text into a list of text, or join a list of text. Empty input: `""` / an empty list; empty
/// delimiter `""`.
fn lists_split(node: &Node, pass: &mut Pass<'_>) -> EmitResult<Emission> {
    let split = match option(node, "MODE")? {
        "SPLIT" => true,
        "JOIN" => false,
        _ => return Err(EmitError::unhandled_option(node, "MODE")),
    };
    let delimiter = pass.value_or(node, "DELIM", Rank::None, "\"\"")?;
    require_allocator(pass);
    let code = if split {
        let input = pass.value_or(node, "INPUT", Rank::None, "\"\"")?;
        let helper = pass.provide_helper("lists_split", SPLIT);
        format!("try {helper}({input}, {delimiter})")
    } else {
        let items = items_or_empty(node, "INPUT", pass)?;
        format!("try std.mem.join(allocator, {delimiter}, {items})")
    };
    Ok(Emission::value(code, Rank::UnaryPrefix))
}

const REVERSE: &str = r#"
fn {{HELPER}}(values: []const f32) !std.ArrayList(f32) {
  var list = std.ArrayList(f32).init(allocator);
  try list.appendSlice(values);
  std.mem.reverse(f32, list.items);
  return list;
}
"#;

fn lists_reverse(node: &Node, pass: &mut Pass<'_>) -> EmitResult<Emission> {
    let items = items_or_empty(node, "LIST", pass)?;
    require_allocator(pass);
    let helper = pass.provide_helper("lists_reverse", REVERSE);
    Ok(Emission::value(format!("try {helper}({items})"), Rank::UnaryPrefix))
}

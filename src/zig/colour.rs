//! Colours.
//!
//! Colours are `#rrggbb` text. Everything except the picker goes through a helper that allocates the
//! resulting string.

use weft_core::lang::precedence::Rank;
use weft_graph::Node;

use super::require_allocator;
use crate::backend::{EmitResult, Emission, EmitterTable, Pass};

pub(crate) fn register(table: &mut EmitterTable) {
    table.register("colour_picker", colour_picker);
    table.register("colour_random", colour_random);
    table.register("colour_rgb", colour_rgb);
    table.register("colour_blend", colour_blend);
}

const BLACK: &str = "\"#000000\"";

fn colour_picker(node: &Node, pass: &mut Pass<'_>) -> EmitResult<Emission> {
    let colour = node.field_text("COLOUR").unwrap_or("#000000");
    Ok(Emission::value(pass.quote(colour), Rank::Atomic))
}

const RANDOM: &str = r##"
fn {{HELPER}}() ![]const u8 {
  return std.fmt.allocPrint(allocator, "#{x:0>6}", .{ std.crypto.random.int(u24) });
}
"##;

fn colour_random(_node: &Node, pass: &mut Pass<'_>) -> EmitResult<Emission> {
    require_allocator(pass);
    let helper = pass.provide_helper("colour_random", RANDOM);
    Ok(Emission::value(format!("try {helper}()"), Rank::UnaryPrefix))
}

const RGB: &str = r##"
fn {{HELPER}}(r: f32, g: f32, b: f32) ![]const u8 {
  const red: u8 = @intFromFloat(@round(std.math.clamp(r, 0, 100) * 2.55));
  const green: u8 = @intFromFloat(@round(std.math.clamp(g, 0, 100) * 2.55));
  const blue: u8 = @intFromFloat(@round(std.math.clamp(b, 0, 100) * 2.55));
  return std.fmt.allocPrint(allocator, "#{x:0>2}{x:0>2}{x:0>2}", .{ red, green, blue });
}
"##;

/// A colour from red, green and blue percentages. Empty channels are `0`.
fn colour_rgb(node: &Node, pass: &mut Pass<'_>) -> EmitResult<Emission> {
    let red = pass.value_or(node, "RED", Rank::None, "0")?;
    let green = pass.value_or(node, "GREEN", Rank::None, "0")?;
    let blue = pass.value_or(node, "BLUE", Rank::None, "0")?;
    require_allocator(pass);
    let helper = pass.provide_helper("colour_rgb", RGB);
    Ok(Emission::value(format!("try {helper}({red}, {green}, {blue})"), Rank::UnaryPrefix))
}

const BLEND: &str = r##"
fn {{HELPER}}(c1: []const u8, c2: []const u8, ratio: f32) ![]const u8 {
  const weight = std.math.clamp(ratio, 0, 1);
  var channels: [3]u8 = undefined;
  for (&channels, 0..) |*channel, i| {
    const a: f32 = @floatFromInt(try std.fmt.parseInt(u8, c1[1 + i * 2 .. 3 + i * 2], 16));
    const b: f32 = @floatFromInt(try std.fmt.parseInt(u8, c2[1 + i * 2 .. 3 + i * 2], 16));
    channel.* = @intFromFloat(@round(a * (1 - weight) + b * weight));
  }
  return std.fmt.allocPrint(allocator, "#{x:0>2}{x:0>2}{x:0>2}", .{ channels[0], channels[1], channels[2] });
}
"##;

/// Mix two colours. Defaults: black, black, `0.5`.
fn colour_blend(node: &Node, pass: &mut Pass<'_>) -> EmitResult<Emission> {
    let first = pass.value_or(node, "COLOUR1", Rank::None, BLACK)?;
    let second = pass.value_or(node, "COLOUR2", Rank::None, BLACK)?;
    let ratio = pass.value_or(node, "RATIO", Rank::None, "0.5")?;
    require_allocator(pass);
    let helper = pass.provide_helper("colour_blend", BLEND);
    Ok(Emission::value(
        format!("try {helper}({first}, {second}, {ratio})"),
        Rank::UnaryPrefix,
    ))
}

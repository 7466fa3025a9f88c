//! Zig keyword vocabulary (for identifier escaping in generated code).

/// Reserved keywords in Zig.
pub const ZIG_KEYWORDS: &[&str] = &[
    "addrspace", "align", "allowzero", "and", "anyframe", "anytype", "asm", "async", "await", "break",
    "callconv", "catch", "comptime", "const", "continue", "defer", "else", "enum", "errdefer", "error",
    "export", "extern", "fn", "for", "if", "inline", "linksection", "noalias", "noinline", "nosuspend",
    "opaque", "or", "orelse", "packed", "pub", "resume", "return", "struct", "suspend", "switch", "test",
    "threadlocal", "try", "union", "unreachable", "usingnamespace", "var", "volatile", "while",
];

/// Primitive type names and values that cannot be shadowed in Zig.
pub const ZIG_PRIMITIVES: &[&str] = &[
    "anyerror", "anyopaque", "bool", "c_char", "c_int", "c_long", "c_short", "c_uint", "c_ulong", "c_ushort",
    "comptime_float", "comptime_int", "f16", "f32", "f64", "f80", "f128", "false", "i8", "i16", "i32", "i64",
    "i128", "isize", "noreturn", "null", "true", "type", "u8", "u16", "u32", "u64", "u128", "undefined",
    "usize", "void",
];

/// Names the generated program itself depends on (imports, entry point, device runtime).
pub const ZIG_RUNTIME_NAMES: &[&str] = &[
    "std", "math", "debug", "main", "allocator", "c", "sen", "composeCbor", "transmitLorawan",
];

/// Check whether an identifier is a Zig keyword.
pub fn is_keyword(name: &str) -> bool {
    ZIG_KEYWORDS.contains(&name)
}

/// Check whether an identifier must never be produced as a bare name in generated Zig.
pub fn is_reserved(name: &str) -> bool {
    is_keyword(name) || ZIG_PRIMITIVES.contains(&name) || ZIG_RUNTIME_NAMES.contains(&name)
}

/// Iterate every reserved spelling (keywords, primitives, runtime names).
pub fn all_reserved() -> impl Iterator<Item = &'static str> {
    ZIG_KEYWORDS
        .iter()
        .chain(ZIG_PRIMITIVES)
        .chain(ZIG_RUNTIME_NAMES)
        .copied()
}

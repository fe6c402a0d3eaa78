//! Naming helpers shared by the emitters.
//!
//! Schema identifiers are snake_case; generated type names are PascalCase,
//! canonical finder and parameter names camelCase, and Rust items snake_case.

use convert_case::{Boundary, Case, Casing};

const RUST_KEYWORDS: &[&str] = &[
    "abstract", "as", "async", "await", "become", "box", "break", "const", "continue", "do", "dyn",
    "else", "enum", "extern", "false", "final", "fn", "for", "gen", "if", "impl", "in", "let",
    "loop", "macro", "match", "mod", "move", "mut", "override", "priv", "pub", "ref", "return",
    "static", "struct", "trait", "true", "try", "type", "typeof", "unsafe", "unsized", "use",
    "virtual", "where", "while", "yield",
];

/// SQL reserved words a short alias can spell out.
const SQL_KEYWORDS: &[&str] = &[
    "add", "all", "alter", "and", "any", "as", "asc", "at", "between", "by", "case", "cast",
    "check", "column", "create", "cross", "current", "default", "delete", "desc", "distinct", "do",
    "drop", "each", "else", "end", "exists", "false", "fetch", "for", "foreign", "from", "full",
    "grant", "group", "having", "if", "in", "index", "inner", "insert", "into", "is", "join", "key",
    "left", "like", "limit", "natural", "not", "null", "of", "offset", "on", "or", "order", "outer",
    "primary", "right", "row", "rows", "select", "set", "some", "table", "then", "to", "top",
    "true", "union", "unique", "update", "use", "user", "using", "values", "view", "when", "where",
    "with",
];

/// Keywords that cannot be written as raw identifiers.
const RESERVED_PATH_KEYWORDS: &[&str] = &["crate", "self", "super", "Self"];

/// Non-empty and made of ASCII letters, digits and `_` only.
pub fn is_identifier(name: &str) -> bool {
    !name.is_empty() && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Convert a snake_case identifier to PascalCase.
///
/// Splits on `_` and upper-cases the first character of every segment; the
/// rest of each segment is kept as-is. Empty segments contribute nothing.
pub fn snake_to_pascal(snake: &str) -> String {
    snake
        .split('_')
        .filter(|segment| !segment.is_empty())
        .map(upper_first)
        .collect()
}

/// Convert a snake_case identifier to camelCase.
pub fn snake_to_camel(snake: &str) -> String {
    lower_first(&snake_to_pascal(snake))
}

pub fn upper_first(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

pub fn lower_first(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Short table alias: first character of every `_`-separated segment.
///
/// `user_accounts` → `ua`. An alias that spells an SQL reserved word gets a
/// trailing `_` (`is_sent` → `is_`). Distinct tables may share an alias.
pub fn table_alias(table_name: &str) -> String {
    let alias: String = table_name
        .split('_')
        .filter_map(|segment| segment.chars().next())
        .collect();
    if is_sql_keyword(&alias) {
        format!("{}_", alias)
    } else {
        alias
    }
}

/// Case-insensitive match against the SQL reserved words.
pub fn is_sql_keyword(word: &str) -> bool {
    SQL_KEYWORDS
        .iter()
        .any(|keyword| keyword.eq_ignore_ascii_case(word))
}

/// Convert a schema identifier to snake_case, splitting only on
/// underscores and lower→upper transitions (digits stay attached).
pub fn to_snake_case(s: &str) -> String {
    s.with_boundaries(&[Boundary::Underscore, Boundary::LowerUpper])
        .to_case(Case::Snake)
}

/// A snake_case Rust identifier for a schema identifier, escaped when it
/// collides with a keyword.
pub fn rust_ident(name: &str) -> String {
    let mut ident = to_snake_case(name);
    if ident.is_empty() || ident.starts_with(|c: char| c.is_ascii_digit()) {
        ident.insert(0, '_');
    }

    if RESERVED_PATH_KEYWORDS.contains(&ident.as_str()) {
        format!("{}_", ident)
    } else if RUST_KEYWORDS.contains(&ident.as_str()) {
        format!("r#{}", ident)
    } else {
        ident
    }
}

/// Escape a string for use in Rust string literals
pub fn escape_rust_string(s: &str) -> String {
    s.replace('\\', "\\\\")
        .replace('"', "\\\"")
        .replace('\n', "\\n")
        .replace('\r', "\\r")
        .replace('\t', "\\t")
}

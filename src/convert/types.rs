//! Column type normalization for MySQL → SQLite.
//!
//! Handles:
//! - Column modifiers with no SQLite meaning (UNSIGNED, ZEROFILL)
//! - ENUM/SET value lists, collapsed to TEXT
//! - Integer display widths (`int(11)` → INTEGER)
//! - Floating point types (DOUBLE, FLOAT → REAL)

use super::quoting::{closing_paren, map_unquoted, unquoted_mask};
use once_cell::sync::Lazy;
use regex::Regex;

/// Type mapper for the MySQL → SQLite direction
pub struct TypeMapper;

impl TypeMapper {
    /// Normalize all column types in a CREATE TABLE statement.
    ///
    /// Quoted identifiers and string literals are never rewritten.
    pub fn mysql_to_sqlite(stmt: &str) -> String {
        let collapsed = collapse_value_lists(stmt);
        map_unquoted(&collapsed, Self::map_types)
    }

    /// Rewrites for one unquoted stretch of SQL.
    fn map_types(sql: &str) -> String {
        // Modifiers - remove
        let mut result = RE_UNSIGNED.replace_all(sql, "").into_owned();
        result = RE_ZEROFILL.replace_all(&result, "").into_owned();

        // Integer types - width is display-only
        for re in RE_INT_WIDTH.iter() {
            result = re.replace_all(&result, "INTEGER").into_owned();
        }

        // Float types
        result = RE_DOUBLE.replace_all(&result, "REAL").into_owned();
        RE_FLOAT.replace_all(&result, "REAL").into_owned()
    }
}

/// Replace every `enum(...)` / `set(...)` type with TEXT.
///
/// The closing parenthesis is found outside quotes, so values may contain
/// any characters.
fn collapse_value_lists(stmt: &str) -> String {
    let mask = unquoted_mask(stmt);
    let mut out = String::with_capacity(stmt.len());
    let mut copied = 0;

    for m in RE_VALUE_LIST_OPEN.find_iter(stmt) {
        if m.start() < copied || !mask[m.start()] {
            continue;
        }
        let Some(close) = closing_paren(&stmt[m.end()..]) else {
            break;
        };
        out.push_str(&stmt[copied..m.start()]);
        out.push_str("TEXT");
        copied = m.end() + close + 1;
    }

    out.push_str(&stmt[copied..]);
    out
}

static RE_UNSIGNED: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)\bunsigned\b").unwrap());
static RE_ZEROFILL: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)\bzerofill\b").unwrap());

static RE_VALUE_LIST_OPEN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\b(?:enum|set)\s*\(").unwrap());

static RE_INT_WIDTH: Lazy<Vec<Regex>> = Lazy::new(|| {
    ["tinyint", "smallint", "mediumint", "bigint", "integer", "int"]
        .iter()
        .map(|t| Regex::new(&format!(r"(?i)\b{}\s*\(\s*\d+\s*\)", t)).unwrap())
        .collect()
});

static RE_DOUBLE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)\bdouble\b").unwrap());
static RE_FLOAT: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)\bfloat\b").unwrap());

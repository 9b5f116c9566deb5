//! CREATE TABLE rewriting for SQLite.
//!
//! The rewrite runs in a fixed order:
//! 1. backticks become double quotes
//! 2. column types are normalized (see [`TypeMapper`])
//! 3. AUTO_INCREMENT is removed, both as table option and column modifier
//! 4. each top-level item of the definition list is inspected: named
//!    UNIQUE keys become bare `UNIQUE (...)` constraints and plain index
//!    declarations are dropped
//! 5. MySQL table options after the definition list are dropped
//! 6. a dangling comma before the final parenthesis is removed
//!
//! Steps 2 and 3 leave quoted identifiers and string literals alone.

use super::quoting::{map_unquoted, walk_unquoted};
use super::types::TypeMapper;
use once_cell::sync::Lazy;
use regex::Regex;
use std::ops::ControlFlow;

static RE_AUTO_INC_OPTION: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\bAUTO_INCREMENT\s*=\s*\d+\b").unwrap());

static RE_AUTO_INC_COLUMN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\s+AUTO_INCREMENT\b").unwrap());

static RE_UNIQUE_KEY: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r#"(?is)^UNIQUE\s+(?:KEY|INDEX)(?:\s+"[^"]+")?(?:\s+USING\s+\w+)?\s*\((.+)\)(?:\s+USING\s+\w+)?$"#,
    )
    .unwrap()
});

static RE_PLAIN_KEY: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r#"(?is)^(?:(?:FULLTEXT|SPATIAL)\s+)?(?:KEY|INDEX)(?:\s+"[^"]+")?(?:\s+USING\s+\w+)?\s*\(.+\)(?:\s+USING\s+\w+)?$"#,
    )
    .unwrap()
});

/// Index prefix length on a key column: `"name"(10)`
static RE_KEY_PREFIX_LEN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#""([^"]+)"\s*\(\s*\d+\s*\)"#).unwrap());

static RE_TABLE_OPTIONS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)^\s*(?:ENGINE|TYPE|DEFAULT|AUTO_INCREMENT|CHARSET|COLLATE|CHARACTER|ROW_FORMAT|COMMENT|PACK_KEYS|CHECKSUM|MAX_ROWS|MIN_ROWS|AVG_ROW_LENGTH|KEY_BLOCK_SIZE)\b",
    )
    .unwrap()
});

static RE_DANGLING_COMMA: Lazy<Regex> = Lazy::new(|| Regex::new(r",\s*\)\s*$").unwrap());

/// Convert a MySQL `CREATE TABLE` statement (without trailing semicolon).
pub fn convert_create_table(stmt: &str) -> String {
    let mut result = stmt.replace('`', "\"");

    result = TypeMapper::mysql_to_sqlite(&result);

    result = map_unquoted(&result, |sql| {
        let sql = RE_AUTO_INC_OPTION.replace_all(sql, "");
        RE_AUTO_INC_COLUMN.replace_all(&sql, "").into_owned()
    });

    result = rewrite_definitions(&result);

    RE_DANGLING_COMMA.replace(&result, ")").into_owned()
}

/// Rewrite key items of the definition list and drop trailing table options.
fn rewrite_definitions(stmt: &str) -> String {
    let Some((open, close)) = find_definition_list(stmt) else {
        return stmt.to_string();
    };

    let body = &stmt[open + 1..close];
    let kept: Vec<String> = split_top_level(body)
        .into_iter()
        .filter_map(rewrite_item)
        .collect();

    let mut out = String::with_capacity(stmt.len());
    out.push_str(&stmt[..=open]);
    out.push_str(kept.join(",").trim_end());
    out.push_str(&body[body.trim_end().len()..]);
    out.push(')');

    let tail = &stmt[close + 1..];
    if !RE_TABLE_OPTIONS.is_match(tail) {
        out.push_str(tail.trim_end());
    }
    out
}

/// Rewrite one column/constraint item. `None` drops it.
fn rewrite_item(item: &str) -> Option<String> {
    let trimmed = item.trim();

    if let Some(caps) = RE_UNIQUE_KEY.captures(trimmed) {
        let lead = &item[..item.len() - item.trim_start().len()];
        let trail = &item[item.trim_end().len()..];
        let columns = RE_KEY_PREFIX_LEN.replace_all(&caps[1], "\"$1\"");
        return Some(format!("{}UNIQUE ({}){}", lead, columns, trail));
    }

    if RE_PLAIN_KEY.is_match(trimmed) {
        return None;
    }

    Some(item.to_string())
}

/// Byte offsets of the parentheses enclosing the column definitions.
fn find_definition_list(stmt: &str) -> Option<(usize, usize)> {
    let mut open = None;
    let mut close = None;
    let mut depth = 0usize;

    walk_unquoted(stmt, |i, b| {
        match b {
            b'(' => {
                if depth == 0 {
                    open = Some(i);
                }
                depth += 1;
            }
            b')' if depth > 0 => {
                depth -= 1;
                if depth == 0 {
                    close = Some(i);
                    return ControlFlow::Break(());
                }
            }
            _ => {}
        }
        ControlFlow::Continue(())
    });

    Some((open?, close?))
}

/// Split on commas that are outside quotes and nested parentheses.
fn split_top_level(body: &str) -> Vec<&str> {
    let mut items = Vec::new();
    let mut start = 0;
    let mut depth = 0usize;

    walk_unquoted(body, |i, b| {
        match b {
            b'(' => depth += 1,
            b')' => depth = depth.saturating_sub(1),
            b',' if depth == 0 => {
                items.push(&body[start..i]);
                start = i + 1;
            }
            _ => {}
        }
        ControlFlow::Continue(())
    });

    items.push(&body[start..]);
    items
}

//! Lexical layer: comment stripping, statement splitting and classification.


use once_cell::sync::Lazy;
use regex::Regex;

/// Leading keywords of statements that only make sense in a MySQL session.
const SESSION_PREFIXES: &[&str] = &[
    "SET ",
    "LOCK TABLES",
    "UNLOCK TABLES",
    "DELIMITER",
    "START TRANSACTION",
    "COMMIT",
    "ROLLBACK",
    "CREATE DATABASE",
    "DROP DATABASE",
];

static USE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"(?i)^USE\s+[`"]?([^`";\s]+)[`"]?\s*;?$"#).unwrap());

/// Remove full-line comments and single-line `/*! ... */;` directives.
///
/// Only whole lines are removed. A comment that starts after SQL on the
/// same line, or a `/* ... */` block spanning several lines, is left in
/// place for the splitter to deal with.
pub fn strip_comment_lines(sql: &str) -> String {
    let mut kept: Vec<&str> = Vec::new();
    for line in sql.lines() {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            kept.push(line);
            continue;
        }
        if trimmed.starts_with("--") || trimmed.starts_with('#') {
            continue;
        }
        if trimmed.starts_with("/*!") && trimmed.ends_with("*/;") {
            continue;
        }
        kept.push(line);
    }
    kept.join("\n")
}

/// Lexical state of the splitter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum QuoteState {
    Normal,
    SingleQuote,
    DoubleQuote,
    Backtick,
}

impl QuoteState {
    /// Quote byte that opens (and closes) this state.
    fn opened_by(b: u8) -> Option<Self> {
        match b {
            b'\'' => Some(QuoteState::SingleQuote),
            b'"' => Some(QuoteState::DoubleQuote),
            b'`' => Some(QuoteState::Backtick),
            _ => None,
        }
    }
}

/// Iterator over the statements of a SQL script.
///
/// Statements are returned trimmed, with their terminating semicolon, as
/// slices of the input. Splitting happens only on `;` outside of quotes;
/// a backslash suppresses interpretation of the following character in
/// every state.
pub struct StatementSplitter<'a> {
    sql: &'a str,
    pos: usize,
}

impl<'a> StatementSplitter<'a> {
    pub fn new(sql: &'a str) -> Self {
        Self { sql, pos: 0 }
    }

    /// Bytes of input consumed so far.
    pub fn position(&self) -> usize {
        self.pos
    }
}

impl<'a> Iterator for StatementSplitter<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<&'a str> {
        let bytes = self.sql.as_bytes();
        let mut state = QuoteState::Normal;
        let mut escaped = false;

        // All bytes we act on are ASCII, so every cut lands on a char boundary.
        while self.pos < bytes.len() {
            let start = self.pos;
            let mut end = None;

            for (i, &b) in bytes[start..].iter().enumerate() {
                if escaped {
                    escaped = false;
                    continue;
                }
                if b == b'\\' {
                    escaped = true;
                    continue;
                }
                match state {
                    QuoteState::Normal => {
                        if let Some(opened) = QuoteState::opened_by(b) {
                            state = opened;
                        } else if b == b';' {
                            end = Some(start + i + 1);
                            break;
                        }
                    }
                    quoted => {
                        if QuoteState::opened_by(b) == Some(quoted) {
                            state = QuoteState::Normal;
                        }
                    }
                }
            }

            let end = end.unwrap_or(bytes.len());
            self.pos = end;
            let stmt = self.sql[start..end].trim();
            if !stmt.is_empty() {
                return Some(stmt);
            }
        }

        None
    }
}

/// Split a whole script into statements.
pub fn split_statements(sql: &str) -> Vec<&str> {
    StatementSplitter::new(sql).collect()
}

/// Statement category, decided by the leading keyword.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatementKind {
    /// `/*! ... */` version-conditional directive
    Directive,
    /// Session and transaction control (`SET`, `LOCK TABLES`, ...)
    Session,
    Use,
    CreateTable,
    AlterTable,
    Insert,
    DropTable,
    Other,
    Empty,
}

impl StatementKind {
    /// Classify a statement. Leading whitespace and trailing semicolons are ignored.
    pub fn classify(stmt: &str) -> Self {
        let body = statement_body(stmt);
        if body.is_empty() {
            return StatementKind::Empty;
        }
        if body.starts_with("/*!") {
            return StatementKind::Directive;
        }

        let upper: String = body
            .chars()
            .take(32)
            .collect::<String>()
            .to_ascii_uppercase();

        if SESSION_PREFIXES.iter().any(|p| upper.starts_with(p)) {
            StatementKind::Session
        } else if upper.starts_with("USE ") {
            StatementKind::Use
        } else if upper.starts_with("CREATE TABLE") || upper.starts_with("CREATE TEMPORARY TABLE")
        {
            StatementKind::CreateTable
        } else if upper.starts_with("ALTER TABLE") {
            StatementKind::AlterTable
        } else if upper.starts_with("INSERT INTO") {
            StatementKind::Insert
        } else if upper.starts_with("DROP TABLE") {
            StatementKind::DropTable
        } else {
            StatementKind::Other
        }
    }
}

/// Statement text without surrounding whitespace and trailing semicolons.
pub fn statement_body(stmt: &str) -> &str {
    stmt.trim().trim_end_matches(';').trim()
}

/// Schema name selected by a `USE <schema>` statement, if `stmt` is one.
pub fn extract_use_schema(stmt: &str) -> Option<&str> {
    USE_RE
        .captures(stmt.trim())
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_comment_lines() {
        let sql = "-- phpMyAdmin SQL Dump\n# mysql comment\n/*!40101 SET NAMES utf8 */;\n\nCREATE TABLE t (id INT);\n  -- indented\n";
        assert_eq!(strip_comment_lines(sql), "\nCREATE TABLE t (id INT);");
    }

    #[test]
    fn test_strip_keeps_mid_line_comment() {
        let sql = "INSERT INTO t VALUES (1); -- trailing";
        assert_eq!(strip_comment_lines(sql), sql);
    }

    #[test]
    fn test_strip_keeps_unterminated_directive() {
        let sql = "/*!40101 SET @OLD_CHARACTER_SET_CLIENT=@@CHARACTER_SET_CLIENT */";
        assert_eq!(strip_comment_lines(sql), sql);
    }

    #[test]
    fn test_split_basic() {
        let stmts = split_statements("CREATE TABLE t1 (id INT); INSERT INTO t1 VALUES (1);");
        assert_eq!(
            stmts,
            vec!["CREATE TABLE t1 (id INT);", "INSERT INTO t1 VALUES (1);"]
        );
    }

    #[test]
    fn test_split_quotes() {
        let stmts = split_statements(r#"INSERT INTO t VALUES ('a;b', "c;d");"#);
        assert_eq!(stmts.len(), 1);
    }

    #[test]
    fn test_split_leftover() {
        let stmts = split_statements("SELECT 1; SELECT 2");
        assert_eq!(stmts, vec!["SELECT 1;", "SELECT 2"]);
    }

    #[test]
    fn test_classify() {
        assert_eq!(StatementKind::classify("set names utf8;"), StatementKind::Session);
        assert_eq!(StatementKind::classify("Lock Tables t WRITE;"), StatementKind::Session);
        assert_eq!(StatementKind::classify("/*!40000 ALTER TABLE t */;"), StatementKind::Directive);
        assert_eq!(StatementKind::classify("use db;"), StatementKind::Use);
        assert_eq!(
            StatementKind::classify("CREATE TEMPORARY TABLE x (a int);"),
            StatementKind::CreateTable
        );
        assert_eq!(StatementKind::classify("alter table t add x int;"), StatementKind::AlterTable);
        assert_eq!(StatementKind::classify("INSERT INTO t VALUES (1);"), StatementKind::Insert);
        assert_eq!(StatementKind::classify("DROP TABLE IF EXISTS t;"), StatementKind::DropTable);
        assert_eq!(StatementKind::classify("CREATE INDEX i ON t (a);"), StatementKind::Other);
        assert_eq!(StatementKind::classify(";"), StatementKind::Empty);
    }

    #[test]
    fn test_extract_use_schema() {
        assert_eq!(extract_use_schema("USE chiamogna;"), Some("chiamogna"));
        assert_eq!(extract_use_schema("use `other_db`;"), Some("other_db"));
        assert_eq!(extract_use_schema("USE \"quoted\""), Some("quoted"));
        assert_eq!(extract_use_schema("USE a b;"), None);
        assert_eq!(extract_use_schema("USER x;"), None);
    }
}

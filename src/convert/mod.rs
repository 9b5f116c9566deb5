//! Per-statement translation of MySQL dump statements to SQLite.
//!
//! Every statement is classified by its leading keyword
//! ([`StatementKind`]) and mapped to one [`Action`]:
//! - skipped (session control, directives, ALTER TABLE, empty)
//! - `USE`, handed back untouched for the schema tracker
//! - `CREATE TABLE`, structurally rewritten
//! - anything else, passed through with backticks turned into double quotes

mod create_table;
mod quoting;
mod types;

pub use create_table::convert_create_table;
pub use types::TypeMapper;

use crate::parser::{statement_body, StatementKind};
use serde::Serialize;
use std::fmt;

/// Why a statement was not executed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    /// `/*! ... */` conditional directive
    Directive,
    /// Session/transaction control with no meaning in the target
    Session,
    /// Statement kind not supported by the conversion (ALTER TABLE)
    Unsupported,
    /// Nothing left after stripping semicolons
    Empty,
    /// `USE` statement, consumed by the schema tracker
    SchemaSwitch,
    /// Active schema not in the inclusion set
    Filtered,
    /// Active schema is a MySQL system schema
    SystemSchema,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::Directive => write!(f, "conditional directive"),
            SkipReason::Session => write!(f, "session statement"),
            SkipReason::Unsupported => write!(f, "unsupported statement"),
            SkipReason::Empty => write!(f, "empty statement"),
            SkipReason::SchemaSwitch => write!(f, "schema switch"),
            SkipReason::Filtered => write!(f, "filtered schema"),
            SkipReason::SystemSchema => write!(f, "system schema"),
        }
    }
}

/// What to do with a statement of a given kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Skip(SkipReason),
    Use,
    RewriteCreateTable,
    NormalizeQuotes,
}

impl From<StatementKind> for Action {
    fn from(kind: StatementKind) -> Self {
        match kind {
            StatementKind::Directive => Action::Skip(SkipReason::Directive),
            StatementKind::Session => Action::Skip(SkipReason::Session),
            StatementKind::AlterTable => Action::Skip(SkipReason::Unsupported),
            StatementKind::Empty => Action::Skip(SkipReason::Empty),
            StatementKind::Use => Action::Use,
            StatementKind::CreateTable => Action::RewriteCreateTable,
            StatementKind::Insert | StatementKind::DropTable | StatementKind::Other => {
                Action::NormalizeQuotes
            }
        }
    }
}

/// Result of converting one statement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Conversion {
    /// SQLite statement to execute, without trailing semicolon
    Execute(String),
    /// `USE` statement, passed through unchanged; never executed
    Use(String),
    Skip(SkipReason),
}

/// Convert a single split statement.
pub fn convert_statement(stmt: &str) -> Conversion {
    let body = statement_body(stmt);

    match Action::from(StatementKind::classify(body)) {
        Action::Skip(reason) => Conversion::Skip(reason),
        Action::Use => Conversion::Use(body.to_string()),
        Action::RewriteCreateTable => Conversion::Execute(convert_create_table(body)),
        Action::NormalizeQuotes => Conversion::Execute(backticks_to_double_quotes(body)),
    }
}

/// Replace every backtick with a double quote.
pub fn backticks_to_double_quotes(stmt: &str) -> String {
    stmt.replace('`', "\"")
}

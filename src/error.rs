//! Error types for dump import.

use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, ImportError>;

/// Fatal failures of an import run.
///
/// Skipped statements are never errors; they only show up in
/// [`ImportStats`](crate::loader::ImportStats).
#[derive(Debug, Error)]
pub enum ImportError {
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("unknown text encoding: {0}")]
    UnknownEncoding(String),

    #[error("{} is not valid {encoding} text", path.display())]
    Decode { path: PathBuf, encoding: String },

    #[error("database error on {}: {source}", path.display())]
    Database {
        path: PathBuf,
        #[source]
        source: rusqlite::Error,
    },

    #[error("{source} (statement #{index}, active schema={}):\n{statement}", display_schema(schema))]
    Execute {
        /// 1-based position of the statement in the split stream
        index: usize,
        schema: Option<String>,
        statement: String,
        #[source]
        source: rusqlite::Error,
    },
}

impl ImportError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ImportError::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn database(path: impl Into<PathBuf>, source: rusqlite::Error) -> Self {
        ImportError::Database {
            path: path.into(),
            source,
        }
    }

    /// Statement index for execution failures.
    pub fn statement_index(&self) -> Option<usize> {
        match self {
            ImportError::Execute { index, .. } => Some(*index),
            _ => None,
        }
    }
}

fn display_schema(schema: &Option<String>) -> String {
    match schema {
        Some(name) => format!("'{}'", name),
        None => "None".to_string(),
    }
}

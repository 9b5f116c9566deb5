//! Convert MySQL/phpMyAdmin SQL dumps into SQLite databases.
//!
//! ```ignore
//! use dump2sqlite::config::ImportOptions;
//! use dump2sqlite::loader::import_dump;
//! use std::path::Path;
//!
//! let stats = import_dump(Path::new("backup.sql"), Path::new("out.sqlite3"), &ImportOptions::default())?;
//! println!("{}", stats);
//! ```

pub mod config;
pub mod convert;
pub mod error;
pub mod loader;
pub mod parser;
pub mod plan;
pub mod schema;
pub mod source;

pub use error::{ImportError, Result};

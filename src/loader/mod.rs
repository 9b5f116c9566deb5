//! Loading converted dumps into SQLite.
//!
//! The whole dump is applied in one transaction with foreign key
//! enforcement off, since dump order does not follow FK dependencies.
//! The first statement SQLite rejects rolls everything back and is
//! reported with its index, the active schema and its converted text.

mod target;

pub use target::TargetDatabase;

use crate::config::ImportOptions;
use crate::error::{ImportError, Result};
use crate::parser::strip_comment_lines;
use crate::plan::{Planned, StatementCounts, StatementPlan};
use crate::schema::SchemaFilter;
use crate::source::read_dump;
use indicatif::{ProgressBar, ProgressStyle};
use rusqlite::Connection;
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::time::Instant;

/// Label used in errors for in-memory targets
const IN_MEMORY: &str = ":memory:";

/// Statistics from a dump import
#[derive(Debug, Clone, Serialize)]
pub struct ImportStats {
    /// Database written (`None` for dry runs)
    pub output: Option<PathBuf>,
    #[serde(flatten)]
    pub counts: StatementCounts,
    /// Included schemas; empty when every schema was imported
    pub schemas: Vec<String>,
    pub duration_secs: f64,
}

impl ImportStats {
    pub fn executed(&self) -> u64 {
        self.counts.executed
    }

    pub fn skipped(&self) -> u64 {
        self.counts.skipped
    }
}

impl std::fmt::Display for ImportStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} executed, {} skipped in {:.2}s",
            self.counts.executed, self.counts.skipped, self.duration_secs
        )
    }
}

/// Executes a statement plan against a SQLite connection.
pub struct Loader<'a> {
    conn: &'a Connection,
    filter: &'a SchemaFilter,
    target: PathBuf,
    progress: Option<ProgressBar>,
}

impl<'a> Loader<'a> {
    /// `target` names the database in error messages.
    pub fn new(conn: &'a Connection, filter: &'a SchemaFilter, target: impl Into<PathBuf>) -> Self {
        Self {
            conn,
            filter,
            target: target.into(),
            progress: None,
        }
    }

    /// Report progress in bytes of `sql` consumed.
    pub fn with_progress(mut self, progress: ProgressBar) -> Self {
        self.progress = Some(progress);
        self
    }

    /// Apply comment-stripped dump text in a single transaction.
    pub fn load(&self, sql: &str) -> Result<StatementCounts> {
        self.conn
            .pragma_update(None, "foreign_keys", false)
            .map_err(|e| ImportError::database(&self.target, e))?;

        let tx = self
            .conn
            .unchecked_transaction()
            .map_err(|e| ImportError::database(&self.target, e))?;

        let mut counts = StatementCounts::default();
        let mut plan = StatementPlan::new(sql, self.filter);

        while let Some(planned) = plan.next() {
            match planned.outcome {
                Planned::Skip(reason) => counts.record_skip(reason),
                Planned::Execute(statement) => {
                    if let Err(source) = tx.execute_batch(&statement) {
                        let err = ImportError::Execute {
                            index: planned.index,
                            schema: plan.active_schema().map(str::to_string),
                            statement,
                            source,
                        };
                        if let Err(e) = tx.rollback() {
                            eprintln!("Warning: rollback failed: {}", e);
                        }
                        return Err(err);
                    }
                    counts.record_executed();
                }
            }

            if let Some(ref pb) = self.progress {
                pb.set_position(plan.position() as u64);
            }
        }

        tx.commit()
            .map_err(|e| ImportError::database(&self.target, e))?;

        if let Some(ref pb) = self.progress {
            pb.finish_with_message("Import complete");
        }

        Ok(counts)
    }
}

/// Import a dump file into a new SQLite database at `output`.
///
/// The output is replaced only if every statement succeeds. With
/// `options.dry_run` the dump is loaded into an in-memory database and
/// nothing is written.
pub fn import_dump(dump: &Path, output: &Path, options: &ImportOptions) -> Result<ImportStats> {
    let start = Instant::now();

    let raw = read_dump(dump, &options.encoding)?;
    let sql = strip_comment_lines(&raw);
    drop(raw);

    let filter = options.schema_filter();
    let progress = if options.progress {
        Some(progress_bar(sql.len() as u64))
    } else {
        None
    };

    let (counts, written) = if options.dry_run {
        let conn = Connection::open_in_memory().map_err(|e| ImportError::database(IN_MEMORY, e))?;
        let counts = run_loader(&conn, &filter, IN_MEMORY, progress, &sql)?;
        (counts, None)
    } else {
        let target = TargetDatabase::create(output)?;
        let counts = run_loader(target.connection(), &filter, output, progress, &sql)?;
        (counts, Some(target.persist()?))
    };

    Ok(ImportStats {
        output: written,
        counts,
        schemas: filter.included(),
        duration_secs: start.elapsed().as_secs_f64(),
    })
}

fn run_loader(
    conn: &Connection,
    filter: &SchemaFilter,
    target: impl Into<PathBuf>,
    progress: Option<ProgressBar>,
    sql: &str,
) -> Result<StatementCounts> {
    let mut loader = Loader::new(conn, filter, target);
    if let Some(pb) = progress {
        loader = loader.with_progress(pb);
    }
    loader.load(sql)
}

fn progress_bar(len: u64) -> ProgressBar {
    let pb = ProgressBar::new(len);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {bytes}/{total_bytes} ({percent}%)")
            .unwrap()
            .progress_chars("=>-"),
    );
    pb
}

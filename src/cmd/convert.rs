//! Convert command CLI handler.
//!
//! Writes the SQLite script the import command would execute.

use dump2sqlite::config::ImportOptions;
use dump2sqlite::parser::strip_comment_lines;
use dump2sqlite::plan::{Planned, StatementCounts, StatementPlan};
use dump2sqlite::schema::SchemaFilter;
use dump2sqlite::source::read_dump;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;

pub fn run(
    dump: PathBuf,
    output: Option<PathBuf>,
    options: ImportOptions,
    verbose: bool,
) -> anyhow::Result<()> {
    if !dump.exists() {
        anyhow::bail!("input file does not exist: {}", dump.display());
    }

    let raw = read_dump(&dump, &options.encoding)?;
    let sql = strip_comment_lines(&raw);
    drop(raw);

    let writer: Box<dyn Write> = match output {
        Some(ref path) => Box::new(File::create(path).map_err(|e| {
            anyhow::anyhow!("failed to create {}: {}", path.display(), e)
        })?),
        None => Box::new(io::stdout().lock()),
    };
    let mut writer = BufWriter::with_capacity(256 * 1024, writer);

    let filter = options.schema_filter();
    let counts = write_script(&mut writer, &sql, &filter)?;
    writer.flush()?;

    if verbose {
        eprintln!();
        eprintln!("Conversion Statistics:");
        eprintln!("  Statements processed: {}", counts.total());
        eprintln!("  Statements written: {}", counts.executed);
        eprintln!("  Statements skipped: {}", counts.skipped);
        for (reason, count) in &counts.skip_reasons {
            eprintln!("    {}: {}", reason, count);
        }
    }

    Ok(())
}

fn write_script<W: Write>(
    out: &mut W,
    sql: &str,
    filter: &SchemaFilter,
) -> io::Result<StatementCounts> {
    let mut counts = StatementCounts::default();

    writeln!(out, "PRAGMA foreign_keys = OFF;")?;
    writeln!(out, "BEGIN TRANSACTION;")?;

    for planned in StatementPlan::new(sql, filter) {
        match planned.outcome {
            Planned::Execute(statement) => {
                writeln!(out, "{};", statement)?;
                counts.record_executed();
            }
            Planned::Skip(reason) => counts.record_skip(reason),
        }
    }

    writeln!(out, "COMMIT;")?;
    Ok(counts)
}

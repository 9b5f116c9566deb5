//! Import command CLI handler.

use dump2sqlite::config::ImportOptions;
use dump2sqlite::loader::{import_dump, ImportStats};
use dump2sqlite::source::Compression;
use std::path::{Path, PathBuf};

pub fn run(
    dump: PathBuf,
    sqlite: PathBuf,
    options: ImportOptions,
    json: bool,
    verbose: bool,
) -> anyhow::Result<()> {
    if !dump.exists() {
        anyhow::bail!("input file does not exist: {}", dump.display());
    }

    if !json {
        let file_size = std::fs::metadata(&dump)?.len();
        let compression = Compression::from_path(&dump);
        if compression != Compression::None {
            eprintln!("Detected compression: {}", compression);
        }
        eprintln!(
            "Importing SQL dump: {} ({:.2} MB) [encoding: {}]",
            dump.display(),
            file_size as f64 / (1024.0 * 1024.0),
            options.encoding
        );
    }

    let stats = import_dump(&dump, &sqlite, &options)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&stats)?);
        return Ok(());
    }

    print_summary(&stats, &sqlite, verbose);
    Ok(())
}

fn print_summary(stats: &ImportStats, sqlite: &Path, verbose: bool) {
    match stats.output {
        Some(ref path) => println!("Imported into: {}", path.display()),
        None => println!("Dry run, not written: {}", sqlite.display()),
    }
    println!("Executed statements: {}", stats.executed());
    println!("Skipped statements: {}", stats.skipped());
    if stats.schemas.is_empty() {
        println!("Included schemas: (all)");
    } else {
        println!("Included schemas: {}", stats.schemas.join(", "));
    }

    if verbose {
        eprintln!();
        eprintln!("Skipped by reason:");
        for (reason, count) in &stats.counts.skip_reasons {
            eprintln!("  {}: {}", reason, count);
        }
        eprintln!("Completed in {:.2}s", stats.duration_secs);
    }
}

mod convert;
mod import;

use clap::{Args, CommandFactory, Parser, Subcommand};
use clap_complete::{generate, Shell};
use dump2sqlite::config::{ImportOptions, ImportYamlConfig};
use std::io;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "dump2sqlite")]
#[command(version)]
#[command(about = "Convert MySQL/phpMyAdmin SQL dumps into SQLite databases", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

/// Schema selection and decoding options shared by import and convert
#[derive(Args, Debug, Clone)]
pub struct SourceArgs {
    /// Schema/database name to include (repeatable, default: chiamogna)
    #[arg(long = "schema", value_name = "NAME")]
    schemas: Vec<String>,

    /// Import every schema instead of an inclusion list
    #[arg(long, conflicts_with = "schemas")]
    all_schemas: bool,

    /// Also import system schemas (information_schema, mysql, performance_schema, sys)
    #[arg(long)]
    include_system_schemas: bool,

    /// Input dump encoding (default: latin1)
    #[arg(long)]
    encoding: Option<String>,

    /// YAML config file with schemas, include_system_schemas, encoding
    #[arg(short, long)]
    config: Option<PathBuf>,
}

impl SourceArgs {
    fn into_options(self) -> anyhow::Result<ImportOptions> {
        let file_config = match self.config {
            Some(ref path) => ImportYamlConfig::load(path).map_err(|e| {
                anyhow::anyhow!("failed to load config {}: {}", path.display(), e)
            })?,
            None => ImportYamlConfig::default(),
        };

        Ok(file_config.merge(
            self.schemas,
            self.all_schemas,
            self.include_system_schemas,
            self.encoding,
        ))
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Import a MySQL dump into a SQLite database
    Import {
        /// Input SQL dump (supports .gz, .bz2, .xz, .zst compression)
        dump: PathBuf,

        /// Output SQLite database (replaced on success)
        sqlite: PathBuf,

        #[command(flatten)]
        source: SourceArgs,

        /// Load into an in-memory database and write nothing
        #[arg(long)]
        dry_run: bool,

        /// Show progress during import
        #[arg(short, long)]
        progress: bool,

        /// Output statistics as JSON instead of human-readable text
        #[arg(long)]
        json: bool,

        /// Show skipped statements by reason
        #[arg(short, long)]
        verbose: bool,
    },

    /// Write the converted SQLite script without executing it
    Convert {
        /// Input SQL dump (supports .gz, .bz2, .xz, .zst compression)
        dump: PathBuf,

        /// Output SQL file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        #[command(flatten)]
        source: SourceArgs,

        /// Show conversion statistics on stderr
        #[arg(short, long)]
        verbose: bool,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

pub fn run(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Commands::Import {
            dump,
            sqlite,
            source,
            dry_run,
            progress,
            json,
            verbose,
        } => {
            let mut options = source.into_options()?;
            options.dry_run = dry_run;
            options.progress = progress && !json;
            import::run(dump, sqlite, options, json, verbose)
        }
        Commands::Convert {
            dump,
            output,
            source,
            verbose,
        } => convert::run(dump, output, source.into_options()?, verbose),
        Commands::Completions { shell } => {
            generate(
                shell,
                &mut Cli::command(),
                "dump2sqlite",
                &mut io::stdout(),
            );
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_is_well_formed() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_import_defaults() {
        let cli = Cli::try_parse_from(["dump2sqlite", "import", "in.sql", "out.sqlite3"]).unwrap();
        match cli.command {
            Commands::Import { source, .. } => {
                let options = source.into_options().unwrap();
                assert_eq!(options.schemas, Some(vec!["chiamogna".to_string()]));
                assert_eq!(options.encoding, "latin1");
            }
            _ => panic!("expected import"),
        }
    }

    #[test]
    fn test_repeatable_schema() {
        let cli = Cli::try_parse_from([
            "dump2sqlite",
            "import",
            "in.sql",
            "out.sqlite3",
            "--schema",
            "a",
            "--schema",
            "b",
            "--include-system-schemas",
        ])
        .unwrap();
        match cli.command {
            Commands::Import { source, .. } => {
                let options = source.into_options().unwrap();
                assert_eq!(options.schemas, Some(vec!["a".to_string(), "b".to_string()]));
                assert!(options.include_system_schemas);
            }
            _ => panic!("expected import"),
        }
    }

    #[test]
    fn test_all_schemas_conflicts_with_schema() {
        let result = Cli::try_parse_from([
            "dump2sqlite",
            "import",
            "in.sql",
            "out.sqlite3",
            "--schema",
            "a",
            "--all-schemas",
        ]);
        assert!(result.is_err());
    }
}

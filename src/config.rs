//! Import options and the optional YAML configuration file.

use crate::schema::SchemaFilter;
use crate::source::DEFAULT_ENCODING;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Schema imported when none is given.
pub const DEFAULT_SCHEMA: &str = "chiamogna";

/// Options for one import run.
#[derive(Debug, Clone)]
pub struct ImportOptions {
    /// Schemas to import; `None` imports every schema
    pub schemas: Option<Vec<String>>,
    /// Also import information_schema, mysql, performance_schema, sys
    pub include_system_schemas: bool,
    /// Text encoding of the dump
    pub encoding: String,
    /// Load into an in-memory database and write nothing
    pub dry_run: bool,
    /// Show a progress bar
    pub progress: bool,
}

impl Default for ImportOptions {
    fn default() -> Self {
        Self {
            schemas: Some(vec![DEFAULT_SCHEMA.to_string()]),
            include_system_schemas: false,
            encoding: DEFAULT_ENCODING.to_string(),
            dry_run: false,
            progress: false,
        }
    }
}

impl ImportOptions {
    pub fn schema_filter(&self) -> SchemaFilter {
        SchemaFilter::new(self.schemas.clone(), self.include_system_schemas)
    }
}

/// YAML configuration file. Every key is optional; command-line flags win.
///
/// ```yaml
/// schemas: [chiamogna, archive]
/// include_system_schemas: false
/// encoding: latin1
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ImportYamlConfig {
    pub schemas: Option<Vec<String>>,
    /// Import every schema (ignores `schemas`)
    pub all_schemas: Option<bool>,
    pub include_system_schemas: Option<bool>,
    pub encoding: Option<String>,
}

impl ImportYamlConfig {
    /// Load configuration from a YAML file
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = fs::read_to_string(path)?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> anyhow::Result<Self> {
        let config: ImportYamlConfig = serde_yaml_ng::from_str(content)?;
        Ok(config)
    }

    /// Combine with command-line values into import options.
    ///
    /// `cli_schemas` empty means "not given on the command line".
    pub fn merge(
        &self,
        cli_schemas: Vec<String>,
        cli_all_schemas: bool,
        cli_include_system: bool,
        cli_encoding: Option<String>,
    ) -> ImportOptions {
        let defaults = ImportOptions::default();

        let schemas = if cli_all_schemas {
            None
        } else if !cli_schemas.is_empty() {
            Some(cli_schemas)
        } else if self.all_schemas == Some(true) {
            None
        } else {
            self.schemas.clone().or(defaults.schemas)
        };

        ImportOptions {
            schemas,
            include_system_schemas: cli_include_system
                || self.include_system_schemas.unwrap_or(false),
            encoding: cli_encoding
                .or_else(|| self.encoding.clone())
                .unwrap_or(defaults.encoding),
            ..defaults
        }
    }
}

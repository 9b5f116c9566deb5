//! Schema context for a conversion run.
//!
//! This module provides:
//! - [`SchemaTracker`]: the active schema, as selected by `USE` statements
//! - [`SchemaFilter`]: inclusion set and system-schema exclusion

use crate::convert::SkipReason;
use crate::parser::extract_use_schema;
use ahash::AHashSet;

/// MySQL's own schemas, excluded unless explicitly requested.
pub const SYSTEM_SCHEMAS: [&str; 4] = ["information_schema", "mysql", "performance_schema", "sys"];

pub fn is_system_schema(name: &str) -> bool {
    SYSTEM_SCHEMAS.contains(&name)
}

/// Tracks the schema selected by the most recent `USE` statement.
#[derive(Debug, Default, Clone)]
pub struct SchemaTracker {
    active: Option<String>,
}

impl SchemaTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inspect a statement before conversion.
    ///
    /// Returns `true` when the statement was a `USE <schema>` and the
    /// active schema changed; the statement is then consumed.
    pub fn observe(&mut self, stmt: &str) -> bool {
        match extract_use_schema(stmt) {
            Some(name) => {
                self.active = Some(name.to_string());
                true
            }
            None => false,
        }
    }

    pub fn active(&self) -> Option<&str> {
        self.active.as_deref()
    }
}

/// Decides whether statements under the active schema are imported.
#[derive(Debug, Clone)]
pub struct SchemaFilter {
    /// `None` imports every schema
    include: Option<AHashSet<String>>,
    exclude_system: bool,
}

impl SchemaFilter {
    pub fn new<I, S>(include: Option<I>, include_system_schemas: bool) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            include: include.map(|names| names.into_iter().map(Into::into).collect()),
            exclude_system: !include_system_schemas,
        }
    }

    /// Filter that lets every schema through.
    pub fn allow_all() -> Self {
        Self {
            include: None,
            exclude_system: false,
        }
    }

    /// Skip reason for statements under `active`, or `None` to import them.
    ///
    /// Statements seen before any `USE` are always imported.
    pub fn check(&self, active: Option<&str>) -> Option<SkipReason> {
        let schema = active?;

        if let Some(ref include) = self.include {
            if !include.contains(schema) {
                return Some(SkipReason::Filtered);
            }
        }

        if self.exclude_system && is_system_schema(schema) {
            return Some(SkipReason::SystemSchema);
        }

        None
    }

    /// Included schema names, sorted. Empty when every schema is imported.
    pub fn included(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .include
            .as_ref()
            .map(|set| set.iter().cloned().collect())
            .unwrap_or_default();
        names.sort();
        names
    }
}

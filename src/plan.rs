//! Statement plan: the ordered outcome of every statement in a dump.
//!
//! Ties together splitting, schema tracking, conversion and schema
//! filtering. For each statement the schema tracker runs first, so a
//! `USE` is always applied before the filter decision of the statements
//! that follow it.

use crate::convert::{convert_statement, Conversion, SkipReason};
use crate::parser::StatementSplitter;
use crate::schema::{SchemaFilter, SchemaTracker};
use serde::Serialize;
use std::collections::BTreeMap;

/// Outcome for one statement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Planned {
    Execute(String),
    Skip(SkipReason),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedStatement {
    /// 1-based position in the split stream
    pub index: usize,
    pub outcome: Planned,
}

/// Iterator of planned statements over comment-stripped dump text.
pub struct StatementPlan<'a> {
    statements: StatementSplitter<'a>,
    tracker: SchemaTracker,
    filter: &'a SchemaFilter,
    index: usize,
}

impl<'a> StatementPlan<'a> {
    pub fn new(sql: &'a str, filter: &'a SchemaFilter) -> Self {
        Self {
            statements: StatementSplitter::new(sql),
            tracker: SchemaTracker::new(),
            filter,
            index: 0,
        }
    }

    /// Schema selected by the most recent `USE`.
    pub fn active_schema(&self) -> Option<&str> {
        self.tracker.active()
    }

    /// Bytes of input consumed so far.
    pub fn position(&self) -> usize {
        self.statements.position()
    }

    fn plan(&mut self, stmt: &str) -> Planned {
        if self.tracker.observe(stmt) {
            return Planned::Skip(SkipReason::SchemaSwitch);
        }

        match convert_statement(stmt) {
            Conversion::Skip(reason) => Planned::Skip(reason),
            // Malformed USE: still never reaches the database.
            Conversion::Use(_) => Planned::Skip(SkipReason::SchemaSwitch),
            Conversion::Execute(sql) => match self.filter.check(self.tracker.active()) {
                Some(reason) => Planned::Skip(reason),
                None => Planned::Execute(sql),
            },
        }
    }
}

impl Iterator for StatementPlan<'_> {
    type Item = PlannedStatement;

    fn next(&mut self) -> Option<PlannedStatement> {
        let stmt = self.statements.next()?;
        self.index += 1;
        let outcome = self.plan(stmt);
        Some(PlannedStatement {
            index: self.index,
            outcome,
        })
    }
}

/// Executed/skipped counters for a run.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
pub struct StatementCounts {
    pub executed: u64,
    pub skipped: u64,
    pub skip_reasons: BTreeMap<SkipReason, u64>,
}

impl StatementCounts {
    pub fn record_executed(&mut self) {
        self.executed += 1;
    }

    pub fn record_skip(&mut self, reason: SkipReason) {
        self.skipped += 1;
        *self.skip_reasons.entry(reason).or_insert(0) += 1;
    }

    /// Every statement produced by the splitter, executed or not.
    pub fn total(&self) -> u64 {
        self.executed + self.skipped
    }
}

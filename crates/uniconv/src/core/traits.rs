//! Core traits for engine-agnostic row copying.
//!
//! - [`Dialect`]: literal quoting and parameter placeholders for an engine
//! - [`SourceReader`]: runs SELECT statements and materializes rows
//! - [`TargetWriter`]: runs INSERT/UPDATE/DELETE statements
//!
//! The pipeline only talks to these traits, so tests drive it with
//! in-memory implementations and the dry-run mode swaps the target
//! connection for a writer that prints statements.

use async_trait::async_trait;

use crate::error::Result;
use crate::statement::Statement;

use super::value::{Row, SqlValue};

/// SQL syntax strategy for a database engine.
pub trait Dialect: Send + Sync {
    /// Engine name ("mysql", "sqlite").
    fn name(&self) -> &str;

    /// Render a value as an SQL literal, escaped per the engine's rules.
    fn quote_literal(&self, value: &SqlValue) -> String;

    /// Placeholder for the `index`-th bound parameter (1-based).
    fn param_placeholder(&self, index: usize) -> String;
}

/// Read rows from a source database.
#[async_trait]
pub trait SourceReader: Send {
    /// Run a statement and return the whole result set.
    async fn fetch(&mut self, stmt: &Statement) -> Result<Vec<Row>>;
}

/// Write rows to a target database.
#[async_trait]
pub trait TargetWriter: Send {
    /// Run a statement, returning the number of affected rows.
    ///
    /// Callers skip no-op statements; implementations return `Ok(0)` if they
    /// receive one anyway.
    async fn write(&mut self, stmt: &Statement) -> Result<u64>;
}

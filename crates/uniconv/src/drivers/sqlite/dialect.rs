//! SQLite SQL dialect (Strategy pattern).

use crate::core::{Dialect, SqlValue};
use crate::drivers::common::quote_literal_with;

/// SQLite dialect implementation.
///
/// SQLite has no backslash escapes; a single quote is escaped by doubling it.
#[derive(Debug, Clone, Copy, Default)]
pub struct SqliteDialect;

impl SqliteDialect {
    /// Create a new SQLite dialect instance.
    pub fn new() -> Self {
        Self
    }
}

impl Dialect for SqliteDialect {
    fn name(&self) -> &str {
        "sqlite"
    }

    fn quote_literal(&self, value: &SqlValue) -> String {
        quote_literal_with(value, |s| format!("'{}'", s.replace('\'', "''")))
    }

    fn param_placeholder(&self, _index: usize) -> String {
        "?".to_string()
    }
}

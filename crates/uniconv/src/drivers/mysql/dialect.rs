//! MySQL/MariaDB SQL dialect (Strategy pattern).
//!
//! Provides MySQL-specific literal quoting and parameter placeholders.

use crate::core::{Dialect, SqlValue};
use crate::drivers::common::quote_literal_with;

/// MySQL/MariaDB dialect implementation.
///
/// String literals are escaped the way `mysql_real_escape_string` does, so
/// rendered statements are valid with the default `sql_mode` (backslash
/// escapes enabled).
#[derive(Debug, Clone, Copy, Default)]
pub struct MysqlDialect;

impl MysqlDialect {
    /// Create a new MySQL dialect instance.
    pub fn new() -> Self {
        Self
    }
}

impl Dialect for MysqlDialect {
    fn name(&self) -> &str {
        "mysql"
    }

    fn quote_literal(&self, value: &SqlValue) -> String {
        quote_literal_with(value, escape_string)
    }

    fn param_placeholder(&self, _index: usize) -> String {
        "?".to_string()
    }
}

fn escape_string(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('\'');
    for c in s.chars() {
        match c {
            '\0' => out.push_str("\\0"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\\' => out.push_str("\\\\"),
            '\'' => out.push_str("\\'"),
            '"' => out.push_str("\\\""),
            '\x1a' => out.push_str("\\Z"),
            c => out.push(c),
        }
    }
    out.push('\'');
    out
}

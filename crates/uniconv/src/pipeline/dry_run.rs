//! Target writer that prints statements instead of executing them.

use std::io::Write;

use async_trait::async_trait;

use crate::core::TargetWriter;
use crate::drivers::DialectImpl;
use crate::error::Result;
use crate::statement::Statement;

/// Writes every statement as SQL text, one per line, terminated by `;`.
///
/// Values are inlined with the target dialect so the output can be replayed
/// against the target database.
pub struct DryRunWriter<W> {
    out: W,
    dialect: DialectImpl,
    statements: u64,
}

impl<W: Write + Send> DryRunWriter<W> {
    pub fn new(out: W, dialect: DialectImpl) -> Self {
        Self {
            out,
            dialect,
            statements: 0,
        }
    }

    /// Number of statements printed so far.
    pub fn statements(&self) -> u64 {
        self.statements
    }
}

#[async_trait]
impl<W: Write + Send> TargetWriter for DryRunWriter<W> {
    async fn write(&mut self, stmt: &Statement) -> Result<u64> {
        if stmt.is_noop() {
            return Ok(0);
        }
        writeln!(self.out, "{};", stmt.render(&self.dialect))?;
        self.statements += 1;
        Ok(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::drivers::{MysqlDialect, SqliteDialect};
    use crate::statement::InsertDraft;

    #[tokio::test]
    async fn test_prints_rendered_statements() {
        let mut out = Vec::new();
        let mut writer = DryRunWriter::new(&mut out, DialectImpl::Mysql(MysqlDialect::new()));
        let insert = Statement::from(InsertDraft::new("users").value("id", 1i64).value("name", "O'Hara"));
        assert_eq!(writer.write(&insert).await.unwrap(), 1);
        assert_eq!(writer.write(&InsertDraft::new("users").into()).await.unwrap(), 0);

        assert_eq!(writer.statements(), 1);
        drop(writer);
        assert_eq!(String::from_utf8(out).unwrap(), "INSERT INTO users (id,name) VALUES (1,'O\\'Hara');\n");
    }

    #[tokio::test]
    async fn test_uses_target_dialect() {
        let mut out = Vec::new();
        let mut writer = DryRunWriter::new(&mut out, DialectImpl::Sqlite(SqliteDialect::new()));
        let insert = Statement::from(InsertDraft::new("t").value("s", "it's"));
        writer.write(&insert).await.unwrap();
        drop(writer);
        assert_eq!(String::from_utf8(out).unwrap(), "INSERT INTO t (s) VALUES ('it''s');\n");
    }
}

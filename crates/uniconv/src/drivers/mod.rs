//! Database driver implementations.
//!
//! - [`mysql`]: MySQL/MariaDB driver
//! - [`sqlite`]: SQLite driver
//! - [`common`]: Shared literal rendering
//!
//! # Static dispatch
//!
//! [`DialectImpl`] and [`Connection`] are enums with one variant per engine.
//! Each forwards to the engine module with a `match`, so the pipeline works
//! with any engine without boxing.
//!
//! # Adding New Databases
//!
//! 1. Create a module under `drivers/` with a dialect and a connection type
//! 2. Add a [`DbKind`] variant and its `type` spelling
//! 3. Add variants to [`DialectImpl`] and [`Connection`]

pub mod common;
pub mod mysql;
pub mod sqlite;

pub use mysql::{MysqlConnection, MysqlDialect};
pub use sqlite::{SqliteConnection, SqliteDialect};

use async_trait::async_trait;
use tracing::debug;

use crate::config::{DatabaseConfig, DbKind};
use crate::core::{Dialect, Row, SourceReader, SqlValue, TargetWriter};
use crate::error::{Result, UniconvError};
use crate::statement::{BoundStatement, Statement};

/// Enum-based static dispatch for dialects.
#[derive(Debug, Clone, Copy)]
pub enum DialectImpl {
    Mysql(MysqlDialect),
    Sqlite(SqliteDialect),
}

impl Dialect for DialectImpl {
    fn name(&self) -> &str {
        match self {
            DialectImpl::Mysql(d) => d.name(),
            DialectImpl::Sqlite(d) => d.name(),
        }
    }

    fn quote_literal(&self, value: &SqlValue) -> String {
        match self {
            DialectImpl::Mysql(d) => d.quote_literal(value),
            DialectImpl::Sqlite(d) => d.quote_literal(value),
        }
    }

    fn param_placeholder(&self, index: usize) -> String {
        match self {
            DialectImpl::Mysql(d) => d.param_placeholder(index),
            DialectImpl::Sqlite(d) => d.param_placeholder(index),
        }
    }
}

impl DialectImpl {
    /// Dialect for an engine kind.
    pub fn for_kind(kind: DbKind) -> Self {
        match kind {
            DbKind::Mysql => DialectImpl::Mysql(MysqlDialect::new()),
            DbKind::Sqlite => DialectImpl::Sqlite(SqliteDialect::new()),
        }
    }

    /// Create a dialect implementation from a database type string.
    ///
    /// # Errors
    ///
    /// Returns an error if the database type is not recognized.
    pub fn from_db_type(db_type: &str) -> Result<Self> {
        DbKind::parse(db_type).map(Self::for_kind).ok_or_else(|| {
            UniconvError::Config(format!(
                "Unknown database type: '{}'. Supported types: mysql, sqlite",
                db_type
            ))
        })
    }
}

/// A live connection to one of the supported engines.
///
/// Every variant returns rows as [`Row`] maps and executes
/// [`Statement`]s compiled with its own dialect.
pub enum Connection {
    Mysql(MysqlConnection),
    Sqlite(SqliteConnection),
}

impl Connection {
    /// Open a connection for a descriptor.
    ///
    /// # Errors
    ///
    /// [`UniconvError::Connection`] when the type is unknown or the engine
    /// rejects the location or credentials.
    pub async fn open(config: &DatabaseConfig) -> Result<Self> {
        match config.kind() {
            Some(DbKind::Mysql) => Ok(Connection::Mysql(MysqlConnection::connect(config).await?)),
            Some(DbKind::Sqlite) => Ok(Connection::Sqlite(SqliteConnection::connect(config).await?)),
            None => Err(UniconvError::connection(
                format!("unknown database type '{}'", config.r#type),
                format!("opening {}", config.describe()),
            )),
        }
    }

    /// Open a connection without creating anything on disk.
    ///
    /// Same as [`Connection::open`] except that a missing SQLite file is a
    /// connection error.
    pub async fn open_existing(config: &DatabaseConfig) -> Result<Self> {
        match config.kind() {
            Some(DbKind::Sqlite) => Ok(Connection::Sqlite(
                SqliteConnection::connect_existing(config).await?,
            )),
            _ => Self::open(config).await,
        }
    }

    pub fn dialect(&self) -> DialectImpl {
        match self {
            Connection::Mysql(c) => DialectImpl::Mysql(c.dialect()),
            Connection::Sqlite(c) => DialectImpl::Sqlite(c.dialect()),
        }
    }

    pub async fn fetch_all(&mut self, stmt: &BoundStatement) -> Result<Vec<Row>> {
        match self {
            Connection::Mysql(c) => c.fetch_all(stmt).await,
            Connection::Sqlite(c) => c.fetch_all(stmt).await,
        }
    }

    pub async fn execute(&mut self, stmt: &BoundStatement) -> Result<u64> {
        match self {
            Connection::Mysql(c) => c.execute(stmt).await,
            Connection::Sqlite(c) => c.execute(stmt).await,
        }
    }

    pub async fn execute_script(&mut self, sql: &str) -> Result<()> {
        match self {
            Connection::Mysql(c) => c.execute_script(sql).await,
            Connection::Sqlite(c) => c.execute_script(sql).await,
        }
    }

    pub async fn ping(&mut self) -> Result<()> {
        match self {
            Connection::Mysql(c) => c.ping().await,
            Connection::Sqlite(c) => c.ping().await,
        }
    }

    pub async fn close(self) -> Result<()> {
        match self {
            Connection::Mysql(c) => c.close().await,
            Connection::Sqlite(c) => c.close().await,
        }
    }
}

#[async_trait]
impl SourceReader for Connection {
    async fn fetch(&mut self, stmt: &Statement) -> Result<Vec<Row>> {
        let Some(bound) = stmt.compile(&self.dialect()) else {
            debug!("Skipping no-op {} on {}", stmt.kind(), stmt.table());
            return Ok(Vec::new());
        };
        self.fetch_all(&bound).await
    }
}

#[async_trait]
impl TargetWriter for Connection {
    async fn write(&mut self, stmt: &Statement) -> Result<u64> {
        let Some(bound) = stmt.compile(&self.dialect()) else {
            debug!("Skipping no-op {} on {}", stmt.kind(), stmt.table());
            return Ok(0);
        };
        self.execute(&bound).await
    }
}

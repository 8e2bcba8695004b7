//! MySQL/MariaDB connection.
//!
//! One sqlx connection, used sequentially by a single owner. Rows are
//! decoded into [`Row`] maps by column type name.

use sqlx::mysql::{MySqlArguments, MySqlConnectOptions, MySqlSslMode};
use sqlx::query::Query;
use sqlx::{ConnectOptions, Connection, MySql};
use tracing::{debug, info};

use crate::config::DatabaseConfig;
use crate::core::{Row, SqlValue};
use crate::error::{Result, UniconvError};
use crate::statement::BoundStatement;

use super::decode::decode_row;
use super::MysqlDialect;

/// A live MySQL connection.
pub struct MysqlConnection {
    conn: sqlx::MySqlConnection,
    dialect: MysqlDialect,
}

impl MysqlConnection {
    /// Connect using a `mysql` descriptor: `location` is the host name.
    pub async fn connect(config: &DatabaseConfig) -> Result<Self> {
        let context = format!("connecting to {}", config.describe());

        let mut options = MySqlConnectOptions::new()
            .host(&config.location)
            .port(config.port)
            .ssl_mode(MySqlSslMode::Preferred)
            .charset("utf8mb4");
        if let Some(database) = &config.database {
            options = options.database(database);
        }
        if let Some(user) = &config.user {
            options = options.username(user);
        }
        if let Some(password) = &config.password {
            options = options.password(password);
        }
        let options = options.disable_statement_logging();

        let mut conn = options
            .connect()
            .await
            .map_err(|e| UniconvError::connection(e, context.clone()))?;

        // Test connection
        sqlx::query("SELECT 1")
            .execute(&mut conn)
            .await
            .map_err(|e| UniconvError::connection(e, context))?;

        info!("Connected to {}", config.describe());

        Ok(Self {
            conn,
            dialect: MysqlDialect::new(),
        })
    }

    pub fn dialect(&self) -> MysqlDialect {
        self.dialect
    }

    /// Run a query and decode the full result set.
    pub async fn fetch_all(&mut self, stmt: &BoundStatement) -> Result<Vec<Row>> {
        debug!("Fetching: {}", stmt.sql);
        let rows = bind_params(sqlx::query(&stmt.sql), &stmt.params)
            .fetch_all(&mut self.conn)
            .await?;
        rows.iter().map(decode_row).collect()
    }

    /// Run a statement, returning the number of affected rows.
    pub async fn execute(&mut self, stmt: &BoundStatement) -> Result<u64> {
        debug!("Executing: {}", stmt.sql);
        let result = bind_params(sqlx::query(&stmt.sql), &stmt.params)
            .execute(&mut self.conn)
            .await?;
        Ok(result.rows_affected())
    }

    /// Run unparameterized SQL, possibly several statements.
    pub async fn execute_script(&mut self, sql: &str) -> Result<()> {
        sqlx::raw_sql(sql).execute(&mut self.conn).await?;
        Ok(())
    }

    pub async fn ping(&mut self) -> Result<()> {
        self.conn.ping().await?;
        Ok(())
    }

    pub async fn close(self) -> Result<()> {
        self.conn.close().await?;
        Ok(())
    }
}

fn bind_params<'q>(
    mut query: Query<'q, MySql, MySqlArguments>,
    params: &'q [SqlValue],
) -> Query<'q, MySql, MySqlArguments> {
    for param in params {
        query = match param {
            SqlValue::Null => query.bind(None::<String>),
            SqlValue::Bool(v) => query.bind(*v),
            SqlValue::Int(v) => query.bind(*v),
            SqlValue::Float(v) => query.bind(*v),
            SqlValue::Decimal(v) => query.bind(*v),
            SqlValue::Text(v) => query.bind(v.as_str()),
            SqlValue::Bytes(v) => query.bind(v.as_slice()),
            SqlValue::DateTime(v) => query.bind(*v),
            SqlValue::Date(v) => query.bind(*v),
            SqlValue::Time(v) => query.bind(*v),
        };
    }
    query
}

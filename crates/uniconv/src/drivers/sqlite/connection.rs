//! SQLite connection.
//!
//! SQLite columns have no fixed type, so values are decoded by the storage
//! class of each individual value rather than by the declared column type.

use sqlx::query::Query;
use sqlx::sqlite::{SqliteArguments, SqliteConnectOptions, SqliteRow};
use sqlx::{Column, ConnectOptions, Connection, Row as _, Sqlite, TypeInfo, ValueRef};
use tracing::{debug, info};

use crate::config::DatabaseConfig;
use crate::core::{Row, SqlValue};
use crate::error::{Result, UniconvError};
use crate::statement::BoundStatement;

use super::SqliteDialect;

/// Location that opens a private in-memory database.
pub const MEMORY_LOCATION: &str = ":memory:";

/// A live SQLite connection.
pub struct SqliteConnection {
    conn: sqlx::SqliteConnection,
    dialect: SqliteDialect,
}

impl SqliteConnection {
    /// Open a `sqlite` descriptor: `location` is the database file, created
    /// if it does not exist.
    pub async fn connect(config: &DatabaseConfig) -> Result<Self> {
        Self::connect_with(config, true).await
    }

    /// Open a `sqlite` descriptor whose file must already exist.
    pub async fn connect_existing(config: &DatabaseConfig) -> Result<Self> {
        Self::connect_with(config, false).await
    }

    async fn connect_with(config: &DatabaseConfig, create_if_missing: bool) -> Result<Self> {
        let options = if config.location == MEMORY_LOCATION {
            SqliteConnectOptions::new().in_memory(true)
        } else {
            SqliteConnectOptions::new()
                .filename(&config.location)
                .create_if_missing(create_if_missing)
        };
        let options = options.disable_statement_logging();

        let conn = options
            .connect()
            .await
            .map_err(|e| UniconvError::connection(e, format!("opening {}", config.describe())))?;

        info!("Opened {}", config.describe());

        Ok(Self {
            conn,
            dialect: SqliteDialect::new(),
        })
    }

    pub fn dialect(&self) -> SqliteDialect {
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
    mut query: Query<'q, Sqlite, SqliteArguments<'q>>,
    params: &'q [SqlValue],
) -> Query<'q, Sqlite, SqliteArguments<'q>> {
    for param in params {
        query = match param {
            SqlValue::Null => query.bind(None::<String>),
            SqlValue::Bool(v) => query.bind(*v),
            SqlValue::Int(v) => query.bind(*v),
            SqlValue::Float(v) => query.bind(*v),
            // SQLite has no decimal type; text keeps the exact digits
            SqlValue::Decimal(v) => query.bind(v.to_string()),
            SqlValue::Text(v) => query.bind(v.as_str()),
            SqlValue::Bytes(v) => query.bind(v.as_slice()),
            SqlValue::DateTime(v) => query.bind(*v),
            SqlValue::Date(v) => query.bind(*v),
            SqlValue::Time(v) => query.bind(*v),
        };
    }
    query
}

fn decode_row(row: &SqliteRow) -> Result<Row> {
    let mut out = Row::with_capacity(row.len());
    for (i, column) in row.columns().iter().enumerate() {
        out.insert(column.name().to_string(), decode_value(row, i)?);
    }
    Ok(out)
}

fn decode_value(row: &SqliteRow, i: usize) -> Result<SqlValue> {
    let storage_class = {
        let raw = row.try_get_raw(i)?;
        if raw.is_null() {
            return Ok(SqlValue::Null);
        }
        raw.type_info().name().to_string()
    };

    let value = match storage_class.as_str() {
        "INTEGER" => SqlValue::Int(row.try_get_unchecked(i)?),
        "REAL" => SqlValue::Float(row.try_get_unchecked(i)?),
        "BLOB" => SqlValue::Bytes(row.try_get_unchecked(i)?),
        _ => SqlValue::Text(row.try_get_unchecked(i)?),
    };

    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::statement::{InsertDraft, SelectDraft, Statement};

    fn memory_config() -> DatabaseConfig {
        DatabaseConfig {
            r#type: "sqlite".to_string(),
            location: MEMORY_LOCATION.to_string(),
            port: 3306,
            database: None,
            user: None,
            password: None,
        }
    }

    #[tokio::test]
    async fn test_values_round_trip_through_parameters() {
        let mut conn = SqliteConnection::connect(&memory_config()).await.unwrap();
        conn.execute_script("CREATE TABLE t (i INTEGER, r REAL, s TEXT, b BLOB, n TEXT)")
            .await
            .unwrap();

        let insert = Statement::from(
            InsertDraft::new("t")
                .value("i", 42i64)
                .value("r", 2.5f64)
                .value("s", "it's")
                .value("b", vec![1u8, 2, 3])
                .value("n", SqlValue::Null),
        );
        let bound = insert.compile(&conn.dialect()).unwrap();
        assert_eq!(conn.execute(&bound).await.unwrap(), 1);

        let select = Statement::from(SelectDraft::new("t"));
        let rows = conn
            .fetch_all(&select.compile(&conn.dialect()).unwrap())
            .await
            .unwrap();
        assert_eq!(rows.len(), 1);

        let row = &rows[0];
        let columns: Vec<_> = row.keys().map(String::as_str).collect();
        assert_eq!(columns, ["i", "r", "s", "b", "n"]);
        assert_eq!(row["i"], SqlValue::Int(42));
        assert_eq!(row["r"], SqlValue::Float(2.5));
        assert_eq!(row["s"], SqlValue::from("it's"));
        assert_eq!(row["b"], SqlValue::Bytes(vec![1, 2, 3]));
        assert_eq!(row["n"], SqlValue::Null);
    }

    #[tokio::test]
    async fn test_filtered_select_binds_value() {
        let mut conn = SqliteConnection::connect(&memory_config()).await.unwrap();
        conn.execute_script(
            "CREATE TABLE users (id INTEGER, status TEXT);
             INSERT INTO users VALUES (1, 'active'), (2, 'gone'), (3, 'active');",
        )
        .await
        .unwrap();

        let select = Statement::from(
            SelectDraft::new("users")
                .filter_value("status = ?", "active")
                .order_by("id", crate::statement::SortDirection::Asc),
        );
        let rows = conn
            .fetch_all(&select.compile(&conn.dialect()).unwrap())
            .await
            .unwrap();
        let ids: Vec<_> = rows.iter().map(|r| r["id"].clone()).collect();
        assert_eq!(ids, [SqlValue::Int(1), SqlValue::Int(3)]);
    }

    #[tokio::test]
    async fn test_ping() {
        let mut conn = SqliteConnection::connect(&memory_config()).await.unwrap();
        conn.ping().await.unwrap();
        conn.close().await.unwrap();
    }
}

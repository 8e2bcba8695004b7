//! Configuration type definitions.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Root configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Settings and database connections.
    pub config: GeneralConfig,

    /// Entity conversions, in declaration order.
    #[serde(default)]
    pub conversions: IndexMap<String, EntityConfig>,
}

/// The `config` section: run settings and both connections.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Run settings.
    #[serde(default)]
    pub settings: Settings,

    /// Source and target database descriptors.
    pub databases: Databases,
}

/// Source and target database descriptors.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Databases {
    pub source: DatabaseConfig,
    pub target: DatabaseConfig,
}

/// Run settings.
///
/// `pass_size` and `ignore_errors` are accepted for compatibility with
/// existing configuration files but do not change how a run behaves.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Settings {
    /// Rows per pass. Parsed but unused: every entity is read in one pass.
    #[serde(default)]
    pub pass_size: i64,

    /// Parsed but inert: statement errors always abort the run.
    #[serde(default)]
    pub ignore_errors: i64,

    /// Non-zero to write logs to `uniconv.log`.
    #[serde(default)]
    pub log_file: i64,

    /// Zone used when formatting epoch timestamps (default: local).
    #[serde(default)]
    pub timezone: TimeZoneSetting,
}

impl Settings {
    pub fn ignore_errors(&self) -> bool {
        self.ignore_errors != 0
    }

    pub fn log_to_file(&self) -> bool {
        self.log_file != 0
    }
}

/// Time zone for datetime conversions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeZoneSetting {
    /// The system's local time zone.
    #[default]
    Local,

    /// Coordinated Universal Time.
    Utc,
}

/// Supported database engines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DbKind {
    /// Networked MySQL/MariaDB server.
    Mysql,

    /// Local SQLite database file.
    Sqlite,
}

impl DbKind {
    /// Parse a configuration `type` string.
    pub fn parse(db_type: &str) -> Option<Self> {
        match db_type.to_lowercase().as_str() {
            "mysql" | "mariadb" => Some(DbKind::Mysql),
            "sqlite" | "sqlite3" => Some(DbKind::Sqlite),
            _ => None,
        }
    }
}

impl fmt::Display for DbKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DbKind::Mysql => f.write_str("mysql"),
            DbKind::Sqlite => f.write_str("sqlite"),
        }
    }
}

/// A database connection descriptor.
#[derive(Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// Database type: "mysql" or "sqlite".
    pub r#type: String,

    /// Host name for MySQL, file path for SQLite.
    pub location: String,

    /// Server port (MySQL only, default: 3306).
    #[serde(default = "default_mysql_port")]
    pub port: u16,

    /// Database name (MySQL only).
    #[serde(default)]
    pub database: Option<String>,

    /// Username (MySQL only).
    #[serde(default)]
    pub user: Option<String>,

    /// Password (MySQL only).
    #[serde(default)]
    pub password: Option<String>,
}

impl DatabaseConfig {
    /// The engine kind, if the type string is recognized.
    pub fn kind(&self) -> Option<DbKind> {
        DbKind::parse(&self.r#type)
    }

    /// Human readable location used in logs and error context.
    pub fn describe(&self) -> String {
        match self.kind() {
            Some(kind @ DbKind::Mysql) => format!(
                "{} at {}:{}/{}",
                kind,
                self.location,
                self.port,
                self.database.as_deref().unwrap_or("")
            ),
            Some(kind @ DbKind::Sqlite) => format!("{} at {}", kind, self.location),
            None => format!("{} at {}", self.r#type, self.location),
        }
    }
}

impl fmt::Debug for DatabaseConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DatabaseConfig")
            .field("type", &self.r#type)
            .field("location", &self.location)
            .field("port", &self.port)
            .field("database", &self.database)
            .field("user", &self.user)
            .field("password", &self.password.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

/// One entity conversion as written in the configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntityConfig {
    /// Source/target tables and the optional filter.
    pub tables: TablesConfig,

    /// Field mappings, in target column order.
    #[serde(default)]
    pub fields: Vec<FieldConfig>,
}

/// Table names and filter of an entity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TablesConfig {
    /// Table to read from.
    pub source: String,

    /// Table to insert into.
    pub target: String,

    /// Filter tokens, e.g. `"status = active"` or `"updated_at > created_at"`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub r#where: Option<String>,

    /// How to read `where`: "value" or "fields".
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wheretype: Option<String>,
}

/// One field mapping as written in the configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldConfig {
    /// Column read from the source row.
    pub source: String,

    /// Column written in the target table.
    pub target: String,

    /// Optional converter name, e.g. "timestamp_to_datetime".
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub convert: Option<String>,
}

fn default_mysql_port() -> u16 {
    3306
}

//! MySQL/MariaDB database driver.
//!
//! - [`MysqlDialect`]: literal quoting and placeholders
//! - [`MysqlConnection`]: single sqlx connection used as source or target
//!
//! # Descriptor
//!
//! ```json
//! { "type": "mysql", "location": "db.internal", "port": 3306,
//!   "database": "legacy", "user": "app", "password": "..." }
//! ```
//!
//! TLS is used when the server offers it.

mod connection;
mod decode;
mod dialect;

pub use connection::MysqlConnection;
pub use dialect::MysqlDialect;

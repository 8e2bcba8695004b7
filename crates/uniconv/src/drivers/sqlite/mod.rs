//! SQLite database driver.
//!
//! - [`SqliteDialect`]: literal quoting and placeholders
//! - [`SqliteConnection`]: single sqlx connection to a database file
//!
//! # Descriptor
//!
//! ```json
//! { "type": "sqlite", "location": "/var/lib/app/data.db" }
//! ```
//!
//! `":memory:"` opens a private in-memory database.

mod connection;
mod dialect;

pub use connection::{SqliteConnection, MEMORY_LOCATION};
pub use dialect::SqliteDialect;

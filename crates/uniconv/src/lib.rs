//! # uniconv
//!
//! Configuration-driven row copier between relational databases.
//!
//! A configuration names a source and a target database and an ordered list
//! of entity conversions. Each entity is read from its source table, every
//! row is remapped field by field (optionally through a value converter) and
//! inserted into the target table, one statement per row.
//!
//! - **MySQL/MariaDB and SQLite** on either side
//! - **Field renaming** with `identity` and `timestamp_to_datetime` converters
//! - **Source filters** as bound values or raw column comparisons
//! - **Dry runs** that print the statements instead of executing them
//!
//! ## Example
//!
//! ```rust,no_run
//! use uniconv::{Config, NoopProgress, Orchestrator};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> uniconv::Result<()> {
//!     let config = Config::load("config.json")?;
//!     let orchestrator = Orchestrator::new(config)?;
//!     let result = orchestrator.run(&NoopProgress).await?;
//!     println!("Copied {} rows", result.rows_transferred);
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod convert;
pub mod core;
pub mod drivers;
pub mod error;
pub mod orchestrator;
pub mod pipeline;
pub mod statement;

// Re-exports for convenient access
pub use config::{Config, DatabaseConfig, DbKind, Settings, TimeZoneSetting};
pub use convert::ValueConverter;
pub use core::{Dialect, Row, SourceReader, SqlValue, TargetWriter};
pub use drivers::{Connection, DialectImpl};
pub use error::{Result, UniconvError};
pub use orchestrator::{HealthCheckResult, Orchestrator, RunResult};
pub use pipeline::{
    ConversionPipeline, ConvertOptions, DryRunWriter, EntityPlan, EntitySummary, FieldMapping,
    NoopProgress, ProgressSink, WhereSpec,
};
pub use statement::{
    BoundStatement, Condition, DeleteDraft, InsertDraft, SelectDraft, SortDirection, Statement,
    UpdateDraft,
};

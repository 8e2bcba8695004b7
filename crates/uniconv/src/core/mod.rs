//! Core abstractions shared by the drivers and the pipeline.
//!
//! - [`value`]: owned SQL values and the [`Row`] map every connection returns
//! - [`traits`]: dialect, reader and writer traits
//!
//! Driver modules (`drivers/mysql`, `drivers/sqlite`) implement the traits;
//! the pipeline depends only on this module.

pub mod traits;
pub mod value;

pub use traits::{Dialect, SourceReader, TargetWriter};
pub use value::{Row, SqlValue};

//! Common utilities shared across database drivers.
//!
//! - [`literal`]: value-to-literal rendering shared by the dialects

pub mod literal;

pub use literal::{hex_literal, quote_literal_with};

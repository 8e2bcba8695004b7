//! SQL literal rendering.
//!
//! Dialects only differ in how string literals are escaped, so they pass
//! their string quoting function and share the rest.

use std::fmt::Write;

use crate::core::SqlValue;

/// Render `value` as a literal, quoting character data with `quote_text`.
pub fn quote_literal_with(value: &SqlValue, quote_text: impl Fn(&str) -> String) -> String {
    match value {
        SqlValue::Null => "NULL".to_string(),
        SqlValue::Bool(true) => "1".to_string(),
        SqlValue::Bool(false) => "0".to_string(),
        SqlValue::Int(v) => v.to_string(),
        SqlValue::Float(v) if v.is_finite() => v.to_string(),
        // NaN and infinities have no SQL literal
        SqlValue::Float(_) => "NULL".to_string(),
        SqlValue::Decimal(v) => v.to_string(),
        SqlValue::Text(v) => quote_text(v),
        SqlValue::Bytes(v) => hex_literal(v),
        SqlValue::DateTime(v) => quote_text(&v.format("%Y-%m-%d %H:%M:%S%.f").to_string()),
        SqlValue::Date(v) => quote_text(&v.format("%Y-%m-%d").to_string()),
        SqlValue::Time(v) => quote_text(&v.format("%H:%M:%S%.f").to_string()),
    }
}

/// `X'..'` blob literal, understood by both MySQL and SQLite.
pub fn hex_literal(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(bytes.len() * 2 + 3);
    out.push_str("X'");
    for b in bytes {
        let _ = write!(out, "{:02X}", b);
    }
    out.push('\'');
    out
}

//! MySQL row decoding.
//!
//! Columns are mapped to a [`ColumnKind`] by type name. Temporal values
//! that chrono cannot represent (zero dates, `TIME` outside a single day)
//! are rebuilt from the binary protocol bytes and copied as text.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use sqlx::mysql::{MySqlRow, MySqlValueFormat};
use sqlx::{Column, Row as _, TypeInfo, ValueRef};

use crate::core::{Row, SqlValue};
use crate::error::Result;

/// How a MySQL column is read into a [`SqlValue`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ColumnKind {
    Null,
    Signed,
    Unsigned,
    Float,
    Double,
    Decimal,
    DateTime,
    Date,
    Time,
    Binary,
    Text,
}

impl ColumnKind {
    /// `TINYINT(1)` is reported as `BOOLEAN` but may hold any tinyint, so it
    /// is read as an integer.
    pub(crate) fn from_type_name(type_name: &str) -> Self {
        match type_name {
            "NULL" => ColumnKind::Null,
            "BOOLEAN" | "TINYINT" | "SMALLINT" | "MEDIUMINT" | "INT" | "BIGINT" => {
                ColumnKind::Signed
            }
            "TINYINT UNSIGNED" | "SMALLINT UNSIGNED" | "MEDIUMINT UNSIGNED" | "INT UNSIGNED"
            | "BIGINT UNSIGNED" | "YEAR" => ColumnKind::Unsigned,
            "FLOAT" => ColumnKind::Float,
            "DOUBLE" => ColumnKind::Double,
            "DECIMAL" => ColumnKind::Decimal,
            "DATETIME" | "TIMESTAMP" => ColumnKind::DateTime,
            "DATE" => ColumnKind::Date,
            "TIME" => ColumnKind::Time,
            "BINARY" | "VARBINARY" | "TINYBLOB" | "BLOB" | "MEDIUMBLOB" | "LONGBLOB" | "BIT"
            | "GEOMETRY" => ColumnKind::Binary,
            // CHAR, VARCHAR, *TEXT, ENUM, SET, JSON
            _ => ColumnKind::Text,
        }
    }
}

pub(crate) fn decode_row(row: &MySqlRow) -> Result<Row> {
    let mut out = Row::with_capacity(row.len());
    for (i, column) in row.columns().iter().enumerate() {
        let kind = ColumnKind::from_type_name(column.type_info().name());
        out.insert(column.name().to_string(), decode_value(row, i, kind)?);
    }
    Ok(out)
}

fn decode_value(row: &MySqlRow, i: usize, kind: ColumnKind) -> Result<SqlValue> {
    if row.try_get_raw(i)?.is_null() {
        return Ok(SqlValue::Null);
    }

    let value = match kind {
        ColumnKind::Null => SqlValue::Null,
        ColumnKind::Signed => SqlValue::Int(row.try_get_unchecked(i)?),
        ColumnKind::Unsigned => SqlValue::from(row.try_get_unchecked::<u64, _>(i)?),
        ColumnKind::Float => SqlValue::Float(f64::from(row.try_get_unchecked::<f32, _>(i)?)),
        ColumnKind::Double => SqlValue::Float(row.try_get_unchecked(i)?),
        ColumnKind::Decimal => SqlValue::Decimal(row.try_get_unchecked(i)?),
        ColumnKind::DateTime => match row.try_get_unchecked::<NaiveDateTime, _>(i) {
            Ok(v) => SqlValue::DateTime(v),
            Err(e) => temporal_fallback(row, i, kind, e)?,
        },
        ColumnKind::Date => match row.try_get_unchecked::<NaiveDate, _>(i) {
            Ok(v) => SqlValue::Date(v),
            Err(e) => temporal_fallback(row, i, kind, e)?,
        },
        ColumnKind::Time => match row.try_get_unchecked::<NaiveTime, _>(i) {
            Ok(v) => SqlValue::Time(v),
            Err(e) => temporal_fallback(row, i, kind, e)?,
        },
        ColumnKind::Binary => SqlValue::Bytes(row.try_get_unchecked(i)?),
        ColumnKind::Text => SqlValue::Text(row.try_get_unchecked(i)?),
    };

    Ok(value)
}

/// Text form of a temporal value chrono rejected, or the original error.
fn temporal_fallback(
    row: &MySqlRow,
    i: usize,
    kind: ColumnKind,
    err: sqlx::Error,
) -> Result<SqlValue> {
    let raw: Vec<u8> = row.try_get_unchecked(i)?;
    if row.try_get_raw(i)?.format() == MySqlValueFormat::Text {
        return Ok(SqlValue::Text(String::from_utf8_lossy(&raw).into_owned()));
    }
    match binary_temporal_text(kind, &raw) {
        Some(text) => Ok(SqlValue::Text(text)),
        None => Err(err.into()),
    }
}

/// Render a binary-protocol temporal value as MySQL prints it.
///
/// `raw` starts with the payload length byte. Zero dates have an empty
/// payload.
pub(crate) fn binary_temporal_text(kind: ColumnKind, raw: &[u8]) -> Option<String> {
    let (&len, payload) = raw.split_first()?;
    if payload.len() != usize::from(len) {
        return None;
    }

    match kind {
        ColumnKind::Date => match payload.len() {
            0 => Some("0000-00-00".to_string()),
            4 | 7 | 11 => Some(date_text(payload)),
            _ => None,
        },
        ColumnKind::DateTime => match payload.len() {
            0 => Some("0000-00-00 00:00:00".to_string()),
            4 => Some(format!("{} 00:00:00", date_text(payload))),
            7 | 11 => Some(format!(
                "{} {:02}:{:02}:{:02}{}",
                date_text(payload),
                payload[4],
                payload[5],
                payload[6],
                micros_text(&payload[7..])
            )),
            _ => None,
        },
        ColumnKind::Time => match payload.len() {
            0 => Some("00:00:00".to_string()),
            8 | 12 => {
                let sign = if payload[0] == 1 { "-" } else { "" };
                let days = u32::from_le_bytes([payload[1], payload[2], payload[3], payload[4]]);
                let hours = u64::from(days) * 24 + u64::from(payload[5]);
                Some(format!(
                    "{}{:02}:{:02}:{:02}{}",
                    sign,
                    hours,
                    payload[6],
                    payload[7],
                    micros_text(&payload[8..])
                ))
            }
            _ => None,
        },
        _ => None,
    }
}

fn date_text(payload: &[u8]) -> String {
    let year = u16::from_le_bytes([payload[0], payload[1]]);
    format!("{:04}-{:02}-{:02}", year, payload[2], payload[3])
}

fn micros_text(rest: &[u8]) -> String {
    match rest {
        [a, b, c, d] => match u32::from_le_bytes([*a, *b, *c, *d]) {
            0 => String::new(),
            micros => format!(".{:06}", micros),
        },
        _ => String::new(),
    }
}

//! Named value converters applied to individual field values.
//!
//! A field mapping may name a converter with `"convert"`. Known names:
//!
//! | Name | Effect |
//! |------|--------|
//! | `identity` | value unchanged |
//! | `timestamp_to_datetime` | epoch seconds to `YYYY-MM-DD HH:MM:SS` text |
//! | `epoch_to_datetime` | alias of `timestamp_to_datetime` |

use chrono::{DateTime, Local, Utc};
use rust_decimal::prelude::ToPrimitive;
use tracing::warn;

use crate::config::TimeZoneSetting;
use crate::core::SqlValue;
use crate::error::{Result, UniconvError};

const DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// A value transformation selected by name in a field mapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ValueConverter {
    #[default]
    Identity,
    EpochToDatetime,
}

impl ValueConverter {
    /// Resolve a converter name.
    ///
    /// # Errors
    ///
    /// [`UniconvError::Conversion`] for an unknown name. Callers treat it as
    /// non-fatal and fall back to [`ValueConverter::Identity`].
    pub fn from_name(name: &str) -> Result<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "" | "identity" => Ok(ValueConverter::Identity),
            "timestamp_to_datetime" | "epoch_to_datetime" => Ok(ValueConverter::EpochToDatetime),
            other => Err(UniconvError::Conversion(format!(
                "unknown converter '{}'",
                other
            ))),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            ValueConverter::Identity => "identity",
            ValueConverter::EpochToDatetime => "timestamp_to_datetime",
        }
    }

    /// Apply the converter. Values it cannot handle are returned unchanged.
    pub fn apply(&self, value: SqlValue, timezone: TimeZoneSetting) -> SqlValue {
        match self {
            ValueConverter::Identity => value,
            ValueConverter::EpochToDatetime => epoch_to_datetime(value, timezone),
        }
    }
}

fn epoch_to_datetime(value: SqlValue, timezone: TimeZoneSetting) -> SqlValue {
    if value.is_null() {
        return value;
    }

    let Some(formatted) = epoch_seconds(&value).and_then(|secs| format_epoch(secs, timezone))
    else {
        warn!(
            "Cannot convert {} value to a datetime, passing it through unchanged",
            value.kind()
        );
        return value;
    };

    SqlValue::Text(formatted)
}

fn epoch_seconds(value: &SqlValue) -> Option<i64> {
    match value {
        SqlValue::Int(v) => Some(*v),
        SqlValue::Float(v) if v.is_finite() => v.trunc().to_i64(),
        SqlValue::Decimal(v) => v.trunc().to_i64(),
        SqlValue::Text(s) => {
            let s = s.trim();
            s.parse::<i64>().ok().or_else(|| {
                s.parse::<f64>()
                    .ok()
                    .filter(|v| v.is_finite())
                    .and_then(|v| v.trunc().to_i64())
            })
        }
        _ => None,
    }
}

fn format_epoch(secs: i64, timezone: TimeZoneSetting) -> Option<String> {
    let utc: DateTime<Utc> = DateTime::from_timestamp(secs, 0)?;
    let formatted = match timezone {
        TimeZoneSetting::Utc => utc.format(DATETIME_FORMAT).to_string(),
        TimeZoneSetting::Local => utc.with_timezone(&Local).format(DATETIME_FORMAT).to_string(),
    };
    Some(formatted)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;
    use std::str::FromStr;

    fn utc(value: SqlValue) -> SqlValue {
        ValueConverter::EpochToDatetime.apply(value, TimeZoneSetting::Utc)
    }

    #[test]
    fn test_from_name() {
        assert_eq!(
            ValueConverter::from_name("identity").unwrap(),
            ValueConverter::Identity
        );
        assert_eq!(
            ValueConverter::from_name("timestamp_to_datetime").unwrap(),
            ValueConverter::EpochToDatetime
        );
        assert_eq!(
            ValueConverter::from_name("epoch_to_datetime").unwrap(),
            ValueConverter::EpochToDatetime
        );
    }

    #[test]
    fn test_unknown_name_is_conversion_error() {
        let err = ValueConverter::from_name("rot13").unwrap_err();
        assert!(matches!(err, UniconvError::Conversion(_)));
        assert_eq!(err.exit_code(), 4);
    }

    #[test]
    fn test_epoch_zero_utc() {
        assert_eq!(utc(SqlValue::Int(0)), SqlValue::from("1970-01-01 00:00:00"));
    }

    #[test]
    fn test_epoch_billion_utc() {
        assert_eq!(
            utc(SqlValue::Int(1_000_000_000)),
            SqlValue::from("2001-09-09 01:46:40")
        );
    }

    #[test]
    fn test_numeric_inputs() {
        assert_eq!(
            utc(SqlValue::from("1000000000")),
            SqlValue::from("2001-09-09 01:46:40")
        );
        assert_eq!(
            utc(SqlValue::Float(86_400.9)),
            SqlValue::from("1970-01-02 00:00:00")
        );
        assert_eq!(
            utc(SqlValue::Decimal(Decimal::from_str("60.5").unwrap())),
            SqlValue::from("1970-01-01 00:01:00")
        );
    }

    #[test]
    fn test_null_and_unconvertible_pass_through() {
        assert_eq!(utc(SqlValue::Null), SqlValue::Null);
        assert_eq!(utc(SqlValue::from("yesterday")), SqlValue::from("yesterday"));
        assert_eq!(utc(SqlValue::Bytes(vec![1])), SqlValue::Bytes(vec![1]));
    }

    #[test]
    fn test_identity() {
        assert_eq!(
            ValueConverter::Identity.apply(SqlValue::Int(7), TimeZoneSetting::Local),
            SqlValue::Int(7)
        );
    }

    #[test]
    fn test_local_zone_produces_datetime_text() {
        let out = ValueConverter::EpochToDatetime.apply(SqlValue::Int(0), TimeZoneSetting::Local);
        let SqlValue::Text(s) = out else {
            panic!("expected text, got {:?}", out);
        };
        assert_eq!(s.len(), "1970-01-01 00:00:00".len());
    }
}

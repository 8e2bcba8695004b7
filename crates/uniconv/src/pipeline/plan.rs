//! Entity plans resolved from the configuration.

use serde::Serialize;
use std::fmt;
use tracing::warn;

use crate::config::{EntityConfig, TablesConfig};
use crate::convert::ValueConverter;
use crate::error::{Result, UniconvError};
use crate::statement::{Condition, SelectDraft};

/// Row filter applied to the source query of an entity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum WhereSpec {
    /// `<field> <operator> <value>`; the value is bound as a parameter.
    Value {
        field: String,
        operator: String,
        value: String,
    },

    /// A comparison between columns, copied into the query verbatim.
    Fields(String),
}

impl WhereSpec {
    /// Read the `where`/`wheretype` pair of an entity.
    ///
    /// Returns `Ok(None)` when there is no filter. A filter whose
    /// `wheretype` is missing or unknown is ignored with a warning.
    ///
    /// # Errors
    ///
    /// [`UniconvError::Config`] when a `value` filter does not have the
    /// `field operator value` shape.
    pub fn from_tables(tables: &TablesConfig) -> Result<Option<Self>> {
        let Some(raw) = tables.r#where.as_deref().map(str::trim).filter(|w| !w.is_empty())
        else {
            return Ok(None);
        };

        let wheretype = tables
            .wheretype
            .as_deref()
            .map(|t| t.trim().to_ascii_lowercase());

        match wheretype.as_deref() {
            Some("value") => {
                let Some((field, operator, value)) = split_value_filter(raw) else {
                    return Err(UniconvError::Config(format!(
                        "where filter on '{}' must look like 'field operator value', got '{}'",
                        tables.source, raw
                    )));
                };
                Ok(Some(WhereSpec::Value {
                    field: field.to_string(),
                    operator: operator.to_string(),
                    value: value.to_string(),
                }))
            }
            Some("fields") => Ok(Some(WhereSpec::Fields(
                raw.split_whitespace().collect::<Vec<_>>().join(" "),
            ))),
            other => {
                warn!(
                    "Ignoring where filter on '{}': wheretype {} is not 'value' or 'fields'",
                    tables.source,
                    other.map_or_else(|| "is missing".to_string(), |t| format!("'{}'", t)),
                );
                Ok(None)
            }
        }
    }

    /// Condition for the source SELECT.
    pub fn to_condition(&self) -> Condition {
        match self {
            WhereSpec::Value {
                field,
                operator,
                value,
            } => Condition::bound(format!("{} {} ?", field, operator), value.as_str()),
            WhereSpec::Fields(expr) => Condition::raw(expr.clone()),
        }
    }
}

impl fmt::Display for WhereSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WhereSpec::Value {
                field,
                operator,
                value,
            } => write!(f, "{} {} {:?}", field, operator, value),
            WhereSpec::Fields(expr) => f.write_str(expr),
        }
    }
}

/// Split `field operator value`. The value is everything after the operator,
/// so it may contain spaces.
pub(crate) fn split_value_filter(raw: &str) -> Option<(&str, &str, &str)> {
    let (field, rest) = raw.trim().split_once(char::is_whitespace)?;
    let (operator, value) = rest.trim_start().split_once(char::is_whitespace)?;
    let value = value.trim();
    (!value.is_empty()).then_some((field, operator, value))
}

/// One source column copied into one target column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldMapping {
    pub source_column: String,
    pub target_column: String,
    #[serde(serialize_with = "serialize_converter")]
    pub converter: ValueConverter,
}

fn serialize_converter<S: serde::Serializer>(
    converter: &ValueConverter,
    serializer: S,
) -> std::result::Result<S::Ok, S::Error> {
    serializer.serialize_str(converter.name())
}

/// Everything needed to copy one entity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EntityPlan {
    pub name: String,
    pub source_table: String,
    pub target_table: String,
    pub fields: Vec<FieldMapping>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filter: Option<WhereSpec>,
}

impl EntityPlan {
    /// Resolve an entity from its configuration.
    ///
    /// Unknown converter names are logged and replaced with identity.
    pub fn from_config(name: &str, config: &EntityConfig) -> Result<Self> {
        let filter = WhereSpec::from_tables(&config.tables)?;

        let fields = config
            .fields
            .iter()
            .map(|field| {
                let converter = match field.convert.as_deref() {
                    None => ValueConverter::Identity,
                    Some(convert) => ValueConverter::from_name(convert).unwrap_or_else(|e| {
                        warn!(
                            "{}.{}: {}, copying the value unchanged",
                            name, field.source, e
                        );
                        ValueConverter::Identity
                    }),
                };
                FieldMapping {
                    source_column: field.source.clone(),
                    target_column: field.target.clone(),
                    converter,
                }
            })
            .collect();

        Ok(Self {
            name: name.to_string(),
            source_table: config.tables.source.clone(),
            target_table: config.tables.target.clone(),
            fields,
            filter,
        })
    }

    /// `SELECT * FROM <source_table> [WHERE <filter>]`.
    pub fn source_query(&self) -> SelectDraft {
        let select = SelectDraft::new(&self.source_table);
        match &self.filter {
            Some(filter) => select.condition(filter.to_condition()),
            None => select,
        }
    }
}

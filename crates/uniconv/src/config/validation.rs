//! Configuration validation.

use super::{Config, DatabaseConfig, DbKind, TablesConfig};
use crate::error::{Result, UniconvError};
use crate::pipeline::split_value_filter;

/// Validate the configuration.
pub fn validate(config: &Config) -> Result<()> {
    validate_database("source", &config.config.databases.source)?;
    validate_database("target", &config.config.databases.target)?;

    for (name, entity) in &config.conversions {
        if name.trim().is_empty() {
            return Err(UniconvError::Config(
                "conversion names must not be empty".into(),
            ));
        }
        if entity.tables.source.trim().is_empty() {
            return Err(UniconvError::Config(format!(
                "conversions.{}.tables.source is required",
                name
            )));
        }
        if entity.tables.target.trim().is_empty() {
            return Err(UniconvError::Config(format!(
                "conversions.{}.tables.target is required",
                name
            )));
        }
        if let Some(filter) = value_filter(&entity.tables) {
            if split_value_filter(filter).is_none() {
                return Err(UniconvError::Config(format!(
                    "conversions.{}.tables.where must look like 'field operator value', got '{}'",
                    name, filter
                )));
            }
        }
        for (i, field) in entity.fields.iter().enumerate() {
            if field.source.trim().is_empty() || field.target.trim().is_empty() {
                return Err(UniconvError::Config(format!(
                    "conversions.{}.fields[{}] needs both source and target",
                    name, i
                )));
            }
        }
    }

    Ok(())
}

/// The `where` text of a `wheretype: value` filter.
fn value_filter(tables: &TablesConfig) -> Option<&str> {
    let is_value = tables
        .wheretype
        .as_deref()
        .is_some_and(|t| t.trim().eq_ignore_ascii_case("value"));
    tables
        .r#where
        .as_deref()
        .map(str::trim)
        .filter(|w| is_value && !w.is_empty())
}

fn validate_database(role: &str, db: &DatabaseConfig) -> Result<()> {
    let Some(kind) = db.kind() else {
        return Err(UniconvError::Config(format!(
            "{}.type must be 'mysql' or 'sqlite', got '{}'",
            role, db.r#type
        )));
    };

    if db.location.trim().is_empty() {
        return Err(UniconvError::Config(format!(
            "{}.location is required",
            role
        )));
    }

    if kind == DbKind::Mysql && db.database.as_deref().map_or(true, str::is_empty) {
        return Err(UniconvError::Config(format!(
            "{}.database is required for mysql",
            role
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{
        Databases, EntityConfig, FieldConfig, GeneralConfig, Settings, TablesConfig,
    };
    use indexmap::IndexMap;

    fn valid_config() -> Config {
        let mut conversions = IndexMap::new();
        conversions.insert(
            "users".to_string(),
            EntityConfig {
                tables: TablesConfig {
                    source: "tbl_users".to_string(),
                    target: "users".to_string(),
                    r#where: None,
                    wheretype: None,
                },
                fields: vec![FieldConfig {
                    source: "usr_id".to_string(),
                    target: "id".to_string(),
                    convert: None,
                }],
            },
        );

        Config {
            config: GeneralConfig {
                settings: Settings::default(),
                databases: Databases {
                    source: DatabaseConfig {
                        r#type: "mysql".to_string(),
                        location: "localhost".to_string(),
                        port: 3306,
                        database: Some("legacy".to_string()),
                        user: Some("root".to_string()),
                        password: Some("password".to_string()),
                    },
                    target: DatabaseConfig {
                        r#type: "sqlite".to_string(),
                        location: "target.db".to_string(),
                        port: 3306,
                        database: None,
                        user: None,
                        password: None,
                    },
                },
            },
            conversions,
        }
    }

    #[test]
    fn test_valid_config() {
        let config = valid_config();
        assert!(validate(&config).is_ok());
    }

    #[test]
    fn test_unknown_source_type() {
        let mut config = valid_config();
        config.config.databases.source.r#type = "oracle".to_string();
        let err = validate(&config).unwrap_err();
        assert!(err.to_string().contains("source.type"));
    }

    #[test]
    fn test_missing_target_location() {
        let mut config = valid_config();
        config.config.databases.target.location = " ".to_string();
        assert!(validate(&config).is_err());
    }

    #[test]
    fn test_mysql_requires_database() {
        let mut config = valid_config();
        config.config.databases.source.database = None;
        assert!(validate(&config).is_err());
    }

    #[test]
    fn test_empty_table_names_rejected() {
        let mut config = valid_config();
        config.conversions["users"].tables.target = String::new();
        let err = validate(&config).unwrap_err();
        assert!(err.to_string().contains("conversions.users.tables.target"));
    }

    #[test]
    fn test_empty_field_rejected() {
        let mut config = valid_config();
        config.conversions["users"].fields[0].source = String::new();
        assert!(validate(&config).is_err());
    }

    #[test]
    fn test_value_filter_needs_three_parts() {
        let mut config = valid_config();
        config.conversions["users"].tables.r#where = Some("status =".to_string());
        config.conversions["users"].tables.wheretype = Some("value".to_string());
        let err = validate(&config).unwrap_err();
        assert!(err.to_string().contains("conversions.users.tables.where"));

        config.conversions["users"].tables.r#where = Some("status = on hold".to_string());
        assert!(validate(&config).is_ok());
    }

    #[test]
    fn test_fields_filter_is_not_split() {
        let mut config = valid_config();
        config.conversions["users"].tables.r#where = Some("flagged".to_string());
        config.conversions["users"].tables.wheretype = Some("fields".to_string());
        assert!(validate(&config).is_ok());
    }

    #[test]
    fn test_database_config_debug_redacts_password() {
        let mut config = valid_config();
        config.config.databases.source.password = Some("super_secret_password_123".to_string());
        let debug_output = format!("{:?}", config.config.databases.source);
        assert!(
            debug_output.contains("[REDACTED]"),
            "Debug output should contain [REDACTED]"
        );
        assert!(
            !debug_output.contains("super_secret_password_123"),
            "Debug output should not contain actual password value"
        );
    }
}

//! CLI integration tests for uniconv.
//!
//! These tests verify command-line argument parsing, help output, exit
//! codes for error conditions, and full copies between SQLite files.

use assert_cmd::Command;
use predicates::prelude::*;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use uniconv::{Connection, DatabaseConfig, Dialect, SelectDraft, SortDirection, SqlValue, Statement};

/// Get a command for the uniconv binary.
fn cmd() -> Command {
    Command::cargo_bin("uniconv").unwrap()
}

fn sqlite(path: &Path) -> DatabaseConfig {
    DatabaseConfig {
        r#type: "sqlite".to_string(),
        location: path.to_string_lossy().into_owned(),
        port: 3306,
        database: None,
        user: None,
        password: None,
    }
}

/// Workspace with a seeded source database and an empty `people` table.
struct Fixture {
    dir: TempDir,
}

impl Fixture {
    async fn new() -> Self {
        let fixture = Self {
            dir: TempDir::new().unwrap(),
        };
        fixture
            .seed(
                "source.db",
                "CREATE TABLE users (id INTEGER, created_at INTEGER, status TEXT);
                 INSERT INTO users VALUES (1, 0, 'active'), (2, 1000000000, 'active'), (3, 5, 'gone');",
            )
            .await;
        fixture
            .seed("target.db", "CREATE TABLE people (id INTEGER, created TEXT);")
            .await;
        fixture
    }

    fn path(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }

    async fn seed(&self, name: &str, script: &str) {
        let mut conn = Connection::open(&sqlite(&self.path(name))).await.unwrap();
        conn.execute_script(script).await.unwrap();
        conn.close().await.unwrap();
    }

    fn write_config(&self, conversions: serde_json::Value) -> PathBuf {
        let config = serde_json::json!({
            "config": {
                "settings": { "pass_size": 100, "ignore_errors": 0, "log_file": 0, "timezone": "utc" },
                "databases": {
                    "source": { "type": "sqlite", "location": self.path("source.db") },
                    "target": { "type": "sqlite", "location": self.path("target.db") },
                }
            },
            "conversions": conversions,
        });
        let path = self.path("config.json");
        std::fs::write(&path, serde_json::to_string_pretty(&config).unwrap()).unwrap();
        path
    }

    fn users_config(&self) -> PathBuf {
        self.write_config(serde_json::json!({
            "users": {
                "tables": { "source": "users", "target": "people", "where": "status = active", "wheretype": "value" },
                "fields": [
                    { "source": "id", "target": "id" },
                    { "source": "created_at", "target": "created", "convert": "timestamp_to_datetime" }
                ]
            }
        }))
    }

    async fn people(&self) -> Vec<(SqlValue, SqlValue)> {
        let mut conn = Connection::open(&sqlite(&self.path("target.db")))
            .await
            .unwrap();
        let select = Statement::from(SelectDraft::new("people").order_by("id", SortDirection::Asc));
        let bound = select.compile(&conn.dialect()).unwrap();
        assert_eq!(conn.dialect().name(), "sqlite");
        conn.fetch_all(&bound)
            .await
            .unwrap()
            .into_iter()
            .map(|r| (r["id"].clone(), r["created"].clone()))
            .collect()
    }
}

// =============================================================================
// Help and Version Tests
// =============================================================================

#[test]
fn test_help_shows_all_commands() {
    cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("run"))
        .stdout(predicate::str::contains("check"))
        .stdout(predicate::str::contains("health-check"));
}

#[test]
fn test_run_subcommand_help() {
    cmd()
        .args(["run", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--dry-run"))
        .stdout(predicate::str::contains("--yes"))
        .stdout(predicate::str::contains("--no-progress"));
}

#[test]
fn test_version_flag() {
    cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("uniconv"));
}

#[test]
fn test_log_format_values() {
    cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("--log-format"))
        .stdout(predicate::str::contains("json"));
}

#[test]
fn test_verbosity_flag_exists() {
    cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("--verbosity"))
        .stdout(predicate::str::contains("[default: info]"));
}

#[test]
fn test_config_default_path() {
    cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("[default: config.json]"));
}

#[test]
fn test_no_subcommand_shows_help() {
    cmd()
        .assert()
        .failure()
        .stderr(predicate::str::contains("Usage:"));
}

// =============================================================================
// Exit Code Tests
// =============================================================================

#[test]
fn test_missing_config_exits_with_code_7() {
    // Missing file is an IO error, not a config error
    cmd()
        .args(["--config", "nonexistent_config_file.json", "check"])
        .assert()
        .code(7);
}

#[test]
fn test_invalid_json_exits_with_code_1() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "{{ \"config\": ").unwrap();

    cmd()
        .args(["--config", file.path().to_str().unwrap(), "check"])
        .assert()
        .code(1);
}

#[test]
fn test_empty_config_exits_with_code_1() {
    let file = tempfile::NamedTempFile::new().unwrap();

    cmd()
        .args(["--config", file.path().to_str().unwrap(), "check"])
        .assert()
        .code(1);
}

#[test]
fn test_unknown_database_type_exits_with_code_1() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(
        file,
        r#"{{"config": {{"databases": {{
            "source": {{"type": "oracle", "location": "db"}},
            "target": {{"type": "sqlite", "location": "t.db"}}
        }}}}}}"#
    )
    .unwrap();

    cmd()
        .args(["--config", file.path().to_str().unwrap(), "check"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("source.type"));
}

// =============================================================================
// Check and Health Check
// =============================================================================

#[tokio::test]
async fn test_check_prints_plan() {
    let fixture = Fixture::new().await;
    let config = fixture.users_config();

    cmd()
        .args(["--config", config.to_str().unwrap(), "check"])
        .assert()
        .success()
        .stdout(predicate::str::contains("users: users -> people"))
        .stdout(predicate::str::contains("where status = \"active\""))
        .stdout(predicate::str::contains("created_at -> created [timestamp_to_datetime]"));
}

#[tokio::test]
async fn test_check_output_json() {
    let fixture = Fixture::new().await;
    let config = fixture.users_config();

    let output = cmd()
        .args(["--config", config.to_str().unwrap(), "--output-json", "check"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let plans: serde_json::Value = serde_json::from_slice(&output).unwrap();
    assert_eq!(plans[0]["name"], "users");
    assert_eq!(plans[0]["fields"][1]["converter"], "timestamp_to_datetime");
}

#[tokio::test]
async fn test_health_check_reports_healthy() {
    let fixture = Fixture::new().await;
    let config = fixture.users_config();

    cmd()
        .args(["--config", config.to_str().unwrap(), "health-check"])
        .assert()
        .success()
        .stdout(predicate::str::contains("HEALTHY"));
}

#[tokio::test]
async fn test_health_check_unreachable_target_exits_with_code_2() {
    let fixture = Fixture::new().await;
    let config = serde_json::json!({
        "config": {
            "databases": {
                "source": { "type": "sqlite", "location": fixture.path("source.db") },
                "target": { "type": "sqlite", "location": fixture.path("missing/target.db") },
            }
        }
    });
    let path = fixture.path("bad.json");
    std::fs::write(&path, config.to_string()).unwrap();

    cmd()
        .args(["--config", path.to_str().unwrap(), "health-check"])
        .assert()
        .code(2)
        .stdout(predicate::str::contains("UNHEALTHY"));
}

#[tokio::test]
async fn test_health_check_does_not_create_missing_target() {
    let fixture = Fixture::new().await;
    let config = serde_json::json!({
        "config": {
            "databases": {
                "source": { "type": "sqlite", "location": fixture.path("source.db") },
                "target": { "type": "sqlite", "location": fixture.path("absent.db") },
            }
        }
    });
    let path = fixture.path("absent.json");
    std::fs::write(&path, config.to_string()).unwrap();

    cmd()
        .args(["--config", path.to_str().unwrap(), "health-check"])
        .assert()
        .code(2)
        .stdout(predicate::str::contains("UNHEALTHY"));
    assert!(!fixture.path("absent.db").exists());
}

// =============================================================================
// Runs
// =============================================================================

#[tokio::test]
async fn test_run_copies_filtered_rows() {
    let fixture = Fixture::new().await;
    let config = fixture.users_config();

    cmd()
        .args(["--config", config.to_str().unwrap(), "run", "--yes", "--no-progress"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Conversion completed!"))
        .stderr(predicate::str::contains("users 2/2... finished in"));

    assert_eq!(
        fixture.people().await,
        [
            (SqlValue::Int(1), SqlValue::from("1970-01-01 00:00:00")),
            (SqlValue::Int(2), SqlValue::from("2001-09-09 01:46:40")),
        ]
    );
}

#[tokio::test]
async fn test_run_output_json() {
    let fixture = Fixture::new().await;
    let config = fixture.users_config();

    let output = cmd()
        .args([
            "--config",
            config.to_str().unwrap(),
            "--output-json",
            "run",
            "--yes",
            "--no-progress",
        ])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let result: serde_json::Value = serde_json::from_slice(&output).unwrap();
    assert_eq!(result["status"], "completed");
    assert_eq!(result["rows_transferred"], 2);
    assert_eq!(result["entities"][0]["entity"], "users");
}

#[tokio::test]
async fn test_dry_run_prints_statements() {
    let fixture = Fixture::new().await;
    let config = fixture.users_config();

    cmd()
        .args(["--config", config.to_str().unwrap(), "run", "--dry-run", "--no-progress"])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "INSERT INTO people (id,created) VALUES (1,'1970-01-01 00:00:00');",
        ))
        .stdout(predicate::str::contains("Dry run completed!"));

    assert!(fixture.people().await.is_empty());
}

#[tokio::test]
async fn test_run_missing_target_table_exits_with_code_3() {
    let fixture = Fixture::new().await;
    let config = fixture.write_config(serde_json::json!({
        "users": {
            "tables": { "source": "users", "target": "nowhere" },
            "fields": [ { "source": "id", "target": "id" } ]
        }
    }));

    cmd()
        .args(["--config", config.to_str().unwrap(), "run", "--yes", "--no-progress"])
        .assert()
        .code(3)
        .stderr(predicate::str::contains("users"));
}

#[tokio::test]
async fn test_run_missing_source_column_exits_with_code_1() {
    let fixture = Fixture::new().await;
    let config = fixture.write_config(serde_json::json!({
        "users": {
            "tables": { "source": "users", "target": "people" },
            "fields": [ { "source": "email", "target": "id" } ]
        }
    }));

    cmd()
        .args(["--config", config.to_str().unwrap(), "run", "--yes", "--no-progress"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("email"));
}

#[tokio::test]
async fn test_log_file_receives_logs() {
    let fixture = Fixture::new().await;
    let config = fixture.users_config();
    let log = fixture.path("run.log");

    cmd()
        .args([
            "--config",
            config.to_str().unwrap(),
            "--log-file",
            log.to_str().unwrap(),
            "run",
            "--yes",
            "--no-progress",
        ])
        .assert()
        .success();

    let contents = std::fs::read_to_string(&log).unwrap();
    assert!(contents.contains("Loaded configuration"));
    assert!(contents.contains("Converting users"));
}

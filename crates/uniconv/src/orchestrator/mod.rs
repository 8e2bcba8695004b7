//! Conversion orchestrator - main workflow coordinator.

use std::io::Write;
use std::time::Instant;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::config::{Config, DatabaseConfig};
use crate::drivers::{Connection, DialectImpl};
use crate::error::{Result, UniconvError};
use crate::pipeline::{
    ConversionPipeline, ConvertOptions, DryRunWriter, EntityPlan, EntitySummary, ProgressSink,
};

/// Conversion orchestrator.
///
/// Entity plans are resolved when the orchestrator is created, so
/// configuration problems surface before any database is touched.
pub struct Orchestrator {
    config: Config,
    plans: Vec<EntityPlan>,
}

/// Result of a conversion run.
#[derive(Debug, Clone, Serialize)]
pub struct RunResult {
    /// Unique run identifier.
    pub run_id: String,

    /// "completed" or "dry_run".
    pub status: String,

    /// When the run started.
    pub started_at: DateTime<Utc>,

    /// When the run completed.
    pub completed_at: DateTime<Utc>,

    /// Total duration in seconds.
    pub duration_seconds: f64,

    /// Entities processed.
    pub entities_total: usize,

    /// Rows written (or printed, for a dry run).
    pub rows_transferred: u64,

    /// Average throughput (rows/second).
    pub rows_per_second: u64,

    /// Per-entity summaries, in processing order.
    pub entities: Vec<EntitySummary>,
}

/// Result of a connectivity check.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthCheckResult {
    pub source_connected: bool,
    pub source_latency_ms: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_error: Option<String>,
    pub target_connected: bool,
    pub target_latency_ms: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_error: Option<String>,
    pub healthy: bool,
}

impl Orchestrator {
    /// Create a new orchestrator.
    pub fn new(config: Config) -> Result<Self> {
        config.validate()?;

        if config.settings().ignore_errors() {
            warn!("settings.ignore_errors has no effect: the first failing statement stops the run");
        }

        let plans = config
            .conversions
            .iter()
            .map(|(name, entity)| EntityPlan::from_config(name, entity))
            .collect::<Result<Vec<_>>>()?;

        Ok(Self { config, plans })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Entity plans in processing order.
    pub fn plans(&self) -> &[EntityPlan] {
        &self.plans
    }

    fn options(&self) -> ConvertOptions {
        ConvertOptions {
            timezone: self.config.settings().timezone,
        }
    }

    /// Run the conversion.
    pub async fn run(&self, progress: &dyn ProgressSink) -> Result<RunResult> {
        let started_at = Utc::now();
        let run_id = uuid::Uuid::new_v4().to_string();
        info!("Starting conversion run: {}", run_id);

        let mut source = Connection::open(self.config.source()).await?;
        let mut target = Connection::open(self.config.target()).await?;

        let outcome = ConversionPipeline::new(&mut source, &mut target, progress, self.options())
            .run(&self.plans)
            .await;

        let source_closed = source.close().await;
        let target_closed = target.close().await;
        let entities = outcome?;
        source_closed?;
        target_closed?;

        let result = RunResult::new(run_id, "completed", started_at, entities);
        info!(
            "Conversion {}: {} entities, {} rows in {:.1}s ({} rows/s)",
            result.status,
            result.entities_total,
            result.rows_transferred,
            result.duration_seconds,
            result.rows_per_second
        );

        Ok(result)
    }

    /// Read the source and print every INSERT instead of executing it.
    ///
    /// Statements are rendered with the target's dialect. The target
    /// database is never opened.
    pub async fn dry_run<W: Write + Send>(
        &self,
        progress: &dyn ProgressSink,
        out: W,
    ) -> Result<RunResult> {
        let started_at = Utc::now();
        let run_id = uuid::Uuid::new_v4().to_string();
        info!("Starting dry run: {}", run_id);

        let dialect = DialectImpl::from_db_type(&self.config.target().r#type)?;
        let mut source = Connection::open(self.config.source()).await?;
        let mut writer = DryRunWriter::new(out, dialect);

        let outcome = ConversionPipeline::new(&mut source, &mut writer, progress, self.options())
            .run(&self.plans)
            .await;

        let source_closed = source.close().await;
        let entities = outcome?;
        source_closed?;
        info!("Dry run printed {} statements", writer.statements());

        Ok(RunResult::new(run_id, "dry_run", started_at, entities))
    }

    /// Open both databases and ping them. Missing SQLite files are reported
    /// as unhealthy rather than created.
    pub async fn health_check(&self) -> Result<HealthCheckResult> {
        let (source_latency_ms, source) = ping_database(self.config.source()).await;
        let (target_latency_ms, target) = ping_database(self.config.target()).await;

        let source_error = source.err().map(|e| e.to_string());
        let target_error = target.err().map(|e| e.to_string());
        let healthy = source_error.is_none() && target_error.is_none();

        Ok(HealthCheckResult {
            source_connected: source_error.is_none(),
            source_latency_ms,
            source_error,
            target_connected: target_error.is_none(),
            target_latency_ms,
            target_error,
            healthy,
        })
    }
}

async fn ping_database(config: &DatabaseConfig) -> (u64, Result<()>) {
    let started = Instant::now();
    let outcome = async {
        let mut conn = Connection::open_existing(config).await?;
        conn.ping().await?;
        conn.close().await
    }
    .await;
    let latency_ms = started.elapsed().as_millis() as u64;

    if let Err(e) = &outcome {
        warn!("Health check of {} failed: {}", config.describe(), e);
    }
    (latency_ms, outcome)
}

impl RunResult {
    fn new(
        run_id: String,
        status: &str,
        started_at: DateTime<Utc>,
        entities: Vec<EntitySummary>,
    ) -> Self {
        let completed_at = Utc::now();
        let duration_seconds = (completed_at - started_at)
            .to_std()
            .map(|d| d.as_secs_f64())
            .unwrap_or_default();
        let rows_transferred: u64 = entities.iter().map(|e| e.rows_written).sum();
        let rows_per_second = if duration_seconds > 0.0 {
            (rows_transferred as f64 / duration_seconds) as u64
        } else {
            0
        };

        Self {
            run_id,
            status: status.to_string(),
            started_at,
            completed_at,
            duration_seconds,
            entities_total: entities.len(),
            rows_transferred,
            rows_per_second,
            entities,
        }
    }

    /// Convert to JSON string.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

impl HealthCheckResult {
    /// Error for an unhealthy result, naming the failing side(s).
    pub fn into_error(self) -> Option<UniconvError> {
        if self.healthy {
            return None;
        }
        let failures: Vec<String> = [("source", self.source_error), ("target", self.target_error)]
            .into_iter()
            .filter_map(|(role, err)| err.map(|e| format!("{}: {}", role, e)))
            .collect();
        Some(UniconvError::connection(failures.join("; "), "health check"))
    }
}

//! Progress reporting for entity conversions.

use serde::Serialize;
use std::fmt;

/// Receives progress events from the pipeline.
///
/// All methods default to doing nothing, so a sink only implements the
/// events it renders.
pub trait ProgressSink: Send + Sync {
    /// Called once the source rows of an entity have been fetched.
    fn entity_started(&self, _entity: &str, _total: u64) {}

    /// Called after each row, `current` is 1-based.
    fn row(&self, _entity: &str, _current: u64, _total: u64) {}

    /// Called when an entity is complete.
    fn entity_finished(&self, _summary: &EntitySummary) {}
}

/// Sink that ignores every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopProgress;

impl ProgressSink for NoopProgress {}

/// Outcome of one entity.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EntitySummary {
    pub entity: String,
    pub rows_read: u64,
    pub rows_written: u64,
    /// Rows whose INSERT had no values and was not executed.
    pub rows_skipped: u64,
    pub duration_seconds: f64,
}

impl EntitySummary {
    /// Rows processed, written or skipped.
    pub fn processed(&self) -> u64 {
        self.rows_written + self.rows_skipped
    }
}

impl fmt::Display for EntitySummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {}/{}... finished in {:.3}s",
            self.entity,
            self.processed(),
            self.rows_read,
            self.duration_seconds
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary_display() {
        let summary = EntitySummary {
            entity: "users".to_string(),
            rows_read: 3,
            rows_written: 3,
            rows_skipped: 0,
            duration_seconds: 0.0421,
        };
        assert_eq!(summary.to_string(), "users 3/3... finished in 0.042s");
    }

    #[test]
    fn test_empty_summary_display() {
        let summary = EntitySummary {
            entity: "logs".to_string(),
            rows_read: 0,
            rows_written: 0,
            rows_skipped: 0,
            duration_seconds: 0.0,
        };
        assert_eq!(summary.to_string(), "logs 0/0... finished in 0.000s");
    }
}

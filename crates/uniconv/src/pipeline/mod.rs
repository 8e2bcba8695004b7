//! Row-by-row conversion pipeline.
//!
//! - [`EntityPlan`]: resolved tables, field mappings and filter of an entity
//! - [`ConversionPipeline`]: reads each entity from a [`SourceReader`] and
//!   writes one INSERT per row through a [`TargetWriter`]
//! - [`ProgressSink`]: per-row and per-entity progress events
//! - [`DryRunWriter`]: target that prints statements instead of running them
//!
//! Entities are processed strictly in order, one row at a time. The first
//! failing statement aborts the run; rows already written stay written.

mod dry_run;
mod plan;
mod progress;

pub use dry_run::DryRunWriter;
pub use plan::{EntityPlan, FieldMapping, WhereSpec};
pub(crate) use plan::split_value_filter;
pub use progress::{EntitySummary, NoopProgress, ProgressSink};

use std::time::Instant;

use tracing::{debug, info};

use crate::config::TimeZoneSetting;
use crate::core::{Row, SourceReader, TargetWriter};
use crate::error::{Result, UniconvError};
use crate::statement::{InsertDraft, Statement};

/// Options applied to every entity of a run.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConvertOptions {
    /// Zone used by the epoch converter.
    pub timezone: TimeZoneSetting,
}

/// Copies entities from a source to a target.
pub struct ConversionPipeline<'a> {
    source: &'a mut dyn SourceReader,
    target: &'a mut dyn TargetWriter,
    progress: &'a dyn ProgressSink,
    options: ConvertOptions,
}

impl<'a> ConversionPipeline<'a> {
    pub fn new(
        source: &'a mut dyn SourceReader,
        target: &'a mut dyn TargetWriter,
        progress: &'a dyn ProgressSink,
        options: ConvertOptions,
    ) -> Self {
        Self {
            source,
            target,
            progress,
            options,
        }
    }

    /// Convert every entity in order.
    ///
    /// # Errors
    ///
    /// Stops at the first failure: a missing source column is a
    /// [`UniconvError::Config`], a rejected statement a
    /// [`UniconvError::Statement`] naming the entity.
    pub async fn run(&mut self, plans: &[EntityPlan]) -> Result<Vec<EntitySummary>> {
        let mut summaries = Vec::with_capacity(plans.len());
        for plan in plans {
            summaries.push(self.run_entity(plan).await?);
        }
        Ok(summaries)
    }

    async fn run_entity(&mut self, plan: &EntityPlan) -> Result<EntitySummary> {
        let started = Instant::now();
        info!(
            "Converting {}: {} -> {}",
            plan.name, plan.source_table, plan.target_table
        );

        let query = Statement::from(plan.source_query());
        let rows = self
            .source
            .fetch(&query)
            .await
            .map_err(|e| e.for_entity(&plan.name))?;

        let total = rows.len() as u64;
        self.progress.entity_started(&plan.name, total);

        let mut rows_written = 0;
        let mut rows_skipped = 0;
        for (index, row) in rows.iter().enumerate() {
            let stmt = Statement::from(build_insert(plan, row, self.options)?);
            if stmt.is_noop() {
                debug!("{}: row {} has no values, skipping", plan.name, index + 1);
                rows_skipped += 1;
            } else {
                rows_written += self
                    .target
                    .write(&stmt)
                    .await
                    .map_err(|e| e.for_entity(&plan.name))?;
            }
            self.progress.row(&plan.name, index as u64 + 1, total);
        }

        let summary = EntitySummary {
            entity: plan.name.clone(),
            rows_read: total,
            rows_written,
            rows_skipped,
            duration_seconds: started.elapsed().as_secs_f64(),
        };
        info!("{}", summary);
        self.progress.entity_finished(&summary);

        Ok(summary)
    }
}

/// One INSERT for a source row, columns in mapping order.
fn build_insert(plan: &EntityPlan, row: &Row, options: ConvertOptions) -> Result<InsertDraft> {
    let mut insert = InsertDraft::new(&plan.target_table);
    for field in &plan.fields {
        let Some(value) = row.get(&field.source_column) else {
            return Err(UniconvError::Config(format!(
                "{}: column '{}' not found in source table '{}'",
                plan.name, field.source_column, plan.source_table
            )));
        };
        let value = field.converter.apply(value.clone(), options.timezone);
        insert = insert.value(&field.target_column, value);
    }
    Ok(insert)
}

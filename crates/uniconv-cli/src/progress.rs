//! Terminal progress for conversion runs.

use indicatif::{ProgressBar, ProgressStyle};
use std::sync::Mutex;
use uniconv::{EntitySummary, ProgressSink};

/// Draws one progress bar per entity on stderr and prints each entity's
/// completion line.
pub struct BarProgress {
    enabled: bool,
    bar: Mutex<Option<ProgressBar>>,
}

impl BarProgress {
    pub fn new(enabled: bool) -> Self {
        Self {
            enabled,
            bar: Mutex::new(None),
        }
    }

    fn style() -> ProgressStyle {
        ProgressStyle::with_template(
            "{spinner:.green} {prefix} [{bar:40.cyan/blue}] {pos}/{len} ({per_sec})",
        )
        .map(|style| style.progress_chars("=> "))
        .unwrap_or_else(|_| ProgressStyle::default_bar())
    }
}

impl ProgressSink for BarProgress {
    fn entity_started(&self, entity: &str, total: u64) {
        if !self.enabled {
            return;
        }
        let bar = ProgressBar::new(total);
        bar.set_style(Self::style());
        bar.set_prefix(entity.to_string());
        if let Ok(mut slot) = self.bar.lock() {
            *slot = Some(bar);
        }
    }

    fn row(&self, _entity: &str, current: u64, _total: u64) {
        if let Ok(slot) = self.bar.lock() {
            if let Some(bar) = slot.as_ref() {
                bar.set_position(current);
            }
        }
    }

    fn entity_finished(&self, summary: &EntitySummary) {
        if let Ok(mut slot) = self.bar.lock() {
            if let Some(bar) = slot.take() {
                bar.finish_and_clear();
            }
        }
        eprintln!("{}", summary);
    }
}

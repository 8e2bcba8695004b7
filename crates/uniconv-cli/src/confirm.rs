//! Confirmation prompt before writing to the target.

use dialoguer::Confirm;
use std::io::IsTerminal;
use uniconv::{Orchestrator, UniconvError};

/// Ask before a run touches the target database.
///
/// Skipped when stdin is not a terminal. Declining returns
/// [`UniconvError::Cancelled`].
pub fn confirm_run(orchestrator: &Orchestrator) -> Result<(), UniconvError> {
    if !std::io::stdin().is_terminal() {
        return Ok(());
    }

    let config = orchestrator.config();
    let prompt = format!(
        "Copy {} entities from {} into {}?",
        orchestrator.plans().len(),
        config.source().describe(),
        config.target().describe()
    );

    let proceed = Confirm::new()
        .with_prompt(prompt)
        .default(false)
        .interact()
        .map_err(|dialoguer::Error::IO(e)| e)?;

    if proceed {
        Ok(())
    } else {
        Err(UniconvError::Cancelled)
    }
}

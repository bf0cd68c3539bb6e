//! Push command - encrypt the local env file and append a version.

use crate::cli::output;
use crate::cli::prompt::Prompt;
use crate::core::workspace::{PushOutcome, Workspace};
use crate::error::Result;

/// Push the stage's local env file as a new version.
pub fn execute(stage: &str, message: Option<String>, force: bool) -> Result<()> {
    let workspace = Workspace::open()?;

    match workspace.push(stage, message, force, &Prompt)? {
        PushOutcome::Pushed(meta) => {
            output::success(&format!(
                "pushed {} v{}",
                output::stage(stage),
                meta.sequence
            ));
            if let Some(message) = meta.message {
                output::kv("message", message);
            }
        }
        PushOutcome::Unchanged { sequence } => {
            output::warn(&format!(
                "no changes since v{}, nothing pushed",
                sequence
            ));
            output::hint("use --force to push anyway");
        }
    }

    Ok(())
}

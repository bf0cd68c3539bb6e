//! History command - list every pushed version of a stage.

use crate::cli::output;
use crate::core::workspace::Workspace;
use crate::error::Result;

/// List a stage's versions, oldest first.
pub fn execute(stage: &str) -> Result<()> {
    let workspace = Workspace::open()?;

    let versions = workspace.history(stage)?;

    output::header(&format!("{} history", stage));
    for meta in versions {
        let line = match meta.message {
            Some(message) => format!(
                "v{}  {}  {}",
                meta.sequence,
                meta.timestamp.format("%Y-%m-%d %H:%M:%S UTC"),
                message
            ),
            None => format!(
                "v{}  {}",
                meta.sequence,
                meta.timestamp.format("%Y-%m-%d %H:%M:%S UTC")
            ),
        };
        output::list_item(&line);
    }

    Ok(())
}

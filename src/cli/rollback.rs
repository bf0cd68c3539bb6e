//! Rollback command - re-publish an old version as a new one.
//!
//! The sealed payload is copied as-is, so no passphrase is needed and
//! no history is rewritten.

use crate::cli::output;
use crate::core::workspace::Workspace;
use crate::error::Result;

/// Roll a stage back to an earlier version.
pub fn execute(stage: &str, version: u64) -> Result<()> {
    let workspace = Workspace::open()?;

    let meta = workspace.rollback(stage, version)?;

    output::success(&format!(
        "rolled {} back to v{} (published as v{})",
        output::stage(stage),
        version,
        meta.sequence
    ));
    output::hint(&format!("run: warren pull --stage {}", stage));

    Ok(())
}

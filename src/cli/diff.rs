//! Diff command - compare the local env file against a remote version.
//!
//! Key names only. Values never reach the terminal, so the diff is safe
//! to run in front of other people.

use crate::cli::output;
use crate::cli::prompt::Prompt;
use crate::core::workspace::Workspace;
use crate::error::Result;

/// Show the diff between the local env file and a remote version.
pub fn execute(stage: &str, version: Option<u64>) -> Result<()> {
    let workspace = Workspace::open()?;

    let (meta, diff) = workspace.diff(stage, version, &Prompt)?;

    if diff.is_clean() {
        output::success(&format!(
            "{} matches v{} ({} keys)",
            output::stage(stage),
            meta.sequence,
            diff.unchanged_count()
        ));
        return Ok(());
    }

    output::header(&format!("local vs {} v{}", stage, meta.sequence));

    for key in diff.added() {
        output::list_item(&format!("+ {} (remote only)", key));
    }
    for key in diff.removed() {
        output::list_item(&format!("- {} (local only)", key));
    }
    for key in diff.changed() {
        output::list_item(&format!("~ {} (values differ)", key));
    }
    output::dimmed(&format!("{} unchanged", diff.unchanged_count()));

    Ok(())
}

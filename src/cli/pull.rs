//! Pull command - decrypt the latest version into the local env file.

use crate::cli::output;
use crate::cli::prompt::Prompt;
use crate::core::workspace::Workspace;
use crate::error::Result;

/// Pull the latest version of a stage.
pub fn execute(stage: &str) -> Result<()> {
    let workspace = Workspace::open()?;

    let (meta, path) = workspace.pull(stage, &Prompt)?;

    output::success(&format!(
        "pulled {} v{} -> {}",
        output::stage(stage),
        meta.sequence,
        output::path(&path.display().to_string())
    ));

    Ok(())
}

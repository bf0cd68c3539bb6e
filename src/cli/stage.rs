//! Stage command - manage the stage map in .warren.json.

use std::path::PathBuf;

use tracing::info;

use crate::cli::output;
use crate::core::config::Config;
use crate::error::Result;

/// Add a stage to the project.
pub fn add(name: &str, path: Option<PathBuf>) -> Result<()> {
    let mut config = Config::load()?;
    let path = config.add_stage(name, path)?.clone();
    config.save()?;

    info!(stage = name, path = %path.display(), "stage added");

    output::success(&format!(
        "added stage {} -> {}",
        output::stage(name),
        output::path(&path.display().to_string())
    ));

    Ok(())
}

/// List configured stages.
pub fn list() -> Result<()> {
    let config = Config::load()?;

    output::header("Stages");
    for (name, path) in &config.stages {
        output::kv(name, path.display());
    }

    Ok(())
}

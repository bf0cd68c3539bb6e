//! Init command - create .warren.json and wire up the remote.

use tracing::info;

use crate::cli::output;
use crate::core::config::{self, Config};
use crate::core::constants::{CONFIG_FILE, DEFAULT_ENV_FILE, DEFAULT_STAGE};
use crate::core::remote::DirStore;
use crate::error::{ConfigError, Result};

/// Initialize warren in the current directory.
pub fn execute(remote: &str) -> Result<()> {
    if Config::exists() {
        return Err(ConfigError::AlreadyInitialized.into());
    }

    // Fail now if the remote cannot be reached, not on first push.
    DirStore::open(remote)?;

    let config = Config::new(remote);
    config.save()?;
    config::ensure_gitignore()?;

    info!(project_id = %config.project_id, remote, "initialized");

    output::success(&format!("initialized {}", output::path(CONFIG_FILE)));
    output::kv("project", &config.project_id);
    output::kv("remote", remote);
    output::kv(
        "stage",
        format!("{} -> {}", DEFAULT_STAGE, DEFAULT_ENV_FILE),
    );
    output::hint("commit .warren.json; keep .env out of git");

    Ok(())
}

//! Project configuration.
//!
//! Handles reading, writing, and validating `.warren.json`, the
//! checked-in project file: a stable project id, the remote location,
//! and the local env file path for each stage. It never contains key
//! material.

use std::collections::BTreeMap;
use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::core::constants::{self, DEFAULT_ENV_FILE, DEFAULT_STAGE};
use crate::error::{ConfigError, Result, ValidationError};

/// Project configuration stored in `.warren.json`.
#[derive(Debug, Serialize, Deserialize)]
pub struct Config {
    /// Opaque unique project id, generated once at init.
    pub project_id: String,
    pub created_at: DateTime<Utc>,
    /// Remote store location shared by the whole team.
    pub remote: String,
    /// Map of stage names to local env file paths.
    pub stages: BTreeMap<String, PathBuf>,
}

impl Config {
    /// Create a new configuration with a fresh project id and the
    /// default stage mapped to `.env`.
    pub fn new(remote: &str) -> Self {
        let mut stages = BTreeMap::new();
        stages.insert(DEFAULT_STAGE.to_string(), PathBuf::from(DEFAULT_ENV_FILE));

        Self {
            project_id: uuid::Uuid::new_v4().to_string(),
            created_at: Utc::now(),
            remote: remote.to_string(),
            stages,
        }
    }

    /// Path to the configuration file in the current directory.
    pub fn config_path() -> PathBuf {
        PathBuf::from(constants::CONFIG_FILE)
    }

    /// Check if a configuration file exists in the current directory.
    pub fn exists() -> bool {
        Self::config_path().exists()
    }

    /// Load configuration from `.warren.json`.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::NotInitialized` if the file doesn't exist,
    /// or `ConfigError::Parse` if the JSON is malformed.
    pub fn load() -> Result<Self> {
        let path = Self::config_path();
        debug!(path = %path.display(), "loading config");

        if !path.exists() {
            return Err(ConfigError::NotInitialized.into());
        }
        let contents = std::fs::read_to_string(&path).map_err(ConfigError::ReadFile)?;
        let config: Self = serde_json::from_str(&contents).map_err(ConfigError::Parse)?;

        debug!(
            project_id = %config.project_id,
            stages = config.stages.len(),
            "config loaded"
        );

        Ok(config)
    }

    /// Save configuration to `.warren.json`.
    ///
    /// # Errors
    ///
    /// Returns error if serialization or file write fails.
    pub fn save(&self) -> Result<()> {
        debug!("saving config");

        let contents =
            serde_json::to_string_pretty(self).map_err(ConfigError::Serialize)?;
        std::fs::write(Self::config_path(), contents)?;

        Ok(())
    }

    /// Local env file path for a stage.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::StageNotFound` if the stage is not
    /// configured for this project.
    pub fn stage_path(&self, stage: &str) -> Result<&PathBuf> {
        self.stages
            .get(stage)
            .ok_or_else(|| ConfigError::StageNotFound(stage.to_string()).into())
    }

    /// Add a stage with an optional explicit local path. Without one,
    /// the stage maps to `.env.{name}`.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::InvalidStageName` for malformed names
    /// or `ConfigError::StageExists` for duplicates.
    pub fn add_stage(&mut self, name: &str, path: Option<PathBuf>) -> Result<&PathBuf> {
        validate_stage_name(name)?;

        if self.stages.contains_key(name) {
            return Err(ConfigError::StageExists(name.to_string()).into());
        }

        let path = path.unwrap_or_else(|| PathBuf::from(format!(".env.{}", name)));
        self.stages.insert(name.to_string(), path);

        Ok(&self.stages[name])
    }
}

/// Validate a stage name: lowercase ASCII letters, digits, and dashes,
/// starting with a letter.
pub fn validate_stage_name(name: &str) -> Result<()> {
    let invalid = |reason: &str| {
        Err(ValidationError::InvalidStageName {
            name: name.to_string(),
            reason: reason.to_string(),
        }
        .into())
    };

    if name.is_empty() {
        return invalid("cannot be empty");
    }
    if !name.chars().next().is_some_and(|c| c.is_ascii_lowercase()) {
        return invalid("must start with a lowercase letter");
    }
    if !name
        .chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
    {
        return invalid("only lowercase letters, digits, and dashes are allowed");
    }

    Ok(())
}

/// Ensure `.gitignore` contains entries to ignore `.env` files.
///
/// Adds `.env`, `.env.*`, and `!.env.example` if not already present.
///
/// # Errors
///
/// Returns error if file operations fail.
pub fn ensure_gitignore() -> Result<()> {
    let gitignore = std::path::Path::new(".gitignore");

    let existing = if gitignore.exists() {
        std::fs::read_to_string(gitignore)?
    } else {
        String::new()
    };

    let mut updated = existing.clone();
    for entry in constants::GITIGNORE_ENTRIES {
        if !existing.lines().any(|l| l.trim() == *entry) {
            if !updated.is_empty() && !updated.ends_with('\n') {
                updated.push('\n');
            }
            updated.push_str(entry);
            updated.push('\n');
        }
    }

    if updated != existing {
        std::fs::write(gitignore, updated)?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    struct TestContext {
        _tmp: TempDir,
        _original_dir: std::path::PathBuf,
    }

    impl Drop for TestContext {
        fn drop(&mut self) {
            // Restore original directory before tempdir is cleaned up
            let _ = std::env::set_current_dir(&self._original_dir);
        }
    }

    fn setup_test_dir() -> TestContext {
        let tmp = TempDir::new().unwrap();
        let original_dir = std::env::current_dir().unwrap();
        std::env::set_current_dir(tmp.path()).unwrap();
        TestContext {
            _tmp: tmp,
            _original_dir: original_dir,
        }
    }

    #[test]
    fn test_config_save_load_roundtrip() {
        let _ctx = setup_test_dir();

        let mut config = Config::new("/mnt/shared/warren");
        config
            .add_stage("production", Some(PathBuf::from(".env.prod")))
            .unwrap();
        config.save().unwrap();
        assert!(Config::exists());

        let loaded = Config::load().unwrap();
        assert_eq!(loaded.project_id, config.project_id);
        assert_eq!(loaded.remote, "/mnt/shared/warren");
        assert_eq!(loaded.stages.len(), 2);
        assert_eq!(
            loaded.stage_path("production").unwrap(),
            &PathBuf::from(".env.prod")
        );
    }

    #[test]
    fn test_new_config_has_default_stage() {
        let config = Config::new("remote");

        assert_eq!(
            config.stage_path(DEFAULT_STAGE).unwrap(),
            &PathBuf::from(DEFAULT_ENV_FILE)
        );
    }

    #[test]
    fn test_project_ids_are_unique() {
        assert_ne!(Config::new("r").project_id, Config::new("r").project_id);
    }

    #[test]
    fn test_load_without_file_is_not_initialized() {
        let _ctx = setup_test_dir();

        let result = Config::load();
        assert!(matches!(
            result,
            Err(crate::error::Error::Config(ConfigError::NotInitialized))
        ));
    }

    #[test]
    fn test_unknown_stage_is_an_error() {
        let config = Config::new("remote");

        let result = config.stage_path("staging");
        assert!(matches!(
            result,
            Err(crate::error::Error::Config(ConfigError::StageNotFound(_)))
        ));
    }

    #[test]
    fn test_add_stage_default_path() {
        let mut config = Config::new("remote");

        config.add_stage("staging", None).unwrap();

        assert_eq!(
            config.stage_path("staging").unwrap(),
            &PathBuf::from(".env.staging")
        );
    }

    #[test]
    fn test_add_stage_rejects_duplicates() {
        let mut config = Config::new("remote");

        config.add_stage("staging", None).unwrap();
        let result = config.add_stage("staging", None);

        assert!(matches!(
            result,
            Err(crate::error::Error::Config(ConfigError::StageExists(_)))
        ));
    }

    #[test]
    fn test_stage_name_validation() {
        assert!(validate_stage_name("development").is_ok());
        assert!(validate_stage_name("qa-2").is_ok());

        assert!(validate_stage_name("").is_err());
        assert!(validate_stage_name("Production").is_err());
        assert!(validate_stage_name("2nd").is_err());
        assert!(validate_stage_name("has space").is_err());
        assert!(validate_stage_name("under_score").is_err());
    }

    #[test]
    fn test_ensure_gitignore_adds_entries_once() {
        let _ctx = setup_test_dir();

        ensure_gitignore().unwrap();
        ensure_gitignore().unwrap();

        let contents = std::fs::read_to_string(".gitignore").unwrap();
        assert_eq!(contents.matches(".env.*").count(), 1);
        assert!(contents.contains("!.env.example"));
    }
}

//! Test support utilities for warren integration tests.
//!
//! Provides reusable test environment setup and helper commands.

#![allow(dead_code)]

pub mod assertions;
pub mod commands;

#[allow(unused_imports)]
pub use assertions::*;

use std::fs;
use tempfile::TempDir;

/// Passphrase used by every test command unless overridden.
pub const PASSPHRASE: &str = "a shared team passphrase";

/// Test environment with isolated temp directories.
///
/// Each test gets its own temporary project dir, home dir, and remote
/// store dir. No process-global state is mutated — child processes use
/// `.current_dir()` so tests can safely run in parallel.
pub struct Test {
    /// Temporary directory for the test project
    pub dir: TempDir,
    /// Temporary home directory (keyring lives here)
    pub home: TempDir,
    /// Temporary remote store directory
    pub remote: TempDir,
}

impl Test {
    /// Create a new empty test environment.
    ///
    /// Sets up temporary directories for project, home, and remote.
    /// Does NOT change the process working directory — child commands
    /// use `.current_dir()` for isolation instead.
    pub fn new() -> Self {
        let dir = TempDir::new().expect("failed to create temp dir");
        let home = TempDir::new().expect("failed to create temp home");
        let remote = TempDir::new().expect("failed to create temp remote");

        Self { dir, home, remote }
    }

    /// Create a test environment with the project initialized.
    pub fn init() -> Self {
        let t = Self::new();
        let output = t.init_cmd();
        assert!(
            output.status.success(),
            "Failed to initialize project: {}",
            String::from_utf8_lossy(&output.stderr)
        );
        t
    }

    /// A second device on the same project: fresh project dir and home,
    /// the same remote and the same .warren.json.
    pub fn join(other: &Test) -> Self {
        let dir = TempDir::new().expect("failed to create temp dir");
        let home = TempDir::new().expect("failed to create temp home");
        let remote = TempDir::new().expect("failed to create temp remote");

        fs::copy(
            other.dir.path().join(".warren.json"),
            dir.path().join(".warren.json"),
        )
        .expect("failed to copy project config");

        // The copied config points at `other`'s remote; this device's
        // own remote dir goes unused.
        Self { dir, home, remote }
    }

    /// Write the default stage's local env file.
    pub fn write_env(&self, contents: &str) {
        fs::write(self.dir.path().join(".env"), contents).expect("failed to write .env");
    }

    /// Write a named env file in the project dir.
    pub fn write_env_file(&self, name: &str, contents: &str) {
        fs::write(self.dir.path().join(name), contents).expect("failed to write env file");
    }

    /// Read the default stage's local env file.
    pub fn read_env(&self) -> String {
        fs::read_to_string(self.dir.path().join(".env")).expect("failed to read .env")
    }
}

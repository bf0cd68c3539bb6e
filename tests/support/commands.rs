//! Command helper methods for Test.

use super::{Test, PASSPHRASE};
use assert_cmd::Command;
use std::process::Output;

impl Test {
    /// Create a warren command with correct environment variables.
    ///
    /// Returns a Command configured with:
    /// - HOME set to the temporary home directory
    /// - WARREN_PASSPHRASE set to the shared test passphrase
    /// - Current directory set to the test project directory
    pub fn cmd(&self) -> Command {
        self.cmd_with_passphrase(PASSPHRASE)
    }

    /// Same as `cmd`, with an explicit passphrase.
    pub fn cmd_with_passphrase(&self, passphrase: &str) -> Command {
        let mut cmd = Command::cargo_bin("warren").expect("failed to find warren binary");
        cmd.env("HOME", self.home.path());
        // Windows uses USERPROFILE instead of HOME for home directory
        cmd.env("USERPROFILE", self.home.path());
        cmd.env("WARREN_PASSPHRASE", passphrase);
        cmd.current_dir(self.dir.path());
        cmd
    }

    /// Shortcut for `warren init <remote>`.
    pub fn init_cmd(&self) -> Output {
        self.cmd()
            .args(["init", &self.remote.path().display().to_string()])
            .output()
            .expect("failed to run warren init")
    }

    /// Shortcut for `warren push`.
    pub fn push(&self) -> Output {
        self.cmd()
            .arg("push")
            .output()
            .expect("failed to run warren push")
    }

    /// Shortcut for `warren push --message <msg>`.
    pub fn push_msg(&self, msg: &str) -> Output {
        self.cmd()
            .args(["push", "--message", msg])
            .output()
            .expect("failed to run warren push")
    }

    /// Shortcut for `warren push --stage <stage>`.
    pub fn push_stage(&self, stage: &str) -> Output {
        self.cmd()
            .args(["push", "--stage", stage])
            .output()
            .expect("failed to run warren push")
    }

    /// Shortcut for `warren push --force`.
    pub fn push_force(&self) -> Output {
        self.cmd()
            .args(["push", "--force"])
            .output()
            .expect("failed to run warren push --force")
    }

    /// Shortcut for `warren pull`.
    pub fn pull(&self) -> Output {
        self.cmd()
            .arg("pull")
            .output()
            .expect("failed to run warren pull")
    }

    /// Shortcut for `warren pull --stage <stage>`.
    pub fn pull_stage(&self, stage: &str) -> Output {
        self.cmd()
            .args(["pull", "--stage", stage])
            .output()
            .expect("failed to run warren pull")
    }

    /// Shortcut for `warren diff`.
    pub fn diff(&self) -> Output {
        self.cmd()
            .arg("diff")
            .output()
            .expect("failed to run warren diff")
    }

    /// Shortcut for `warren history`.
    pub fn history(&self) -> Output {
        self.cmd()
            .arg("history")
            .output()
            .expect("failed to run warren history")
    }

    /// Shortcut for `warren rollback <version>`.
    pub fn rollback(&self, version: u64) -> Output {
        self.cmd()
            .args(["rollback", &version.to_string()])
            .output()
            .expect("failed to run warren rollback")
    }

    /// Shortcut for `warren stage add <name>`.
    pub fn stage_add(&self, name: &str) -> Output {
        self.cmd()
            .args(["stage", "add", name])
            .output()
            .expect("failed to run warren stage add")
    }

    /// Shortcut for `warren run -- <command...>`.
    pub fn run(&self, command: &[&str]) -> Output {
        self.cmd()
            .args(["run", "--"])
            .args(command)
            .output()
            .expect("failed to run warren run")
    }
}

//! Command-line interface.

pub mod completions;
pub mod diff;
pub mod history;
pub mod init;
pub mod output;
pub mod prompt;
pub mod pull;
pub mod push;
pub mod rollback;
pub mod run;
pub mod stage;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::core::constants::DEFAULT_STAGE;

/// Warren - share encrypted .env files with your team.
#[derive(Parser)]
#[command(
    name = "warren",
    about = "Share encrypted .env files with your team through any dumb blob store",
    version
)]
pub struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// Top-level commands.
#[derive(Subcommand)]
pub enum Command {
    /// Initialize warren in the current directory
    Init {
        /// Remote store location (shared directory or mount)
        remote: String,
    },

    /// Manage stages
    Stage {
        #[command(subcommand)]
        action: StageAction,
    },

    /// Encrypt the local env file and push a new version
    Push {
        /// Stage to push
        #[arg(short, long, default_value = DEFAULT_STAGE)]
        stage: String,
        /// Message recorded with the version
        #[arg(short, long)]
        message: Option<String>,
        /// Push even if nothing changed
        #[arg(short, long)]
        force: bool,
    },

    /// Decrypt the latest version into the local env file
    Pull {
        /// Stage to pull
        #[arg(short, long, default_value = DEFAULT_STAGE)]
        stage: String,
    },

    /// Run a command with the latest remote env injected
    Run {
        /// Stage to load
        #[arg(short, long, default_value = DEFAULT_STAGE)]
        stage: String,
        /// Command and arguments to run
        #[arg(trailing_var_arg = true, required = true)]
        command: Vec<String>,
    },

    /// Compare the local env file against a remote version
    Diff {
        /// Stage to compare
        #[arg(short, long, default_value = DEFAULT_STAGE)]
        stage: String,
        /// Version to compare against (latest by default)
        #[arg(long)]
        version: Option<u64>,
    },

    /// List every pushed version of a stage
    History {
        /// Stage to inspect
        #[arg(short, long, default_value = DEFAULT_STAGE)]
        stage: String,
    },

    /// Re-publish an old version as a new one
    Rollback {
        /// Version to roll back to
        version: u64,
        /// Stage to roll back
        #[arg(short, long, default_value = DEFAULT_STAGE)]
        stage: String,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Supported shells for completions.
#[derive(clap::ValueEnum, Clone, Debug)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
}

/// Stage subcommands.
#[derive(Subcommand)]
pub enum StageAction {
    /// Add a stage
    Add {
        /// Stage name (lowercase letters, digits, dashes)
        name: String,
        /// Local env file path (defaults to .env.{name})
        #[arg(long)]
        path: Option<PathBuf>,
    },

    /// List configured stages
    List,
}

/// Execute a command.
pub fn execute(command: Command) -> crate::error::Result<()> {
    use Command::*;

    match command {
        Init { remote } => init::execute(&remote),
        Stage { action } => match action {
            StageAction::Add { name, path } => stage::add(&name, path),
            StageAction::List => stage::list(),
        },
        Push {
            stage,
            message,
            force,
        } => push::execute(&stage, message, force),
        Pull { stage } => pull::execute(&stage),
        Run { stage, command } => run::execute(&stage, &command),
        Diff { stage, version } => diff::execute(&stage, version),
        History { stage } => history::execute(&stage),
        Rollback { version, stage } => rollback::execute(&stage, version),
        Completions { shell } => completions::execute(shell),
    }
}

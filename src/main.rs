//! Warren - share encrypted .env files with your team.

use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use warren::cli::output;
use warren::cli::{execute, Cli};
use warren::error::{ConfigError, CryptoError, Error, LedgerError};

fn main() {
    let cli = Cli::parse();

    // Initialize tracing subscriber with env-filter support
    let filter = EnvFilter::try_from_env("WARREN_LOG").unwrap_or_else(|_| {
        if cli.verbose {
            EnvFilter::new("warren=debug")
        } else {
            EnvFilter::new("warren=warn")
        }
    });

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).without_time())
        .init();

    if let Err(e) = execute(cli.command) {
        let suggestion = match &e {
            Error::Config(ConfigError::NotInitialized) => Some("run: warren init <remote>"),
            Error::Config(ConfigError::StageNotFound(_)) => {
                Some("run: warren stage add <name>")
            }
            Error::Crypto(CryptoError::AuthenticationFailed) => {
                Some("check the team passphrase and try again")
            }
            Error::Ledger(LedgerError::EmptyHistory(_)) => Some("run: warren push"),
            _ => None,
        };

        output::error(&e.to_string());
        if let Some(hint) = suggestion {
            output::hint(hint);
        }
        std::process::exit(1);
    }
}

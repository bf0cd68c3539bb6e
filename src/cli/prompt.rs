//! Passphrase prompting.
//!
//! The interactive [`PassphraseSource`] behind every CLI command. The
//! `WARREN_PASSPHRASE` environment variable short-circuits the prompt
//! for CI and scripted use.

use std::io::IsTerminal;

use dialoguer::Password;
use zeroize::Zeroizing;

use crate::core::constants::PASSPHRASE_ENV;
use crate::core::workspace::PassphraseSource;
use crate::error::{Result, ValidationError};

/// Prompts on the terminal, unless the environment already answers.
pub struct Prompt;

impl PassphraseSource for Prompt {
    fn passphrase(&self, confirm: bool) -> Result<Zeroizing<String>> {
        if let Ok(value) = std::env::var(PASSPHRASE_ENV) {
            return Ok(Zeroizing::new(value));
        }

        if !std::io::stdin().is_terminal() {
            return Err(ValidationError::PassphraseUnavailable(PASSPHRASE_ENV).into());
        }

        let mut password = Password::new().with_prompt("Team passphrase");
        if confirm {
            password = password
                .with_confirmation("Confirm passphrase", "passphrases do not match");
        }

        Ok(Zeroizing::new(password.interact()?))
    }
}

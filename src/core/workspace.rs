//! Sync orchestrator.
//!
//! Ties config, keyring, crypto, and the remote ledger together behind
//! the operations the CLI exposes: push, pull, fetch, diff, history,
//! rollback. Key material is obtained lazily — the keyring first, a
//! passphrase prompt only when the cache misses or has gone stale.

use std::path::PathBuf;

use tracing::{debug, info, warn};
use zeroize::Zeroizing;

use crate::core::config::Config;
use crate::core::constants::MIN_PASSPHRASE_LEN;
use crate::core::diff::EnvDiff;
use crate::core::env::{self, EnvFile};
use crate::core::envelope::{self, Payload};
use crate::core::kdf::{self, DerivedKey, Salt};
use crate::core::keyring::Keyring;
use crate::core::ledger::{Ledger, StageHistory, VersionMeta};
use crate::core::remote::{DirStore, RemoteStore};
use crate::error::{CryptoError, Error, LedgerError, Result, ValidationError};

/// Where a passphrase comes from when the keyring misses.
///
/// The CLI implements this over an interactive prompt and an
/// environment variable override; tests supply a fixed string.
pub trait PassphraseSource {
    /// Obtain the passphrase. `confirm` is set when establishing a new
    /// project key, where a typo would be silently destructive.
    ///
    /// # Errors
    ///
    /// Returns error if no passphrase can be obtained.
    fn passphrase(&self, confirm: bool) -> Result<Zeroizing<String>>;
}

/// Result of a push.
#[derive(Debug)]
pub enum PushOutcome {
    /// A new version was appended.
    Pushed(VersionMeta),
    /// The local file matched the latest remote version byte for byte.
    Unchanged { sequence: u64 },
}

/// A loaded project: config, device keyring, and the remote store.
pub struct Workspace {
    config: Config,
    keyring: Keyring,
    remote: Box<dyn RemoteStore>,
}

impl Workspace {
    /// Open the project in the current directory with the default
    /// keyring and the remote named by the config.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::NotInitialized` outside a project, or
    /// `RemoteError::Network` if the remote cannot be opened.
    pub fn open() -> Result<Self> {
        let config = Config::load()?;
        let keyring = Keyring::open_default()?;
        let remote: Box<dyn RemoteStore> = Box::new(DirStore::open(&config.remote)?);

        Ok(Self {
            config,
            keyring,
            remote,
        })
    }

    /// Assemble a workspace from explicit parts.
    pub fn with_parts(config: Config, keyring: Keyring, remote: Box<dyn RemoteStore>) -> Self {
        Self {
            config,
            keyring,
            remote,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    fn ledger(&self) -> Ledger<'_> {
        Ledger::new(self.remote.as_ref(), &self.config.project_id)
    }

    /// Encrypt the stage's local env file and append it to the remote
    /// history.
    ///
    /// Skips the append when the local file matches the latest remote
    /// version byte for byte, unless `force` is set.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::StageNotFound` for unknown stages,
    /// `ValidationError::BinaryPayload` if the local file is not text,
    /// and `CryptoError::AuthenticationFailed` if the passphrase does
    /// not match the existing history.
    pub fn push(
        &self,
        stage: &str,
        message: Option<String>,
        force: bool,
        source: &dyn PassphraseSource,
    ) -> Result<PushOutcome> {
        let path = self.config.stage_path(stage)?;
        let bytes = std::fs::read(path)?;
        if std::str::from_utf8(&bytes).is_err() {
            return Err(ValidationError::BinaryPayload(path.display().to_string()).into());
        }

        let mut history = self
            .ledger()
            .load(stage)?
            .unwrap_or_else(|| StageHistory::empty(stage));

        // Reuse the salt the existing history was sealed under; confirm
        // the passphrase only when establishing a brand new key.
        let (key, salt) = match history.latest() {
            Some(latest) => {
                let payload = latest.payload()?;
                let (key, salt) = self.obtain_key(Some(payload.salt()), false, source)?;
                let current = self.open_payload(&payload, &key)?;

                if !force && current.as_slice() == bytes.as_slice() {
                    info!(stage, sequence = latest.sequence, "push skipped, no changes");
                    return Ok(PushOutcome::Unchanged {
                        sequence: latest.sequence,
                    });
                }
                (key, salt)
            }
            None => self.obtain_key(None, true, source)?,
        };

        let sealed = envelope::seal(&bytes, &key)?;
        let meta = history.append(Payload::new(salt, sealed).encode(), message);
        self.ledger().save(stage, &history)?;

        info!(stage, sequence = meta.sequence, "pushed");
        Ok(PushOutcome::Pushed(meta))
    }

    /// Decrypt the latest remote version and write it over the stage's
    /// local env file (0600 on Unix).
    ///
    /// # Errors
    ///
    /// Returns `LedgerError::EmptyHistory` if nothing has been pushed.
    pub fn pull(
        &self,
        stage: &str,
        source: &dyn PassphraseSource,
    ) -> Result<(VersionMeta, PathBuf)> {
        let path = self.config.stage_path(stage)?.clone();
        let (meta, plaintext) = self.fetch(stage, None, source)?;

        env::write_secret_file(&path, &plaintext)?;

        info!(stage, sequence = meta.sequence, path = %path.display(), "pulled");
        Ok((meta, path))
    }

    /// Decrypt a remote version into memory without touching local
    /// files. `sequence` of `None` means the latest version.
    ///
    /// # Errors
    ///
    /// Returns `LedgerError::EmptyHistory` if nothing has been pushed,
    /// or `LedgerError::VersionNotFound` for an unknown sequence.
    pub fn fetch(
        &self,
        stage: &str,
        sequence: Option<u64>,
        source: &dyn PassphraseSource,
    ) -> Result<(VersionMeta, Zeroizing<Vec<u8>>)> {
        // Unknown stages fail before the remote is consulted.
        self.config.stage_path(stage)?;

        let history = self
            .ledger()
            .load(stage)?
            .ok_or_else(|| LedgerError::EmptyHistory(stage.to_string()))?;

        let record = match sequence {
            Some(n) => history.version(n)?,
            None => history
                .latest()
                .ok_or_else(|| LedgerError::EmptyHistory(stage.to_string()))?,
        };

        let payload = record.payload()?;
        let (key, _) = self.obtain_key(Some(payload.salt()), false, source)?;
        let plaintext = self.open_payload(&payload, &key)?;

        debug!(stage, sequence = record.sequence, "fetched version");
        Ok((VersionMeta::from(record), plaintext))
    }

    /// Compare the local env file against a remote version (latest by
    /// default). A missing local file diffs as empty.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::BinaryPayload` if the remote plaintext
    /// is not text.
    pub fn diff(
        &self,
        stage: &str,
        sequence: Option<u64>,
        source: &dyn PassphraseSource,
    ) -> Result<(VersionMeta, EnvDiff)> {
        let path = self.config.stage_path(stage)?.clone();
        let (meta, plaintext) = self.fetch(stage, sequence, source)?;

        let remote_text = std::str::from_utf8(&plaintext)
            .map_err(|_| ValidationError::BinaryPayload(stage.to_string()))?;
        let remote = EnvFile::parse(remote_text, path.clone());

        let local = if path.exists() {
            EnvFile::load(&path)?
        } else {
            EnvFile::parse("", path)
        };

        Ok((meta, EnvDiff::compute(local.entries(), remote.entries())))
    }

    /// List every version of a stage, oldest first.
    ///
    /// # Errors
    ///
    /// Returns `LedgerError::EmptyHistory` if nothing has been pushed.
    pub fn history(&self, stage: &str) -> Result<Vec<VersionMeta>> {
        self.config.stage_path(stage)?;

        let history = self
            .ledger()
            .load(stage)?
            .ok_or_else(|| LedgerError::EmptyHistory(stage.to_string()))?;

        Ok(history.versions.iter().map(VersionMeta::from).collect())
    }

    /// Re-publish an old version as a new one. The sealed payload is
    /// copied verbatim, so no passphrase is needed and the target
    /// version survives untouched.
    ///
    /// # Errors
    ///
    /// Returns `LedgerError::VersionNotFound` for an unknown sequence.
    pub fn rollback(&self, stage: &str, sequence: u64) -> Result<VersionMeta> {
        self.config.stage_path(stage)?;

        let mut history = self
            .ledger()
            .load(stage)?
            .ok_or_else(|| LedgerError::EmptyHistory(stage.to_string()))?;

        let payload = history.version(sequence)?.payload.clone();
        let meta = history.append(payload, Some(format!("rollback to v{}", sequence)));
        self.ledger().save(stage, &history)?;

        info!(stage, from = sequence, to = meta.sequence, "rolled back");
        Ok(meta)
    }

    /// Get the project key: the keyring if it holds a fresh entry,
    /// otherwise derive from a prompted passphrase and cache the result.
    ///
    /// A cached entry whose salt disagrees with the remote payload's
    /// salt is stale and ignored.
    fn obtain_key(
        &self,
        salt: Option<Salt>,
        confirm: bool,
        source: &dyn PassphraseSource,
    ) -> Result<(DerivedKey, Salt)> {
        if let Some((key, cached_salt)) = self.keyring.get(&self.config.project_id)? {
            match salt {
                Some(expected) if expected != cached_salt => {
                    warn!("cached key predates current remote history, re-deriving");
                }
                _ => return Ok((key, cached_salt)),
            }
        }

        let passphrase = source.passphrase(confirm)?;
        if passphrase.len() < MIN_PASSPHRASE_LEN {
            return Err(ValidationError::PassphraseTooShort {
                min: MIN_PASSPHRASE_LEN,
            }
            .into());
        }

        let (key, salt) = kdf::derive(&passphrase, salt);
        self.keyring.persist(&self.config.project_id, &salt, &key)?;

        Ok((key, salt))
    }

    /// Open a payload, dropping the cached key on authentication
    /// failure so the next operation re-prompts instead of failing the
    /// same way again.
    fn open_payload(&self, payload: &Payload, key: &DerivedKey) -> Result<Zeroizing<Vec<u8>>> {
        match envelope::open(payload.envelope(), key) {
            Ok(plaintext) => Ok(plaintext),
            Err(e) => {
                if matches!(e, Error::Crypto(CryptoError::AuthenticationFailed)) {
                    warn!("authentication failed, invalidating cached key");
                    self.keyring.invalidate(&self.config.project_id)?;
                }
                Err(e)
            }
        }
    }
}

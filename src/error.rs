//! Error types.
//!
//! One top-level [`Error`] composed of domain-specific sub-errors so
//! callers can match on the failure class (config, keyring, crypto,
//! remote, ledger) without string inspection.

use thiserror::Error;

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level error for all warren operations.
#[derive(Error, Debug)]
pub enum Error {
    #[error("config error: {0}")]
    Config(#[from] ConfigError),

    #[error("keyring error: {0}")]
    Keyring(#[from] KeyringError),

    #[error(transparent)]
    Crypto(#[from] CryptoError),

    #[error(transparent)]
    Remote(#[from] RemoteError),

    #[error(transparent)]
    Ledger(#[from] LedgerError),

    #[error("{0}")]
    Validation(#[from] ValidationError),

    #[error("prompt error: {0}")]
    Prompt(#[from] dialoguer::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Project configuration (`.warren.json`) errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("not initialized: no .warren.json in this directory")]
    NotInitialized,

    #[error("already initialized: .warren.json exists")]
    AlreadyInitialized,

    #[error("failed to read config: {0}")]
    ReadFile(#[source] std::io::Error),

    #[error("invalid config: {0}")]
    Parse(#[source] serde_json::Error),

    #[error("failed to serialize config: {0}")]
    Serialize(#[source] serde_json::Error),

    #[error("unknown stage '{0}'")]
    StageNotFound(String),

    #[error("stage '{0}' already exists")]
    StageExists(String),
}

/// Device keyring errors.
#[derive(Error, Debug)]
pub enum KeyringError {
    #[error("failed to read keyring: {0}")]
    ReadFailed(#[source] std::io::Error),

    #[error("failed to write keyring: {0}")]
    WriteFailed(#[source] std::io::Error),

    #[error("corrupt keyring: {0}")]
    Corrupt(String),

    #[error("unable to determine home directory")]
    NoHomeDir,
}

/// Encryption and envelope errors.
#[derive(Error, Debug)]
pub enum CryptoError {
    /// Tag verification failed: wrong key or tampered payload.
    #[error("authentication failed: incorrect passphrase or tampered payload")]
    AuthenticationFailed,

    /// The encoded envelope or payload cannot be split into its fields.
    #[error("malformed envelope: {0}")]
    Format(String),

    #[error("encryption failed: {0}")]
    Encrypt(String),
}

/// Remote blob store errors.
#[derive(Error, Debug)]
pub enum RemoteError {
    #[error("remote object not found: {0}")]
    NotFound(String),

    /// The store was unreachable or returned an unexpected response.
    /// Never retried automatically at this layer.
    #[error("remote store error: {0}")]
    Network(String),
}

/// Version ledger errors.
#[derive(Error, Debug)]
pub enum LedgerError {
    #[error("version {sequence} does not exist for stage '{stage}'")]
    VersionNotFound { stage: String, sequence: u64 },

    #[error("stage '{0}' has no versions yet")]
    EmptyHistory(String),

    #[error("corrupt history document: {0}")]
    Corrupt(String),
}

/// Input validation errors.
#[derive(Error, Debug)]
pub enum ValidationError {
    #[error("passphrase too short: at least {min} characters required")]
    PassphraseTooShort { min: usize },

    #[error("invalid stage name '{name}': {reason}")]
    InvalidStageName { name: String, reason: String },

    #[error("no command specified")]
    EmptyCommand,

    #[error("decrypted payload for stage '{0}' is not valid UTF-8")]
    BinaryPayload(String),

    #[error("no passphrase available: set {0} or run from a terminal")]
    PassphraseUnavailable(&'static str),
}

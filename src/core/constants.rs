//! Constants used throughout warren.
//!
//! Centralizes magic strings and cryptographic parameters.

/// Project configuration file name (checked into source control).
pub const CONFIG_FILE: &str = ".warren.json";

/// Device keyring directory relative to HOME (`~/.warren`).
pub const KEYRING_DIR: &str = ".warren";

/// Device keyring file name inside [`KEYRING_DIR`].
pub const KEYRING_FILE: &str = "keyring.json";

/// The default stage. Legacy (pre-stage) payloads are only ever
/// resolved for this stage.
pub const DEFAULT_STAGE: &str = "development";

/// Local env file for the default stage.
pub const DEFAULT_ENV_FILE: &str = ".env";

/// PBKDF2-HMAC-SHA256 iteration count. Fixed so the same
/// passphrase+salt always reproduces the same key on any device.
pub const PBKDF2_ITERATIONS: u32 = 310_000;

/// Key derivation salt length in bytes.
pub const SALT_LEN: usize = 16;

/// Symmetric key length in bytes (AES-256).
pub const KEY_LEN: usize = 32;

/// AES-GCM IV length in bytes (96 bits).
pub const IV_LEN: usize = 12;

/// AES-GCM authentication tag length in bytes (128 bits).
pub const TAG_LEN: usize = 16;

/// Delimiter between base64 fields in the envelope wire form.
pub const FIELD_DELIMITER: char = ':';

/// Minimum passphrase length, enforced by the orchestrator.
pub const MIN_PASSPHRASE_LEN: usize = 8;

/// Environment variable consulted before prompting for a passphrase.
pub const PASSPHRASE_ENV: &str = "WARREN_PASSPHRASE";

/// Gitignore entries to protect decrypted env files.
pub const GITIGNORE_ENTRIES: &[&str] = &[".env", ".env.*", "!.env.example"];

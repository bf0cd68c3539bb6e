//! Passphrase key derivation.
//!
//! PBKDF2-HMAC-SHA256 with a fixed iteration count and output length:
//! intentionally slow to resist offline brute force of weak
//! passphrases, deterministic so the same passphrase+salt reproduces
//! the same key on every device.

use pbkdf2::pbkdf2_hmac;
use rand::rngs::OsRng;
use rand::RngCore;
use sha2::Sha256;
use zeroize::Zeroize;

use crate::core::constants::{KEY_LEN, PBKDF2_ITERATIONS, SALT_LEN};

/// A key derivation salt.
pub type Salt = [u8; SALT_LEN];

/// A derived symmetric key. Wiped from memory on drop.
#[derive(Clone)]
pub struct DerivedKey {
    bytes: [u8; KEY_LEN],
}

impl DerivedKey {
    /// Wrap raw key bytes.
    pub fn from_bytes(bytes: [u8; KEY_LEN]) -> Self {
        Self { bytes }
    }

    /// Raw key bytes.
    pub fn as_bytes(&self) -> &[u8; KEY_LEN] {
        &self.bytes
    }
}

impl Drop for DerivedKey {
    fn drop(&mut self) {
        self.bytes.zeroize();
    }
}

impl std::fmt::Debug for DerivedKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("DerivedKey(..)")
    }
}

/// Generate a fresh random salt.
pub fn generate_salt() -> Salt {
    let mut salt = [0u8; SALT_LEN];
    OsRng.fill_bytes(&mut salt);
    salt
}

/// Derive a symmetric key from a passphrase.
///
/// When `salt` is absent a fresh random one is generated; the caller
/// must carry it alongside the resulting ciphertext so other devices
/// can re-derive the key. Derivation itself cannot fail for well-formed
/// input — passphrase length policy lives in the orchestrator.
pub fn derive(passphrase: &str, salt: Option<Salt>) -> (DerivedKey, Salt) {
    let salt = salt.unwrap_or_else(generate_salt);

    let mut key = [0u8; KEY_LEN];
    pbkdf2_hmac::<Sha256>(passphrase.as_bytes(), &salt, PBKDF2_ITERATIONS, &mut key);

    (DerivedKey::from_bytes(key), salt)
}

//! Device keyring.
//!
//! Per-device cache of derived keys at `~/.warren/keyring.json`, never
//! checked in. One active entry per project, shared across all of its
//! stages — the salt travels with each remote payload, the keyring only
//! spares the user from re-typing the passphrase. A cached key is never
//! trusted beyond its next authenticated decryption: any authentication
//! failure invalidates the entry.

use std::fs;
use std::path::{Path, PathBuf};

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::core::constants::{KEYRING_DIR, KEYRING_FILE, KEY_LEN, SALT_LEN};
use crate::core::kdf::{DerivedKey, Salt};
use crate::error::{KeyringError, Result};

/// One cached derived key.
#[derive(Debug, Serialize, Deserialize)]
struct KeyringEntry {
    project_id: String,
    /// base64-encoded key derivation salt
    salt: String,
    /// base64-encoded derived key
    derived_key: String,
    created_at: DateTime<Utc>,
}

/// The device keyring file.
pub struct Keyring {
    path: PathBuf,
}

impl Keyring {
    /// Open the keyring at its default location (`~/.warren/keyring.json`).
    ///
    /// # Errors
    ///
    /// Returns `KeyringError::NoHomeDir` if the home directory cannot
    /// be determined.
    pub fn open_default() -> Result<Self> {
        let home = dirs::home_dir().ok_or(KeyringError::NoHomeDir)?;
        Ok(Self::at(home.join(KEYRING_DIR).join(KEYRING_FILE)))
    }

    /// Open a keyring at an explicit path.
    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Look up the cached key and salt for a project.
    ///
    /// An entry that cannot be decoded (bad base64, wrong length) is
    /// treated as a miss and removed, so the next operation re-derives
    /// from the passphrase instead of failing on the same bytes forever.
    ///
    /// # Errors
    ///
    /// Returns `KeyringError::ReadFailed`/`Corrupt` if the keyring file
    /// itself cannot be read or parsed.
    pub fn get(&self, project_id: &str) -> Result<Option<(DerivedKey, Salt)>> {
        let entries = self.load()?;

        let Some(entry) = entries.iter().find(|e| e.project_id == project_id) else {
            return Ok(None);
        };

        let decoded = decode_fixed::<SALT_LEN>(&entry.salt, "salt")
            .and_then(|salt| Ok((salt, decode_fixed::<KEY_LEN>(&entry.derived_key, "derived key")?)));

        match decoded {
            Ok((salt, key)) => {
                debug!(project_id, "keyring hit");
                Ok(Some((DerivedKey::from_bytes(key), salt)))
            }
            Err(e) => {
                warn!(project_id, error = %e, "dropping undecodable keyring entry");
                self.invalidate(project_id)?;
                Ok(None)
            }
        }
    }

    /// Cache a derived key for a project. Idempotent upsert: an
    /// existing entry for the project is replaced.
    ///
    /// # Errors
    ///
    /// Returns `KeyringError::WriteFailed` if the file cannot be written.
    pub fn persist(&self, project_id: &str, salt: &Salt, key: &DerivedKey) -> Result<()> {
        let mut entries = self.load()?;
        entries.retain(|e| e.project_id != project_id);
        entries.push(KeyringEntry {
            project_id: project_id.to_string(),
            salt: BASE64.encode(salt),
            derived_key: BASE64.encode(key.as_bytes()),
            created_at: Utc::now(),
        });

        debug!(project_id, "keyring persist");
        self.save(&entries)
    }

    /// Remove the cached entry for a project. Invoked after any
    /// authentication failure so the next use re-prompts. Removing an
    /// absent entry is a no-op.
    ///
    /// # Errors
    ///
    /// Returns `KeyringError::WriteFailed` if the file cannot be written.
    pub fn invalidate(&self, project_id: &str) -> Result<()> {
        let mut entries = self.load()?;
        let before = entries.len();
        entries.retain(|e| e.project_id != project_id);

        if entries.len() != before {
            debug!(project_id, "keyring invalidate");
            self.save(&entries)?;
        }

        Ok(())
    }

    fn load(&self) -> Result<Vec<KeyringEntry>> {
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(KeyringError::ReadFailed(e).into()),
        };

        serde_json::from_str(&contents)
            .map_err(|e| KeyringError::Corrupt(e.to_string()).into())
    }

    fn save(&self, entries: &[KeyringEntry]) -> Result<()> {
        if let Some(dir) = self.path.parent() {
            fs::create_dir_all(dir).map_err(KeyringError::WriteFailed)?;
        }

        let contents = serde_json::to_string_pretty(entries)
            .map_err(|e| KeyringError::Corrupt(e.to_string()))?;
        write_private(&self.path, contents.as_bytes()).map_err(KeyringError::WriteFailed)?;

        Ok(())
    }
}

/// Write a file readable only by the owner (0600 on Unix).
fn write_private(path: &Path, contents: &[u8]) -> std::io::Result<()> {
    #[cfg(unix)]
    {
        use std::io::Write;
        use std::os::unix::fs::OpenOptionsExt;

        let mut file = fs::OpenOptions::new()
            .create(true)
            .truncate(true)
            .write(true)
            .mode(0o600)
            .open(path)?;
        file.write_all(contents)?;
        file.flush()?;
    }

    #[cfg(not(unix))]
    {
        fs::write(path, contents)?;
    }

    Ok(())
}

fn decode_fixed<const N: usize>(field: &str, name: &str) -> Result<[u8; N]> {
    let bytes = BASE64
        .decode(field)
        .map_err(|e| KeyringError::Corrupt(format!("{}: {}", name, e)))?;

    bytes.as_slice().try_into().map_err(|_| {
        KeyringError::Corrupt(format!(
            "{}: expected {} bytes, found {}",
            name,
            N,
            bytes.len()
        ))
        .into()
    })
}

//! Directory-backed remote store.
//!
//! Uses a shared directory (network mount, synced folder) as the blob
//! store: one file per key. Writes go through a temp file and rename so
//! readers never observe a partially written object.

use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use tracing::debug;

use super::RemoteStore;
use crate::error::{RemoteError, Result};

/// Filesystem remote store rooted at a directory.
pub struct DirStore {
    root: PathBuf,
}

impl DirStore {
    /// Open a store rooted at `root`, creating the directory if needed.
    ///
    /// # Errors
    ///
    /// Returns `RemoteError::Network` if the directory cannot be created.
    pub fn open(root: impl AsRef<Path>) -> Result<Self> {
        let root = root.as_ref().to_path_buf();
        fs::create_dir_all(&root).map_err(|e| network(&root, e))?;
        Ok(Self { root })
    }

    fn object_path(&self, key: &str) -> PathBuf {
        self.root.join(key)
    }
}

impl RemoteStore for DirStore {
    fn put(&self, key: &str, bytes: &[u8]) -> Result<()> {
        let path = self.object_path(key);

        debug!(key, len = bytes.len(), "remote put");

        // Unique temp file per writer: concurrent puts to the same key
        // each publish a whole document instead of racing on one temp path.
        let mut tmp = tempfile::Builder::new()
            .prefix(".put")
            .suffix(".tmp")
            .tempfile_in(&self.root)
            .map_err(|e| network(&self.root, e))?;
        tmp.write_all(bytes).map_err(|e| network(&path, e))?;
        tmp.persist(&path).map_err(|e| network(&path, e.error))?;

        Ok(())
    }

    fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        let path = self.object_path(key);

        match fs::read(&path) {
            Ok(bytes) => {
                debug!(key, len = bytes.len(), "remote get");
                Ok(Some(bytes))
            }
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(key, "remote get: not found");
                Ok(None)
            }
            Err(e) => Err(network(&path, e).into()),
        }
    }

    fn head(&self, key: &str) -> Result<bool> {
        Ok(self.object_path(key).exists())
    }
}

fn network(path: &Path, e: std::io::Error) -> RemoteError {
    RemoteError::Network(format!("{}: {}", path.display(), e))
}

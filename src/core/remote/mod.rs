//! Remote blob store.
//!
//! The untrusted intermediary: any object store exposing put/get/head.
//! It only ever sees sealed payloads. Implementations must not retry on
//! failure — a masked failed write could desynchronize local and remote
//! state.
//!
//! ## Adding a new store backend
//!
//! 1. Implement the `RemoteStore` trait
//! 2. Add the implementation in a new file (e.g., `s3.rs`, `http.rs`)
//! 3. Re-export from this module

mod address;
mod fs;
mod memory;

pub use address::{locate, locate_legacy, read_candidates, write_key, Candidate, Source};
pub use fs::DirStore;
pub use memory::{MemoryStore, UnreachableStore};

use crate::error::Result;

/// Object store abstraction for sealed payloads.
///
/// Keys come from the addressing scheme (`address`); values are opaque
/// bytes. Calls are blocking and bounded only by the store's own
/// timeout semantics.
pub trait RemoteStore {
    /// Store bytes under a key, replacing any existing object whole.
    ///
    /// # Errors
    ///
    /// Returns `RemoteError::Network` if the store is unreachable or
    /// the write fails.
    fn put(&self, key: &str, bytes: &[u8]) -> Result<()>;

    /// Fetch the object at a key, or `None` if it does not exist.
    ///
    /// # Errors
    ///
    /// Returns `RemoteError::Network` on any failure other than a
    /// clean not-found.
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>>;

    /// Whether an object exists at a key.
    ///
    /// # Errors
    ///
    /// Returns `RemoteError::Network` if existence cannot be determined.
    fn head(&self, key: &str) -> Result<bool>;
}

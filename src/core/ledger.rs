//! Append-only version history.
//!
//! Each stage's remote object is a JSON document holding every version
//! ever pushed, newest last. The whole document is rewritten on every
//! append, so a single store put replaces history and latest version
//! together — there is no window where they disagree. Concurrent pushes
//! are last-writer-wins on the entire document.

use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::core::envelope::Payload;
use crate::core::remote::{self, RemoteStore, Source};
use crate::error::{LedgerError, Result};

/// One pushed version: metadata plus the sealed payload, base64 wire
/// format.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VersionRecord {
    /// 1-based, strictly increasing within a stage.
    pub sequence: u64,
    pub timestamp: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Sealed payload in `salt:iv:tag:ciphertext` form.
    pub payload: String,
}

impl VersionRecord {
    /// Decode the sealed payload carried by this version.
    ///
    /// # Errors
    ///
    /// Returns `CryptoError::Format` if the stored payload is malformed.
    pub fn payload(&self) -> Result<Payload> {
        Payload::parse(&self.payload)
    }
}

/// Version metadata without the payload, for display.
#[derive(Debug, Clone)]
pub struct VersionMeta {
    pub sequence: u64,
    pub timestamp: DateTime<Utc>,
    pub message: Option<String>,
}

impl From<&VersionRecord> for VersionMeta {
    fn from(record: &VersionRecord) -> Self {
        Self {
            sequence: record.sequence,
            timestamp: record.timestamp,
            message: record.message.clone(),
        }
    }
}

/// The full history of one stage, as stored remotely.
#[derive(Debug, Serialize, Deserialize)]
pub struct StageHistory {
    pub stage: String,
    /// Ascending by sequence; never empty once stored.
    pub versions: Vec<VersionRecord>,
}

impl StageHistory {
    /// An empty history for a stage that has never been pushed.
    pub fn empty(stage: &str) -> Self {
        Self {
            stage: stage.to_string(),
            versions: Vec::new(),
        }
    }

    /// Wrap a bare legacy payload as a one-version history.
    ///
    /// Legacy objects predate versioning and carry no metadata, so the
    /// import gets sequence 1 and the epoch as its timestamp.
    pub fn from_legacy_payload(stage: &str, payload: &str) -> Self {
        Self {
            stage: stage.to_string(),
            versions: vec![VersionRecord {
                sequence: 1,
                timestamp: Utc.timestamp_opt(0, 0).single().unwrap_or_else(Utc::now),
                message: Some("imported from legacy storage".to_string()),
                payload: payload.to_string(),
            }],
        }
    }

    /// The most recent version.
    pub fn latest(&self) -> Option<&VersionRecord> {
        self.versions.last()
    }

    /// Look up a version by sequence number.
    ///
    /// # Errors
    ///
    /// Returns `LedgerError::VersionNotFound` if no version carries
    /// that sequence.
    pub fn version(&self, sequence: u64) -> Result<&VersionRecord> {
        self.versions
            .iter()
            .find(|v| v.sequence == sequence)
            .ok_or_else(|| {
                LedgerError::VersionNotFound {
                    stage: self.stage.clone(),
                    sequence,
                }
                .into()
            })
    }

    /// Append a new version with the next sequence number.
    pub fn append(&mut self, payload: String, message: Option<String>) -> VersionMeta {
        let sequence = self.latest().map_or(0, |v| v.sequence) + 1;
        let record = VersionRecord {
            sequence,
            timestamp: Utc::now(),
            message,
            payload,
        };
        let meta = VersionMeta::from(&record);
        self.versions.push(record);
        meta
    }
}

/// Reads and writes stage histories through a remote store.
pub struct Ledger<'a> {
    store: &'a dyn RemoteStore,
    project_id: &'a str,
}

impl<'a> Ledger<'a> {
    pub fn new(store: &'a dyn RemoteStore, project_id: &'a str) -> Self {
        Self { store, project_id }
    }

    /// Load the history for a stage, or `None` if nothing has ever
    /// been pushed.
    ///
    /// Read candidates are tried in order: the versioned primary key
    /// first, then (for the default stage only) the legacy bare key.
    /// A legacy object is wrapped as a one-version history in memory;
    /// it is only rewritten remotely on the next push.
    ///
    /// # Errors
    ///
    /// Returns `LedgerError::Corrupt` if a stored document cannot be
    /// decoded, or `RemoteError::Network` on store failures.
    pub fn load(&self, stage: &str) -> Result<Option<StageHistory>> {
        for candidate in remote::read_candidates(self.project_id, stage) {
            let Some(bytes) = self.store.get(&candidate.key)? else {
                continue;
            };

            debug!(stage, key = %candidate.key, source = ?candidate.source, "ledger load");

            return match candidate.source {
                Source::Primary => {
                    let history: StageHistory = serde_json::from_slice(&bytes)
                        .map_err(|e| LedgerError::Corrupt(e.to_string()))?;
                    Ok(Some(history))
                }
                Source::Legacy => {
                    let payload = String::from_utf8(bytes)
                        .map_err(|e| LedgerError::Corrupt(e.to_string()))?;
                    Ok(Some(StageHistory::from_legacy_payload(stage, &payload)))
                }
            };
        }

        Ok(None)
    }

    /// Write a stage's full history to the primary key, replacing the
    /// stored document whole.
    ///
    /// # Errors
    ///
    /// Returns `LedgerError::Corrupt` if the history cannot be
    /// serialized, or `RemoteError::Network` on store failures.
    pub fn save(&self, stage: &str, history: &StageHistory) -> Result<()> {
        let key = remote::write_key(self.project_id, stage);
        let bytes =
            serde_json::to_vec(history).map_err(|e| LedgerError::Corrupt(e.to_string()))?;

        debug!(stage, key = %key, versions = history.versions.len(), "ledger save");
        self.store.put(&key, &bytes)
    }
}

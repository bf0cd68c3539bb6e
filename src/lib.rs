//! warren — passphrase-encrypted env file sharing for teams.
//!
//! Local `.env` files are sealed with a key derived from a team
//! passphrase and synced through a shared remote store as an
//! append-only version history. The remote only ever sees ciphertext.
//!
//! # Architecture
//!
//! - [`core::kdf`] — passphrase key derivation (PBKDF2-HMAC-SHA256)
//! - [`core::envelope`] — AES-256-GCM sealing and the wire format
//! - [`core::keyring`] — per-device derived key cache
//! - [`core::remote`] — blob store trait, addressing, backends
//! - [`core::ledger`] — append-only per-stage version history
//! - [`core::workspace`] — the orchestrator behind every command
//! - [`cli`] — command definitions and handlers

pub mod cli;
pub mod core;
pub mod error;

pub use error::{Error, Result};

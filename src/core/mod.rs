//! Core sync logic, independent of the CLI.

pub mod config;
pub mod constants;
pub mod diff;
pub mod env;
pub mod envelope;
pub mod kdf;
pub mod keyring;
pub mod ledger;
pub mod remote;
pub mod workspace;

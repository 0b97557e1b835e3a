//! cardbank - local-first bank account store with remote synchronization
//!
//! Accounts live as individual encrypted files on disk, fronted by a chained
//! hash index so reads stay in memory after startup. When a remote account
//! authority is configured and reachable, local changes are mirrored to it
//! best-effort and a push-then-pull reconciliation runs at startup; the local
//! store is always the source of truth for the current session.
//!
//! # Architecture
//!
//! - `config`: path resolution and remote server settings
//! - `error`: custom error types
//! - `models`: the account record and its identifier
//! - `crypto`: the persisted system key and the XOR stream cipher
//! - `storage`: card file store, hash index, and the write-through façade
//! - `remote`: the remote authority client and its wire protocol
//! - `sync`: startup push/pull reconciliation
//! - `services`: teller business operations

pub mod config;
pub mod crypto;
pub mod error;
pub mod models;
pub mod remote;
pub mod services;
pub mod storage;
pub mod sync;

pub use error::{CardBankError, CardBankResult};

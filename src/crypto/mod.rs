//! Cipher layer for card files
//!
//! A reversible XOR stream mask keyed by a persisted 16-byte system key.
//! This is obfuscation for data at rest, not a cryptographic guarantee: there
//! is no authentication, and corruption only surfaces as a later structural
//! parse failure.

pub mod key;
pub mod stream;

pub use key::{SystemKey, KEY_LEN};

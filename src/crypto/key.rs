//! System key management
//!
//! The system key is 16 cryptographically random bytes generated once and
//! persisted as a raw binary file. Every cipher use requires a loaded
//! [`SystemKey`] value, so operating with an uninitialized key is
//! unrepresentable rather than a silent bug.

use std::fmt;
use std::fs;
use std::path::Path;

use rand::rngs::OsRng;
use rand::RngCore;
use sha2::{Digest, Sha256};
use tracing::info;

use crate::error::{CardBankError, CardBankResult};

/// Size of the system key in bytes
pub const KEY_LEN: usize = 16;

/// The persisted 16-byte secret keying the card-file cipher
#[derive(Clone, PartialEq, Eq)]
pub struct SystemKey([u8; KEY_LEN]);

impl SystemKey {
    /// Generate a fresh random key
    pub fn generate() -> Self {
        let mut bytes = [0u8; KEY_LEN];
        OsRng.fill_bytes(&mut bytes);
        Self(bytes)
    }

    /// Build a key from raw bytes
    pub fn from_bytes(bytes: [u8; KEY_LEN]) -> Self {
        Self(bytes)
    }

    /// Raw key bytes
    pub fn as_bytes(&self) -> &[u8; KEY_LEN] {
        &self.0
    }

    /// Persist the key as exactly 16 raw bytes
    pub fn save(&self, path: &Path) -> CardBankResult<()> {
        fs::write(path, self.0).map_err(|e| {
            CardBankError::Io(format!("failed to write key file {}: {}", path.display(), e))
        })
    }

    /// Load a key file, requiring exactly 16 bytes
    pub fn load(path: &Path) -> CardBankResult<Self> {
        let raw = fs::read(path).map_err(|e| {
            CardBankError::Io(format!("failed to read key file {}: {}", path.display(), e))
        })?;

        if raw.len() != KEY_LEN {
            return Err(CardBankError::CorruptRecord(format!(
                "key file {} holds {} bytes, expected {}",
                path.display(),
                raw.len(),
                KEY_LEN
            )));
        }

        let mut bytes = [0u8; KEY_LEN];
        bytes.copy_from_slice(&raw);
        Ok(Self(bytes))
    }

    /// Load the key, generating and persisting a new one if the file is absent
    ///
    /// This is the startup path: no account operation can proceed without it.
    pub fn load_or_generate(path: &Path) -> CardBankResult<Self> {
        if path.exists() {
            return Self::load(path);
        }

        let key = Self::generate();
        key.save(path)?;
        info!(path = %path.display(), "generated new system key");
        Ok(key)
    }

    /// Stable client identifier derived from the key
    ///
    /// Hex-encoded SHA-256 of the raw key bytes; sent to the remote authority
    /// as the `X-Client-Key` header.
    pub fn client_id(&self) -> String {
        hex::encode(Sha256::digest(self.0))
    }
}

// Keep raw key bytes out of debug output.
impl fmt::Debug for SystemKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SystemKey(..)")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_save_and_load_roundtrip() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("system.key");

        let key = SystemKey::generate();
        key.save(&path).unwrap();

        let loaded = SystemKey::load(&path).unwrap();
        assert_eq!(key, loaded);
    }

    #[test]
    fn test_key_file_is_sixteen_raw_bytes() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("system.key");

        SystemKey::generate().save(&path).unwrap();
        assert_eq!(fs::read(&path).unwrap().len(), KEY_LEN);
    }

    #[test]
    fn test_load_rejects_wrong_size() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("system.key");

        fs::write(&path, b"short").unwrap();
        let err = SystemKey::load(&path).unwrap_err();
        assert!(matches!(err, CardBankError::CorruptRecord(_)));
    }

    #[test]
    fn test_load_missing_file_fails() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("missing.key");
        assert!(SystemKey::load(&path).is_err());
    }

    #[test]
    fn test_load_or_generate_creates_then_reuses() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("system.key");

        let first = SystemKey::load_or_generate(&path).unwrap();
        let second = SystemKey::load_or_generate(&path).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_client_id_is_stable_hex() {
        let key = SystemKey::from_bytes([7u8; KEY_LEN]);
        let id = key.client_id();
        assert_eq!(id.len(), 64);
        assert_eq!(id, key.client_id());
        assert!(id.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_debug_redacts_bytes() {
        let key = SystemKey::from_bytes([0xAB; KEY_LEN]);
        assert_eq!(format!("{:?}", key), "SystemKey(..)");
    }
}

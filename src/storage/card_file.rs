//! Card file store
//!
//! Durable single-account persistence. Each account lives in its own file
//! named `<uuid>.card`, holding the identifier as a clear-text line followed
//! by a fixed 16-byte binary block (password then balance, both u64
//! little-endian) masked with the system key.

use std::fs;
use std::path::{Path, PathBuf};

use crate::crypto::{stream, SystemKey};
use crate::error::{CardBankError, CardBankResult};
use crate::models::{Account, AccountId};

/// File extension for account files
pub const CARD_EXT: &str = "card";

/// Width of the encrypted binary block: two u64 fields
const PAYLOAD_LEN: usize = 16;

/// File-per-account persistent store
pub struct CardStore {
    dir: PathBuf,
    key: SystemKey,
}

impl CardStore {
    /// Open a card store rooted at `dir`, creating the directory if absent
    ///
    /// Directory creation failure is fatal to startup.
    pub fn open(dir: PathBuf, key: SystemKey) -> CardBankResult<Self> {
        if !dir.exists() {
            fs::create_dir_all(&dir).map_err(|e| {
                CardBankError::Io(format!(
                    "failed to create card directory {}: {}",
                    dir.display(),
                    e
                ))
            })?;
        }
        Ok(Self { dir, key })
    }

    /// Directory holding the card files
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn card_path(&self, id: &AccountId) -> PathBuf {
        self.dir.join(format!("{}.{}", id, CARD_EXT))
    }

    /// Check whether a card file exists for this identifier
    pub fn exists(&self, id: &AccountId) -> bool {
        self.card_path(id).exists()
    }

    /// Write an account to its card file, overwriting any existing file
    pub fn save(&self, account: &Account) -> CardBankResult<()> {
        let mut payload = [0u8; PAYLOAD_LEN];
        payload[..8].copy_from_slice(&account.password.to_le_bytes());
        payload[8..].copy_from_slice(&account.balance.to_le_bytes());
        stream::transform(&mut payload, &self.key);

        let id_line = account.id.to_string();
        let mut contents = Vec::with_capacity(id_line.len() + 1 + PAYLOAD_LEN);
        contents.extend_from_slice(id_line.as_bytes());
        contents.push(b'\n');
        contents.extend_from_slice(&payload);

        let path = self.card_path(&account.id);
        fs::write(&path, contents).map_err(|e| {
            CardBankError::Io(format!("failed to write {}: {}", path.display(), e))
        })
    }

    /// Load an account from its card file
    pub fn load(&self, id: &AccountId) -> CardBankResult<Account> {
        let path = self.card_path(id);
        let raw = match fs::read(&path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(CardBankError::not_found(id));
            }
            Err(e) => {
                return Err(CardBankError::Io(format!(
                    "failed to read {}: {}",
                    path.display(),
                    e
                )));
            }
        };

        let newline = raw.iter().position(|&b| b == b'\n').ok_or_else(|| {
            CardBankError::CorruptRecord(format!("{}: missing identifier line", path.display()))
        })?;

        let id_line = std::str::from_utf8(&raw[..newline]).map_err(|_| {
            CardBankError::CorruptRecord(format!(
                "{}: identifier line is not UTF-8",
                path.display()
            ))
        })?;
        let stored_id = AccountId::parse(id_line).map_err(|_| {
            CardBankError::CorruptRecord(format!(
                "{}: malformed identifier line '{}'",
                path.display(),
                id_line
            ))
        })?;
        if stored_id != *id {
            return Err(CardBankError::CorruptRecord(format!(
                "{}: identifier line {} does not match filename",
                path.display(),
                stored_id
            )));
        }

        let body = &raw[newline + 1..];
        if body.len() < PAYLOAD_LEN {
            return Err(CardBankError::CorruptRecord(format!(
                "{}: truncated payload ({} of {} bytes)",
                path.display(),
                body.len(),
                PAYLOAD_LEN
            )));
        }

        let mut payload = [0u8; PAYLOAD_LEN];
        payload.copy_from_slice(&body[..PAYLOAD_LEN]);
        stream::transform(&mut payload, &self.key);

        let mut field = [0u8; 8];
        field.copy_from_slice(&payload[..8]);
        let password = u64::from_le_bytes(field);
        field.copy_from_slice(&payload[8..]);
        let balance = u64::from_le_bytes(field);

        Ok(Account::from_parts(*id, password, balance))
    }

    /// Delete an account's card file
    pub fn delete(&self, id: &AccountId) -> CardBankResult<()> {
        let path = self.card_path(id);
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(CardBankError::not_found(id))
            }
            Err(e) => Err(CardBankError::Io(format!(
                "failed to delete {}: {}",
                path.display(),
                e
            ))),
        }
    }

    /// Enumerate all account identifiers in the directory
    ///
    /// One pass in filesystem order; files whose names are not canonical
    /// identifiers are skipped.
    pub fn list(&self) -> CardBankResult<Vec<AccountId>> {
        let entries = fs::read_dir(&self.dir).map_err(|e| {
            CardBankError::Io(format!(
                "failed to read card directory {}: {}",
                self.dir.display(),
                e
            ))
        })?;

        let mut ids = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| CardBankError::Io(e.to_string()))?;
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some(CARD_EXT) {
                continue;
            }
            let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };
            if let Ok(id) = AccountId::parse(stem) {
                ids.push(id);
            }
        }
        Ok(ids)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn create_test_store() -> (TempDir, CardStore) {
        let temp_dir = TempDir::new().unwrap();
        let store = CardStore::open(temp_dir.path().join("cards"), SystemKey::generate()).unwrap();
        (temp_dir, store)
    }

    #[test]
    fn test_open_creates_directory() {
        let temp_dir = TempDir::new().unwrap();
        let dir = temp_dir.path().join("nested").join("cards");
        let store = CardStore::open(dir.clone(), SystemKey::generate()).unwrap();
        assert!(store.dir().exists());
        assert_eq!(store.dir(), dir);
    }

    #[test]
    fn test_save_load_roundtrip() {
        let (_temp_dir, store) = create_test_store();

        let account = Account::from_parts(AccountId::new(), 1234567, 100);
        store.save(&account).unwrap();

        let loaded = store.load(&account.id).unwrap();
        assert_eq!(loaded, account);
    }

    #[test]
    fn test_file_layout() {
        let (_temp_dir, store) = create_test_store();

        let account = Account::from_parts(AccountId::new(), 7654321, 999);
        store.save(&account).unwrap();

        let path = store.dir().join(format!("{}.card", account.id));
        let raw = fs::read(&path).unwrap();

        // Clear-text identifier line, then exactly 16 encrypted bytes.
        assert_eq!(&raw[..36], account.id.to_string().as_bytes());
        assert_eq!(raw[36], b'\n');
        assert_eq!(raw.len(), 37 + PAYLOAD_LEN);
    }

    #[test]
    fn test_payload_is_masked_on_disk() {
        let (_temp_dir, store) = create_test_store();

        let account = Account::from_parts(AccountId::new(), 1234567, 5000);
        store.save(&account).unwrap();

        let raw = fs::read(store.dir().join(format!("{}.card", account.id))).unwrap();
        let on_disk = &raw[37..45];
        assert_ne!(on_disk, account.password.to_le_bytes());
    }

    #[test]
    fn test_save_overwrites() {
        let (_temp_dir, store) = create_test_store();

        let mut account = Account::from_parts(AccountId::new(), 1234567, 100);
        store.save(&account).unwrap();

        account.balance = 250;
        store.save(&account).unwrap();

        assert_eq!(store.load(&account.id).unwrap().balance, 250);
    }

    #[test]
    fn test_load_missing_is_not_found() {
        let (_temp_dir, store) = create_test_store();
        let err = store.load(&AccountId::new()).unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn test_load_truncated_payload_is_corrupt() {
        let (_temp_dir, store) = create_test_store();

        let account = Account::from_parts(AccountId::new(), 1234567, 100);
        store.save(&account).unwrap();

        let path = store.dir().join(format!("{}.card", account.id));
        let mut raw = fs::read(&path).unwrap();
        raw.truncate(37 + 8);
        fs::write(&path, raw).unwrap();

        let err = store.load(&account.id).unwrap_err();
        assert!(matches!(err, CardBankError::CorruptRecord(_)));
    }

    #[test]
    fn test_load_malformed_identifier_line_is_corrupt() {
        let (_temp_dir, store) = create_test_store();

        let id = AccountId::new();
        let path = store.dir().join(format!("{}.card", id));
        let mut raw = Vec::new();
        raw.extend_from_slice(b"definitely-not-a-uuid\n");
        raw.extend_from_slice(&[0u8; PAYLOAD_LEN]);
        fs::write(&path, raw).unwrap();

        let err = store.load(&id).unwrap_err();
        assert!(matches!(err, CardBankError::CorruptRecord(_)));
    }

    #[test]
    fn test_wrong_key_yields_garbage_fields() {
        let temp_dir = TempDir::new().unwrap();
        let dir = temp_dir.path().join("cards");

        let account = Account::from_parts(AccountId::new(), 1234567, 100);
        {
            let store = CardStore::open(dir.clone(), SystemKey::generate()).unwrap();
            store.save(&account).unwrap();
        }

        // Structurally valid file, silently wrong numbers: no checksum exists.
        let other = CardStore::open(dir, SystemKey::generate()).unwrap();
        let loaded = other.load(&account.id).unwrap();
        assert_ne!(loaded.password, account.password);
    }

    #[test]
    fn test_delete_then_load_fails() {
        let (_temp_dir, store) = create_test_store();

        // Store-level delete has no balance rule; that lives in the teller.
        let id = AccountId::parse("11111111-1111-4111-8111-111111111111").unwrap();
        let account = Account::from_parts(id, 1234567, 0);
        store.save(&account).unwrap();

        store.delete(&id).unwrap();
        assert!(store.load(&id).unwrap_err().is_not_found());
    }

    #[test]
    fn test_delete_missing_fails() {
        let (_temp_dir, store) = create_test_store();
        assert!(store.delete(&AccountId::new()).unwrap_err().is_not_found());
    }

    #[test]
    fn test_list_skips_foreign_files() {
        let (_temp_dir, store) = create_test_store();

        let a = Account::from_parts(AccountId::new(), 1234567, 1);
        let b = Account::from_parts(AccountId::new(), 7654321, 2);
        store.save(&a).unwrap();
        store.save(&b).unwrap();

        fs::write(store.dir().join("notes.txt"), b"ignore me").unwrap();
        fs::write(store.dir().join("bad-name.card"), b"ignore me too").unwrap();

        let mut ids = store.list().unwrap();
        ids.sort_by_key(|id| id.to_string());
        let mut expected = vec![a.id, b.id];
        expected.sort_by_key(|id| id.to_string());
        assert_eq!(ids, expected);
    }
}

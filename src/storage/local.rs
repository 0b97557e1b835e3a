//! Local account store
//!
//! Write-through façade over the card file store and the hash index. Reads
//! prefer the cache and warm it on a miss; writes hit the disk first and only
//! update the cache once the disk operation succeeded, so cache and disk never
//! diverge on the success path.

use tracing::{debug, warn};

use crate::error::CardBankResult;
use crate::models::{Account, AccountId};

use super::card_file::CardStore;
use super::hash_index::HashIndex;

/// Cache-fronted account store
pub struct LocalStore {
    files: CardStore,
    index: HashIndex,
    cache_enabled: bool,
    cache_hits: u64,
}

impl LocalStore {
    /// Create a store with the cache enabled (the canonical configuration)
    pub fn new(files: CardStore) -> Self {
        Self {
            files,
            index: HashIndex::new(),
            cache_enabled: true,
            cache_hits: 0,
        }
    }

    /// Create a store that always reads through to disk
    ///
    /// Strictly dominated by the cached variant; exists as a configuration,
    /// not a separate code path.
    pub fn without_cache(files: CardStore) -> Self {
        Self {
            files,
            index: HashIndex::new(),
            cache_enabled: false,
            cache_hits: 0,
        }
    }

    /// Fetch an account, preferring the cache
    ///
    /// Always returns an owned copy; callers never see a live alias into the
    /// index. A disk miss propagates `NotFound` and caches nothing.
    pub fn get(&mut self, id: &AccountId) -> CardBankResult<Account> {
        if self.cache_enabled {
            if let Some(cached) = self.index.find(id) {
                self.cache_hits += 1;
                return Ok(cached.clone());
            }
        }

        let account = self.files.load(id)?;
        if self.cache_enabled {
            self.index.insert(account.clone());
        }
        Ok(account)
    }

    /// Persist an account, then upsert it into the cache
    ///
    /// A file store failure leaves the cache untouched.
    pub fn put(&mut self, account: &Account) -> CardBankResult<()> {
        self.files.save(account)?;
        if self.cache_enabled {
            self.index.insert(account.clone());
        }
        Ok(())
    }

    /// Delete an account from disk, then evict it from the cache
    ///
    /// A file store failure keeps the cache entry: a failed delete must not
    /// silently evict a still-valid record.
    pub fn remove(&mut self, id: &AccountId) -> CardBankResult<()> {
        self.files.delete(id)?;
        if self.cache_enabled {
            self.index.delete(id);
        }
        Ok(())
    }

    /// Check existence without loading the record
    pub fn exists(&self, id: &AccountId) -> bool {
        if self.cache_enabled && self.index.find(id).is_some() {
            return true;
        }
        self.files.exists(id)
    }

    /// Enumerate all stored account identifiers (directory scan)
    pub fn ids(&self) -> CardBankResult<Vec<AccountId>> {
        self.files.list()
    }

    /// Load every stored account into the cache
    ///
    /// Run once at startup so subsequent reads skip the directory. Unreadable
    /// files are logged and skipped; returns the number of accounts loaded.
    pub fn preload(&mut self) -> CardBankResult<usize> {
        if !self.cache_enabled {
            return Ok(0);
        }

        let mut loaded = 0;
        for id in self.files.list()? {
            match self.files.load(&id) {
                Ok(account) => {
                    self.index.insert(account);
                    loaded += 1;
                }
                Err(e) => {
                    warn!(id = %id, error = %e, "skipping unreadable card file during preload");
                }
            }
        }
        debug!(loaded, "preloaded account cache");
        Ok(loaded)
    }

    /// Number of reads served from the cache
    pub fn cache_hits(&self) -> u64 {
        self.cache_hits
    }

    /// Number of cached entries
    pub fn cached_len(&self) -> usize {
        self.index.len()
    }
}

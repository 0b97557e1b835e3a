//! Chained hash index over loaded accounts
//!
//! Buckets the canonical identifier string with the djb2 rolling hash
//! (`h = h * 33 + byte`, seeded at 5381) and resolves collisions by chaining,
//! newest entry first. Growth is geometric: whenever inserting a genuinely new
//! entry would push the load factor to the threshold, the bucket array doubles
//! and every entry is rehashed under the new size first.
//!
//! Lookups return references into the table, so they are valid only until the
//! next mutating call; the write-through façade in [`super::local`] copies
//! values out and never exposes these references.

use crate::models::{Account, AccountId};

/// Bucket count a fresh index starts with
pub const INITIAL_BUCKETS: usize = 16;

/// Load factor at which the bucket array doubles
pub const LOAD_FACTOR_THRESHOLD: f64 = 0.75;

/// In-memory cache of account records, keyed by identifier
pub struct HashIndex {
    buckets: Vec<Vec<Account>>,
    count: usize,
    threshold: f64,
}

impl HashIndex {
    /// Create an index with the default initial bucket count
    pub fn new() -> Self {
        Self::with_buckets(INITIAL_BUCKETS)
    }

    /// Create an index with an explicit initial bucket count
    pub fn with_buckets(buckets: usize) -> Self {
        let buckets = buckets.max(1);
        Self {
            buckets: vec![Vec::new(); buckets],
            count: 0,
            threshold: LOAD_FACTOR_THRESHOLD,
        }
    }

    /// Number of live entries
    pub fn len(&self) -> usize {
        self.count
    }

    /// True when no entries are stored
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Current bucket array size
    pub fn bucket_count(&self) -> usize {
        self.buckets.len()
    }

    fn bucket_for(&self, id: &AccountId) -> usize {
        (hash_id(id) as usize) % self.buckets.len()
    }

    /// Insert or overwrite an account (idempotent upsert)
    ///
    /// An existing entry with the same identifier is overwritten in place and
    /// `len()` is unchanged; otherwise the entry is prepended to its bucket's
    /// chain, resizing first if the load factor would reach the threshold.
    pub fn insert(&mut self, account: Account) {
        let bucket = self.bucket_for(&account.id);
        if let Some(existing) = self.buckets[bucket]
            .iter_mut()
            .find(|a| a.id == account.id)
        {
            *existing = account;
            return;
        }

        if (self.count as f64) / (self.buckets.len() as f64) >= self.threshold {
            self.resize();
        }

        // Bucket assignment may have changed under the new size.
        let bucket = self.bucket_for(&account.id);
        self.buckets[bucket].insert(0, account);
        self.count += 1;
    }

    /// Equivalent to [`insert`](Self::insert); kept as the explicit
    /// "overwrite, falling back to insert-as-new" operation
    pub fn update(&mut self, account: Account) {
        self.insert(account);
    }

    /// Look up an account by identifier
    ///
    /// The returned reference is invalidated by the next mutating call.
    pub fn find(&self, id: &AccountId) -> Option<&Account> {
        let bucket = self.bucket_for(id);
        self.buckets[bucket].iter().find(|a| a.id == *id)
    }

    /// Remove an account; returns whether an entry existed
    ///
    /// Deletion never shrinks the bucket array.
    pub fn delete(&mut self, id: &AccountId) -> bool {
        let bucket = self.bucket_for(id);
        match self.buckets[bucket].iter().position(|a| a.id == *id) {
            Some(pos) => {
                self.buckets[bucket].remove(pos);
                self.count -= 1;
                true
            }
            None => false,
        }
    }

    /// Double the bucket array and rehash every entry under the new size
    fn resize(&mut self) {
        let new_size = self.buckets.len() * 2;
        let old = std::mem::replace(&mut self.buckets, vec![Vec::new(); new_size]);
        for chain in old {
            for account in chain {
                let bucket = self.bucket_for(&account.id);
                self.buckets[bucket].push(account);
            }
        }
    }
}

impl Default for HashIndex {
    fn default() -> Self {
        Self::new()
    }
}

/// djb2 rolling hash over the canonical identifier string
fn hash_id(id: &AccountId) -> u32 {
    let mut hash: u32 = 5381;
    for byte in id.to_string().bytes() {
        hash = hash.wrapping_mul(33).wrapping_add(byte as u32);
    }
    hash
}

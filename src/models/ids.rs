//! Strongly-typed account identifier
//!
//! The newtype wrapper keeps raw UUID strings out of the rest of the code and
//! pins down the canonical form used for filenames and wire keys: the
//! 36-character lowercase hyphenated UUID-v4 rendering.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use crate::error::{CardBankError, CardBankResult};

/// Length of the canonical identifier string form
pub const CANONICAL_LEN: usize = 36;

/// Unique identifier for an account
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AccountId(Uuid);

impl AccountId {
    /// Create a new random identifier
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Create an identifier from an existing UUID
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Get the underlying UUID
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }

    /// Parse an identifier from its canonical 36-character string form
    ///
    /// Only the hyphenated lowercase/uppercase-hex form is accepted; braced
    /// and un-hyphenated renderings are rejected since on-disk filenames and
    /// wire keys always use the canonical form.
    pub fn parse(s: &str) -> CardBankResult<Self> {
        if s.len() != CANONICAL_LEN {
            return Err(CardBankError::Validation(format!(
                "identifier must be {} characters, got {}",
                CANONICAL_LEN,
                s.len()
            )));
        }
        let uuid = Uuid::parse_str(s)
            .map_err(|e| CardBankError::Validation(format!("invalid identifier '{}': {}", s, e)))?;
        Ok(Self(uuid))
    }
}

impl Default for AccountId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Uuid renders as lowercase hyphenated, which is the canonical form.
        write!(f, "{}", self.0)
    }
}

impl From<Uuid> for AccountId {
    fn from(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

impl FromStr for AccountId {
    type Err = CardBankError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

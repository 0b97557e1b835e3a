//! Account model
//!
//! An account is a balance in minor currency units (cents) guarded by a
//! seven-digit numeric password and identified by a UUID.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::ids::AccountId;
use crate::error::{CardBankError, CardBankResult};

/// Smallest valid password (seven digits)
pub const PASSWORD_MIN: u64 = 1_000_000;

/// Largest valid password (seven digits)
pub const PASSWORD_MAX: u64 = 9_999_999;

/// Reserved password meaning "unknown, must be reclaimed out of band"
///
/// Accounts created locally by a pull from the remote authority carry this
/// sentinel because the authority never stores or transmits passwords.
pub const PASSWORD_SENTINEL: u64 = 0;

/// A bank account record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    /// Unique identifier
    pub id: AccountId,

    /// Seven-digit numeric password, or [`PASSWORD_SENTINEL`]
    ///
    /// Set at creation and immutable thereafter except through whole-record
    /// overwrite.
    pub password: u64,

    /// Balance in minor currency units (cents); never observably negative
    pub balance: u64,
}

impl Account {
    /// Create a new account with a fresh identifier and a zero balance
    ///
    /// The password must be in the inclusive range
    /// [`PASSWORD_MIN`]..=[`PASSWORD_MAX`].
    pub fn new(password: u64) -> CardBankResult<Self> {
        validate_password(password)?;
        Ok(Self {
            id: AccountId::new(),
            password,
            balance: 0,
        })
    }

    /// Reassemble an account from its stored fields
    ///
    /// Used when loading from disk or materializing a pulled remote record;
    /// the password sentinel is allowed here.
    pub fn from_parts(id: AccountId, password: u64, balance: u64) -> Self {
        Self {
            id,
            password,
            balance,
        }
    }

    /// Re-check the record invariants
    pub fn validate(&self) -> CardBankResult<()> {
        if self.password != PASSWORD_SENTINEL {
            validate_password(self.password)?;
        }
        Ok(())
    }

    /// Compare a password candidate against the stored password
    pub fn verify_password(&self, candidate: u64) -> bool {
        self.password == candidate
    }

    /// Check whether this account carries the "unknown password" sentinel
    pub fn has_sentinel_password(&self) -> bool {
        self.password == PASSWORD_SENTINEL
    }
}

impl fmt::Display for Account {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Balances are stored in cents.
        write!(
            f,
            "{}  balance {}.{:02}",
            self.id,
            self.balance / 100,
            self.balance % 100
        )
    }
}

fn validate_password(password: u64) -> CardBankResult<()> {
    if !(PASSWORD_MIN..=PASSWORD_MAX).contains(&password) {
        return Err(CardBankError::Validation(format!(
            "password must be a seven-digit number ({}-{})",
            PASSWORD_MIN, PASSWORD_MAX
        )));
    }
    Ok(())
}

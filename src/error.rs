//! Custom error types for cardbank
//!
//! This module defines the error hierarchy for the application using thiserror
//! for ergonomic error definitions.

use thiserror::Error;

/// The main error type for cardbank operations
#[derive(Error, Debug)]
pub enum CardBankError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// File I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(String),

    /// Validation errors for data models and amounts
    #[error("Validation error: {0}")]
    Validation(String),

    /// No account record exists for the identifier
    #[error("Account not found: {id}")]
    NotFound { id: String },

    /// An account with this identifier already exists
    #[error("Account already exists: {id}")]
    DuplicateAccount { id: String },

    /// Password mismatch on a protected operation
    #[error("Password mismatch")]
    Auth,

    /// Withdrawal or transfer exceeds the available balance
    #[error("Insufficient funds: need {needed}, have {available}")]
    InsufficientFunds { needed: u64, available: u64 },

    /// Malformed identifier line or truncated binary block in a card file
    #[error("Corrupt account record: {0}")]
    CorruptRecord(String),

    /// Transport or protocol failure talking to the remote authority
    #[error("Remote failure: {0}")]
    RemoteFailure(String),
}

impl CardBankError {
    /// Create a "not found" error for an account identifier
    pub fn not_found(id: impl ToString) -> Self {
        Self::NotFound { id: id.to_string() }
    }

    /// Create a "duplicate account" error for an account identifier
    pub fn duplicate(id: impl ToString) -> Self {
        Self::DuplicateAccount { id: id.to_string() }
    }

    /// Check if this is a "not found" error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Check if this is a remote (soft) failure
    ///
    /// Remote failures are logged and counted but never reverse a local
    /// operation that already succeeded.
    pub fn is_remote(&self) -> bool {
        matches!(self, Self::RemoteFailure(_))
    }

    /// Check if this is a validation error
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }
}

// Implement From traits for common error types

impl From<std::io::Error> for CardBankError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

impl From<serde_json::Error> for CardBankError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err.to_string())
    }
}

impl From<reqwest::Error> for CardBankError {
    fn from(err: reqwest::Error) -> Self {
        Self::RemoteFailure(err.to_string())
    }
}

/// Result type alias for cardbank operations
pub type CardBankResult<T> = Result<T, CardBankError>;

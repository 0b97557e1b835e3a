//! Remote server settings
//!
//! An absent settings file means no remote authority is configured and the
//! system runs purely locally; a present file still only enables remote mode
//! if the capability probe succeeds at startup.

use std::fs;

use serde::{Deserialize, Serialize};

use super::paths::CardPaths;
use crate::error::{CardBankError, CardBankResult};

fn default_timeout_secs() -> u64 {
    10
}

fn default_verify_cert() -> bool {
    true
}

fn default_max_pull_batch() -> usize {
    1000
}

/// Connection settings for the remote account authority
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerSettings {
    /// Base URL of the authority, e.g. `https://bank.example.com`
    pub url: String,

    /// Timeout applied to every request, in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Whether to verify the server's TLS certificate
    #[serde(default = "default_verify_cert")]
    pub verify_cert: bool,

    /// Upper bound on records accepted from one pull
    #[serde(default = "default_max_pull_batch")]
    pub max_pull_batch: usize,
}

impl ServerSettings {
    /// Load settings if the file exists; `None` means local-only operation
    pub fn load(paths: &CardPaths) -> CardBankResult<Option<Self>> {
        let path = paths.settings_file();
        if !path.exists() {
            return Ok(None);
        }

        let raw = fs::read_to_string(&path).map_err(|e| {
            CardBankError::Io(format!("failed to read {}: {}", path.display(), e))
        })?;
        let settings: Self = serde_json::from_str(&raw)?;

        if settings.url.trim().is_empty() {
            return Err(CardBankError::Config(format!(
                "{}: server url must not be empty",
                path.display()
            )));
        }

        Ok(Some(settings))
    }

    /// Persist settings as pretty-printed JSON
    pub fn save(&self, paths: &CardPaths) -> CardBankResult<()> {
        let path = paths.settings_file();
        let raw = serde_json::to_string_pretty(self)?;
        fs::write(&path, raw).map_err(|e| {
            CardBankError::Io(format!("failed to write {}: {}", path.display(), e))
        })
    }
}

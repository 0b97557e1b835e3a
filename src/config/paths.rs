//! Path management for cardbank
//!
//! Provides XDG-compliant path resolution for the key file, card directory,
//! and server settings.
//!
//! ## Path Resolution Order
//!
//! 1. `CARDBANK_DATA_DIR` environment variable (if set)
//! 2. Unix (Linux/macOS): `$XDG_CONFIG_HOME/cardbank` or `~/.config/cardbank`
//! 3. Windows: `%APPDATA%\cardbank`

use std::path::PathBuf;

use crate::error::CardBankError;

/// Manages all paths used by cardbank
#[derive(Debug, Clone)]
pub struct CardPaths {
    /// Base directory for all cardbank data
    base_dir: PathBuf,
}

impl CardPaths {
    /// Create a new CardPaths instance
    ///
    /// # Errors
    ///
    /// Returns an error if the home directory cannot be determined.
    pub fn new() -> Result<Self, CardBankError> {
        let base_dir = if let Ok(custom) = std::env::var("CARDBANK_DATA_DIR") {
            PathBuf::from(custom)
        } else {
            resolve_default_path()?
        };

        Ok(Self { base_dir })
    }

    /// Create CardPaths with a custom base directory (useful for testing)
    pub fn with_base_dir(base_dir: PathBuf) -> Self {
        Self { base_dir }
    }

    /// Get the base directory (~/.config/cardbank/ or equivalent)
    pub fn base_dir(&self) -> &PathBuf {
        &self.base_dir
    }

    /// Directory holding the per-account card files
    ///
    /// Created lazily by the card store on first use, not here.
    pub fn cards_dir(&self) -> PathBuf {
        self.base_dir.join("cards")
    }

    /// Path to the 16-byte system key file
    pub fn key_file(&self) -> PathBuf {
        self.base_dir.join("system.key")
    }

    /// Path to the remote server settings file
    pub fn settings_file(&self) -> PathBuf {
        self.base_dir.join("server.json")
    }

    /// Ensure the base directory exists
    pub fn ensure_directories(&self) -> Result<(), CardBankError> {
        std::fs::create_dir_all(&self.base_dir)
            .map_err(|e| CardBankError::Io(format!("Failed to create base directory: {}", e)))?;
        Ok(())
    }
}

/// Resolve the default data directory path based on platform
#[cfg(not(windows))]
fn resolve_default_path() -> Result<PathBuf, CardBankError> {
    // Unix (Linux/macOS): Use XDG_CONFIG_HOME if set, otherwise ~/.config
    let config_base = std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .or_else(|_| {
            std::env::var("HOME").map(|home| PathBuf::from(home).join(".config"))
        })
        .map_err(|_| CardBankError::Config("Could not determine home directory".into()))?;
    Ok(config_base.join("cardbank"))
}

/// Resolve the default data directory path based on platform
#[cfg(windows)]
fn resolve_default_path() -> Result<PathBuf, CardBankError> {
    // Windows: Use APPDATA
    let appdata = std::env::var("APPDATA")
        .map_err(|_| CardBankError::Config("Could not determine APPDATA directory".into()))?;
    Ok(PathBuf::from(appdata).join("cardbank"))
}

// Path: crates/types/src/config.rs

//! Shared configuration structures for the PageVault host.

use crate::app::AccountId;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// A page seeded into a fresh store at genesis.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct SeedPage {
    /// The page id.
    pub id: String,
    /// The initial content.
    pub content: String,
}

/// The initial contents of a fresh store.
///
/// Ignored when the host opens a backend that was already initialized:
/// existing state is authoritative.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct GenesisConfig {
    /// The privileged writer as a 64-character hex string.
    pub writer: String,
    /// Pages written at genesis, through the normal write path.
    #[serde(default)]
    pub pages: Vec<SeedPage>,
}

impl GenesisConfig {
    /// Parses the configured writer into an `AccountId`.
    pub fn writer_account_id(&self) -> Result<AccountId, String> {
        let id = AccountId::from_hex(&self.writer)?;
        if id.is_zero() {
            return Err("Configuration Error: 'writer' must not be the zero account".to_string());
        }
        Ok(id)
    }
}

/// Configuration for a PageVault host instance (`store.toml`).
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct StoreConfig {
    /// The path to the backing database file.
    pub state_file: String,
    /// The genesis contents for a fresh backend.
    pub genesis: GenesisConfig,
}

impl StoreConfig {
    /// Validates the configuration for semantic correctness.
    pub fn validate(&self) -> Result<(), String> {
        if self.state_file.is_empty() {
            return Err("Configuration Error: 'state_file' must not be empty".to_string());
        }

        self.genesis.writer_account_id()?;

        let mut seen = BTreeSet::new();
        for page in &self.genesis.pages {
            if page.id.is_empty() {
                return Err("Configuration Error: seed page id must not be empty".to_string());
            }
            if page.content.is_empty() {
                return Err(format!(
                    "Configuration Error: seed page '{}' has empty content",
                    page.id
                ));
            }
            if !seen.insert(page.id.as_str()) {
                return Err(format!(
                    "Configuration Error: duplicate seed page id '{}'",
                    page.id
                ));
            }
        }
        Ok(())
    }
}

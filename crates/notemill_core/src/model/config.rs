//! Vault layout configuration.
//!
//! # Responsibility
//! - Name the always-present core files and the special directory roots.
//! - Provide key-by-key override merging over the reference defaults.
//!
//! # Invariants
//! - A `VaultConfig` is immutable once handed to the index.
//! - Blank override values never replace a default; the reference layout
//!   stays intact unless a meaningful value is supplied.

use serde::{Deserialize, Serialize};

/// Immutable description of the on-disk vault layout.
///
/// The core never loads configuration files itself; host applications build
/// or deserialize this record and pass it in at construction time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VaultConfig {
    /// Top-level documents that always exist, created on initialize.
    pub core_files: Vec<String>,
    /// Name of the arbitrarily nested resources tree.
    pub resources_dir: String,
    /// Name of the daily temporal root.
    pub daily_dir: String,
    /// Name of the journal temporal root.
    pub journal_dir: String,
}

impl Default for VaultConfig {
    fn default() -> Self {
        Self {
            core_files: vec!["inbox.md".to_string(), "active.md".to_string()],
            resources_dir: "resources".to_string(),
            daily_dir: "daily".to_string(),
            journal_dir: "journal".to_string(),
        }
    }
}

/// Partial configuration used for key-by-key override merging.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VaultConfigOverrides {
    /// Replaces the core file list when present and non-empty.
    #[serde(default)]
    pub core_files: Option<Vec<String>>,
    /// Replaces the resources directory name when present and non-blank.
    #[serde(default)]
    pub resources_dir: Option<String>,
    /// Replaces the daily directory name when present and non-blank.
    #[serde(default)]
    pub daily_dir: Option<String>,
    /// Replaces the journal directory name when present and non-blank.
    #[serde(default)]
    pub journal_dir: Option<String>,
}

impl VaultConfig {
    /// Builds a config from defaults with `overrides` applied key by key.
    pub fn merged(overrides: &VaultConfigOverrides) -> Self {
        let mut config = Self::default();
        if let Some(core_files) = &overrides.core_files {
            let cleaned: Vec<String> = core_files
                .iter()
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
                .collect();
            if !cleaned.is_empty() {
                config.core_files = cleaned;
            }
        }
        if let Some(value) = non_blank(&overrides.resources_dir) {
            config.resources_dir = value;
        }
        if let Some(value) = non_blank(&overrides.daily_dir) {
            config.daily_dir = value;
        }
        if let Some(value) = non_blank(&overrides.journal_dir) {
            config.journal_dir = value;
        }
        config
    }

    /// Returns whether `name` is one of the two temporal roots.
    pub fn is_temporal_bucket(&self, name: &str) -> bool {
        name == self.daily_dir || name == self.journal_dir
    }
}

fn non_blank(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|trimmed| !trimmed.is_empty())
        .map(str::to_string)
}

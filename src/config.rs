//
//  config.rs
//  notegraph
//
//  Created by hak (tharun)
//

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::warn;

use crate::error::Result;

/// Name of the config file looked up in the vault root.
pub const CONFIG_FILE: &str = "notegraph.toml";

/// Top-level notegraph configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NotegraphConfig {
    #[serde(default)]
    pub vault: VaultConfig,
    #[serde(default)]
    pub graph: GraphConfig,
    #[serde(default)]
    pub search: SearchConfig,
    #[serde(default)]
    pub watch: WatchConfig,
}

/// Vault-level settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VaultConfig {
    /// Vault directory (relative to the config file's directory).
    #[serde(default = "default_root")]
    pub root: String,
    /// Note file extension, without the dot.
    #[serde(default = "default_extension")]
    pub extension: String,
}

/// Graph query defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraphConfig {
    /// Depth used by `neighbors` when none is given.
    #[serde(default = "default_depth")]
    pub default_depth: usize,
    /// Number of hub notes reported by default.
    #[serde(default = "default_hub_limit")]
    pub hub_limit: usize,
    /// Smallest cluster reported by default.
    #[serde(default = "default_min_cluster_size")]
    pub min_cluster_size: usize,
}

/// Search defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    #[serde(default = "default_search_limit")]
    pub default_limit: usize,
}

/// Change watcher settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WatchConfig {
    /// Debounce window for filesystem events.
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,
}

fn default_root() -> String {
    ".".to_string()
}

fn default_extension() -> String {
    "md".to_string()
}

fn default_depth() -> usize {
    2
}

fn default_hub_limit() -> usize {
    10
}

fn default_min_cluster_size() -> usize {
    2
}

fn default_search_limit() -> usize {
    10
}

fn default_debounce_ms() -> u64 {
    200
}

impl Default for VaultConfig {
    fn default() -> Self {
        Self {
            root: default_root(),
            extension: default_extension(),
        }
    }
}

impl Default for GraphConfig {
    fn default() -> Self {
        Self {
            default_depth: default_depth(),
            hub_limit: default_hub_limit(),
            min_cluster_size: default_min_cluster_size(),
        }
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            default_limit: default_search_limit(),
        }
    }
}

impl Default for WatchConfig {
    fn default() -> Self {
        Self {
            debounce_ms: default_debounce_ms(),
        }
    }
}

impl NotegraphConfig {
    /// Load config from a TOML file, falling back to defaults.
    pub fn load(path: &Path) -> Self {
        if !path.exists() {
            return Self::default();
        }
        Self::try_load(path).unwrap_or_else(|e| {
            warn!(path = %path.display(), error = %e, "invalid config, using defaults");
            Self::default()
        })
    }

    /// Load config from a TOML file, reporting read and parse failures.
    pub fn try_load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&contents)?)
    }

    /// Resolve the vault root relative to the config file's parent directory.
    pub fn resolve_root(&self, config_path: &Path) -> PathBuf {
        let parent = config_path.parent().unwrap_or(config_path);
        parent.join(&self.vault.root)
    }
}

//! Configuration file handling
//!
//! Loads and manages the ~/.config/schemascope/config.yaml file. Every knob
//! is a flat scalar so the file stays hand-editable; CLI flags and
//! environment variables override individual fields at startup.

use crate::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Default SPARQL endpoint (the ODISSEI acceptance knowledge graph)
pub const DEFAULT_ENDPOINT: &str =
    "https://api.kg.odissei.nl/datasets/odissei/odissei-kg-acceptance/services/odissei-kg-acceptance-virtuoso/sparql";

fn default_endpoint() -> String {
    DEFAULT_ENDPOINT.to_string()
}

fn default_refresh_interval() -> u64 {
    300
}

fn default_query_limit() -> usize {
    100
}

fn default_request_timeout() -> u64 {
    30
}

fn default_listen_port() -> u16 {
    8052
}

fn default_cache_file() -> PathBuf {
    // Always use ~/.config for consistency across platforms (macOS, Linux)
    let mut path = dirs::home_dir().unwrap_or_else(|| PathBuf::from("."));
    path.push(".config");
    path.push("schemascope");
    path.push("schema_cache.json");
    path
}

/// Schemascope configuration
///
/// Represents the complete ~/.config/schemascope/config.yaml file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchemascopeConfig {
    /// SPARQL endpoint URL
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    /// Background refresh interval in seconds
    #[serde(default = "default_refresh_interval")]
    pub refresh_interval_secs: u64,

    /// Row limit applied to both schema queries
    #[serde(default = "default_query_limit")]
    pub query_limit: usize,

    /// Per-request timeout in seconds
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,

    /// Dashboard listen port
    #[serde(default = "default_listen_port")]
    pub listen_port: u16,

    /// Path of the persisted snapshot used as startup fallback
    #[serde(default = "default_cache_file")]
    pub cache_file: PathBuf,
}

impl Default for SchemascopeConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            refresh_interval_secs: default_refresh_interval(),
            query_limit: default_query_limit(),
            request_timeout_secs: default_request_timeout(),
            listen_port: default_listen_port(),
            cache_file: default_cache_file(),
        }
    }
}

impl SchemascopeConfig {
    /// Load configuration from the default path, falling back to defaults
    /// when no config file exists yet.
    pub fn load_default() -> Result<Self> {
        let path = Self::default_path();
        if path.exists() {
            Self::load(&path)
        } else {
            tracing::debug!(path = %path.display(), "No config file, using defaults");
            Ok(Self::default())
        }
    }

    /// Load configuration from a specific path
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(crate::SchemascopeError::Config(format!(
                "Config file not found: {}",
                path.display()
            )));
        }

        tracing::info!(path = %path.display(), "Loading configuration");

        let content = fs::read_to_string(path)?;
        let config: Self = serde_yaml::from_str(&content)?;

        Ok(config)
    }

    /// Save configuration to a specific path
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let yaml = serde_yaml::to_string(self)?;
        fs::write(path, yaml)?;

        Ok(())
    }

    /// Get the default config path (~/.config/schemascope/config.yaml)
    pub fn default_path() -> PathBuf {
        let mut path = dirs::home_dir().unwrap_or_else(|| PathBuf::from("."));
        path.push(".config");
        path.push("schemascope");
        path.push("config.yaml");
        path
    }

    /// Refresh interval as a Duration
    pub fn refresh_interval(&self) -> Duration {
        Duration::from_secs(self.refresh_interval_secs)
    }

    /// Request timeout as a Duration
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

//! Console configuration, loaded from YAML with environment overrides.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::Result;

// ---------------------------------------------------------------------------
// ConsoleConfig
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConsoleConfig {
    /// Base URL of the upstream compute API (no trailing slash).
    #[serde(default = "default_upstream_base_url")]
    pub upstream_base_url: String,

    /// URL of the remote status feed (Atom).
    #[serde(default = "default_status_feed_url")]
    pub status_feed_url: String,

    /// Organization slug assumed when none is configured.
    #[serde(default = "default_org")]
    pub default_org: String,

    /// Port the gateway listens on.
    #[serde(default = "default_listen_port")]
    pub listen_port: u16,
}

fn default_upstream_base_url() -> String {
    "https://api.machines.dev/v1".to_string()
}

fn default_status_feed_url() -> String {
    "https://status.machines.dev/history.atom".to_string()
}

fn default_org() -> String {
    crate::credential::DEFAULT_ORG.to_string()
}

fn default_listen_port() -> u16 {
    3141
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self {
            upstream_base_url: default_upstream_base_url(),
            status_feed_url: default_status_feed_url(),
            default_org: default_org(),
            listen_port: default_listen_port(),
        }
    }
}

impl ConsoleConfig {
    /// Load from `path` if it exists, otherwise return defaults. Environment
    /// variables `FLEET_API_BASE` and `FLEET_STATUS_FEED` override either way.
    pub fn load(path: &Path) -> Result<Self> {
        let mut config = if path.exists() {
            let raw = std::fs::read_to_string(path)?;
            serde_yaml::from_str(&raw)?
        } else {
            Self::default()
        };
        if let Ok(base) = std::env::var("FLEET_API_BASE") {
            if !base.is_empty() {
                config.upstream_base_url = base;
            }
        }
        if let Ok(feed) = std::env::var("FLEET_STATUS_FEED") {
            if !feed.is_empty() {
                config.status_feed_url = feed;
            }
        }
        config.upstream_base_url = config
            .upstream_base_url
            .trim_end_matches('/')
            .to_string();
        Ok(config)
    }
}

// ---------------------------------------------------------------------------
// Well-known paths
// ---------------------------------------------------------------------------

/// `$FLEET_DATA_DIR/console.redb`, or the platform data dir when unset.
pub fn store_path() -> PathBuf {
    data_dir().join("console.redb")
}

/// Path of the YAML config file.
pub fn config_path() -> PathBuf {
    if let Ok(dir) = std::env::var("FLEET_CONFIG_DIR") {
        return PathBuf::from(dir).join("config.yaml");
    }
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("fleet")
        .join("config.yaml")
}

fn data_dir() -> PathBuf {
    if let Ok(dir) = std::env::var("FLEET_DATA_DIR") {
        return PathBuf::from(dir);
    }
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("fleet")
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_when_file_missing() {
        let dir = tempfile::TempDir::new().unwrap();
        let config = ConsoleConfig::load(&dir.path().join("missing.yaml")).unwrap();
        assert_eq!(config.default_org, "personal");
        assert_eq!(config.listen_port, 3141);
        assert!(!config.upstream_base_url.ends_with('/'));
    }

    #[test]
    fn partial_yaml_fills_defaults() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("config.yaml");
        std::fs::write(&path, "upstream_base_url: http://localhost:9000/\n").unwrap();
        let config = ConsoleConfig::load(&path).unwrap();
        assert_eq!(config.upstream_base_url, "http://localhost:9000");
        assert_eq!(config.default_org, "personal");
    }

    #[test]
    fn invalid_yaml_is_an_error() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("config.yaml");
        std::fs::write(&path, "listen_port: [not a port]\n").unwrap();
        assert!(ConsoleConfig::load(&path).is_err());
    }
}

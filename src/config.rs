//! Runtime configuration
//!
//! Configuration comes from three layers, later ones winning:
//!
//! 1. Built-in defaults
//! 2. An optional YAML file
//! 3. `RACEBOARD_*` environment variables
//!
//! ```yaml
//! base_url: http://ergast.com/api/f1
//! cache_dir: /var/cache/raceboard
//! duplicate_policy: first-wins
//! fixture_dir: null
//! ```

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::normalizer::DuplicatePolicy;
use crate::providers::DEFAULT_BASE_URL;
use crate::{RaceboardError, Result};

/// Environment variable overriding [`RaceboardConfig::base_url`].
pub const ENV_BASE_URL: &str = "RACEBOARD_BASE_URL";
/// Environment variable overriding [`RaceboardConfig::cache_dir`].
pub const ENV_CACHE_DIR: &str = "RACEBOARD_CACHE_DIR";
/// Environment variable overriding [`RaceboardConfig::fixture_dir`].
pub const ENV_FIXTURE_DIR: &str = "RACEBOARD_FIXTURE_DIR";

/// Settings shared by the library entry point and the CLI
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RaceboardConfig {
    /// Root of the results feed
    pub base_url: String,
    /// Directory holding the last-result snapshot
    pub cache_dir: PathBuf,
    /// Handling of drivers listed twice in one document
    pub duplicate_policy: DuplicatePolicy,
    /// Serve recorded documents from this directory instead of the network
    pub fixture_dir: Option<PathBuf>,
}

impl Default for RaceboardConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            cache_dir: PathBuf::from(".raceboard-cache"),
            duplicate_policy: DuplicatePolicy::FirstWins,
            fixture_dir: None,
        }
    }
}

impl RaceboardConfig {
    /// Parse a YAML configuration document; omitted keys keep their defaults.
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml_ng::from_str(yaml)
            .map_err(|e| RaceboardError::config(format!("config parsing failed: {}", e)))
    }

    /// Defaults, then the file at `path` (if given), then the process environment.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(path) => {
                let yaml = std::fs::read_to_string(path).map_err(|e| {
                    RaceboardError::config(format!("cannot read {}: {}", path.display(), e))
                })?;
                debug!(path = %path.display(), "Loaded configuration file");
                Self::from_yaml_str(&yaml)?
            }
            None => Self::default(),
        };
        config.apply_overrides(|key| std::env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    /// Apply `RACEBOARD_*` overrides from `lookup` (normally the environment).
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let lookup = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        if let Some(base_url) = lookup(ENV_BASE_URL) {
            debug!(base_url = %base_url, "Base URL overridden from environment");
            self.base_url = base_url;
        }
        if let Some(cache_dir) = lookup(ENV_CACHE_DIR) {
            self.cache_dir = PathBuf::from(cache_dir);
        }
        if let Some(fixture_dir) = lookup(ENV_FIXTURE_DIR) {
            self.fixture_dir = Some(PathBuf::from(fixture_dir));
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.base_url.trim().is_empty() {
            return Err(RaceboardError::config("base_url must not be empty"));
        }
        if self.cache_dir.as_os_str().is_empty() {
            return Err(RaceboardError::config("cache_dir must not be empty"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn partial_yaml_keeps_defaults() {
        let config = RaceboardConfig::from_yaml_str("duplicate_policy: reject\n").unwrap();
        assert_eq!(config.duplicate_policy, DuplicatePolicy::Reject);
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.fixture_dir, None);
    }

    #[test]
    fn empty_yaml_is_default() {
        assert_eq!(RaceboardConfig::from_yaml_str("  \n").unwrap(), RaceboardConfig::default());
    }

    #[test]
    fn invalid_yaml_is_a_config_error() {
        let error = RaceboardConfig::from_yaml_str("duplicate_policy: sometimes\n").unwrap_err();
        assert!(matches!(error, RaceboardError::Config { .. }));
    }

    #[test]
    fn environment_overrides_file_values() {
        let mut config =
            RaceboardConfig::from_yaml_str("base_url: http://file.example/api\n").unwrap();
        let env: HashMap<&str, &str> = HashMap::from([
            (ENV_BASE_URL, "https://env.example/api"),
            (ENV_CACHE_DIR, "/tmp/raceboard"),
            (ENV_FIXTURE_DIR, "   "),
        ]);
        config.apply_overrides(|key| env.get(key).map(|v| v.to_string()));

        assert_eq!(config.base_url, "https://env.example/api");
        assert_eq!(config.cache_dir, PathBuf::from("/tmp/raceboard"));
        assert_eq!(config.fixture_dir, None);
    }

    #[test]
    fn load_reads_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("raceboard.yaml");
        std::fs::write(&path, "cache_dir: snapshots\nduplicate_policy: first-wins\n").unwrap();

        let config = RaceboardConfig::load(Some(&path)).unwrap();
        // Environment may override cache_dir on developer machines
        if std::env::var(ENV_CACHE_DIR).is_err() {
            assert_eq!(config.cache_dir, PathBuf::from("snapshots"));
        }
        assert!(RaceboardConfig::load(Some(&dir.path().join("missing.yaml"))).is_err());
    }

    #[test]
    fn validation_rejects_blank_values() {
        let config = RaceboardConfig { base_url: " ".to_string(), ..Default::default() };
        assert!(config.validate().is_err());
    }
}

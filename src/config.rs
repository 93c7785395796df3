//! Engine configuration
//!
//! Loaded from a JSON file (`~/.config/multipow/config.json` by default).
//! Every field is optional in the file; missing fields take the defaults
//! below and command-line flags override whatever was loaded.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::engine::{
    CallerOrder, CostRanking, MeasuredRanking, OrderingStrategy, PowError, SearchMode,
    SearchOptions, DEFAULT_CHUNK_SIZE, DEFAULT_NONCE_MAX,
};

/// Configuration loading failures
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config {}: {source}", path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error(transparent)]
    Engine(#[from] PowError),
}

/// Search mode as written in the config file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ModeSetting {
    Sequential,
    #[default]
    Parallel,
    BestEffort,
}

/// Ordering strategy as written in the config file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderingSetting {
    #[default]
    Cost,
    Caller,
    /// Uses `rates` (hashes/second per algorithm)
    Measured,
}

/// Engine configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Worker threads; defaults to the number of CPUs
    pub threads: Option<usize>,
    /// Nonces per parallel work unit
    pub chunk_size: u64,
    pub mode: ModeSetting,
    pub ordering: OrderingSetting,
    /// Measured throughput per algorithm identifier, for `ordering = "measured"`
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub rates: BTreeMap<String, f64>,
    pub timeout_ms: Option<u64>,
    /// Upper nonce bound used when a caller gives none
    pub default_nonce_max: u64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            threads: None,
            chunk_size: DEFAULT_CHUNK_SIZE,
            mode: ModeSetting::default(),
            ordering: OrderingSetting::default(),
            rates: BTreeMap::new(),
            timeout_ms: None,
            default_nonce_max: DEFAULT_NONCE_MAX,
        }
    }
}

/// Default config file location
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("multipow").join("config.json"))
}

impl EngineConfig {
    /// Read a config file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let data = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&data).map_err(|source| ConfigError::Json {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Load `path` if given (it must exist), otherwise the default location
    /// if a file is there, otherwise defaults.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = path {
            return Self::load(path);
        }
        match default_config_path() {
            Some(path) if path.exists() => {
                tracing::debug!(path = %path.display(), "loading config");
                Self::load(&path)
            }
            _ => Ok(Self::default()),
        }
    }

    /// Write the config as pretty JSON, creating parent directories
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let io_err = |source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        };
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(io_err)?;
        }
        let json = serde_json::to_string_pretty(self).map_err(|source| ConfigError::Json {
            path: path.to_path_buf(),
            source,
        })?;
        std::fs::write(path, json).map_err(io_err)
    }

    /// Effective worker count
    pub fn threads(&self) -> usize {
        self.threads.unwrap_or_else(num_cpus::get)
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_ms.map(Duration::from_millis)
    }

    pub fn search_mode(&self) -> SearchMode {
        let threads = self.threads();
        let chunk_size = self.chunk_size;
        match self.mode {
            ModeSetting::Sequential => SearchMode::Sequential,
            ModeSetting::Parallel => SearchMode::Parallel {
                threads,
                chunk_size,
            },
            ModeSetting::BestEffort => SearchMode::BestEffort {
                threads,
                chunk_size,
            },
        }
    }

    pub fn strategy(&self) -> Result<Arc<dyn OrderingStrategy>, ConfigError> {
        Ok(match self.ordering {
            OrderingSetting::Cost => Arc::new(CostRanking),
            OrderingSetting::Caller => Arc::new(CallerOrder),
            OrderingSetting::Measured => {
                let ranking =
                    MeasuredRanking::from_named(self.rates.iter().map(|(k, v)| (k.as_str(), *v)))?;
                if ranking.is_empty() {
                    tracing::warn!("measured ordering without rates; falling back to cost ranking");
                }
                Arc::new(ranking)
            }
        })
    }

    /// Core search options for this configuration.
    ///
    /// Thread count and chunk size are checked later, when the searcher is
    /// built.
    pub fn search_options(&self) -> Result<SearchOptions, ConfigError> {
        let mut options = SearchOptions::default()
            .with_strategy(self.strategy()?)
            .with_mode(self.search_mode());
        options.timeout = self.timeout();
        Ok(options)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::Algorithm;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir()
            .join(format!("multipow-config-test-{}", std::process::id()))
            .join(name)
    }

    #[test]
    fn test_defaults() {
        let config = EngineConfig::default();
        assert_eq!(config.chunk_size, 4096);
        assert_eq!(config.default_nonce_max, 100_000_000);
        assert_eq!(config.mode, ModeSetting::Parallel);
        assert!(config.threads() >= 1);
        assert_eq!(config.timeout(), None);
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let json = r#"{"mode": "best-effort", "threads": 3, "timeout_ms": 250}"#;
        let config: EngineConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.chunk_size, DEFAULT_CHUNK_SIZE);
        assert_eq!(
            config.search_mode(),
            SearchMode::BestEffort {
                threads: 3,
                chunk_size: DEFAULT_CHUNK_SIZE,
            }
        );
        assert_eq!(config.timeout(), Some(Duration::from_millis(250)));
    }

    #[test]
    fn test_unknown_mode_is_rejected() {
        assert!(serde_json::from_str::<EngineConfig>(r#"{"mode": "turbo"}"#).is_err());
    }

    #[test]
    fn test_measured_ordering() {
        let json = r#"{"ordering": "measured", "rates": {"SHA2-256": 5.0, "MD5": 1.0}}"#;
        let config: EngineConfig = serde_json::from_str(json).unwrap();
        let strategy = config.strategy().unwrap();
        assert_eq!(strategy.name(), "measured");
        assert_eq!(
            strategy.order(&[Algorithm::Md5, Algorithm::Sha2_256]),
            vec![Algorithm::Sha2_256, Algorithm::Md5]
        );

        let bad: EngineConfig =
            serde_json::from_str(r#"{"ordering": "measured", "rates": {"MD7": 1.0}}"#).unwrap();
        assert!(matches!(bad.strategy(), Err(ConfigError::Engine(_))));
    }

    #[test]
    fn test_save_and_load() {
        let path = temp_path("nested/config.json");
        let config = EngineConfig {
            threads: Some(2),
            ordering: OrderingSetting::Caller,
            timeout_ms: Some(1000),
            ..EngineConfig::default()
        };
        config.save(&path).unwrap();
        assert_eq!(EngineConfig::load(&path).unwrap(), config);
        assert_eq!(EngineConfig::load_or_default(Some(&path)).unwrap(), config);
        std::fs::remove_dir_all(temp_path("")).ok();
    }

    #[test]
    fn test_explicit_missing_file_is_an_error() {
        let path = temp_path("does-not-exist.json");
        assert!(matches!(
            EngineConfig::load_or_default(Some(&path)),
            Err(ConfigError::Io { .. })
        ));
    }
}

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::tables::TablePaths;

pub const CONFIG_ENV: &str = "ROOT_ANALYTICS_CONFIG";
pub const DATA_DIR_ENV: &str = "ROOT_ANALYTICS_DATA_DIR";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error reading config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Invalid config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

// Key point:
// Serializable
// Comparable
// Explicit defaults
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub data_dir: PathBuf,
    pub tables: TableFiles,
    pub capabilities: Capabilities,
    pub clustering: ClusteringConfig,
    pub cooccurrence_min_threshold: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TableFiles {
    pub occurrences: String,
    pub frequencies: String,
    pub cooccurrences: String,
}

/// Optional analysis capabilities, resolved once when the engine is built.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Capabilities {
    pub network_analysis: bool,
    pub clustering: bool,
    pub extended_statistics: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClusteringConfig {
    pub default_k: usize,
    pub seed: u64,
    pub restarts: usize,
    pub max_iterations: usize,
    pub tolerance: f64,
}

impl EngineConfig {
    pub fn v0() -> Self {
        Self {
            data_dir: PathBuf::from("."),
            tables: TableFiles::default(),
            capabilities: Capabilities::default(),
            clustering: ClusteringConfig::default(),
            cooccurrence_min_threshold: 2,
        }
    }

    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Config file from `ROOT_ANALYTICS_CONFIG` if set, else defaults; then
    /// `ROOT_ANALYTICS_DATA_DIR` overrides the data directory.
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = match std::env::var(CONFIG_ENV) {
            Ok(path) => Self::load_from_file(path)?,
            Err(_) => Self::v0(),
        };
        if let Ok(data_dir) = std::env::var(DATA_DIR_ENV) {
            config.data_dir = PathBuf::from(data_dir);
        }
        Ok(config)
    }

    pub fn table_paths(&self) -> TablePaths {
        TablePaths {
            occurrences: self.data_dir.join(&self.tables.occurrences),
            frequencies: self.data_dir.join(&self.tables.frequencies),
            cooccurrences: self.data_dir.join(&self.tables.cooccurrences),
        }
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self::v0()
    }
}

impl Default for TableFiles {
    fn default() -> Self {
        Self {
            occurrences: "quran-enhanced-phase1.csv".into(),
            frequencies: "root-frequency-analysis.csv".into(),
            cooccurrences: "root-cooccurrence-matrix.csv".into(),
        }
    }
}

impl Default for Capabilities {
    fn default() -> Self {
        Self {
            network_analysis: true,
            clustering: true,
            extended_statistics: true,
        }
    }
}

impl Capabilities {
    pub fn none() -> Self {
        Self {
            network_analysis: false,
            clustering: false,
            extended_statistics: false,
        }
    }
}

impl Default for ClusteringConfig {
    fn default() -> Self {
        Self {
            default_k: 8,
            seed: 42,
            restarts: 10,
            max_iterations: 300,
            tolerance: 1e-4,
        }
    }
}

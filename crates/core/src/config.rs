//! Index configuration.
//!
//! Values come from (in order of precedence) an explicit JSON file, the
//! `SPLITDEX_INDEX_DIR` environment variable and the built-in defaults.

use crate::error::{IndexError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const INDEX_DIR_ENV: &str = "SPLITDEX_INDEX_DIR";
pub const DEFAULT_INDEX_DIR: &str = ".splitdex/nodes";

pub const DEFAULT_TABLE_CAPACITY: usize = 1024;
pub const DEFAULT_LOAD_FACTOR: f32 = 0.75;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IndexConfig {
    /// Directory holding one file per node for the file-backed store.
    pub index_dir: PathBuf,
    /// zstd level applied to file-backed node blobs. `0` selects zstd's default.
    pub compression_level: i32,
    /// Initial capacity of the element path table and the element routing table.
    pub table_capacity: usize,
    /// Load factor after which those tables grow.
    pub load_factor: f32,
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self {
            index_dir: Self::default_index_dir(),
            compression_level: 0,
            table_capacity: DEFAULT_TABLE_CAPACITY,
            load_factor: DEFAULT_LOAD_FACTOR,
        }
    }
}

impl IndexConfig {
    /// Gets the base directory for node files, supporting the `SPLITDEX_INDEX_DIR` env var.
    pub fn default_index_dir() -> PathBuf {
        if let Ok(env_dir) = std::env::var(INDEX_DIR_ENV) {
            return PathBuf::from(env_dir);
        }

        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(DEFAULT_INDEX_DIR)
    }

    pub fn from_env() -> Self {
        Self::default()
    }

    /// Load a JSON config file. Missing fields fall back to their defaults.
    pub fn load(path: &Path) -> Result<Self> {
        let bytes = std::fs::read(path)?;
        let config: IndexConfig = serde_json::from_slice(&bytes)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.load_factor > 0.0 && self.load_factor <= 1.0) {
            return Err(IndexError::Config(format!(
                "load_factor must be in (0, 1], got {}",
                self.load_factor
            )));
        }
        if self.table_capacity == 0 {
            return Err(IndexError::Config("table_capacity must be positive".into()));
        }
        Ok(())
    }
}

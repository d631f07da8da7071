//! Record store configuration

use serde::Deserialize;
use std::path::PathBuf;

use super::error::ValidationError;

/// Record store configuration
#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    /// Which backend holds session records
    #[serde(default)]
    pub backend: StorageBackend,

    /// Path of the JSON store document (file backend only)
    #[serde(default = "default_data_path")]
    pub data_path: String,
}

/// Record store backend type
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum StorageBackend {
    /// Versioned JSON document on disk
    #[default]
    File,
    /// Ephemeral, leaves no trace after exit
    Memory,
}

impl StorageConfig {
    /// Get the data path as a PathBuf
    pub fn data_path(&self) -> PathBuf {
        PathBuf::from(&self.data_path)
    }

    /// Validate storage configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.backend == StorageBackend::File && self.data_path.trim().is_empty() {
            return Err(ValidationError::EmptyDataPath);
        }
        Ok(())
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: StorageBackend::default(),
            data_path: default_data_path(),
        }
    }
}

fn default_data_path() -> String {
    "data/mirror_hall.json".to_string()
}

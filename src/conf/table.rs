use serde::{Deserialize, Serialize};

use crate::core::ScanError;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct IndexConfig {
    #[serde(default = "IndexConfig::default_enabled")]
    pub min_max: bool,
    #[serde(default = "IndexConfig::default_enabled")]
    pub bucket: bool,
    #[serde(default = "IndexConfig::default_enabled")]
    pub not_null: bool,
}

impl IndexConfig {
    fn default_enabled() -> bool {
        true
    }
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self {
            min_max: true,
            bucket: true,
            not_null: true,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct TableConfig {
    #[serde(default = "TableConfig::default_threads")]
    pub init_threads: usize,
    #[serde(default = "TableConfig::default_threads")]
    pub query_threads: usize,
    #[serde(default = "TableConfig::default_index_step")]
    pub index_step: usize,
    #[serde(default = "TableConfig::default_split_size_mb")]
    pub split_size_mb: u64,
    #[serde(default)]
    pub indexes: IndexConfig,
}

impl TableConfig {
    fn default_threads() -> usize {
        std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(4)
    }

    fn default_index_step() -> usize {
        8 * 1024
    }

    fn default_split_size_mb() -> u64 {
        100
    }

    /// Split size in bytes, `None` when splitting is disabled.
    pub fn split_size_bytes(&self) -> Option<u64> {
        match self.split_size_mb {
            0 => None,
            mb => Some(mb.saturating_mul(1024 * 1024)),
        }
    }

    pub fn validate(&self) -> Result<(), ScanError> {
        if self.index_step == 0 {
            return Err(ScanError::ConfigError(
                "index_step should be > 0".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            init_threads: Self::default_threads(),
            query_threads: Self::default_threads(),
            index_step: Self::default_index_step(),
            split_size_mb: Self::default_split_size_mb(),
            indexes: IndexConfig::default(),
        }
    }
}

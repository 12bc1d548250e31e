use std::path::Path;

use crate::{
    conf::TableConfig,
    core::ScanError::{self, ConfigError},
};
use config::Config as CConfig;
use serde::{Deserialize, Serialize};

const ENV_PREFIX: &str = "RIDESCAN";

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default)]
    pub table: TableConfig,
}

impl Config {
    pub fn from_str(toml_str: &str) -> Result<Config, ScanError> {
        let config = CConfig::builder()
            .add_source(config::File::from_str(toml_str, config::FileFormat::Toml))
            .build()
            .map_err(|e| ConfigError(e.to_string()))?
            .try_deserialize::<Config>()
            .map_err(|e| ConfigError(e.to_string()))?;
        Ok(config)
    }

    /// Load a TOML file, then apply `RIDESCAN_TABLE__*` environment overrides.
    pub fn from_file(path: &Path) -> Result<Config, ScanError> {
        let config = CConfig::builder()
            .add_source(config::File::from(path).format(config::FileFormat::Toml))
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .map_err(|e| ConfigError(format!("{}: {}", path.display(), e)))?
            .try_deserialize::<Config>()
            .map_err(|e| ConfigError(format!("{}: {}", path.display(), e)))?;
        Ok(config)
    }
}

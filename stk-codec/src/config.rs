//! Codec configuration
//!
//! Two tolerance switches, loadable from JSON. Every field has a default so
//! a partial (or empty) document is valid.

use std::fs;
use std::path::Path;

use log::info;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CodecConfig {
    /// Reject `81 xx` lengths below 0x80 and `82 xx xx` lengths below 0x100
    pub strict_length_form: bool,
    /// Skip unexpected comprehension-required objects instead of failing
    /// the command with DATA_NOT_UNDERSTOOD
    pub ignore_unknown_cr_objects: bool,
}

impl CodecConfig {
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path)?;
        let config = Self::from_json(&content)?;
        info!("Loaded codec config from {:?}", path);
        Ok(config)
    }

    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

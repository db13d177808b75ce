//! Runtime configuration for the converter.
//!
//! [`ConvertConfig`] is cheap to clone and deserializes from JSON with every
//! field optional:
//!
//! ```json
//! {
//!   "default_format": "generic",
//!   "max_archive_depth": 2,
//!   "max_member_size": 10485760
//! }
//! ```
use crate::input::TableFormat;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Default nesting limit for archives inside archives
pub const DEFAULT_MAX_ARCHIVE_DEPTH: usize = 4;

/// Default size cap for a single archive member (50 MB)
pub const DEFAULT_MAX_MEMBER_SIZE: u64 = 50 * 1024 * 1024;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConvertConfig {
    /// Table format assumed when a CSV/XLSX input names none
    pub default_format: TableFormat,
    /// How many archive levels are expanded; deeper archives are skipped
    pub max_archive_depth: usize,
    /// Largest archive member accepted, in bytes
    pub max_member_size: u64,
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid configuration JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("max_archive_depth must be at least 1")]
    ZeroArchiveDepth,

    #[error("max_member_size must be at least 1 byte")]
    ZeroMemberSize,
}

impl Default for ConvertConfig {
    fn default() -> Self {
        Self {
            default_format: TableFormat::Tomkat,
            max_archive_depth: DEFAULT_MAX_ARCHIVE_DEPTH,
            max_member_size: DEFAULT_MAX_MEMBER_SIZE,
        }
    }
}

impl ConvertConfig {
    /// Parse and validate a JSON configuration document
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_archive_depth == 0 {
            return Err(ConfigError::ZeroArchiveDepth);
        }
        if self.max_member_size == 0 {
            return Err(ConfigError::ZeroMemberSize);
        }
        Ok(())
    }
}

//! Scan configuration from YAML

use crate::archive::ScanOptions;
use crate::core::ParentKind;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors raised while loading a configuration file
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Could not read config file `{}`", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config")]
    Parse(#[from] serde_yaml::Error),

    #[error("Invalid config: {0}")]
    Invalid(String),
}

/// Scan settings, loaded from a YAML file and/or command-line flags.
///
/// Every field is optional so that a file and the CLI can be layered with
/// [`ScanConfig::merge_cli`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ScanConfig {
    /// Root of the extracted archive
    #[serde(default)]
    pub directory: Option<PathBuf>,

    /// Skip attachments smaller than this many bytes
    #[serde(default)]
    pub min_size: Option<u64>,

    /// Only report the N largest attachments
    #[serde(default)]
    pub limit: Option<usize>,

    /// Only report attachments belonging to these parent kinds
    #[serde(default)]
    pub kinds: Option<Vec<ParentKind>>,

    /// Record missing blobs instead of failing
    #[serde(default)]
    pub allow_missing: Option<bool>,
}

impl ScanConfig {
    /// Load configuration from a YAML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml(&content)
    }

    /// Parse configuration from a YAML string
    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigError> {
        // An empty document deserializes as unit, not as an empty mapping
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        let config: ScanConfig = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.limit == Some(0) {
            return Err(ConfigError::Invalid("limit must be at least 1".to_string()));
        }
        if matches!(&self.kinds, Some(kinds) if kinds.is_empty()) {
            return Err(ConfigError::Invalid(
                "kinds must list at least one parent kind".to_string(),
            ));
        }
        Ok(())
    }

    /// Layer command-line values over this configuration. Values set on the
    /// command line win.
    pub fn merge_cli(self, cli: ScanConfig) -> Self {
        Self {
            directory: cli.directory.or(self.directory),
            min_size: cli.min_size.or(self.min_size),
            limit: cli.limit.or(self.limit),
            kinds: cli.kinds.or(self.kinds),
            allow_missing: cli.allow_missing.or(self.allow_missing),
        }
    }

    /// Archive root, defaulting to the current directory
    pub fn directory(&self) -> PathBuf {
        self.directory.clone().unwrap_or_else(|| PathBuf::from("."))
    }

    /// Convert to scanner options
    pub fn to_scan_options(&self) -> ScanOptions {
        ScanOptions {
            min_size: self.min_size,
            limit: self.limit,
            kinds: self.kinds.clone().unwrap_or_default(),
            allow_missing: self.allow_missing.unwrap_or(false),
        }
    }
}

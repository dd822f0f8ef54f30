//! YAML configuration for an embedded phytomatch matcher.
//!
//! One file describes the ranking policy, where the catalog lives, and the
//! query memo:
//!
//! ```yaml
//! version: "1.0"
//! name: "nursery catalog"
//!
//! matcher:
//!   disease_weight: 0.6
//!   plant_weight: 0.4
//!   strong_cutoff: 85
//!   fuzzy_cutoff: 65
//!   max_results: 5
//!   renormalize_without_plant: true
//!
//! catalog:
//!   path: "data/products.json"
//!
//! memo:
//!   enabled: true
//!   capacity: 1024
//! ```
//!
//! Every section is optional and falls back to its defaults.

use std::fs;
use std::path::{Path, PathBuf};

use matcher::MatchConfig;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur when loading YAML configuration files
#[derive(Debug, Error)]
pub enum ConfigLoadError {
    #[error("failed to read config file: {0}")]
    FileRead(#[from] std::io::Error),

    #[error("failed to parse YAML: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    #[error("validation error: {0}")]
    Validation(String),

    #[error("unsupported config version: {0}")]
    UnsupportedVersion(String),
}

/// Top-level YAML configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct PhytomatchConfig {
    /// Configuration format version
    pub version: String,

    /// Optional configuration name/description
    #[serde(default)]
    pub name: Option<String>,

    #[serde(default)]
    pub matcher: MatchConfig,

    #[serde(default)]
    pub catalog: CatalogSection,

    #[serde(default)]
    pub memo: MemoSection,
}

impl PhytomatchConfig {
    /// Load a YAML configuration file from the given path
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigLoadError> {
        let content = fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Parse YAML configuration from a string
    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigLoadError> {
        let config: PhytomatchConfig = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigLoadError> {
        match self.version.as_str() {
            "1.0" | "1" => Ok(()),
            v => Err(ConfigLoadError::UnsupportedVersion(v.to_string())),
        }?;

        self.matcher
            .validate()
            .map_err(|e| ConfigLoadError::Validation(e.to_string()))?;
        self.memo.validate()?;
        Ok(())
    }

    /// Memo capacity to hand to the matcher; 0 when memoization is off.
    pub fn memo_capacity(&self) -> usize {
        if self.memo.enabled {
            self.memo.capacity
        } else {
            0
        }
    }
}

impl Default for PhytomatchConfig {
    fn default() -> Self {
        Self {
            version: "1.0".to_string(),
            name: None,
            matcher: MatchConfig::default(),
            catalog: CatalogSection::default(),
            memo: MemoSection::default(),
        }
    }
}

/// Where the published catalog is read from.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CatalogSection {
    /// JSON catalog file. Without it the matcher starts on an empty catalog
    /// and products must be published programmatically.
    #[serde(default)]
    pub path: Option<PathBuf>,
}

/// Query memo settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemoSection {
    #[serde(default = "true_value")]
    pub enabled: bool,

    #[serde(default = "default_memo_capacity")]
    pub capacity: usize,
}

impl MemoSection {
    fn validate(&self) -> Result<(), ConfigLoadError> {
        if self.enabled && self.capacity == 0 {
            return Err(ConfigLoadError::Validation(
                "memo.capacity must be > 0 when memo is enabled".into(),
            ));
        }
        Ok(())
    }
}

impl Default for MemoSection {
    fn default() -> Self {
        Self {
            enabled: true_value(),
            capacity: default_memo_capacity(),
        }
    }
}

fn true_value() -> bool {
    true
}

fn default_memo_capacity() -> usize {
    1024
}

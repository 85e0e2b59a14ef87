//! Custom category rule configuration.
//!
//! Custom rules are loaded from a TOML file as an ordered array of tables,
//! so the order categories appear in the file is the order they are merged
//! into the live table (which matters for the first-match tie-break).
//!
//! # Configuration File Format
//!
//! ```toml
//! [[categories]]
//! name = "Images"
//! extensions = [".heic", ".jpg"]
//!
//! [[categories]]
//! name = "Ebooks"
//! extensions = [".epub", ".mobi"]
//! ```
//!
//! A category named after an existing one replaces its extension set; a new
//! name is appended after the defaults.

use crate::classifier::CategoryRule;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Errors that can occur while loading a rules file.
#[derive(Debug, Clone)]
pub enum ConfigError {
    /// Rules file not found at the explicitly requested path.
    ConfigNotFound(PathBuf),
    /// Invalid TOML syntax or structure, or an empty category name.
    ConfigInvalid(String),
    /// IO error while reading the rules file.
    IoError(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::ConfigNotFound(path) => {
                write!(f, "Rules file not found: {}", path.display())
            }
            ConfigError::ConfigInvalid(msg) => write!(f, "Invalid rules file: {}", msg),
            ConfigError::IoError(msg) => write!(f, "IO error reading rules file: {}", msg),
        }
    }
}

impl std::error::Error for ConfigError {}

/// Custom rules parsed from a TOML file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RulesConfig {
    /// Rules in file order. Empty when no rules file was found.
    #[serde(default)]
    pub categories: Vec<CategoryRule>,
}

impl RulesConfig {
    /// Load custom rules, with fallback to none.
    ///
    /// Locations are tried in order:
    /// 1. `rules_path`, when given; a missing file is an error here
    /// 2. `.sortboxrc.toml` in the current directory
    /// 3. `~/.config/sortbox/rules.toml`
    /// 4. no custom rules
    pub fn load(rules_path: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = rules_path {
            return Self::load_from_file(path);
        }

        let local_config = PathBuf::from(".sortboxrc.toml");
        if local_config.exists() {
            return Self::load_from_file(&local_config);
        }

        if let Ok(home) = std::env::var("HOME") {
            let home_config = PathBuf::from(home)
                .join(".config")
                .join("sortbox")
                .join("rules.toml");
            if home_config.exists() {
                return Self::load_from_file(&home_config);
            }
        }

        Ok(Self::default())
    }

    /// Load custom rules from a specific file.
    fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::ConfigNotFound(path.to_path_buf()));
        }

        let content = fs::read_to_string(path).map_err(|e| ConfigError::IoError(e.to_string()))?;
        let config: Self =
            toml::from_str(&content).map_err(|e| ConfigError::ConfigInvalid(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        for rule in &self.categories {
            if rule.name.trim().is_empty() {
                return Err(ConfigError::ConfigInvalid(
                    "category name must not be empty".to_string(),
                ));
            }
        }
        Ok(())
    }

    /// The parsed rules, ready to merge into a
    /// [`CategoryTable`](crate::classifier::CategoryTable). Extension
    /// normalization happens at merge time.
    pub fn into_rules(self) -> Vec<CategoryRule> {
        self.categories
    }
}

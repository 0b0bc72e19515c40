//! Configuration management for `logmask-core`.
//!
//! This module defines the masking configuration consumed from the host
//! application: a map of rule names to two-group patterns plus the masking
//! character. It handles YAML (de)serialization and provides utilities for
//! loading, merging and validating these configs.
//!
//! License: MIT OR Apache-2.0

use anyhow::{anyhow, Context, Result};
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use crate::errors::{LogmaskError, ValidationError};
use crate::rules::compiler::validate_pattern;

/// Masking character used when the configuration does not name one.
pub const DEFAULT_MASKING_CHAR_SETTING: &str = "*";

/// Top-level masking configuration.
///
/// ```yaml
/// masking_char: "#"
/// patterns:
///   token: '(token[:=]\s*)([\w\-._]+)'
/// ```
#[derive(Debug, Default, Deserialize, Serialize, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct MaskingConfig {
    /// Rule name -> pattern with exactly two capture groups.
    #[serde(alias = "pattern")]
    pub patterns: BTreeMap<String, String>,
    /// Raw masking-character setting. `None` means "not configured here".
    #[serde(alias = "masking-char", skip_serializing_if = "Option::is_none")]
    pub masking_char: Option<String>,
}

impl MaskingConfig {
    /// Loads a masking configuration from a YAML file and validates its patterns.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        info!("Loading masking patterns from: {}", path.display());
        let file = File::open(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config = Self::from_reader(BufReader::new(file))
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;

        config.validate()?;
        info!("Loaded {} masking pattern(s) from file {}.", config.patterns.len(), path.display());
        Ok(config)
    }

    /// Loads the built-in masking patterns.
    pub fn load_default_patterns() -> Result<Self> {
        debug!("Loading default masking patterns from embedded string...");
        let default_yaml = include_str!("../config/default_patterns.yaml");
        let config = Self::from_yaml_str(default_yaml).context("Failed to parse default patterns")?;

        debug!("Loaded {} default masking pattern(s).", config.patterns.len());
        Ok(config)
    }

    /// Reads and parses a whole YAML document from `reader`.
    pub fn from_reader<R: Read>(mut reader: R) -> Result<Self, LogmaskError> {
        let mut text = String::new();
        reader.read_to_string(&mut text)?;
        Self::from_yaml_str(&text)
    }

    /// Parses a YAML document. An empty document is an empty configuration.
    pub fn from_yaml_str(text: &str) -> Result<Self, LogmaskError> {
        if text.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yml::from_str(text).map_err(|e| LogmaskError::Config(e.to_string()))
    }

    /// The masking character to apply, falling back to `*`.
    pub fn masking_char(&self) -> &str {
        self.masking_char.as_deref().unwrap_or(DEFAULT_MASKING_CHAR_SETTING)
    }

    pub fn pattern_by_name(&self, name: &str) -> Option<&str> {
        self.patterns.get(name).map(String::as_str)
    }

    pub fn has_patterns(&self) -> bool {
        !self.patterns.is_empty()
    }

    pub fn add_pattern(&mut self, name: impl Into<String>, pattern: impl Into<String>) {
        self.patterns.insert(name.into(), pattern.into());
    }

    /// Checks every pattern, stopping at the first one that fails.
    pub fn validate_patterns(&self) -> Result<(), ValidationError> {
        self.patterns.values().try_for_each(|p| validate_pattern(p))
    }

    /// Checks every pattern and reports all failures at once, by rule name.
    pub fn validate(&self) -> Result<()> {
        let errors: Vec<String> = self
            .patterns
            .iter()
            .filter_map(|(name, pattern)| {
                validate_pattern(pattern)
                    .err()
                    .map(|e| format!("Pattern '{}': {}", name, e))
            })
            .collect();

        if errors.is_empty() {
            Ok(())
        } else {
            Err(anyhow!("Masking pattern validation failed:\n{}", errors.join("\n")))
        }
    }
}

/// Merges user-defined patterns and masking character over the defaults.
///
/// User entries replace default entries of the same name. The user's masking
/// character wins only when the user config sets one.
pub fn merge_patterns(default_config: MaskingConfig, user_config: Option<MaskingConfig>) -> MaskingConfig {
    debug!(
        "merge_patterns called. Initial default patterns count: {}",
        default_config.patterns.len()
    );
    let mut merged = default_config;

    if let Some(user_cfg) = user_config {
        debug!("User config provided. Merging {} user patterns.", user_cfg.patterns.len());
        merged.patterns.extend(user_cfg.patterns);
        if let Some(masking_char) = user_cfg.masking_char {
            debug!("Overriding masking character with user value: '{}'", masking_char);
            merged.masking_char = Some(masking_char);
        }
    }

    debug!("Final total patterns after merge: {}", merged.patterns.len());
    merged
}

// logmask-core/src/binding.rs
//! Late binding of a configuration source to masking hosts.
//!
//! A host (a logger, a layout) may be created before the application has its
//! configuration. The component that creates the host keeps a reference to it
//! and, once configuration is available, hands both to a [`ConfigBinding`].
//! Applying a binding is idempotent per store: repeating it after a success
//! changes nothing, so startup code can call it from every stage that might
//! be the first one with configuration in hand.

use std::path::Path;

use anyhow::Result;
use log::{debug, info};

use crate::config::{merge_patterns, MaskingConfig};
use crate::errors::ValidationError;
use crate::layout::MaskingLayoutHost;
use crate::rules::store::{BindOutcome, RuleStore};

/// A named configuration source ready to be applied to rule stores.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigBinding {
    source: String,
    config: MaskingConfig,
}

impl ConfigBinding {
    pub fn new(source: impl Into<String>, config: MaskingConfig) -> Self {
        Self {
            source: source.into(),
            config,
        }
    }

    /// Binding for the built-in default patterns.
    pub fn defaults() -> Result<Self> {
        Ok(Self::new("defaults", MaskingConfig::load_default_patterns()?))
    }

    /// Binding for a YAML file, optionally layered over the built-in defaults.
    pub fn from_file<P: AsRef<Path>>(path: P, with_defaults: bool) -> Result<Self> {
        let path = path.as_ref();
        let user = MaskingConfig::load_from_file(path)?;
        let config = if with_defaults {
            merge_patterns(MaskingConfig::load_default_patterns()?, Some(user))
        } else {
            user
        };
        Ok(Self::new(path.display().to_string(), config))
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn config(&self) -> &MaskingConfig {
        &self.config
    }

    /// Applies the configuration to `store` unless it was already applied there.
    ///
    /// A failed attempt leaves the store untouched and the binding retryable.
    pub fn apply_to(&self, store: &RuleStore) -> Result<BindOutcome, ValidationError> {
        let outcome = store.apply_config_from(&self.source, &self.config)?;
        if outcome == BindOutcome::AlreadyApplied {
            debug!("Masking configuration '{}' already applied, skipping", self.source);
        }
        Ok(outcome)
    }

    /// Applies the configuration to the layout exposed by `host`.
    pub fn apply_now(&self, host: &dyn MaskingLayoutHost) -> Result<BindOutcome, ValidationError> {
        self.apply_to(host.masking_layout().rule_store())
    }
}

/// Applies `binding` to every host, stopping at the first validation failure.
///
/// Returns how many hosts were newly configured.
pub fn configure_hosts(
    hosts: &[&dyn MaskingLayoutHost],
    binding: &ConfigBinding,
) -> Result<usize, ValidationError> {
    let mut applied = 0usize;
    for host in hosts {
        if binding.apply_now(*host)? == BindOutcome::Applied {
            applied += 1;
        }
    }
    info!(
        "Configured {} of {} masking host(s) from '{}'",
        applied,
        hosts.len(),
        binding.source()
    );
    Ok(applied)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::Redactor;
    use crate::engines::mask_engine::MaskingEngine;
    use crate::layout::MaskingLayout;

    fn binding() -> ConfigBinding {
        let mut config = MaskingConfig::default();
        config.add_pattern("token", r"(token:)([\w\-._]+)");
        config.masking_char = Some("#".to_string());
        ConfigBinding::new("app", config)
    }

    #[test]
    fn test_apply_now_configures_host_once() {
        let layout = MaskingLayout::new(MaskingEngine::new());
        let binding = binding();

        assert_eq!(binding.apply_now(&layout).unwrap(), BindOutcome::Applied);
        assert_eq!(binding.apply_now(&layout).unwrap(), BindOutcome::AlreadyApplied);
        assert_eq!(layout.rule_store().pattern_count(), 1);
        assert_eq!(layout.engine().redact("token:abc"), "token:###");
    }

    #[test]
    fn test_failed_binding_is_retryable() {
        let layout = MaskingLayout::new(MaskingEngine::new());
        let mut config = MaskingConfig::default();
        config.add_pattern("broken", r"(\d{4})");
        let bad = ConfigBinding::new("app", config);

        assert!(bad.apply_now(&layout).is_err());
        assert_eq!(layout.rule_store().pattern_count(), 0);
        assert_eq!(binding().apply_now(&layout).unwrap(), BindOutcome::Applied);
    }

    #[test]
    fn test_configure_hosts_counts_new_hosts() {
        let first = MaskingLayout::new(MaskingEngine::new());
        let second = MaskingLayout::new(MaskingEngine::new());
        let binding = binding();

        binding.apply_now(&first).unwrap();
        let hosts: [&dyn MaskingLayoutHost; 2] = [&first, &second];
        assert_eq!(configure_hosts(&hosts, &binding).unwrap(), 1);
        assert_eq!(second.rule_store().masking_char(), '#');
    }
}

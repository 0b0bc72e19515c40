// logmask/src/commands/mod.rs
//! Command implementations.

pub mod config;
pub mod mask;

use anyhow::{Context, Result};
use log::debug;
use logmask_core::{ConfigBinding, MaskingLayoutHost, configure_hosts};

use crate::cli::RuleOptions;

/// Resolves the configuration source selected by `opts`, if any.
pub fn resolve_binding(opts: &RuleOptions) -> Result<Option<ConfigBinding>> {
    match (&opts.config, opts.no_defaults) {
        (Some(path), no_defaults) => Ok(Some(ConfigBinding::from_file(path, !no_defaults)?)),
        (None, false) => Ok(Some(ConfigBinding::defaults()?)),
        (None, true) => Ok(None),
    }
}

/// Wires the rules selected by `opts` into `host`.
///
/// The configuration source is applied first, then the extra `--pattern`
/// values are appended and finally the `--mask-char` override is set.
pub fn configure(host: &dyn MaskingLayoutHost, opts: &RuleOptions) -> Result<()> {
    if let Some(binding) = resolve_binding(opts)? {
        configure_hosts(&[host], &binding)
            .with_context(|| format!("Invalid masking configuration '{}'", binding.source()))?;
    }

    let store = host.masking_layout().rule_store();
    for raw in &opts.patterns {
        store
            .add_patterns_with_delimiter(raw, &opts.delimiter)
            .context("Invalid --pattern value")?;
    }
    if let Some(mask_char) = &opts.mask_char {
        store.set_masking_char(mask_char);
    }

    debug!("Masking with {} pattern(s)", store.pattern_count());
    Ok(())
}

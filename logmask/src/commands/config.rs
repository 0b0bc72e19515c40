// logmask/src/commands/config.rs
//! The `config` command: read-only view of the effective masking rules.

use anyhow::{Result, bail};
use std::io::{self, Write};

use logmask_core::MaskingLayoutHost;

use crate::cli::ConfigCommand;
use crate::commands::configure;

/// Prints the effective configuration as JSON, or a single pattern by name.
pub fn run_config(cmd: &ConfigCommand, host: &dyn MaskingLayoutHost) -> Result<()> {
    configure(host, &cmd.rules)?;
    let store = host.masking_layout().rule_store();
    let mut stdout = io::stdout().lock();

    match &cmd.name {
        Some(name) => match store.pattern_by_name(name) {
            Some(pattern) => writeln!(stdout, "{}", pattern)?,
            None => bail!("Pattern '{}' not found", name),
        },
        None => writeln!(stdout, "{}", store.status().to_json_pretty()?)?,
    }
    Ok(())
}

// logmask/src/main.rs
//! logmask entry point.
//!
//! Installs the diagnostic logger first, then lets the selected command wire
//! the masking configuration into it.

use anyhow::Result;
use clap::Parser;
use log::LevelFilter;

use logmask::cli::{Cli, Commands};
use logmask::commands::{config::run_config, mask::run_mask};
use logmask::logger;

fn main() -> Result<()> {
    let args = Cli::parse();

    let level = if args.quiet {
        Some(LevelFilter::Off)
    } else if args.debug {
        Some(LevelFilter::Debug)
    } else {
        None
    };
    let layout = logger::init_logger(level);

    match &args.command {
        Commands::Mask(cmd) => run_mask(cmd, layout.as_ref()),
        Commands::Config(cmd) => run_config(cmd, layout.as_ref()),
    }
}

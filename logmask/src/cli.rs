// logmask/src/cli.rs
//! This file defines the command-line interface (CLI) for the logmask application,
//! including all available commands and their arguments.
//! License: MIT OR Apache-2.0

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Top-level CLI definition.
#[derive(Parser, Debug)]
#[command(
    name = "logmask",
    author = "Obscura Team (Relay)",
    version = env!("CARGO_PKG_VERSION"),
    about = "Mask sensitive values in log lines",
    long_about = "logmask reads log lines and overwrites sensitive values with a masking character while keeping the field names and delimiters around them. Every masking pattern has two capture groups: the identifier to keep and the value to mask.",
    arg_required_else_help = true,
)]
pub struct Cli {
    /// Disable informational messages
    #[arg(long, short = 'q', global = true, help = "Suppress all diagnostic messages.")]
    pub quiet: bool,

    /// Enable debug logging (overrides RUST_LOG)
    #[arg(long, short = 'd', global = true, help = "Enable debug logging.")]
    pub debug: bool,

    /// The subcommand to run
    #[command(subcommand)]
    pub command: Commands,
}

/// All available commands for the `logmask` CLI.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Masks an input file or stdin line by line.
    #[command(about = "Masks an input file or stdin line by line.")]
    Mask(MaskCommand),

    /// Prints the masking configuration that would be applied.
    #[command(about = "Prints the masking configuration that would be applied.")]
    Config(ConfigCommand),
}

/// Where the masking rules come from. Shared by every command.
#[derive(Args, Debug, Clone, Default)]
pub struct RuleOptions {
    /// Path to a masking configuration file (YAML).
    #[arg(long = "config", short = 'c', value_name = "FILE", env = "LOGMASK_CONFIG", help = "Path to a masking configuration file (YAML).")]
    pub config: Option<PathBuf>,

    /// Do not load the built-in default patterns.
    #[arg(long = "no-defaults", help = "Do not load the built-in default patterns.")]
    pub no_defaults: bool,

    /// Extra patterns, appended after the configuration.
    #[arg(long = "pattern", short = 'p', value_name = "PATTERN", help = "Extra two-group masking pattern(s), appended after the configuration. May be repeated.")]
    pub patterns: Vec<String>,

    /// Delimiter used to split each `--pattern` value.
    #[arg(long = "delimiter", value_name = "DELIM", default_value = ",", help = "Delimiter used to split each --pattern value into several patterns.")]
    pub delimiter: String,

    /// Masking character override.
    #[arg(long = "mask-char", short = 'm', value_name = "CHAR", help = "Character that replaces masked values (only the first character is used).")]
    pub mask_char: Option<String>,
}

/// Arguments for the `mask` command.
#[derive(Args, Debug)]
pub struct MaskCommand {
    /// Path to an input file (reads from stdin if not provided).
    #[arg(long, short = 'i', value_name = "FILE", help = "Read input from a specified file instead of stdin.")]
    pub input_file: Option<PathBuf>,

    /// Write masked output to this file instead of stdout.
    #[arg(long, short = 'o', value_name = "FILE", help = "Write output to a specified file instead of stdout.")]
    pub output: Option<PathBuf>,

    #[command(flatten)]
    pub rules: RuleOptions,
}

/// Arguments for the `config` command.
#[derive(Args, Debug)]
pub struct ConfigCommand {
    /// Print only the pattern with this name.
    #[arg(long = "name", short = 'n', value_name = "NAME", help = "Print only the pattern with this name.")]
    pub name: Option<String>,

    #[command(flatten)]
    pub rules: RuleOptions,
}

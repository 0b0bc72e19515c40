// logmask/src/logger.rs
//! Diagnostic logging for the logmask binary.
//!
//! Diagnostics go through `env_logger`, but every line is rendered by a
//! `MaskingLayout`, so logmask never leaks a secret in its own messages. The
//! layout is created before any configuration is loaded; the command wires
//! the rules into it later.

use std::io::Write;
use std::sync::Arc;

use env_logger::{Builder, Env};
use log::LevelFilter;
use logmask_core::{MaskingEngine, MaskingLayout};

/// Installs the diagnostic logger and returns its (still empty) masking layout.
///
/// `level` overrides `RUST_LOG` when given. Installing twice keeps the first
/// logger, which only happens in tests.
pub fn init_logger(level: Option<LevelFilter>) -> Arc<MaskingLayout> {
    let layout = Arc::new(
        MaskingLayout::new(MaskingEngine::new())
            .with_formatter(|record| format!("[{} {}] {}", record.level(), record.target(), record.args())),
    );

    let mut builder = Builder::from_env(Env::default().default_filter_or("warn"));
    if let Some(level) = level {
        builder.filter_level(level);
    }
    let format_layout = Arc::clone(&layout);
    builder.format(move |buf, record| writeln!(buf, "{}", format_layout.format(record)));
    let _ = builder.try_init();

    layout
}

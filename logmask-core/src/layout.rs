// logmask-core/src/layout.rs
//! Log pipeline integration.
//!
//! A [`MaskingLayout`] renders a `log::Record` to a line and masks it. Hosts
//! that want masking expose their layout through [`MaskingLayoutHost`], which
//! is how configuration gets wired into them. [`MaskingLogger`] is a ready to
//! use `log` backend built on these pieces.
//!
//! License: MIT OR APACHE 2.0

use std::fmt;
use std::io::Write;
use std::sync::{Mutex, PoisonError};

use log::{LevelFilter, Log, Metadata, Record, SetLoggerError};

use crate::engine::Redactor;
use crate::engines::mask_engine::MaskingEngine;
use crate::rules::store::RuleStore;

/// Renders a record to a single line, before masking.
pub type RecordFormatter = Box<dyn Fn(&Record<'_>) -> String + Send + Sync>;

fn default_format(record: &Record<'_>) -> String {
    format!("{} {} - {}", record.level(), record.target(), record.args())
}

/// A record formatter followed by the masking engine.
pub struct MaskingLayout {
    formatter: RecordFormatter,
    engine: MaskingEngine,
}

impl MaskingLayout {
    /// Uses the default `"{level} {target} - {message}"` format.
    pub fn new(engine: MaskingEngine) -> Self {
        Self {
            formatter: Box::new(default_format),
            engine,
        }
    }

    pub fn with_formatter<F>(mut self, formatter: F) -> Self
    where
        F: Fn(&Record<'_>) -> String + Send + Sync + 'static,
    {
        self.formatter = Box::new(formatter);
        self
    }

    pub fn engine(&self) -> &MaskingEngine {
        &self.engine
    }

    pub fn rule_store(&self) -> &RuleStore {
        self.engine.rule_store()
    }

    /// Renders `record` and masks the rendered line.
    pub fn format(&self, record: &Record<'_>) -> String {
        let line = (self.formatter)(record);
        self.engine.redact(&line).into_owned()
    }
}

impl fmt::Debug for MaskingLayout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MaskingLayout")
            .field("engine", &self.engine)
            .finish_non_exhaustive()
    }
}

/// Capability of a log host component that carries a configurable masking layout.
pub trait MaskingLayoutHost: Send + Sync {
    fn masking_layout(&self) -> &MaskingLayout;
}

impl MaskingLayoutHost for MaskingLayout {
    fn masking_layout(&self) -> &MaskingLayout {
        self
    }
}

/// A `log` backend that writes every enabled record, masked, to a sink.
pub struct MaskingLogger {
    layout: MaskingLayout,
    level: LevelFilter,
    sink: Mutex<Box<dyn Write + Send>>,
}

impl MaskingLogger {
    pub fn new<W>(layout: MaskingLayout, sink: W) -> Self
    where
        W: Write + Send + 'static,
    {
        Self {
            layout,
            level: LevelFilter::Info,
            sink: Mutex::new(Box::new(sink)),
        }
    }

    /// Writes masked records to stderr.
    pub fn stderr(layout: MaskingLayout) -> Self {
        Self::new(layout, std::io::stderr())
    }

    pub fn with_level(mut self, level: LevelFilter) -> Self {
        self.level = level;
        self
    }

    pub fn level(&self) -> LevelFilter {
        self.level
    }

    /// Installs this logger as the global `log` backend.
    ///
    /// The returned reference stays valid for the rest of the process, so the
    /// caller can keep configuring the layout after installation.
    pub fn init(self) -> Result<&'static MaskingLogger, SetLoggerError> {
        let level = self.level;
        let logger: &'static MaskingLogger = Box::leak(Box::new(self));
        log::set_logger(logger)?;
        log::set_max_level(level);
        Ok(logger)
    }
}

impl fmt::Debug for MaskingLogger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MaskingLogger")
            .field("layout", &self.layout)
            .field("level", &self.level)
            .finish_non_exhaustive()
    }
}

impl Log for MaskingLogger {
    fn enabled(&self, metadata: &Metadata<'_>) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record<'_>) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let line = self.layout.format(record);
        let mut sink = self.sink.lock().unwrap_or_else(PoisonError::into_inner);
        // A failing sink must not take the caller down with it.
        let _ = writeln!(sink, "{}", line);
    }

    fn flush(&self) {
        let mut sink = self.sink.lock().unwrap_or_else(PoisonError::into_inner);
        let _ = sink.flush();
    }
}

impl MaskingLayoutHost for MaskingLogger {
    fn masking_layout(&self) -> &MaskingLayout {
        &self.layout
    }
}

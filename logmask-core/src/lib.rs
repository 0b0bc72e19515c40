// logmask-core/src/lib.rs
//! # logmask Core Library
//!
//! `logmask-core` redacts sensitive values inside already rendered log lines
//! while keeping the surrounding context readable. Each masking rule is a
//! regular expression with exactly two capture groups: the first matches the
//! identifier to keep (`token=`), the second the value to mask (`abc123`).
//! Only the value is overwritten, character for character, with the masking
//! character, so `token=abc123` becomes `token=******`.
//!
//! ## Modules
//!
//! * `rules`: Pattern validation, the combined matcher and the thread-safe `RuleStore`.
//! * `engines`: The masking algorithm and the `MaskingEngine` built on a shared store.
//! * `engine`: The `Redactor` trait every log host depends on.
//! * `redaction_match`: The `MatchSpan` describing what gets masked.
//! * `config`: YAML masking configuration, defaults and merging.
//! * `layout`: `MaskingLayout`, the `MaskingLayoutHost` capability and `MaskingLogger`.
//! * `writer`: `MaskingWriter`, a line-masking `io::Write` adaptor.
//! * `binding`: Idempotent late binding of configuration to hosts.
//! * `status`: Read-only status view for diagnostics.
//! * `errors`: `ValidationError` and `LogmaskError`.
//!
//! ## Usage Example
//!
//! ```rust
//! use logmask_core::{MaskingEngine, Redactor};
//!
//! let engine = MaskingEngine::new();
//! engine
//!     .store()
//!     .add_patterns(r"(Credit card: )(\d{4}-\d{4}-\d{4}-\d{4})")
//!     .unwrap();
//!
//! let masked = engine.redact("Credit card: 1234-5678-9012-3456");
//! assert_eq!(masked, "Credit card: *******************");
//! ```
//!
//! ## Concurrency
//!
//! Any number of threads may call `redact` while the configuration is being
//! changed. Each call works on one immutable snapshot of the rule set; a
//! change becomes visible to later calls all at once.
//!
//! ## Error Handling
//!
//! Rule mutations return [`ValidationError`] and leave the store untouched on
//! failure. Redaction itself cannot fail. Configuration loading uses
//! `anyhow::Error` with context.
//!
//! ---
//! License: MIT OR Apache-2.0

pub mod binding;
pub mod config;
pub mod engine;
pub mod engines;
pub mod errors;
pub mod layout;
pub mod redaction_match;
pub mod rules;
pub mod status;
pub mod writer;

/// Re-exports the configuration types for loading and merging masking patterns.
pub use config::{merge_patterns, MaskingConfig};

/// Re-exports the error types.
pub use errors::{LogmaskError, ValidationError};

/// Re-exports the redaction seam and its implementation.
pub use engine::Redactor;
pub use engines::mask_engine::{find_spans, redact, MaskingEngine};

pub use redaction_match::MatchSpan;

/// Re-exports the rule store and its snapshot types.
pub use rules::compiler::{validate_pattern, DEFAULT_PATTERN_DELIMITER};
pub use rules::store::{BindOutcome, Rule, RuleSet, RuleStore, DEFAULT_MASKING_CHAR};

/// Re-exports the log pipeline integration.
pub use layout::{MaskingLayout, MaskingLayoutHost, MaskingLogger};
pub use writer::MaskingWriter;

pub use binding::{configure_hosts, ConfigBinding};
pub use status::MaskingStatus;

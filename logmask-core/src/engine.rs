// logmask-core/src/engine.rs
//! Defines the `Redactor` trait, the seam between log hosts and the masking engine.
//!
//! Layouts, loggers and writers only ever talk to a `Redactor`. This keeps
//! the host side independent of how rules are stored or matched.
//!
//! License: MIT OR APACHE 2.0

use std::borrow::Cow;

use crate::rules::store::RuleStore;

/// Masks one fully rendered line.
pub trait Redactor: Send + Sync {
    /// Returns `line` with every configured value span overwritten.
    ///
    /// This never fails: a line that cannot be masked is returned unchanged.
    /// The result is borrowed when nothing was masked.
    fn redact<'a>(&self, line: &'a str) -> Cow<'a, str>;

    /// The store this redactor reads its rules from.
    fn rule_store(&self) -> &RuleStore;
}

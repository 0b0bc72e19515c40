//! compiler.rs - Validation and compilation of masking patterns.
//!
//! Every masking pattern carries exactly two capture groups: the identifier to
//! keep and the value to redact. This module checks candidates against that
//! contract and builds the combined matcher, the alternation of every active
//! pattern, that the redaction path scans with.
//!
//! License: MIT OR APACHE 2.0

use log::{debug, warn};
use regex::{Regex, RegexBuilder};

use crate::errors::ValidationError;

/// Delimiter used by [`split_patterns`] when the caller does not supply one.
pub const DEFAULT_PATTERN_DELIMITER: &str = ",";

/// Number of capture groups a masking pattern must declare.
pub const REQUIRED_CAPTURE_GROUPS: usize = 2;

/// Upper bound on the compiled size of a single (or combined) matcher.
const COMPILED_SIZE_LIMIT: usize = 10 * (1 << 20);

fn build(pattern: &str) -> Result<Regex, regex::Error> {
    RegexBuilder::new(pattern)
        .multi_line(true)
        .size_limit(COMPILED_SIZE_LIMIT)
        .build()
}

/// Number of explicit capture groups, not counting the implicit whole-match group.
pub fn capture_group_count(regex: &Regex) -> usize {
    regex.captures_len().saturating_sub(1)
}

/// Checks that `pattern` compiles and declares exactly two capture groups.
pub fn validate_pattern(pattern: &str) -> Result<(), ValidationError> {
    let regex = build(pattern).map_err(|source| ValidationError::InvalidSyntax {
        pattern: pattern.to_string(),
        source,
    })?;

    let found = capture_group_count(&regex);
    if found != REQUIRED_CAPTURE_GROUPS {
        return Err(ValidationError::GroupCount {
            pattern: pattern.to_string(),
            found,
        });
    }
    Ok(())
}

/// Validates a whole batch, stopping at the first pattern that fails.
pub fn validate_patterns<'a, I>(patterns: I) -> Result<(), ValidationError>
where
    I: IntoIterator<Item = &'a str>,
{
    for pattern in patterns {
        if let Err(e) = validate_pattern(pattern) {
            debug!(target: "logmask_core::compiler", "Rejected masking pattern: {}", e);
            return Err(e);
        }
    }
    Ok(())
}

/// Splits a delimited list of patterns, trimming each fragment and dropping
/// the empty ones.
///
/// Skipped fragments are reported as warnings; they never fail the batch.
pub fn split_patterns(raw: &str, delimiter: &str) -> Vec<String> {
    let delimiter = if delimiter.is_empty() {
        DEFAULT_PATTERN_DELIMITER
    } else {
        delimiter
    };

    let mut fragments = Vec::new();
    let mut skipped = 0usize;
    for fragment in raw.split(delimiter) {
        let fragment = fragment.trim();
        if fragment.is_empty() {
            skipped += 1;
        } else {
            fragments.push(fragment.to_string());
        }
    }

    if skipped > 0 {
        warn!(
            target: "logmask_core::compiler",
            "Skipped {} empty mask pattern fragment(s) while splitting on '{}'",
            skipped, delimiter
        );
    }
    fragments
}

/// Wraps one rule for the alternation.
///
/// A rule that leaves verbose mode on and ends in a `#` comment would swallow
/// the closing paren, so it gets a newline to end the comment first.
fn wrap_pattern(pattern: &str) -> String {
    let wrapped = format!("(?:{})", pattern);
    if pattern.contains('#') && build(&wrapped).is_err() {
        format!("(?:{}\n)", pattern)
    } else {
        wrapped
    }
}

/// Builds the combined matcher for `patterns`.
///
/// Each pattern is wrapped in a non-capturing group before joining so inline
/// flags such as `(?i)` stay scoped to their own rule. Wrapping adds no capture
/// groups, so rule `i` (0-based) still owns groups `2i + 1` and `2i + 2`.
/// Returns `Ok(None)` when there is nothing to compile.
pub fn compile_combined<S: AsRef<str>>(patterns: &[S]) -> Result<Option<Regex>, regex::Error> {
    if patterns.is_empty() {
        return Ok(None);
    }

    let combined = patterns
        .iter()
        .map(|p| wrap_pattern(p.as_ref()))
        .collect::<Vec<_>>()
        .join("|");

    build(&combined).map(Some)
}

/// Builds the combined matcher for a candidate rule list.
///
/// Patterns that are valid on their own can still conflict once joined, for
/// example two rules declaring the same group name. The error names the first
/// pattern whose addition breaks the combination.
pub fn compile_rules<S: AsRef<str>>(patterns: &[S]) -> Result<Option<Regex>, ValidationError> {
    compile_combined(patterns).map_err(|source| {
        let culprit = (1..patterns.len())
            .find(|&n| compile_combined(&patterns[..n]).is_err())
            .unwrap_or(patterns.len());
        ValidationError::Combined {
            pattern: patterns[culprit - 1].as_ref().to_string(),
            source,
        }
    })
}

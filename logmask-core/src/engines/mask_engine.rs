// logmask-core/src/engines/mask_engine.rs
//! The masking engine: resolves which rule fired on each match of the
//! combined matcher and overwrites that rule's value group with the masking
//! character, one character for one character.
//! License: MIT OR APACHE 2.0

use std::borrow::Cow;
use std::sync::Arc;

use regex::Captures;

use crate::engine::Redactor;
use crate::redaction_match::MatchSpan;
use crate::rules::store::{RuleSet, RuleStore};

/// Finds the value span of every match in `line`, left to right.
///
/// Matches never overlap and each value span lies inside its own match, so the
/// returned spans are sorted and disjoint.
pub fn find_spans(line: &str, rules: &RuleSet) -> Vec<MatchSpan> {
    let Some(matcher) = rules.matcher() else {
        return Vec::new();
    };
    // The matcher was compiled from `rules`, so it holds two groups per rule.
    let rule_count = matcher.captures_len().saturating_sub(1) / 2;

    matcher
        .captures_iter(line)
        .filter_map(|caps| value_span(&caps, rule_count))
        .collect()
}

/// Rule `i` owns groups `2i + 1` (identifier) and `2i + 2` (value). The first
/// rule with both groups present is the alternative that fired.
fn value_span(caps: &Captures<'_>, rule_count: usize) -> Option<MatchSpan> {
    (0..rule_count).find_map(|rule_index| {
        let identifier = caps.get(2 * rule_index + 1);
        let value = caps.get(2 * rule_index + 2);
        identifier.and(value).map(|value| MatchSpan {
            rule_index,
            start: value.start(),
            end: value.end(),
        })
    })
}

/// Masks `line` with the rules in `rules`.
///
/// Every character inside a value span becomes the masking character and
/// everything else is copied verbatim, so the character count never changes.
pub fn redact<'a>(line: &'a str, rules: &RuleSet) -> Cow<'a, str> {
    if line.is_empty() {
        return Cow::Borrowed(line);
    }

    let spans = find_spans(line, rules);
    if spans.iter().all(MatchSpan::is_empty) {
        return Cow::Borrowed(line);
    }
    Cow::Owned(mask_spans(line, &spans, rules.masking_char()))
}

fn mask_spans(line: &str, spans: &[MatchSpan], masking_char: char) -> String {
    let mut masked = String::with_capacity(line.len());
    let mut cursor = 0usize;

    for span in spans {
        debug_assert!(cursor <= span.start && span.end <= line.len());
        masked.push_str(&line[cursor..span.start]);
        let width = line[span.start..span.end].chars().count();
        masked.extend(std::iter::repeat(masking_char).take(width));
        cursor = span.end;
    }
    masked.push_str(&line[cursor..]);
    masked
}

/// A `Redactor` over a shared [`RuleStore`].
///
/// Each call takes one snapshot of the store and uses it for the whole line,
/// so a concurrent reconfiguration is either fully visible or not at all.
#[derive(Debug, Clone, Default)]
pub struct MaskingEngine {
    store: Arc<RuleStore>,
}

impl MaskingEngine {
    /// Creates an engine with its own, empty rule store.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_store(store: Arc<RuleStore>) -> Self {
        Self { store }
    }

    /// Shared handle to the underlying store, for wiring configuration.
    pub fn store(&self) -> &Arc<RuleStore> {
        &self.store
    }

    /// Value spans `line` would have masked under the current rules.
    pub fn find_spans(&self, line: &str) -> Vec<MatchSpan> {
        find_spans(line, &self.store.snapshot())
    }
}

impl Redactor for MaskingEngine {
    fn redact<'a>(&self, line: &'a str) -> Cow<'a, str> {
        let snapshot = self.store.snapshot();
        redact(line, &snapshot)
    }

    fn rule_store(&self) -> &RuleStore {
        &self.store
    }
}

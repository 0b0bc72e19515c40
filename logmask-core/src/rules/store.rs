//! store.rs - The rule store: the single owner of masking rules.
//!
//! The store keeps one immutable [`RuleSet`] behind a coarse `RwLock`. Every
//! mutation validates first, builds a complete replacement `RuleSet` (rules,
//! combined matcher and masking character together) inside the exclusive
//! section and swaps it in. Readers clone the current `Arc` and work on that
//! snapshot, so they see either the old state or the new one, never a mix.
//!
//! Diagnostics are only emitted after the guard is released. The masking
//! logger may itself be the installed `log` backend, and it reads this store.
//!
//! License: MIT OR APACHE 2.0

use std::collections::{BTreeMap, BTreeSet};
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use log::{debug, error, info, warn};
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::config::MaskingConfig;
use crate::errors::ValidationError;
use crate::rules::compiler::{
    compile_rules, split_patterns, validate_patterns, DEFAULT_PATTERN_DELIMITER,
};
use crate::status::MaskingStatus;

/// Masking character used until one is configured.
pub const DEFAULT_MASKING_CHAR: char = '*';

/// A single masking rule: an optional configuration key and its pattern source.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rule {
    /// The configuration key, when the rule came from a named mapping.
    pub name: Option<String>,
    /// The raw pattern source with exactly two capture groups.
    pub pattern: String,
}

impl Rule {
    pub fn named(name: impl Into<String>, pattern: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            pattern: pattern.into(),
        }
    }

    pub fn anonymous(pattern: impl Into<String>) -> Self {
        Self {
            name: None,
            pattern: pattern.into(),
        }
    }
}

/// An immutable, fully compiled view of the active rules.
#[derive(Debug, Clone)]
pub struct RuleSet {
    rules: Vec<Rule>,
    matcher: Option<Regex>,
    masking_char: char,
    sources: BTreeSet<String>,
}

impl Default for RuleSet {
    fn default() -> Self {
        Self {
            rules: Vec::new(),
            matcher: None,
            masking_char: DEFAULT_MASKING_CHAR,
            sources: BTreeSet::new(),
        }
    }
}

impl RuleSet {
    /// Builds a rule set for individually validated `rules`.
    ///
    /// Fails when the rules cannot be combined into one matcher. Callers keep
    /// their current rule set in that case.
    pub fn compile(rules: Vec<Rule>, masking_char: char) -> Result<Self, ValidationError> {
        let patterns: Vec<&str> = rules.iter().map(|r| r.pattern.as_str()).collect();
        let matcher = compile_rules(&patterns)?;
        Ok(Self {
            rules,
            matcher,
            masking_char,
            sources: BTreeSet::new(),
        })
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    pub fn patterns(&self) -> Vec<String> {
        self.rules.iter().map(|r| r.pattern.clone()).collect()
    }

    /// The combined matcher, absent when there are no rules.
    pub fn matcher(&self) -> Option<&Regex> {
        self.matcher.as_ref()
    }

    pub fn masking_char(&self) -> char {
        self.masking_char
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Whether this rule set was populated from the named configuration source.
    pub fn is_bound_to(&self, source: &str) -> bool {
        self.sources.contains(source)
    }

    fn with_masking_char(&self, masking_char: char) -> Self {
        Self {
            masking_char,
            ..self.clone()
        }
    }
}

/// Result of reading a raw masking-character setting.
#[derive(Clone, Copy)]
enum MaskingCharInput {
    Empty,
    Exact(char),
    Truncated(char),
}

fn parse_masking_char(input: &str) -> MaskingCharInput {
    let mut chars = input.chars();
    match (chars.next(), chars.next()) {
        (None, _) => MaskingCharInput::Empty,
        (Some(c), None) => MaskingCharInput::Exact(c),
        (Some(c), Some(_)) => MaskingCharInput::Truncated(c),
    }
}

/// Outcome of applying a named configuration source to a store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BindOutcome {
    Applied,
    AlreadyApplied,
}

/// Thread-safe owner of the active [`RuleSet`].
#[derive(Debug, Default)]
pub struct RuleStore {
    state: RwLock<Arc<RuleSet>>,
}

impl RuleStore {
    /// Creates an empty store; redaction through it is a pass-through.
    pub fn new() -> Self {
        Self::default()
    }

    fn read_guard(&self) -> RwLockReadGuard<'_, Arc<RuleSet>> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write_guard(&self) -> RwLockWriteGuard<'_, Arc<RuleSet>> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Returns the current rule set. The snapshot stays valid and unchanged
    /// however the store is mutated afterwards.
    pub fn snapshot(&self) -> Arc<RuleSet> {
        Arc::clone(&self.read_guard())
    }

    /// Sets the masking character.
    ///
    /// Empty input is ignored and the previous character kept. Longer input is
    /// truncated to its first character. Both cases are reported as warnings.
    pub fn set_masking_char(&self, input: &str) {
        let masking_char = match parse_masking_char(input) {
            MaskingCharInput::Empty => {
                warn!(
                    "Masking character cannot be empty, keeping '{}'",
                    self.masking_char()
                );
                return;
            }
            MaskingCharInput::Exact(c) => c,
            MaskingCharInput::Truncated(c) => {
                warn!(
                    "Masking character should be a single character, using first character: '{}'",
                    c
                );
                c
            }
        };

        {
            let mut guard = self.write_guard();
            let next = guard.with_masking_char(masking_char);
            *guard = Arc::new(next);
        }
        info!("Set masking character to: '{}'", masking_char);
    }

    /// Appends every pattern in a comma-separated list.
    pub fn add_patterns(&self, raw: &str) -> Result<(), ValidationError> {
        self.add_patterns_with_delimiter(raw, DEFAULT_PATTERN_DELIMITER)
    }

    /// Appends every pattern in a `delimiter`-separated list.
    ///
    /// The fragments are validated as one batch: if any fails, none is added
    /// and the active rule set is unchanged.
    pub fn add_patterns_with_delimiter(
        &self,
        raw: &str,
        delimiter: &str,
    ) -> Result<(), ValidationError> {
        if raw.trim().is_empty() {
            warn!("Mask pattern cannot be empty, nothing added");
            return Ok(());
        }

        let fragments = split_patterns(raw, delimiter);
        if fragments.is_empty() {
            warn!("Mask pattern list contained no patterns, nothing added");
            return Ok(());
        }
        validate_patterns(fragments.iter().map(String::as_str))?;

        let added = fragments.len();
        let swapped = {
            let mut guard = self.write_guard();
            let mut rules = guard.rules.clone();
            rules.extend(fragments.into_iter().map(Rule::anonymous));
            RuleSet::compile(rules, guard.masking_char).map(|mut next| {
                next.sources = guard.sources.clone();
                let total = next.len();
                *guard = Arc::new(next);
                total
            })
        };

        let total = swapped.inspect_err(report_rejected)?;
        report_recompile(total);
        info!("Added {} mask pattern(s)", added);
        Ok(())
    }

    /// Replaces the whole rule list with the given name/pattern mapping.
    ///
    /// An empty mapping is a no-op. Otherwise every pattern is validated before
    /// anything is touched. The replacement also forgets which configuration
    /// sources were bound, so binding one of them again reapplies it.
    pub fn set_patterns<I, K, V>(&self, patterns: I) -> Result<(), ValidationError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let rules: Vec<Rule> = patterns
            .into_iter()
            .map(|(name, pattern)| Rule::named(name, pattern))
            .collect();
        if rules.is_empty() {
            debug!("Empty pattern mapping supplied, keeping existing rules");
            return Ok(());
        }
        validate_patterns(rules.iter().map(|r| r.pattern.as_str()))?;

        let swapped = {
            let mut guard = self.write_guard();
            RuleSet::compile(rules, guard.masking_char).map(|next| {
                let total = next.len();
                *guard = Arc::new(next);
                total
            })
        };

        let total = swapped.inspect_err(report_rejected)?;
        report_recompile(total);
        info!("Set {} mask pattern(s) from mapping", total);
        Ok(())
    }

    /// Installs the patterns and masking character of `config` in one step.
    ///
    /// Same semantics as [`set_patterns`](Self::set_patterns) followed by
    /// [`set_masking_char`](Self::set_masking_char), except that readers never
    /// observe the intermediate state.
    pub fn apply_config(&self, config: &MaskingConfig) -> Result<(), ValidationError> {
        self.install(None, config).map(|_| ())
    }

    /// Applies `config` unless this store was already populated from `source`.
    pub fn apply_config_from(
        &self,
        source: &str,
        config: &MaskingConfig,
    ) -> Result<BindOutcome, ValidationError> {
        self.install(Some(source), config)
    }

    fn install(
        &self,
        source: Option<&str>,
        config: &MaskingConfig,
    ) -> Result<BindOutcome, ValidationError> {
        if let Some(source) = source {
            if self.read_guard().is_bound_to(source) {
                return Ok(BindOutcome::AlreadyApplied);
            }
        }

        config.validate_patterns()?;
        let rules: Vec<Rule> = config
            .patterns
            .iter()
            .map(|(name, pattern)| Rule::named(name.as_str(), pattern.as_str()))
            .collect();
        let char_input = parse_masking_char(config.masking_char());

        let swapped = {
            let mut guard = self.write_guard();
            if let Some(source) = source {
                if guard.is_bound_to(source) {
                    return Ok(BindOutcome::AlreadyApplied);
                }
            }

            let masking_char = match char_input {
                MaskingCharInput::Empty => guard.masking_char,
                MaskingCharInput::Exact(c) | MaskingCharInput::Truncated(c) => c,
            };
            // A config without patterns only sets the character and keeps the
            // current rules, along with the sources they came from.
            let next = if rules.is_empty() {
                Ok(guard.with_masking_char(masking_char))
            } else {
                RuleSet::compile(rules, masking_char)
            };
            next.map(|mut next| {
                if let Some(source) = source {
                    next.sources.insert(source.to_string());
                }
                let total = next.len();
                *guard = Arc::new(next);
                (total, masking_char)
            })
        };
        let (total, masking_char) = swapped.inspect_err(report_rejected)?;

        match char_input {
            MaskingCharInput::Empty => {
                warn!("Masking character cannot be empty, keeping '{}'", masking_char)
            }
            MaskingCharInput::Truncated(c) => warn!(
                "Masking character should be a single character, using first character: '{}'",
                c
            ),
            MaskingCharInput::Exact(_) => {}
        }
        report_recompile(total);
        match source {
            Some(source) => info!(
                "Applied masking configuration from '{}': {} pattern(s), masking character '{}'",
                source, total, masking_char
            ),
            None => info!(
                "Applied masking configuration: {} pattern(s), masking character '{}'",
                total, masking_char
            ),
        }
        Ok(BindOutcome::Applied)
    }

    /// Pattern sources of the active rules, in matching order.
    pub fn patterns(&self) -> Vec<String> {
        self.read_guard().patterns()
    }

    pub fn masking_char(&self) -> char {
        self.read_guard().masking_char
    }

    /// Looks up one raw pattern by its configuration key.
    pub fn pattern_by_name(&self, name: &str) -> Option<String> {
        self.read_guard()
            .rules
            .iter()
            .find(|r| r.name.as_deref() == Some(name))
            .map(|r| r.pattern.clone())
    }

    /// Named rules as a name -> pattern map. Anonymous rules are left out.
    pub fn pattern_map(&self) -> BTreeMap<String, String> {
        self.read_guard()
            .rules
            .iter()
            .filter_map(|r| r.name.clone().map(|name| (name, r.pattern.clone())))
            .collect()
    }

    pub fn pattern_count(&self) -> usize {
        self.read_guard().len()
    }

    /// Read-only view for diagnostics and administration.
    pub fn status(&self) -> MaskingStatus {
        MaskingStatus::from_rule_set(&self.snapshot())
    }
}

fn report_recompile(total: usize) {
    if total == 0 {
        debug!("No mask patterns active, matcher cleared");
    } else {
        debug!("Compiled pattern with {} mask pattern(s)", total);
    }
}

fn report_rejected(err: &ValidationError) {
    error!("Rejected mask pattern change, keeping the active rules: {}", err);
}

#[cfg(test)]
mod tests {
    use super::*;

    const CARD: &str = r"(Credit card: )(\d{4}-\d{4}-\d{4}-\d{4})";

    #[test]
    fn test_new_store_is_empty() {
        let store = RuleStore::new();
        assert!(store.patterns().is_empty());
        assert_eq!(store.masking_char(), '*');
        assert!(store.snapshot().matcher().is_none());
    }

    #[test]
    fn test_masking_char_rules() {
        let store = RuleStore::new();
        store.set_masking_char("#");
        assert_eq!(store.masking_char(), '#');

        store.set_masking_char("ABC");
        assert_eq!(store.masking_char(), 'A');

        store.set_masking_char("");
        assert_eq!(store.masking_char(), 'A');

        store.set_masking_char("•x");
        assert_eq!(store.masking_char(), '•');
    }

    #[test]
    fn test_add_patterns_appends() {
        let store = RuleStore::new();
        store.add_patterns(r"(Card: )(\d{4}-\d{4}-\d{4}-\d{4})").unwrap();
        store.add_patterns(r"(Email: )(\w+@\w+\.\w+)").unwrap();

        assert_eq!(store.pattern_count(), 2);
        let snapshot = store.snapshot();
        assert_eq!(snapshot.matcher().map(|m| m.captures_len()), Some(5));
    }

    #[test]
    fn test_add_patterns_whitespace_only_is_noop() {
        let store = RuleStore::new();
        store.add_patterns("   ").unwrap();
        store.add_patterns(" , ,").unwrap();
        assert_eq!(store.pattern_count(), 0);
    }

    #[test]
    fn test_add_patterns_rejects_whole_batch() {
        let store = RuleStore::new();
        store.add_patterns(CARD).unwrap();

        let result = store.add_patterns(r"(a=)(\w+),(\d{4}),(b=)(\w+)");
        assert!(result.is_err());
        assert_eq!(store.patterns(), vec![CARD.to_string()]);
    }

    #[test]
    fn test_set_patterns_replaces() {
        let store = RuleStore::new();
        store.add_patterns(r"(old: )(\w+)").unwrap();

        store
            .set_patterns([("new", r"(new: )(\w+)")])
            .unwrap();
        assert_eq!(store.patterns(), vec![r"(new: )(\w+)".to_string()]);
        assert_eq!(store.pattern_by_name("new").as_deref(), Some(r"(new: )(\w+)"));
        assert_eq!(store.pattern_by_name("old"), None);
    }

    #[test]
    fn test_set_patterns_empty_map_keeps_rules() {
        let store = RuleStore::new();
        store.add_patterns(r"(existing: )(\w+)").unwrap();

        store.set_patterns(BTreeMap::<String, String>::new()).unwrap();
        assert_eq!(store.pattern_count(), 1);
    }

    #[test]
    fn test_set_patterns_invalid_keeps_rules_and_char() {
        let store = RuleStore::new();
        store.add_patterns(CARD).unwrap();
        store.set_masking_char("X");

        let result = store.set_patterns([("valid", r"(valid: )(\w+)"), ("invalid", "(invalid[regex")]);
        assert!(matches!(result, Err(ValidationError::InvalidSyntax { .. })));
        assert_eq!(store.patterns(), vec![CARD.to_string()]);
        assert_eq!(store.masking_char(), 'X');
    }

    #[test]
    fn test_pattern_map_skips_anonymous_rules() {
        let store = RuleStore::new();
        store.set_patterns([("token", r"(token=)(\w+)")]).unwrap();
        store.add_patterns(r"(secret=)(\w+)").unwrap();

        let map = store.pattern_map();
        assert_eq!(map.len(), 1);
        assert_eq!(store.pattern_count(), 2);
    }

    #[test]
    fn test_snapshot_is_stable_across_mutation() {
        let store = RuleStore::new();
        store.add_patterns(CARD).unwrap();
        let before = store.snapshot();

        store.set_masking_char("#");
        store.set_patterns([("x", r"(x=)(\w+)")]).unwrap();

        assert_eq!(before.masking_char(), '*');
        assert_eq!(before.patterns(), vec![CARD.to_string()]);
    }

    #[test]
    fn test_conflicting_group_name_is_rejected() {
        let store = RuleStore::new();
        store.add_patterns(r"(token=)(?P<v>\w+)").unwrap();

        let result = store.add_patterns(r"(pin=)(?P<v>\d+)");
        assert!(matches!(result, Err(ValidationError::Combined { .. })));

        let snapshot = store.snapshot();
        assert_eq!(snapshot.patterns(), vec![r"(token=)(?P<v>\w+)".to_string()]);
        assert_eq!(crate::redact("token=abc", &snapshot), "token=***");
    }

    #[test]
    fn test_conflicting_mapping_keeps_rules() {
        let store = RuleStore::new();
        store.add_patterns(CARD).unwrap();

        let result = store.set_patterns([("a", r"(?P<k>a)(b)"), ("c", r"(?P<k>c)(d)")]);
        assert!(matches!(result, Err(ValidationError::Combined { .. })));
        assert_eq!(store.patterns(), vec![CARD.to_string()]);
        assert!(store.snapshot().matcher().is_some());
    }

    #[test]
    fn test_verbose_rule_with_trailing_comment_is_combined() {
        let store = RuleStore::new();
        store.add_patterns(r"(token=)(\w+)").unwrap();
        store.add_patterns("(?x)(pin=)(\\d+) # trailing comment").unwrap();

        let snapshot = store.snapshot();
        assert_eq!(crate::redact("token=abc pin=1234", &snapshot), "token=*** pin=****");
    }

    #[test]
    fn test_set_patterns_forgets_bound_sources() {
        let store = RuleStore::new();
        let mut config = MaskingConfig::default();
        config.add_pattern("token", r"(token=)(\w+)");

        store.apply_config_from("app", &config).unwrap();
        store.set_patterns([("pin", r"(pin=)(\d+)")]).unwrap();
        assert!(!store.snapshot().is_bound_to("app"));

        assert_eq!(store.apply_config_from("app", &config).unwrap(), BindOutcome::Applied);
        assert_eq!(store.pattern_by_name("token").as_deref(), Some(r"(token=)(\w+)"));
    }

    #[test]
    fn test_apply_config_from_is_idempotent() {
        let store = RuleStore::new();
        let mut config = MaskingConfig::default();
        config.add_pattern("token", r"(token=)(\w+)");

        assert_eq!(store.apply_config_from("app", &config).unwrap(), BindOutcome::Applied);
        store.add_patterns(r"(secret=)(\w+)").unwrap();
        assert_eq!(
            store.apply_config_from("app", &config).unwrap(),
            BindOutcome::AlreadyApplied
        );
        assert_eq!(store.pattern_count(), 2);
    }
}

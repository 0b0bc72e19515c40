//! Read-only status view of a rule store, for diagnostics and administration.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::rules::store::RuleSet;

/// Serializable snapshot of the masking configuration in effect.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MaskingStatus {
    pub masking_char: String,
    /// Named rules, keyed by configuration name.
    pub patterns: BTreeMap<String, String>,
    /// Rules added without a name, in matching order.
    pub unnamed_patterns: Vec<String>,
    /// Total number of active rules, named or not.
    pub pattern_count: usize,
}

impl MaskingStatus {
    pub fn from_rule_set(rules: &RuleSet) -> Self {
        let mut patterns = BTreeMap::new();
        let mut unnamed_patterns = Vec::new();
        for rule in rules.rules() {
            match &rule.name {
                Some(name) => {
                    patterns.insert(name.clone(), rule.pattern.clone());
                }
                None => unnamed_patterns.push(rule.pattern.clone()),
            }
        }

        Self {
            masking_char: rules.masking_char().to_string(),
            patterns,
            unnamed_patterns,
            pattern_count: rules.len(),
        }
    }

    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

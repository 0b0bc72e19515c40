// logmask-core/src/redaction_match.rs
//! Data structures describing where a line gets masked.

use serde::{Deserialize, Serialize};

/// The value span of one match: the bytes that will be overwritten.
///
/// Offsets are byte offsets into the scanned line and always fall on
/// character boundaries. `rule_index` is the 0-based position of the rule
/// whose alternative fired.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MatchSpan {
    pub rule_index: usize,
    pub start: usize,
    pub end: usize,
}

impl MatchSpan {
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Whether the byte at `offset` falls inside this span.
    pub fn contains(&self, offset: usize) -> bool {
        self.start <= offset && offset < self.end
    }
}

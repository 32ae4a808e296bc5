//! Fragment extraction primitives.
//!
//! Every function here is total: inputs of any length, including the empty
//! string, produce a fragment no longer than the requested length. Lengths are
//! counted in `char`s, never bytes.

use serde::{Deserialize, Serialize};

/// How a fragment is cut from a (compacted) field value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExtractionRule {
    /// First `len` characters
    Head { len: usize },
    /// `len` characters starting `offset` characters before the end
    Tail { offset: usize, len: usize },
}

impl ExtractionRule {
    /// Apply the rule to a value.
    pub fn apply(&self, value: &str) -> String {
        match *self {
            Self::Head { len } => head(value, len),
            Self::Tail { offset, len } => tail(value, offset, len),
        }
    }

    /// Upper bound on the fragment length this rule produces.
    pub fn max_len(&self) -> usize {
        match *self {
            Self::Head { len } | Self::Tail { len, .. } => len,
        }
    }
}

/// Take the first `min(len, value.len())` characters.
pub fn head(value: &str, len: usize) -> String {
    value.chars().take(len).collect()
}

/// Take up to `len` characters starting `offset` characters from the end.
///
/// A start position before the beginning of the value clamps to 0, and the
/// fragment stops at the end of the value.
pub fn tail(value: &str, offset: usize, len: usize) -> String {
    let count = value.chars().count();
    let start = count.saturating_sub(offset);
    value.chars().skip(start).take(len).collect()
}

/// Strip whitespace and `-` separators before extraction.
pub fn compact(value: &str) -> String {
    value
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '-')
        .collect()
}

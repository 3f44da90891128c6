//! Whitespace tokenization of user supplied keyword groups.

use crate::types::KeywordSet;
use log::debug;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A manual keyword combination as entered by a user: a whitespace separated
/// list that can be switched off without deleting it.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ManualCombination {
    pub keywords: String,
    #[cfg_attr(feature = "serde", serde(default = "enabled_by_default"))]
    pub enabled: bool,
}

#[cfg(feature = "serde")]
const fn enabled_by_default() -> bool {
    true
}

impl ManualCombination {
    /// An enabled combination.
    pub fn new(keywords: impl Into<String>) -> Self {
        Self {
            keywords: keywords.into(),
            enabled: true,
        }
    }
}

/// Splits a whitespace separated keyword list into a canonical set.
pub fn parse_keywords(raw: &str) -> KeywordSet {
    KeywordSet::from_keywords(raw.split_whitespace())
}

/// Tokenizes every enabled, non-blank combination.
///
/// Disabled entries and entries with no tokens are dropped; tokens within a
/// group are deduplicated.
pub fn parse_keyword_groups(combinations: &[ManualCombination]) -> Vec<KeywordSet> {
    let groups: Vec<KeywordSet> = combinations
        .iter()
        .filter(|c| c.enabled)
        .map(|c| parse_keywords(&c.keywords))
        .filter(|set| !set.is_empty())
        .collect();
    debug!(
        "Tokenized {} of {} manual keyword combinations",
        groups.len(),
        combinations.len()
    );
    groups
}

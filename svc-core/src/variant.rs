//! Variants and the duplicate-free set that accumulates them during a run.

use std::collections::HashSet;
use std::fmt;
use svc_rules::{KeywordSet, PassType, ShaderId};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A concrete compilation target: one pass of one shader with a keyword set.
///
/// `KeywordSet` is canonical, so the derived equality and hash ignore the
/// order keywords were supplied in.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Variant {
    pub shader: ShaderId,
    pub pass: PassType,
    pub keywords: KeywordSet,
}

impl Variant {
    /// Creates a variant.
    pub fn new(shader: impl Into<ShaderId>, pass: PassType, keywords: KeywordSet) -> Self {
        Self {
            shader: shader.into(),
            pass,
            keywords,
        }
    }
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} [{}] {}", self.shader, self.pass, self.keywords)
    }
}

/// An insertion-ordered collection of unique variants.
///
/// Uniqueness is on (shader, pass, keyword set content). Iteration yields
/// variants in the order they were first added.
#[derive(Debug, Clone, Default)]
pub struct VariantSet {
    entries: Vec<Variant>,
    index: HashSet<Variant>,
}

impl VariantSet {
    /// Creates an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a variant.
    ///
    /// Returns `false` and leaves the set untouched if an equal variant is
    /// already present.
    pub fn add(&mut self, variant: Variant) -> bool {
        if self.index.contains(&variant) {
            return false;
        }
        self.index.insert(variant.clone());
        self.entries.push(variant);
        true
    }

    /// Whether an equal variant is present.
    pub fn contains(&self, variant: &Variant) -> bool {
        self.index.contains(variant)
    }

    /// Number of variants.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the set is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates variants in first-seen order.
    pub fn iter(&self) -> std::slice::Iter<'_, Variant> {
        self.entries.iter()
    }

    /// Variants in first-seen order.
    pub fn as_slice(&self) -> &[Variant] {
        &self.entries
    }

    /// Keeps only the variants for which `keep` returns true.
    ///
    /// Returns the number of variants removed.
    pub fn retain<F>(&mut self, mut keep: F) -> usize
    where
        F: FnMut(&Variant) -> bool,
    {
        let before = self.entries.len();
        let index = &mut self.index;
        self.entries.retain(|variant| {
            let kept = keep(variant);
            if !kept {
                index.remove(variant);
            }
            kept
        });
        before - self.entries.len()
    }

    /// Removes every variant.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.index.clear();
    }

    /// Distinct shaders, in the order their first variant was added.
    pub fn shaders(&self) -> Vec<&ShaderId> {
        let mut seen = HashSet::new();
        self.entries
            .iter()
            .map(|v| &v.shader)
            .filter(|shader| seen.insert(*shader))
            .collect()
    }

    /// Variants belonging to one shader.
    pub fn variants_for<'a>(&'a self, shader: &'a ShaderId) -> impl Iterator<Item = &'a Variant> {
        self.entries.iter().filter(move |v| &v.shader == shader)
    }
}

impl<'a> IntoIterator for &'a VariantSet {
    type Item = &'a Variant;
    type IntoIter = std::slice::Iter<'a, Variant>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

impl IntoIterator for VariantSet {
    type Item = Variant;
    type IntoIter = std::vec::IntoIter<Variant>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl Extend<Variant> for VariantSet {
    fn extend<T: IntoIterator<Item = Variant>>(&mut self, iter: T) {
        for variant in iter {
            self.add(variant);
        }
    }
}

impl FromIterator<Variant> for VariantSet {
    fn from_iter<T: IntoIterator<Item = Variant>>(iter: T) -> Self {
        let mut set = Self::new();
        set.extend(iter);
        set
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn variant(pass: PassType, keywords: &[&str]) -> Variant {
        Variant::new("Lit", pass, KeywordSet::from_keywords(keywords.iter().copied()))
    }

    #[test]
    fn test_add_ignores_keyword_order() {
        let mut set = VariantSet::new();
        assert!(set.add(variant(PassType::ForwardBase, &["A", "B"])));
        assert!(!set.add(variant(PassType::ForwardBase, &["B", "A"])));
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn test_pass_and_shader_distinguish_variants() {
        let mut set = VariantSet::new();
        assert!(set.add(variant(PassType::ForwardBase, &["A"])));
        assert!(set.add(variant(PassType::ShadowCaster, &["A"])));
        assert!(set.add(Variant::new(
            "Unlit",
            PassType::ForwardBase,
            KeywordSet::single("A")
        )));
        assert_eq!(set.len(), 3);
        assert_eq!(set.shaders().len(), 2);
    }

    #[test]
    fn test_contains_is_order_independent() {
        let set: VariantSet = [variant(PassType::Normal, &["X", "Y", "Z"])]
            .into_iter()
            .collect();
        assert!(set.contains(&variant(PassType::Normal, &["Z", "X", "Y"])));
        assert!(!set.contains(&variant(PassType::Normal, &["X", "Y"])));
    }

    #[test]
    fn test_retain_keeps_index_in_sync() {
        let mut set: VariantSet = [
            variant(PassType::Normal, &["A"]),
            variant(PassType::Normal, &["B"]),
            variant(PassType::Normal, &["C"]),
        ]
        .into_iter()
        .collect();
        let removed = set.retain(|v| !v.keywords.contains("B"));
        assert_eq!(removed, 1);
        assert!(!set.contains(&variant(PassType::Normal, &["B"])));
        // Re-adding a removed variant must succeed.
        assert!(set.add(variant(PassType::Normal, &["B"])));
        let keys: Vec<String> = set.iter().map(|v| v.keywords.canonical_key()).collect();
        assert_eq!(keys, vec!["A", "C", "B"]);
    }
}

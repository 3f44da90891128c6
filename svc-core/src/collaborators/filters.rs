//! Built-in material and variant filters.

use super::{CollectorTag, MaterialFilter, VariantFilter};
use crate::variant::Variant;
use svc_rules::{parse_keywords, KeywordSet, Material, PassType};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Strips materials whose shader name contains any of the given substrings,
/// ignoring case.
#[derive(Debug, Clone)]
pub struct ShaderExcludeFilter {
    patterns: Vec<String>,
}

impl ShaderExcludeFilter {
    pub fn new<I, S>(patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            patterns: patterns
                .into_iter()
                .map(|p| p.as_ref().to_lowercase())
                .filter(|p| !p.is_empty())
                .collect(),
        }
    }
}

impl MaterialFilter for ShaderExcludeFilter {
    fn should_keep(&self, material: &Material, _provenance: &[CollectorTag]) -> bool {
        let shader = material.shader.as_str().to_lowercase();
        !self.patterns.iter().any(|p| shader.contains(p.as_str()))
    }
}

/// Keeps only materials contributed by at least one of the named collectors.
#[derive(Debug, Clone)]
pub struct ProvenanceFilter {
    collectors: Vec<String>,
}

impl ProvenanceFilter {
    pub fn new<I, S>(collectors: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            collectors: collectors.into_iter().map(Into::into).collect(),
        }
    }
}

impl MaterialFilter for ProvenanceFilter {
    fn should_keep(&self, _material: &Material, provenance: &[CollectorTag]) -> bool {
        provenance
            .iter()
            .any(|tag| self.collectors.iter().any(|name| *name == tag.name))
    }
}

/// A user-entered keyword rule for `KeywordVariantFilter`.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct KeywordFilterRule {
    /// Whitespace separated keywords.
    pub keywords: String,
    #[cfg_attr(feature = "serde", serde(default = "enabled_by_default"))]
    pub enabled: bool,
    /// Strip every variant containing all the keywords instead of only the
    /// variant with exactly these keywords.
    #[cfg_attr(feature = "serde", serde(default))]
    pub include_all_combinations: bool,
}

#[cfg(feature = "serde")]
const fn enabled_by_default() -> bool {
    true
}

impl KeywordFilterRule {
    /// An enabled rule matching the exact keyword set.
    pub fn exact(keywords: impl Into<String>) -> Self {
        Self {
            keywords: keywords.into(),
            enabled: true,
            include_all_combinations: false,
        }
    }

    /// An enabled rule matching any variant that contains the keywords.
    pub fn containing(keywords: impl Into<String>) -> Self {
        Self {
            include_all_combinations: true,
            ..Self::exact(keywords)
        }
    }
}

#[derive(Debug, Clone)]
struct CompiledRule {
    keywords: KeywordSet,
    include_all_combinations: bool,
}

impl CompiledRule {
    fn matches(&self, variant: &Variant) -> bool {
        if self.include_all_combinations {
            self.keywords.is_subset_of(&variant.keywords)
        } else {
            self.keywords == variant.keywords
        }
    }
}

/// Strips variants matched by any enabled keyword rule.
///
/// Disabled rules and rules without keywords never match.
#[derive(Debug, Clone, Default)]
pub struct KeywordVariantFilter {
    rules: Vec<CompiledRule>,
}

impl KeywordVariantFilter {
    pub fn new(rules: &[KeywordFilterRule]) -> Self {
        let rules = rules
            .iter()
            .filter(|rule| rule.enabled)
            .map(|rule| CompiledRule {
                keywords: parse_keywords(&rule.keywords),
                include_all_combinations: rule.include_all_combinations,
            })
            .filter(|rule| !rule.keywords.is_empty())
            .collect();
        Self { rules }
    }

    /// Number of active rules.
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

impl VariantFilter for KeywordVariantFilter {
    fn should_keep(&self, variant: &Variant) -> bool {
        !self.rules.iter().any(|rule| rule.matches(variant))
    }
}

/// Strips every variant of the listed passes.
#[derive(Debug, Clone)]
pub struct PassExcludeFilter {
    passes: Vec<PassType>,
}

impl PassExcludeFilter {
    pub fn new(passes: impl IntoIterator<Item = PassType>) -> Self {
        Self {
            passes: passes.into_iter().collect(),
        }
    }
}

impl VariantFilter for PassExcludeFilter {
    fn should_keep(&self, variant: &Variant) -> bool {
        !self.passes.contains(&variant.pass)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn variant(keywords: &str) -> Variant {
        Variant::new("Lit", PassType::ForwardBase, parse_keywords(keywords))
    }

    #[test]
    fn test_shader_exclude_is_case_insensitive() {
        let filter = ShaderExcludeFilter::new(["hidden/"]);
        let hidden = Material::new("A", "Hidden/InternalError", ["X"]);
        let lit = Material::new("B", "Standard", ["X"]);
        assert!(!filter.should_keep(&hidden, &[]));
        assert!(filter.should_keep(&lit, &[]));
    }

    #[test]
    fn test_provenance_filter() {
        let filter = ProvenanceFilter::new(["scenes"]);
        let material = Material::new("A", "Lit", ["X"]);
        assert!(filter.should_keep(&material, &[CollectorTag::new(1, "scenes")]));
        assert!(!filter.should_keep(&material, &[CollectorTag::new(0, "assigned")]));
        assert!(!filter.should_keep(&material, &[]));
    }

    #[test]
    fn test_exact_rule_ignores_order() {
        let filter = KeywordVariantFilter::new(&[KeywordFilterRule::exact("B A")]);
        assert!(!filter.should_keep(&variant("A B")));
        assert!(filter.should_keep(&variant("A B C")));
        assert!(filter.should_keep(&variant("A")));
    }

    #[test]
    fn test_containing_rule_strips_supersets() {
        let filter = KeywordVariantFilter::new(&[KeywordFilterRule::containing("A B")]);
        assert!(!filter.should_keep(&variant("A B")));
        assert!(!filter.should_keep(&variant("A B C")));
        assert!(filter.should_keep(&variant("A C")));
    }

    #[test]
    fn test_disabled_and_blank_rules_are_ignored() {
        let mut disabled = KeywordFilterRule::containing("A");
        disabled.enabled = false;
        let filter = KeywordVariantFilter::new(&[disabled, KeywordFilterRule::containing("  ")]);
        assert!(filter.is_empty());
        assert!(filter.should_keep(&variant("")));
        assert!(filter.should_keep(&variant("A")));
    }

    #[test]
    fn test_pass_exclude() {
        let filter = PassExcludeFilter::new([PassType::ShadowCaster]);
        assert!(filter.should_keep(&variant("A")));
        assert!(!filter.should_keep(&Variant::new(
            "Lit",
            PassType::ShadowCaster,
            KeywordSet::empty()
        )));
    }
}

use std::cmp::Ordering;
use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A single shader keyword token (one compile-time feature toggle).
///
/// Keywords are opaque and case-sensitive. The type itself does not reject
/// whitespace or empty tokens; that is left to whoever validates keyword
/// sets against a shader (see `ShaderCatalog`).
///
/// Keywords order by [`collate`], not by their bytes.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(transparent))]
pub struct Keyword(String);

impl Keyword {
    /// Creates a keyword from any string-like value.
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Returns the keyword text.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether the token is usable as a keyword at all (non-empty, no whitespace).
    pub fn is_well_formed(&self) -> bool {
        !self.0.is_empty() && !self.0.chars().any(char::is_whitespace)
    }
}

impl PartialOrd for Keyword {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Keyword {
    fn cmp(&self, other: &Self) -> Ordering {
        collate(&self.0, other.0.as_str())
    }
}

/// Primary sort weight of one character: punctuation, then digits, then
/// letters, then everything else, with case folded away.
fn collation_weight(c: char) -> (u8, char) {
    let class = if c.is_ascii_punctuation() || c.is_whitespace() {
        0
    } else if c.is_numeric() {
        1
    } else if c.is_alphabetic() {
        2
    } else {
        3
    };
    (class, c.to_lowercase().next().unwrap_or(c))
}

/// Compares keyword text the way the host editor sorts keyword lists.
///
/// `_` and other punctuation sort before digits and digits before letters.
/// Letters compare case-insensitively first; among texts that differ only in
/// case, lower case sorts first. Byte order breaks any remaining tie so that
/// only identical texts compare equal.
pub fn collate(a: &str, b: &str) -> Ordering {
    a.chars()
        .map(collation_weight)
        .cmp(b.chars().map(collation_weight))
        .then_with(|| {
            a.chars()
                .map(char::is_uppercase)
                .cmp(b.chars().map(char::is_uppercase))
        })
        .then_with(|| a.cmp(b))
}

impl fmt::Display for Keyword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Keyword {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for Keyword {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl AsRef<str> for Keyword {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// An order-independent, duplicate-free set of keywords.
///
/// Stored sorted in [`collate`] order so that two sets holding the same
/// keywords are structurally identical. Equality therefore rejects sets
/// of different lengths before looking at any element.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(from = "Vec<Keyword>", into = "Vec<Keyword>")
)]
pub struct KeywordSet(Vec<Keyword>);

impl KeywordSet {
    /// The empty keyword set.
    pub fn empty() -> Self {
        Self(Vec::new())
    }

    /// Builds a canonical set from any collection of keywords.
    pub fn from_keywords<I, K>(keywords: I) -> Self
    where
        I: IntoIterator<Item = K>,
        K: Into<Keyword>,
    {
        let mut keywords: Vec<Keyword> = keywords.into_iter().map(Into::into).collect();
        keywords.sort_unstable();
        keywords.dedup();
        Self(keywords)
    }

    /// A set holding exactly one keyword.
    pub fn single(keyword: impl Into<Keyword>) -> Self {
        Self(vec![keyword.into()])
    }

    /// Number of keywords in the set.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the set holds no keywords.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterates the keywords in canonical order.
    pub fn iter(&self) -> std::slice::Iter<'_, Keyword> {
        self.0.iter()
    }

    /// The keywords in canonical order.
    pub fn as_slice(&self) -> &[Keyword] {
        &self.0
    }

    /// Checks membership of a keyword by its text.
    pub fn contains(&self, keyword: &str) -> bool {
        self.position(keyword).is_ok()
    }

    /// Inserts a keyword, keeping the set canonical.
    ///
    /// Returns `false` if the keyword was already present.
    pub fn insert(&mut self, keyword: impl Into<Keyword>) -> bool {
        let keyword = keyword.into();
        match self.position(keyword.as_str()) {
            Ok(_) => false,
            Err(index) => {
                self.0.insert(index, keyword);
                true
            }
        }
    }

    /// Removes a keyword. Returns `false` if it was not present.
    pub fn remove(&mut self, keyword: &str) -> bool {
        match self.position(keyword) {
            Ok(index) => {
                self.0.remove(index);
                true
            }
            Err(_) => false,
        }
    }

    /// Whether every keyword of `self` is also in `other`.
    pub fn is_subset_of(&self, other: &Self) -> bool {
        self.len() <= other.len() && self.iter().all(|k| other.contains(k.as_str()))
    }

    /// The canonical key: keywords joined by single spaces.
    pub fn canonical_key(&self) -> String {
        let mut key = String::new();
        for (index, keyword) in self.0.iter().enumerate() {
            if index > 0 {
                key.push(' ');
            }
            key.push_str(keyword.as_str());
        }
        key
    }

    fn position(&self, keyword: &str) -> Result<usize, usize> {
        self.0.binary_search_by(|k| collate(k.as_str(), keyword))
    }
}

impl fmt::Display for KeywordSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            f.write_str("<no keywords>")
        } else {
            f.write_str(&self.canonical_key())
        }
    }
}

/// Parses a whitespace separated keyword list.
impl FromStr for KeywordSet {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::from_keywords(s.split_whitespace()))
    }
}

impl From<Vec<Keyword>> for KeywordSet {
    fn from(value: Vec<Keyword>) -> Self {
        Self::from_keywords(value)
    }
}

impl From<KeywordSet> for Vec<Keyword> {
    fn from(value: KeywordSet) -> Self {
        value.0
    }
}

impl<K: Into<Keyword>> FromIterator<K> for KeywordSet {
    fn from_iter<T: IntoIterator<Item = K>>(iter: T) -> Self {
        Self::from_keywords(iter)
    }
}

impl<'a> IntoIterator for &'a KeywordSet {
    type Item = &'a Keyword;
    type IntoIter = std::slice::Iter<'a, Keyword>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Identifies a shader program by name.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(transparent))]
pub struct ShaderId(String);

impl ShaderId {
    /// Creates a shader identity from its name.
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// The shader name.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ShaderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ShaderId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for ShaderId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// The render pass kinds a shader may implement.
///
/// The range is fixed and independent of any shader. Declaration order
/// matches the numeric values, so the derived `Ord` walks passes from
/// minimum to maximum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum PassType {
    Normal,
    Vertex,
    VertexLm,
    ForwardBase,
    ForwardAdd,
    LightPrePassBase,
    LightPrePassFinal,
    ShadowCaster,
    Deferred,
    Meta,
    MotionVectors,
    ScriptableRenderPipeline,
    ScriptableRenderPipelineDefaultUnlit,
    GrabPass,
}

impl PassType {
    /// Every pass kind, ascending.
    pub const ALL: [Self; 14] = [
        Self::Normal,
        Self::Vertex,
        Self::VertexLm,
        Self::ForwardBase,
        Self::ForwardAdd,
        Self::LightPrePassBase,
        Self::LightPrePassFinal,
        Self::ShadowCaster,
        Self::Deferred,
        Self::Meta,
        Self::MotionVectors,
        Self::ScriptableRenderPipeline,
        Self::ScriptableRenderPipelineDefaultUnlit,
        Self::GrabPass,
    ];

    /// Numeric value used by the host pipeline.
    pub const fn value(self) -> i32 {
        match self {
            Self::Normal => 0,
            Self::Vertex => 1,
            Self::VertexLm => 2,
            Self::ForwardBase => 4,
            Self::ForwardAdd => 5,
            Self::LightPrePassBase => 6,
            Self::LightPrePassFinal => 7,
            Self::ShadowCaster => 8,
            Self::Deferred => 10,
            Self::Meta => 11,
            Self::MotionVectors => 12,
            Self::ScriptableRenderPipeline => 13,
            Self::ScriptableRenderPipelineDefaultUnlit => 14,
            Self::GrabPass => 15,
        }
    }

    /// Looks up a pass kind by its numeric value.
    pub fn from_value(value: i32) -> Option<Self> {
        Self::ALL.into_iter().find(|pass| pass.value() == value)
    }

    /// Canonical name, identical to the variant name.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Normal => "Normal",
            Self::Vertex => "Vertex",
            Self::VertexLm => "VertexLm",
            Self::ForwardBase => "ForwardBase",
            Self::ForwardAdd => "ForwardAdd",
            Self::LightPrePassBase => "LightPrePassBase",
            Self::LightPrePassFinal => "LightPrePassFinal",
            Self::ShadowCaster => "ShadowCaster",
            Self::Deferred => "Deferred",
            Self::Meta => "Meta",
            Self::MotionVectors => "MotionVectors",
            Self::ScriptableRenderPipeline => "ScriptableRenderPipeline",
            Self::ScriptableRenderPipelineDefaultUnlit => "ScriptableRenderPipelineDefaultUnlit",
            Self::GrabPass => "GrabPass",
        }
    }
}

impl fmt::Display for PassType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Error returned when a pass name is not recognised.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("Unknown pass type: {0}")]
pub struct UnknownPassType(pub String);

/// Parses a pass by name (case-insensitive) or by numeric value.
impl FromStr for PassType {
    type Err = UnknownPassType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if let Ok(value) = trimmed.parse::<i32>() {
            return Self::from_value(value).ok_or_else(|| UnknownPassType(s.to_owned()));
        }
        Self::ALL
            .into_iter()
            .find(|pass| pass.name().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| UnknownPassType(s.to_owned()))
    }
}

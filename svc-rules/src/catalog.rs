use crate::types::{Keyword, KeywordSet, PassType, ShaderId};
use log::debug;
use std::collections::{HashMap, HashSet};
use thiserror::Error;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Errors that can occur while building or validating a `ShaderCatalog`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CatalogError {
    /// The catalog defines no shaders at all.
    #[error("Shader catalog defines no shaders.")]
    Empty,
    /// Two shaders share the same name.
    #[error("Duplicate shader name: {0}")]
    DuplicateShader(String),
    /// A pass is declared more than once for the same shader.
    #[error("Shader {shader} declares pass {pass} more than once")]
    DuplicatePass { shader: String, pass: PassType },
    /// A keyword group lists no keywords.
    #[error("Shader {shader} pass {pass} has an empty keyword group")]
    EmptyGroup { shader: String, pass: PassType },
    /// A keyword is empty or contains whitespace.
    #[error("Shader {shader} uses malformed keyword {keyword:?}")]
    MalformedKeyword { shader: String, keyword: String },
    /// A keyword appears in more than one place within a single pass.
    #[error("Shader {shader} pass {pass} lists keyword {keyword} more than once")]
    RepeatedKeyword {
        shader: String,
        pass: PassType,
        keyword: String,
    },
}

/// A set of mutually exclusive keywords; a compiled variant picks at most one.
///
/// A non-optional group must contribute exactly one keyword to every variant
/// of its pass.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct KeywordGroup {
    pub keywords: Vec<Keyword>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub optional: bool,
}

impl KeywordGroup {
    /// Creates a group from its keywords.
    pub fn new<I, K>(keywords: I, optional: bool) -> Self
    where
        I: IntoIterator<Item = K>,
        K: Into<Keyword>,
    {
        Self {
            keywords: keywords.into_iter().map(Into::into).collect(),
            optional,
        }
    }

    fn contains(&self, keyword: &str) -> bool {
        self.keywords.iter().any(|k| k.as_str() == keyword)
    }
}

/// The keyword groups compiled for one pass of a shader.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PassDefinition {
    pub pass: PassType,
    #[cfg_attr(feature = "serde", serde(default))]
    pub keyword_groups: Vec<KeywordGroup>,
}

impl PassDefinition {
    /// Creates a pass definition.
    pub fn new(pass: PassType, keyword_groups: Vec<KeywordGroup>) -> Self {
        Self {
            pass,
            keyword_groups,
        }
    }

    /// Checks whether a compiled variant of this pass matches `keywords` exactly.
    ///
    /// Every keyword must belong to a group, no group may be used twice, and
    /// every non-optional group must be used.
    pub fn accepts(&self, keywords: &KeywordSet) -> bool {
        let mut used = vec![false; self.keyword_groups.len()];
        for keyword in keywords {
            let Some(group_index) = self
                .keyword_groups
                .iter()
                .position(|group| group.contains(keyword.as_str()))
            else {
                return false;
            };
            if used[group_index] {
                return false;
            }
            used[group_index] = true;
        }
        self.keyword_groups
            .iter()
            .zip(used)
            .all(|(group, used)| group.optional || used)
    }

    fn keywords(&self) -> impl Iterator<Item = &Keyword> {
        self.keyword_groups.iter().flat_map(|g| g.keywords.iter())
    }
}

/// A shader program together with the passes it implements.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ShaderDefinition {
    pub name: ShaderId,
    pub passes: Vec<PassDefinition>,
}

impl ShaderDefinition {
    /// Creates a shader definition.
    pub fn new(name: impl Into<ShaderId>, passes: Vec<PassDefinition>) -> Self {
        Self {
            name: name.into(),
            passes,
        }
    }

    /// Looks up the definition of a single pass.
    pub fn pass(&self, pass: PassType) -> Option<&PassDefinition> {
        self.passes.iter().find(|p| p.pass == pass)
    }

    /// The passes this shader implements, ascending.
    pub fn pass_types(&self) -> Vec<PassType> {
        let mut passes: Vec<PassType> = self.passes.iter().map(|p| p.pass).collect();
        passes.sort_unstable();
        passes
    }

    /// Every keyword the shader recognises in any pass, sorted and distinct.
    pub fn vocabulary(&self) -> Vec<Keyword> {
        let mut keywords: Vec<Keyword> = self
            .passes
            .iter()
            .flat_map(PassDefinition::keywords)
            .cloned()
            .collect();
        keywords.sort_unstable();
        keywords.dedup();
        keywords
    }

    fn validate(&self) -> Result<(), CatalogError> {
        let shader = self.name.as_str();
        let mut seen_passes = HashSet::new();
        for pass in &self.passes {
            if !seen_passes.insert(pass.pass) {
                return Err(CatalogError::DuplicatePass {
                    shader: shader.to_owned(),
                    pass: pass.pass,
                });
            }
            let mut seen_keywords = HashSet::new();
            for group in &pass.keyword_groups {
                if group.keywords.is_empty() {
                    return Err(CatalogError::EmptyGroup {
                        shader: shader.to_owned(),
                        pass: pass.pass,
                    });
                }
                for keyword in &group.keywords {
                    if !keyword.is_well_formed() {
                        return Err(CatalogError::MalformedKeyword {
                            shader: shader.to_owned(),
                            keyword: keyword.as_str().to_owned(),
                        });
                    }
                    if !seen_keywords.insert(keyword.as_str()) {
                        return Err(CatalogError::RepeatedKeyword {
                            shader: shader.to_owned(),
                            pass: pass.pass,
                            keyword: keyword.as_str().to_owned(),
                        });
                    }
                }
            }
        }
        Ok(())
    }
}

/// A validated collection of shader definitions, addressable by name.
#[derive(Debug, Clone)]
pub struct ShaderCatalog {
    shaders: Vec<ShaderDefinition>,
    index: HashMap<ShaderId, usize>,
}

impl ShaderCatalog {
    /// Builds a catalog, validating every shader definition.
    ///
    /// # Errors
    ///
    /// Returns a `CatalogError` describing the first problem found.
    pub fn new(shaders: Vec<ShaderDefinition>) -> Result<Self, CatalogError> {
        if shaders.is_empty() {
            return Err(CatalogError::Empty);
        }
        let mut index = HashMap::with_capacity(shaders.len());
        for (position, shader) in shaders.iter().enumerate() {
            shader.validate()?;
            if index.insert(shader.name.clone(), position).is_some() {
                return Err(CatalogError::DuplicateShader(shader.name.to_string()));
            }
        }
        debug!("Shader catalog built with {} shaders", shaders.len());
        Ok(Self { shaders, index })
    }

    /// Looks up a shader by identity.
    pub fn get(&self, shader: &ShaderId) -> Option<&ShaderDefinition> {
        self.index.get(shader).map(|&i| &self.shaders[i])
    }

    /// All shaders, in declaration order.
    pub fn shaders(&self) -> &[ShaderDefinition] {
        &self.shaders
    }

    /// Number of shaders in the catalog.
    pub fn len(&self) -> usize {
        self.shaders.len()
    }

    /// Whether the catalog is empty (never true for a validated catalog).
    pub fn is_empty(&self) -> bool {
        self.shaders.is_empty()
    }
}

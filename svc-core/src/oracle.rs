//! The validity oracle: decides whether a (shader, pass, keywords) triple exists.

use std::sync::Arc;
use svc_rules::{Keyword, KeywordSet, PassType, ShaderId};
use thiserror::Error;

pub mod catalog;

pub use catalog::CatalogOracle;

/// Errors an oracle can raise for a single query.
///
/// During reduction these are absorbed and read as "invalid"; only vocabulary
/// and pass lookups surface them to the caller.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum OracleError {
    /// The shader is not known to the oracle.
    #[error("Unknown shader: {0}")]
    UnknownShader(ShaderId),
    /// A probed keyword is empty or contains whitespace.
    #[error("Malformed keyword {keyword:?} probed on shader {shader}")]
    MalformedKeyword { shader: ShaderId, keyword: String },
    /// Any other failure of the backing implementation.
    #[error("Oracle probe failed: {0}")]
    Probe(String),
}

/// Trait defining the interface to whatever knows which variants a shader
/// can actually be built with.
///
/// Implementations may be slow (the real thing compiles shaders), so callers
/// should query only when necessary. Answers are assumed to be pure.
pub trait ValidityOracle {
    /// Whether `keywords` names an existing variant of `pass` in `shader`.
    fn is_valid(
        &self,
        shader: &ShaderId,
        pass: PassType,
        keywords: &KeywordSet,
    ) -> Result<bool, OracleError>;

    /// Every keyword the shader recognises.
    fn vocabulary(&self, shader: &ShaderId) -> Result<Vec<Keyword>, OracleError>;

    /// The passes the shader implements, ascending.
    fn passes(&self, shader: &ShaderId) -> Result<Vec<PassType>, OracleError>;
}

impl<T: ValidityOracle + ?Sized> ValidityOracle for &T {
    fn is_valid(
        &self,
        shader: &ShaderId,
        pass: PassType,
        keywords: &KeywordSet,
    ) -> Result<bool, OracleError> {
        (**self).is_valid(shader, pass, keywords)
    }

    fn vocabulary(&self, shader: &ShaderId) -> Result<Vec<Keyword>, OracleError> {
        (**self).vocabulary(shader)
    }

    fn passes(&self, shader: &ShaderId) -> Result<Vec<PassType>, OracleError> {
        (**self).passes(shader)
    }
}

impl<T: ValidityOracle + ?Sized> ValidityOracle for Box<T> {
    fn is_valid(
        &self,
        shader: &ShaderId,
        pass: PassType,
        keywords: &KeywordSet,
    ) -> Result<bool, OracleError> {
        (**self).is_valid(shader, pass, keywords)
    }

    fn vocabulary(&self, shader: &ShaderId) -> Result<Vec<Keyword>, OracleError> {
        (**self).vocabulary(shader)
    }

    fn passes(&self, shader: &ShaderId) -> Result<Vec<PassType>, OracleError> {
        (**self).passes(shader)
    }
}

impl<T: ValidityOracle + ?Sized> ValidityOracle for Arc<T> {
    fn is_valid(
        &self,
        shader: &ShaderId,
        pass: PassType,
        keywords: &KeywordSet,
    ) -> Result<bool, OracleError> {
        (**self).is_valid(shader, pass, keywords)
    }

    fn vocabulary(&self, shader: &ShaderId) -> Result<Vec<Keyword>, OracleError> {
        (**self).vocabulary(shader)
    }

    fn passes(&self, shader: &ShaderId) -> Result<Vec<PassType>, OracleError> {
        (**self).passes(shader)
    }
}

//! Data model and file loading for shader variant collection.
//!
//! Holds the leaf types shared by every other crate (keywords, keyword sets,
//! pass kinds, shader identities), the declarative shader catalog and project
//! manifest, and the parsers that read them from disk.

use thiserror::Error;

pub mod catalog;
pub mod formats;
pub mod loader;
pub mod project;
pub mod tokenize;
pub mod types;

pub use catalog::{CatalogError, KeywordGroup, PassDefinition, ShaderCatalog, ShaderDefinition};
pub use project::{Material, ProjectError, ProjectManifest, Scene};
pub use tokenize::{parse_keyword_groups, parse_keywords, ManualCombination};
pub use types::{collate, Keyword, KeywordSet, PassType, ShaderId, UnknownPassType};

/// Errors that can occur while loading a catalog or project manifest.
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("I/O error reading file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse file contents: {0}")]
    ParseError(String),
    #[error("Invalid data: {0}")]
    InvalidData(String),
    #[error("Unsupported file format: {0}")]
    UnsupportedFormat(String),
    #[error("Required feature not enabled: {0}")]
    FeatureNotEnabled(String),
}

impl From<CatalogError> for LoadError {
    fn from(error: CatalogError) -> Self {
        Self::InvalidData(format!("Catalog error: {error}"))
    }
}

impl From<ProjectError> for LoadError {
    fn from(error: ProjectError) -> Self {
        Self::InvalidData(format!("Project error: {error}"))
    }
}

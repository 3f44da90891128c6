//! Module defining parsers for the supported catalog and manifest formats.

// Export the core parser trait
pub mod parser;
pub use parser::FormatParser;

// Format-specific implementations
pub mod json_format;
pub mod ron_format;

pub use json_format::JsonFormatParser;
pub use ron_format::RonFormatParser;

use crate::catalog::{ShaderCatalog, ShaderDefinition};
use crate::project::{Material, ProjectManifest, Scene};
use crate::LoadError;

#[cfg(feature = "serde")]
use serde::Deserialize;

/// Top-level layout of a shader catalog file, shared by every format.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Deserialize))]
pub(crate) struct CatalogFile {
    shaders: Vec<ShaderDefinition>,
}

impl CatalogFile {
    pub(crate) fn into_catalog(self) -> Result<ShaderCatalog, LoadError> {
        Ok(ShaderCatalog::new(self.shaders)?)
    }
}

/// Top-level layout of a project manifest file, shared by every format.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Deserialize))]
pub(crate) struct ProjectFile {
    materials: Vec<Material>,
    #[cfg_attr(feature = "serde", serde(default))]
    scenes: Vec<Scene>,
}

impl ProjectFile {
    pub(crate) fn into_manifest(self) -> Result<ProjectManifest, LoadError> {
        Ok(ProjectManifest::new(self.materials, self.scenes)?)
    }
}

use crate::formats::FormatParser;
#[cfg(feature = "serde")]
use crate::formats::{CatalogFile, ProjectFile};
use crate::{LoadError, ProjectManifest, ShaderCatalog};

/// A parser implementation for RON (Rusty Object Notation) files.
#[derive(Debug, Default, Clone, Copy)]
pub struct RonFormatParser;

impl RonFormatParser {
    /// Creates a new RON format parser
    pub fn new() -> Self {
        Self
    }
}

impl FormatParser for RonFormatParser {
    fn format_name(&self) -> &'static str {
        "Rusty Object Notation (RON)"
    }

    #[cfg(feature = "serde")]
    fn parse_catalog(&self, content: &str) -> Result<ShaderCatalog, LoadError> {
        let file: CatalogFile = ron::from_str(content)
            .map_err(|e| LoadError::ParseError(format!("RON deserialization failed: {e}")))?;
        file.into_catalog()
    }

    #[cfg(feature = "serde")]
    fn parse_project(&self, content: &str) -> Result<ProjectManifest, LoadError> {
        let file: ProjectFile = ron::from_str(content)
            .map_err(|e| LoadError::ParseError(format!("RON deserialization failed: {e}")))?;
        file.into_manifest()
    }

    /// Stub implementation when the `serde` feature is not enabled.
    #[cfg(not(feature = "serde"))]
    fn parse_catalog(&self, _content: &str) -> Result<ShaderCatalog, LoadError> {
        Err(LoadError::FeatureNotEnabled(
            "serde (required for RON parsing)".to_string(),
        ))
    }

    /// Stub implementation when the `serde` feature is not enabled.
    #[cfg(not(feature = "serde"))]
    fn parse_project(&self, _content: &str) -> Result<ProjectManifest, LoadError> {
        Err(LoadError::FeatureNotEnabled(
            "serde (required for RON parsing)".to_string(),
        ))
    }
}

use crate::{LoadError, ProjectManifest, ShaderCatalog};

/// Trait defining the interface for format-specific parsers.
///
/// Implementors read a shader catalog or a project manifest from text in a
/// particular format (e.g., RON or JSON) and return the validated model.
pub trait FormatParser {
    /// Parses a shader catalog.
    ///
    /// # Returns
    ///
    /// * `Ok(ShaderCatalog)` - Successfully parsed and validated catalog
    /// * `Err(LoadError)` - Syntax error or invalid catalog data
    fn parse_catalog(&self, content: &str) -> Result<ShaderCatalog, LoadError>;

    /// Parses a project manifest.
    fn parse_project(&self, content: &str) -> Result<ProjectManifest, LoadError>;

    /// Returns a descriptive name for this parser format.
    ///
    /// This can be used for debugging, logging, or user-facing error messages.
    fn format_name(&self) -> &'static str;
}

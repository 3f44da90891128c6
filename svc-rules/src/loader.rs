use crate::formats::{FormatParser, JsonFormatParser, RonFormatParser};
use crate::{LoadError, ProjectManifest, ShaderCatalog};
use log::info;
use std::fs;
use std::path::Path;

/// Chooses a parser from the file extension (`.ron` or `.json`).
///
/// Files without an extension are treated as RON.
pub fn parser_for_path(path: &Path) -> Result<Box<dyn FormatParser>, LoadError> {
    match path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase)
        .as_deref()
    {
        None | Some("ron") => Ok(Box::new(RonFormatParser::new())),
        Some("json") => Ok(Box::new(JsonFormatParser::new())),
        Some(other) => Err(LoadError::UnsupportedFormat(format!(
            "{} (extension .{other})",
            path.display()
        ))),
    }
}

/// Loads and validates a shader catalog from a file.
///
/// # Arguments
///
/// * `path` - The path to the catalog file (RON or JSON).
///
/// # Returns
///
/// The validated `ShaderCatalog`, or a `LoadError` describing why the file
/// could not be read, parsed, or validated.
pub fn load_catalog_from_file(path: &Path) -> Result<ShaderCatalog, LoadError> {
    let parser = parser_for_path(path)?;
    let content = fs::read_to_string(path)?;
    let catalog = parser.parse_catalog(&content)?;
    info!(
        "Loaded {} shaders from {} ({})",
        catalog.len(),
        path.display(),
        parser.format_name()
    );
    Ok(catalog)
}

/// Loads and validates a project manifest from a file.
pub fn load_project_from_file(path: &Path) -> Result<ProjectManifest, LoadError> {
    let parser = parser_for_path(path)?;
    let content = fs::read_to_string(path)?;
    let project = parser.parse_project(&content)?;
    info!(
        "Loaded {} materials and {} scenes from {} ({})",
        project.materials().len(),
        project.scenes().len(),
        path.display(),
        parser.format_name()
    );
    Ok(project)
}

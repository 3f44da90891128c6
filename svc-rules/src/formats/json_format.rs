use crate::formats::FormatParser;
#[cfg(feature = "serde")]
use crate::formats::{CatalogFile, ProjectFile};
use crate::{LoadError, ProjectManifest, ShaderCatalog};

/// A parser implementation for JSON files.
#[derive(Debug, Default, Clone, Copy)]
pub struct JsonFormatParser;

impl JsonFormatParser {
    /// Creates a new JSON format parser
    pub fn new() -> Self {
        Self
    }
}

impl FormatParser for JsonFormatParser {
    fn format_name(&self) -> &'static str {
        "JSON"
    }

    #[cfg(feature = "serde")]
    fn parse_catalog(&self, content: &str) -> Result<ShaderCatalog, LoadError> {
        let file: CatalogFile = serde_json::from_str(content)
            .map_err(|e| LoadError::ParseError(format!("JSON deserialization failed: {e}")))?;
        file.into_catalog()
    }

    #[cfg(feature = "serde")]
    fn parse_project(&self, content: &str) -> Result<ProjectManifest, LoadError> {
        let file: ProjectFile = serde_json::from_str(content)
            .map_err(|e| LoadError::ParseError(format!("JSON deserialization failed: {e}")))?;
        file.into_manifest()
    }

    #[cfg(not(feature = "serde"))]
    fn parse_catalog(&self, _content: &str) -> Result<ShaderCatalog, LoadError> {
        Err(LoadError::FeatureNotEnabled(
            "serde (required for JSON parsing)".to_string(),
        ))
    }

    #[cfg(not(feature = "serde"))]
    fn parse_project(&self, _content: &str) -> Result<ProjectManifest, LoadError> {
        Err(LoadError::FeatureNotEnabled(
            "serde (required for JSON parsing)".to_string(),
        ))
    }
}

#[cfg(all(test, feature = "serde"))]
mod tests {
    use super::*;
    use crate::ShaderId;

    #[test]
    fn test_parse_catalog_json() {
        let content = r#"{
            "shaders": [
                {
                    "name": "Unlit",
                    "passes": [
                        { "pass": "Normal", "keyword_groups": [ { "keywords": ["_ALPHATEST_ON"], "optional": true } ] }
                    ]
                }
            ]
        }"#;
        let catalog = JsonFormatParser::new().parse_catalog(content).unwrap();
        assert_eq!(catalog.len(), 1);
        assert!(catalog.get(&ShaderId::new("Unlit")).is_some());
    }

    #[test]
    fn test_invalid_catalog_data_is_reported() {
        let content = r#"{ "shaders": [] }"#;
        match JsonFormatParser::new().parse_catalog(content) {
            Err(LoadError::InvalidData(msg)) => assert!(msg.contains("no shaders")),
            other => panic!("Expected InvalidData, got {other:?}"),
        }
    }
}

//! The on-disk variant archive.
//!
//! Variants are stored in RON, grouped per shader. `ArchiveSink` merges into
//! an existing archive unless the engine overwrites it.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use svc_core::{Sink, SinkError, Variant, VariantSet};
use svc_rules::{KeywordSet, PassType, ShaderId};

/// One compiled pass variant inside an archive entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArchivedVariant {
    pub pass: PassType,
    pub keywords: KeywordSet,
}

/// All archived variants of one shader.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArchivedShader {
    pub shader: ShaderId,
    pub variants: Vec<ArchivedVariant>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VariantArchive {
    #[serde(default)]
    pub shaders: Vec<ArchivedShader>,
}

impl VariantArchive {
    pub fn from_variants(variants: &VariantSet) -> Self {
        let shaders = variants
            .shaders()
            .into_iter()
            .map(|shader| ArchivedShader {
                shader: shader.clone(),
                variants: variants
                    .variants_for(shader)
                    .map(|v| ArchivedVariant {
                        pass: v.pass,
                        keywords: v.keywords.clone(),
                    })
                    .collect(),
            })
            .collect();
        Self { shaders }
    }

    pub fn into_variants(self) -> VariantSet {
        self.shaders
            .into_iter()
            .flat_map(|entry| {
                let shader = entry.shader;
                entry
                    .variants
                    .into_iter()
                    .map(move |v| Variant::new(shader.clone(), v.pass, v.keywords))
            })
            .collect()
    }
}

/// Reads an archive file.
pub fn load_archive(path: &Path) -> Result<VariantArchive> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read variant archive: {}", path.display()))?;
    ron::from_str(&content)
        .with_context(|| format!("Failed to parse variant archive: {}", path.display()))
}

/// A `Sink` writing to a RON archive on `flush`.
///
/// Unless the sink was cleared, `flush` first reads the archive already at
/// `path` and keeps its variants ahead of the new ones. Nothing is read
/// before that, so a cleared sink never touches the old file.
#[derive(Debug)]
pub struct ArchiveSink {
    path: PathBuf,
    variants: VariantSet,
    cleared: bool,
}

impl ArchiveSink {
    /// Targets `path` without reading it.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            variants: VariantSet::new(),
            cleared: false,
        }
    }

    /// Variants persisted since the sink was opened or cleared.
    pub fn variants(&self) -> &VariantSet {
        &self.variants
    }

    fn existing(&self) -> Result<VariantSet, SinkError> {
        if self.cleared || !self.path.exists() {
            return Ok(VariantSet::new());
        }
        let existing = load_archive(&self.path)
            .map_err(|e| SinkError::Merge(format!("{e:#}")))?
            .into_variants();
        log::info!(
            "Loaded {} existing variants from {}",
            existing.len(),
            self.path.display()
        );
        Ok(existing)
    }
}

impl Sink for ArchiveSink {
    fn persist(&mut self, variant: &Variant) -> Result<(), SinkError> {
        self.variants.add(variant.clone());
        Ok(())
    }

    fn clear(&mut self) -> Result<(), SinkError> {
        self.variants.clear();
        self.cleared = true;
        Ok(())
    }

    fn flush(&mut self) -> Result<(), SinkError> {
        let mut merged = self.existing()?;
        merged.extend(self.variants.iter().cloned());
        let archive = VariantArchive::from_variants(&merged);
        let content = ron::ser::to_string_pretty(&archive, ron::ser::PrettyConfig::default())
            .map_err(|e| SinkError::Serialization(e.to_string()))?;
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.path, content)?;
        log::info!("Saved {} variants to {}", merged.len(), self.path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn variant(shader: &str, pass: PassType, keywords: &str) -> Variant {
        Variant::new(shader, pass, keywords.parse().unwrap())
    }

    #[test]
    fn test_merge_keeps_existing_variants() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("variants.ron");

        let mut first = ArchiveSink::open(&path);
        first.persist(&variant("Lit", PassType::ForwardBase, "A")).unwrap();
        first.flush().unwrap();

        let mut second = ArchiveSink::open(&path);
        second.persist(&variant("Lit", PassType::ForwardBase, "A")).unwrap();
        second.persist(&variant("Unlit", PassType::Normal, "")).unwrap();
        second.flush().unwrap();

        let archive = load_archive(&path).unwrap();
        assert_eq!(archive.shaders.len(), 2);
        assert_eq!(archive.into_variants().len(), 2);
    }

    #[test]
    fn test_clear_drops_existing_variants() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("variants.ron");

        let mut first = ArchiveSink::open(&path);
        first.persist(&variant("Old", PassType::Meta, "")).unwrap();
        first.flush().unwrap();

        let mut second = ArchiveSink::open(&path);
        second.clear().unwrap();
        second.persist(&variant("Lit", PassType::ShadowCaster, "B")).unwrap();
        second.flush().unwrap();

        let variants = load_archive(&path).unwrap().into_variants();
        let shaders: Vec<&str> = variants.shaders().iter().map(|s| s.as_str()).collect();
        assert_eq!(shaders, vec!["Lit"]);
    }

    #[test]
    fn test_corrupt_archive_fails_merge() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("variants.ron");
        fs::write(&path, "not ron at all (").unwrap();

        let mut sink = ArchiveSink::open(&path);
        sink.persist(&variant("Lit", PassType::ForwardBase, "A")).unwrap();
        assert!(matches!(sink.flush(), Err(SinkError::Merge(_))));
        assert_eq!(fs::read_to_string(&path).unwrap(), "not ron at all (");
    }

    #[test]
    fn test_cleared_sink_ignores_corrupt_archive() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("variants.ron");
        fs::write(&path, "not ron at all (").unwrap();

        let mut sink = ArchiveSink::open(&path);
        sink.clear().unwrap();
        sink.persist(&variant("Lit", PassType::ForwardBase, "A")).unwrap();
        sink.flush().unwrap();

        let variants = load_archive(&path).unwrap().into_variants();
        assert_eq!(variants.len(), 1);
    }
}

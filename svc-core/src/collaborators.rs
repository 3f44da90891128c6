//! Pluggable collaborators consumed by the collection engine.
//!
//! The engine only talks to these traits. Built-in implementations live in
//! the submodules and are normally created through the component registry.

use crate::variant::Variant;
use std::fmt;
use svc_rules::Material;
use thiserror::Error;

pub mod collectors;
pub mod filters;
pub mod sink;

pub use collectors::{AllMaterials, AssignedMaterials, SceneDependencies};
pub use filters::{
    KeywordFilterRule, KeywordVariantFilter, PassExcludeFilter, ProvenanceFilter,
    ShaderExcludeFilter,
};
pub use sink::MemorySink;

/// Errors a collector can raise while enumerating materials.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CollectorError {
    /// The collector was configured with a material that does not exist.
    #[error("Unknown material: {0}")]
    UnknownMaterial(String),
    /// Enumeration failed for any other reason.
    #[error("Failed to enumerate materials: {0}")]
    Enumeration(String),
}

/// Errors a sink can raise while persisting variants.
#[derive(Debug, Error)]
pub enum SinkError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Serialization(String),
    #[error("Variant rejected: {0}")]
    Rejected(String),
    /// Content already held by the destination could not be read back for
    /// merging.
    #[error("Failed to merge with existing output: {0}")]
    Merge(String),
}

/// Identifies which collector contributed a material.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CollectorTag {
    /// Position of the collector in the list handed to the engine.
    pub index: usize,
    /// The collector's display name.
    pub name: String,
}

impl CollectorTag {
    /// Creates a tag.
    pub fn new(index: usize, name: impl Into<String>) -> Self {
        Self {
            index,
            name: name.into(),
        }
    }
}

impl fmt::Display for CollectorTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{} {}", self.index, self.name)
    }
}

/// Supplies candidate materials.
pub trait Collector {
    /// Display name used for provenance and progress reporting.
    fn name(&self) -> &str;

    /// Appends this collector's materials to `out`.
    fn contribute(&self, out: &mut Vec<Material>) -> Result<(), CollectorError>;
}

/// Votes on whether a collected material is kept.
pub trait MaterialFilter {
    /// Returns `false` to strip the material.
    fn should_keep(&self, material: &Material, provenance: &[CollectorTag]) -> bool;
}

impl<F> MaterialFilter for F
where
    F: Fn(&Material, &[CollectorTag]) -> bool,
{
    fn should_keep(&self, material: &Material, provenance: &[CollectorTag]) -> bool {
        self(material, provenance)
    }
}

/// Votes on whether a collected variant is kept.
pub trait VariantFilter {
    /// Returns `false` to strip the variant.
    fn should_keep(&self, variant: &Variant) -> bool;
}

impl<F> VariantFilter for F
where
    F: Fn(&Variant) -> bool,
{
    fn should_keep(&self, variant: &Variant) -> bool {
        self(variant)
    }
}

/// Persists accepted variants.
pub trait Sink {
    /// Stores one variant.
    fn persist(&mut self, variant: &Variant) -> Result<(), SinkError>;

    /// Drops everything previously stored. Only called in overwrite mode.
    fn clear(&mut self) -> Result<(), SinkError>;

    /// Called once after the last variant has been persisted.
    fn flush(&mut self) -> Result<(), SinkError> {
        Ok(())
    }
}

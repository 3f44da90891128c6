//! Core library for shader variant collection.
//! Turns the keyword sets observed on materials into a minimal set of valid
//! shader variants, using a validity oracle to decide what exists.

use thiserror::Error;

/// Collaborator traits and the built-in implementations.
pub mod collaborators;
/// The collection engine driving a full run.
pub mod engine;
/// Validity oracle trait and the catalog-backed oracle.
pub mod oracle;
/// Progress events reported while the engine runs.
pub mod progress;
/// The growth search reducing keyword sets into variants.
pub mod reducer;
/// Declarative construction of collaborators.
pub mod registry;
/// Variants and the variant set.
pub mod variant;

pub use crate::collaborators::{
    Collector, CollectorError, CollectorTag, MaterialFilter, Sink, SinkError, VariantFilter,
};
pub use crate::engine::{MaterialVariantCollectionEngine, RunSummary};
pub use crate::oracle::{CatalogOracle, OracleError, ValidityOracle};
pub use crate::progress::{ProgressCallback, ProgressEvent, ProgressInfo, Stage};
pub use crate::reducer::KeywordCombinationReducer;
pub use crate::registry::{ComponentConfig, ComponentRegistry, RegistryContext, RegistryError};
pub use crate::variant::{Variant, VariantSet};

/// Errors that abort a step of a collection run.
#[derive(Error, Debug)]
pub enum CollectionError {
    /// A collector failed; no materials are kept.
    #[error("Collector {collector} (#{index}) failed: {source}")]
    Collector {
        collector: String,
        index: usize,
        source: CollectorError,
    },
    /// A material's shader could not be described by the oracle; no
    /// variants are kept.
    #[error("Failed to reduce material {material} (#{index}): {source}")]
    Reduction {
        material: String,
        index: usize,
        source: OracleError,
    },
    /// The sink rejected a variant or failed to clear or flush.
    #[error("Failed to emit variants: {0}")]
    Emit(#[from] SinkError),
}

//! In-memory sink, mostly useful for tests and dry runs.

use super::{Sink, SinkError};
use crate::variant::Variant;

/// Keeps persisted variants in memory.
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    variants: Vec<Variant>,
    flushes: usize,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// A sink that already holds `variants`, as if from an earlier run.
    pub fn with_existing(variants: Vec<Variant>) -> Self {
        Self {
            variants,
            flushes: 0,
        }
    }

    pub fn variants(&self) -> &[Variant] {
        &self.variants
    }

    /// How many times `flush` was called.
    pub fn flush_count(&self) -> usize {
        self.flushes
    }

    pub fn into_variants(self) -> Vec<Variant> {
        self.variants
    }
}

impl Sink for MemorySink {
    fn persist(&mut self, variant: &Variant) -> Result<(), SinkError> {
        self.variants.push(variant.clone());
        Ok(())
    }

    fn clear(&mut self) -> Result<(), SinkError> {
        self.variants.clear();
        Ok(())
    }

    fn flush(&mut self) -> Result<(), SinkError> {
        self.flushes += 1;
        Ok(())
    }
}

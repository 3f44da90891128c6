//! Oracle answering validity questions from a declarative shader catalog.

use crate::oracle::{OracleError, ValidityOracle};
use log::trace;
use std::sync::atomic::{AtomicUsize, Ordering};
use svc_rules::{Keyword, KeywordSet, PassType, ShaderCatalog, ShaderDefinition, ShaderId};

/// Table-driven oracle answering from a declarative `ShaderCatalog`.
///
/// Probing a keyword that is empty or contains whitespace is a fault rather
/// than a plain `false`, the same way the host pipeline rejects such input.
#[derive(Debug)]
pub struct CatalogOracle {
    catalog: ShaderCatalog,
    probes: AtomicUsize,
}

impl CatalogOracle {
    /// Wraps a validated catalog.
    pub fn new(catalog: ShaderCatalog) -> Self {
        Self {
            catalog,
            probes: AtomicUsize::new(0),
        }
    }

    /// Number of `is_valid` calls answered so far.
    pub fn probe_count(&self) -> usize {
        self.probes.load(Ordering::Relaxed)
    }

    fn shader(&self, shader: &ShaderId) -> Result<&ShaderDefinition, OracleError> {
        self.catalog
            .get(shader)
            .ok_or_else(|| OracleError::UnknownShader(shader.clone()))
    }
}

impl ValidityOracle for CatalogOracle {
    fn is_valid(
        &self,
        shader: &ShaderId,
        pass: PassType,
        keywords: &KeywordSet,
    ) -> Result<bool, OracleError> {
        self.probes.fetch_add(1, Ordering::Relaxed);
        let definition = self.shader(shader)?;
        if let Some(bad) = keywords.iter().find(|k| !k.is_well_formed()) {
            return Err(OracleError::MalformedKeyword {
                shader: shader.clone(),
                keyword: bad.as_str().to_owned(),
            });
        }
        let valid = definition
            .pass(pass)
            .is_some_and(|definition| definition.accepts(keywords));
        trace!("probe {shader} {pass} [{keywords}] -> {valid}");
        Ok(valid)
    }

    fn vocabulary(&self, shader: &ShaderId) -> Result<Vec<Keyword>, OracleError> {
        Ok(self.shader(shader)?.vocabulary())
    }

    fn passes(&self, shader: &ShaderId) -> Result<Vec<PassType>, OracleError> {
        Ok(self.shader(shader)?.pass_types())
    }
}

//! Wires loaded inputs, configured components and the engine into one run.

use crate::config::{AppConfig, ToolConfig};
use crate::error::AppError;
use crate::output::ArchiveSink;
use crate::progress::{callback_for, ConsoleProgressReporter, ProgressReporter};
use log::info;
use std::sync::{Arc, Mutex};
use svc_core::{
    CatalogOracle, ComponentRegistry, MaterialVariantCollectionEngine, RegistryContext,
    RunSummary,
};
use svc_rules::loader::{load_catalog_from_file, load_project_from_file};
use svc_rules::parse_keyword_groups;

/// Loads the catalog and project, builds every configured component and
/// runs a full collection into the output archive.
pub fn run_collection(config: &AppConfig, tool: &ToolConfig) -> Result<RunSummary, AppError> {
    let catalog = load_catalog_from_file(&config.catalog)?;
    let project = Arc::new(load_project_from_file(&config.project)?);
    info!(
        "Loaded {} shaders and {} materials",
        catalog.len(),
        project.materials().len()
    );

    let registry = ComponentRegistry::with_builtins();
    let mut ctx = RegistryContext::new(Arc::clone(&project));
    ctx.keyword_filters = tool.keyword_filters.clone();
    let collectors = registry.build_collectors(&tool.collectors, &ctx)?;
    let material_filters = registry.build_material_filters(&tool.material_filters, &ctx)?;
    let variant_filters = registry.build_variant_filters(&tool.variant_filters, &ctx)?;
    if collectors.is_empty() {
        return Err(AppError::Config("No enabled collectors configured".to_owned()));
    }

    let reporter = Arc::new(Mutex::new(ConsoleProgressReporter::new(
        config.report_progress_interval,
    )));
    let mut engine = MaterialVariantCollectionEngine::new(CatalogOracle::new(catalog))
        .with_progress_callback(callback_for(Arc::clone(&reporter)));
    engine.set_overwrite(config.overwrite || tool.overwrite);
    engine.set_manual_combinations(parse_keyword_groups(&tool.manual_combinations));

    let mut sink = ArchiveSink::open(&config.output);
    let result = engine.run(&collectors, &material_filters, &variant_filters, &mut sink);

    let mut reporter = reporter
        .lock()
        .map_err(|_| AppError::Config("Progress reporter lock poisoned".to_owned()))?;
    match result {
        Ok(summary) => {
            if let Err(e) = reporter.finish(&summary) {
                log::warn!("Progress reporting failed: {e}");
            }
            info!(
                "Oracle answered {} validity probes",
                engine.oracle().probe_count()
            );
            Ok(summary)
        }
        Err(e) => {
            if let Err(report_err) = reporter.fail(&e) {
                log::warn!("Progress reporting failed: {report_err}");
            }
            Err(e.into())
        }
    }
}

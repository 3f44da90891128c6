// variant-forge-app/src/main.rs

use crate::config::{AppConfig, ToolConfig};
use crate::logging::init_logger;
use crate::setup::run_collection;
use anyhow::{Context, Result};
use clap::Parser;

/// Parses the command line, runs one collection and prints a summary.
pub fn main() -> Result<()> {
    let config = AppConfig::parse();
    init_logger(&config);

    log::info!("Variant Forge App Starting");
    log::debug!("Loaded Config: {:?}", config);

    let tool = ToolConfig::load(config.config.as_deref())
        .context("Failed to load tool configuration")?;
    let summary = run_collection(&config, &tool).context("Variant collection failed")?;

    println!(
        "Collected {} variants from {} materials into {}",
        summary.variants_emitted,
        summary.materials_collected - summary.materials_filtered,
        config.output.display()
    );
    log::info!("Variant Forge App Finished.");
    Ok(())
}

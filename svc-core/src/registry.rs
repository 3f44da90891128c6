//! Builds collaborators from declarative configuration.
//!
//! Each family (collectors, material filters, variant filters) maps a `kind`
//! tag to a factory. `ComponentRegistry::with_builtins` registers the
//! implementations shipped with this crate; callers can add their own.

use crate::collaborators::{
    AllMaterials, AssignedMaterials, Collector, KeywordFilterRule, KeywordVariantFilter,
    MaterialFilter, PassExcludeFilter, ProvenanceFilter, SceneDependencies, ShaderExcludeFilter,
    VariantFilter,
};
use log::debug;
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use svc_rules::{PassType, ProjectManifest};
use thiserror::Error;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Errors raised while turning configuration into collaborators.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RegistryError {
    #[error("Unknown {family} kind: {kind}")]
    UnknownKind { family: &'static str, kind: String },
    #[error("Invalid option '{option}' for {component}: {reason}")]
    InvalidOption {
        component: String,
        option: String,
        reason: String,
    },
    #[error("Missing option '{option}' for {component}")]
    MissingOption { component: String, option: String },
}

/// One configured component.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ComponentConfig {
    /// Registry tag selecting the implementation.
    pub kind: String,
    /// Display name; defaults to `kind`.
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "Option::is_none")
    )]
    pub name: Option<String>,
    #[cfg_attr(feature = "serde", serde(default = "enabled_by_default"))]
    pub enabled: bool,
    #[cfg_attr(feature = "serde", serde(default))]
    pub options: BTreeMap<String, String>,
}

#[cfg(feature = "serde")]
const fn enabled_by_default() -> bool {
    true
}

impl ComponentConfig {
    /// An enabled component with no options.
    pub fn new(kind: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            name: None,
            enabled: true,
            options: BTreeMap::new(),
        }
    }

    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    #[must_use]
    pub fn with_option(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.options.insert(key.into(), value.into());
        self
    }

    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.kind)
    }

    /// A comma separated option, trimmed, with blank entries dropped.
    pub fn list_option(&self, key: &str) -> Option<Vec<String>> {
        self.options.get(key).map(|raw| {
            raw.split(',')
                .map(str::trim)
                .filter(|item| !item.is_empty())
                .map(str::to_owned)
                .collect()
        })
    }

    fn required_list(&self, key: &str) -> Result<Vec<String>, RegistryError> {
        self.list_option(key)
            .ok_or_else(|| RegistryError::MissingOption {
                component: self.display_name().to_owned(),
                option: key.to_owned(),
            })
    }

    fn bool_option(&self, key: &str, default: bool) -> Result<bool, RegistryError> {
        self.options.get(key).map_or(Ok(default), |raw| {
            raw.trim().parse().map_err(|_| self.invalid(key, format!("expected true or false, got '{raw}'")))
        })
    }

    fn invalid(&self, key: &str, reason: String) -> RegistryError {
        RegistryError::InvalidOption {
            component: self.display_name().to_owned(),
            option: key.to_owned(),
            reason,
        }
    }
}

/// Shared state factories may draw on.
#[derive(Debug, Clone, Default)]
pub struct RegistryContext {
    pub project: Arc<ProjectManifest>,
    /// Rules used by `keyword` variant filters that do not carry their own.
    pub keyword_filters: Vec<KeywordFilterRule>,
}

impl RegistryContext {
    pub fn new(project: Arc<ProjectManifest>) -> Self {
        Self {
            project,
            keyword_filters: Vec::new(),
        }
    }
}

pub type CollectorFactory =
    fn(&ComponentConfig, &RegistryContext) -> Result<Box<dyn Collector>, RegistryError>;
pub type MaterialFilterFactory =
    fn(&ComponentConfig, &RegistryContext) -> Result<Box<dyn MaterialFilter>, RegistryError>;
pub type VariantFilterFactory =
    fn(&ComponentConfig, &RegistryContext) -> Result<Box<dyn VariantFilter>, RegistryError>;

/// Maps `kind` tags to factories for each collaborator family.
#[derive(Default)]
pub struct ComponentRegistry {
    collectors: HashMap<String, CollectorFactory>,
    material_filters: HashMap<String, MaterialFilterFactory>,
    variant_filters: HashMap<String, VariantFilterFactory>,
}

impl ComponentRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry with every built-in collaborator registered.
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        registry.register_collector("assigned", build_assigned);
        registry.register_collector("all_materials", build_all_materials);
        registry.register_collector("scene_dependency", build_scene_dependency);
        registry.register_material_filter("shader_exclude", build_shader_exclude);
        registry.register_material_filter("provenance", build_provenance);
        registry.register_variant_filter("keyword", build_keyword);
        registry.register_variant_filter("pass_exclude", build_pass_exclude);
        registry
    }

    pub fn register_collector(&mut self, kind: impl Into<String>, factory: CollectorFactory) {
        self.collectors.insert(kind.into(), factory);
    }

    pub fn register_material_filter(
        &mut self,
        kind: impl Into<String>,
        factory: MaterialFilterFactory,
    ) {
        self.material_filters.insert(kind.into(), factory);
    }

    pub fn register_variant_filter(
        &mut self,
        kind: impl Into<String>,
        factory: VariantFilterFactory,
    ) {
        self.variant_filters.insert(kind.into(), factory);
    }

    /// Builds every enabled collector, preserving configuration order.
    pub fn build_collectors(
        &self,
        configs: &[ComponentConfig],
        ctx: &RegistryContext,
    ) -> Result<Vec<Box<dyn Collector>>, RegistryError> {
        build_all("collector", &self.collectors, configs, ctx)
    }

    pub fn build_material_filters(
        &self,
        configs: &[ComponentConfig],
        ctx: &RegistryContext,
    ) -> Result<Vec<Box<dyn MaterialFilter>>, RegistryError> {
        build_all("material filter", &self.material_filters, configs, ctx)
    }

    pub fn build_variant_filters(
        &self,
        configs: &[ComponentConfig],
        ctx: &RegistryContext,
    ) -> Result<Vec<Box<dyn VariantFilter>>, RegistryError> {
        build_all("variant filter", &self.variant_filters, configs, ctx)
    }
}

fn build_all<T: ?Sized>(
    family: &'static str,
    factories: &HashMap<String, fn(&ComponentConfig, &RegistryContext) -> Result<Box<T>, RegistryError>>,
    configs: &[ComponentConfig],
    ctx: &RegistryContext,
) -> Result<Vec<Box<T>>, RegistryError> {
    let mut built = Vec::with_capacity(configs.len());
    for config in configs {
        if !config.enabled {
            debug!("Skipping disabled {family} {}", config.display_name());
            continue;
        }
        let factory = factories
            .get(&config.kind)
            .ok_or_else(|| RegistryError::UnknownKind {
                family,
                kind: config.kind.clone(),
            })?;
        built.push(factory(config, ctx)?);
        debug!("Built {family} {} ({})", config.display_name(), config.kind);
    }
    Ok(built)
}

fn build_assigned(
    config: &ComponentConfig,
    ctx: &RegistryContext,
) -> Result<Box<dyn Collector>, RegistryError> {
    let materials = config.required_list("materials")?;
    Ok(Box::new(
        AssignedMaterials::new(Arc::clone(&ctx.project), materials)
            .with_name(config.display_name()),
    ))
}

fn build_all_materials(
    config: &ComponentConfig,
    ctx: &RegistryContext,
) -> Result<Box<dyn Collector>, RegistryError> {
    let mut collector =
        AllMaterials::new(Arc::clone(&ctx.project)).with_name(config.display_name());
    if let Some(paths) = config.list_option("include_paths") {
        collector = collector.with_include_paths(paths);
    }
    Ok(Box::new(collector))
}

fn build_scene_dependency(
    config: &ComponentConfig,
    ctx: &RegistryContext,
) -> Result<Box<dyn Collector>, RegistryError> {
    let only_enabled = config.bool_option("only_enabled", true)?;
    Ok(Box::new(
        SceneDependencies::new(Arc::clone(&ctx.project))
            .with_name(config.display_name())
            .only_enabled(only_enabled),
    ))
}

fn build_shader_exclude(
    config: &ComponentConfig,
    _ctx: &RegistryContext,
) -> Result<Box<dyn MaterialFilter>, RegistryError> {
    Ok(Box::new(ShaderExcludeFilter::new(
        config.required_list("shaders")?,
    )))
}

fn build_provenance(
    config: &ComponentConfig,
    _ctx: &RegistryContext,
) -> Result<Box<dyn MaterialFilter>, RegistryError> {
    Ok(Box::new(ProvenanceFilter::new(
        config.required_list("collectors")?,
    )))
}

fn build_keyword(
    config: &ComponentConfig,
    ctx: &RegistryContext,
) -> Result<Box<dyn VariantFilter>, RegistryError> {
    let Some(keywords) = config.options.get("keywords") else {
        return Ok(Box::new(KeywordVariantFilter::new(&ctx.keyword_filters)));
    };
    let include_all_combinations = match config.options.get("match").map(|m| m.trim()) {
        None | Some("exact") => false,
        Some("all") => true,
        Some(other) => {
            return Err(config.invalid("match", format!("expected 'exact' or 'all', got '{other}'")))
        }
    };
    let rule = KeywordFilterRule {
        keywords: keywords.clone(),
        enabled: true,
        include_all_combinations,
    };
    Ok(Box::new(KeywordVariantFilter::new(&[rule])))
}

fn build_pass_exclude(
    config: &ComponentConfig,
    _ctx: &RegistryContext,
) -> Result<Box<dyn VariantFilter>, RegistryError> {
    let passes = config
        .required_list("passes")?
        .iter()
        .map(|raw| raw.parse::<PassType>().map_err(|e| config.invalid("passes", e.to_string())))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Box::new(PassExcludeFilter::new(passes)))
}

//! Collectors that draw materials from a `ProjectManifest`.

use super::{Collector, CollectorError};
use log::debug;
use std::sync::Arc;
use svc_rules::{Material, ProjectManifest};

/// Path prefixes `AllMaterials` searches when none are configured.
pub const DEFAULT_INCLUDE_PATHS: [&str; 2] = ["Assets", "Packages"];

/// An explicit list of materials, looked up by name.
#[derive(Debug, Clone)]
pub struct AssignedMaterials {
    name: String,
    project: Arc<ProjectManifest>,
    materials: Vec<String>,
}

impl AssignedMaterials {
    pub fn new<I, S>(project: Arc<ProjectManifest>, materials: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: "assigned".to_owned(),
            project,
            materials: materials.into_iter().map(Into::into).collect(),
        }
    }

    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }
}

impl Collector for AssignedMaterials {
    fn name(&self) -> &str {
        &self.name
    }

    fn contribute(&self, out: &mut Vec<Material>) -> Result<(), CollectorError> {
        for name in &self.materials {
            let material = self
                .project
                .material(name)
                .ok_or_else(|| CollectorError::UnknownMaterial(name.clone()))?;
            out.push(material.clone());
        }
        Ok(())
    }
}

/// Every project material whose asset path starts with an include prefix.
#[derive(Debug, Clone)]
pub struct AllMaterials {
    name: String,
    project: Arc<ProjectManifest>,
    include_paths: Vec<String>,
}

impl AllMaterials {
    /// Searches the default `Assets` and `Packages` roots.
    pub fn new(project: Arc<ProjectManifest>) -> Self {
        Self {
            name: "all_materials".to_owned(),
            project,
            include_paths: DEFAULT_INCLUDE_PATHS.iter().map(|p| (*p).to_owned()).collect(),
        }
    }

    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    #[must_use]
    pub fn with_include_paths<I, S>(mut self, paths: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.include_paths = paths.into_iter().map(Into::into).collect();
        self
    }
}

impl Collector for AllMaterials {
    fn name(&self) -> &str {
        &self.name
    }

    fn contribute(&self, out: &mut Vec<Material>) -> Result<(), CollectorError> {
        let found = self.project.materials_under(&self.include_paths);
        debug!(
            "{}: {} materials under {:?}",
            self.name,
            found.len(),
            self.include_paths
        );
        out.extend(found.into_iter().cloned());
        Ok(())
    }
}

/// Materials the project's scenes depend on.
#[derive(Debug, Clone)]
pub struct SceneDependencies {
    name: String,
    project: Arc<ProjectManifest>,
    only_enabled: bool,
}

impl SceneDependencies {
    /// Only enabled scenes are searched by default.
    pub fn new(project: Arc<ProjectManifest>) -> Self {
        Self {
            name: "scene_dependency".to_owned(),
            project,
            only_enabled: true,
        }
    }

    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    #[must_use]
    pub const fn only_enabled(mut self, only_enabled: bool) -> Self {
        self.only_enabled = only_enabled;
        self
    }
}

impl Collector for SceneDependencies {
    fn name(&self) -> &str {
        &self.name
    }

    fn contribute(&self, out: &mut Vec<Material>) -> Result<(), CollectorError> {
        out.extend(
            self.project
                .scene_materials(self.only_enabled)
                .into_iter()
                .cloned(),
        );
        Ok(())
    }
}

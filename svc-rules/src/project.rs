use crate::types::{Keyword, ShaderId};
use std::collections::{HashMap, HashSet};
use thiserror::Error;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Errors raised while validating a `ProjectManifest`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProjectError {
    /// Two materials share the same name.
    #[error("Duplicate material name: {0}")]
    DuplicateMaterial(String),
    /// A scene lists a material the project does not define.
    #[error("Scene {scene} references unknown material: {material}")]
    UnknownSceneMaterial { scene: String, material: String },
}

/// A material asset: a shader reference plus the keywords enabled on it.
///
/// `keywords` is the raw live keyword list and may contain duplicates or
/// keywords the shader does not recognise.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Material {
    pub name: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub path: String,
    pub shader: ShaderId,
    #[cfg_attr(feature = "serde", serde(default))]
    pub keywords: Vec<Keyword>,
}

impl Material {
    /// Creates a material with an empty asset path.
    pub fn new<I, K>(name: impl Into<String>, shader: impl Into<ShaderId>, keywords: I) -> Self
    where
        I: IntoIterator<Item = K>,
        K: Into<Keyword>,
    {
        Self {
            name: name.into(),
            path: String::new(),
            shader: shader.into(),
            keywords: keywords.into_iter().map(Into::into).collect(),
        }
    }

    /// Sets the asset path.
    #[must_use]
    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = path.into();
        self
    }

    /// Whether the raw live keyword list mentions `keyword`.
    pub fn has_keyword(&self, keyword: &str) -> bool {
        self.keywords.iter().any(|k| k.as_str() == keyword)
    }
}

/// A scene and the materials it depends on.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Scene {
    pub path: String,
    #[cfg_attr(feature = "serde", serde(default = "default_enabled"))]
    pub enabled: bool,
    #[cfg_attr(feature = "serde", serde(default))]
    pub materials: Vec<String>,
}

#[cfg(feature = "serde")]
const fn default_enabled() -> bool {
    true
}

/// Describes the materials and scenes of a project.
#[derive(Debug, Clone, Default)]
pub struct ProjectManifest {
    materials: Vec<Material>,
    scenes: Vec<Scene>,
    index: HashMap<String, usize>,
}

impl ProjectManifest {
    /// Builds a manifest, checking names are unique and scene references resolve.
    pub fn new(materials: Vec<Material>, scenes: Vec<Scene>) -> Result<Self, ProjectError> {
        let mut index = HashMap::with_capacity(materials.len());
        for (position, material) in materials.iter().enumerate() {
            if index.insert(material.name.clone(), position).is_some() {
                return Err(ProjectError::DuplicateMaterial(material.name.clone()));
            }
        }
        for scene in &scenes {
            if let Some(missing) = scene.materials.iter().find(|m| !index.contains_key(*m)) {
                return Err(ProjectError::UnknownSceneMaterial {
                    scene: scene.path.clone(),
                    material: missing.clone(),
                });
            }
        }
        Ok(Self {
            materials,
            scenes,
            index,
        })
    }

    /// Looks up a material by name.
    pub fn material(&self, name: &str) -> Option<&Material> {
        self.index.get(name).map(|&i| &self.materials[i])
    }

    /// All materials in declaration order.
    pub fn materials(&self) -> &[Material] {
        &self.materials
    }

    /// All scenes in declaration order.
    pub fn scenes(&self) -> &[Scene] {
        &self.scenes
    }

    /// Materials whose asset path starts with any of `prefixes`.
    pub fn materials_under<S: AsRef<str>>(&self, prefixes: &[S]) -> Vec<&Material> {
        self.materials
            .iter()
            .filter(|m| prefixes.iter().any(|p| m.path.starts_with(p.as_ref())))
            .collect()
    }

    /// Distinct materials referenced by scenes, in first-reference order.
    pub fn scene_materials(&self, only_enabled: bool) -> Vec<&Material> {
        let mut seen = HashSet::new();
        self.scenes
            .iter()
            .filter(|scene| !only_enabled || scene.enabled)
            .flat_map(|scene| scene.materials.iter())
            .filter(|name| seen.insert(name.as_str()))
            .filter_map(|name| self.material(name))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn manifest() -> ProjectManifest {
        let materials = vec![
            Material::new("Floor", "Lit", ["_NORMALMAP"]).with_path("Assets/Env/Floor.mat"),
            Material::new("Wall", "Lit", Vec::<Keyword>::new()).with_path("Assets/Env/Wall.mat"),
            Material::new("Ui", "Unlit", Vec::<Keyword>::new()).with_path("Packages/ui/Ui.mat"),
        ];
        let scenes = vec![
            Scene {
                path: "Assets/Scenes/Main.scene".to_owned(),
                enabled: true,
                materials: vec!["Floor".to_owned(), "Wall".to_owned(), "Floor".to_owned()],
            },
            Scene {
                path: "Assets/Scenes/Test.scene".to_owned(),
                enabled: false,
                materials: vec!["Ui".to_owned()],
            },
        ];
        ProjectManifest::new(materials, scenes).unwrap()
    }

    #[test]
    fn test_scene_materials_only_enabled() {
        let project = manifest();
        let names: Vec<&str> = project
            .scene_materials(true)
            .iter()
            .map(|m| m.name.as_str())
            .collect();
        assert_eq!(names, vec!["Floor", "Wall"]);
        assert_eq!(project.scene_materials(false).len(), 3);
    }

    #[test]
    fn test_materials_under_prefix() {
        let project = manifest();
        assert_eq!(project.materials_under(&["Assets"]).len(), 2);
        assert_eq!(project.materials_under(&["Packages/ui"]).len(), 1);
        assert!(project.materials_under::<&str>(&[]).is_empty());
    }

    #[test]
    fn test_rejects_unknown_scene_material() {
        let scenes = vec![Scene {
            path: "Main".to_owned(),
            enabled: true,
            materials: vec!["Ghost".to_owned()],
        }];
        assert_eq!(
            ProjectManifest::new(Vec::new(), scenes).unwrap_err(),
            ProjectError::UnknownSceneMaterial {
                scene: "Main".to_owned(),
                material: "Ghost".to_owned()
            }
        );
    }

    #[test]
    fn test_rejects_duplicate_material() {
        let materials = vec![
            Material::new("Floor", "Lit", ["A"]),
            Material::new("Floor", "Unlit", ["B"]),
        ];
        assert!(matches!(
            ProjectManifest::new(materials, Vec::new()),
            Err(ProjectError::DuplicateMaterial(_))
        ));
    }
}

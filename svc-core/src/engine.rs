//! Drives a full variant collection run: materials in, variants out.

use crate::collaborators::{
    Collector, CollectorTag, MaterialFilter, Sink, VariantFilter,
};
use crate::oracle::{OracleError, ValidityOracle};
use crate::progress::{ProgressCallback, ProgressScope, Stage};
use crate::reducer::KeywordCombinationReducer;
use crate::variant::{Variant, VariantSet};
use crate::CollectionError;
use log::{debug, error, info};
use std::collections::hash_map::Entry;
use std::collections::{HashMap, HashSet};
use svc_rules::{Keyword, KeywordSet, Material, PassType, ShaderId};

/// Counts reported by [`MaterialVariantCollectionEngine::run`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub materials_collected: usize,
    pub materials_filtered: usize,
    pub variants_collected: usize,
    pub variants_filtered: usize,
    pub variants_emitted: usize,
}

#[derive(Debug, Clone)]
struct CollectedMaterial {
    material: Material,
    provenance: Vec<CollectorTag>,
}

/// Per-shader oracle answers cached for one `collect_variants` call.
#[derive(Debug)]
struct ShaderInfo {
    vocabulary: HashSet<Keyword>,
    passes: Vec<PassType>,
}

/// Collects materials, reduces their keyword sets into variants and hands
/// the result to a sink.
///
/// The steps are meant to be called in order: `collect_materials`,
/// `filter_materials`, `collect_variants`, `filter_variants`, `emit`. The
/// `run` method does exactly that. Taking `&mut self` keeps a single run in
/// flight per engine.
pub struct MaterialVariantCollectionEngine<O: ValidityOracle> {
    oracle: O,
    materials: Vec<CollectedMaterial>,
    index: HashMap<Material, usize>,
    manual_combinations: Vec<KeywordSet>,
    shader_cache: HashMap<ShaderId, ShaderInfo>,
    processed_keys: HashSet<(ShaderId, String)>,
    variants: VariantSet,
    overwrite: bool,
    progress_callback: Option<ProgressCallback>,
}

impl<O: ValidityOracle> MaterialVariantCollectionEngine<O> {
    /// Creates an engine that merges into existing sink content.
    pub fn new(oracle: O) -> Self {
        Self {
            oracle,
            materials: Vec::new(),
            index: HashMap::new(),
            manual_combinations: Vec::new(),
            shader_cache: HashMap::new(),
            processed_keys: HashSet::new(),
            variants: VariantSet::new(),
            overwrite: false,
            progress_callback: None,
        }
    }

    /// Sets the progress callback function.
    #[must_use]
    pub fn with_progress_callback(mut self, callback: ProgressCallback) -> Self {
        self.progress_callback = Some(callback);
        self
    }

    /// Whether `emit` clears the sink before persisting.
    pub fn set_overwrite(&mut self, overwrite: bool) {
        self.overwrite = overwrite;
    }

    pub const fn oracle(&self) -> &O {
        &self.oracle
    }

    /// Replaces the manual keyword combinations checked after reduction.
    pub fn set_manual_combinations(&mut self, combinations: Vec<KeywordSet>) {
        self.manual_combinations = combinations;
    }

    fn clear_materials(&mut self) {
        self.materials.clear();
        self.index.clear();
    }

    fn record_material(&mut self, material: Material, tag: &CollectorTag) {
        match self.index.entry(material) {
            Entry::Occupied(entry) => {
                let provenance = &mut self.materials[*entry.get()].provenance;
                if !provenance.contains(tag) {
                    provenance.push(tag.clone());
                }
            }
            Entry::Vacant(entry) => {
                self.materials.push(CollectedMaterial {
                    material: entry.key().clone(),
                    provenance: vec![tag.clone()],
                });
                entry.insert(self.materials.len() - 1);
            }
        }
    }

    /// Gathers materials from every collector, in order.
    ///
    /// Replaces any previously collected materials. A material returned by
    /// several collectors is kept once and remembers all of them. If any
    /// collector fails, nothing collected so far is kept.
    pub fn collect_materials(
        &mut self,
        collectors: &[Box<dyn Collector>],
    ) -> Result<usize, CollectionError> {
        self.clear_materials();
        let scope = ProgressScope::new(Stage::CollectMaterials, self.progress_callback.clone());
        let total = collectors.len();

        for (index, collector) in collectors.iter().enumerate() {
            scope.update(index, total, collector.name());
            let mut contributed = Vec::new();
            if let Err(source) = collector.contribute(&mut contributed) {
                error!(
                    "[Material Collection] Collector {} (#{index}) failed: {source}",
                    collector.name()
                );
                self.clear_materials();
                return Err(CollectionError::Collector {
                    collector: collector.name().to_owned(),
                    index,
                    source,
                });
            }
            debug!(
                "[Material Collection] {} contributed {} materials",
                collector.name(),
                contributed.len()
            );
            let tag = CollectorTag::new(index, collector.name());
            for material in contributed {
                self.record_material(material, &tag);
            }
        }

        info!(
            "[Material Collection] Collected {} materials",
            self.materials.len()
        );
        Ok(self.materials.len())
    }

    /// Drops every material that at least one filter votes to strip.
    ///
    /// Returns the number of materials removed.
    pub fn filter_materials(&mut self, filters: &[Box<dyn MaterialFilter>]) -> usize {
        let before = self.materials.len();
        self.materials.retain(|entry| {
            filters
                .iter()
                .all(|filter| filter.should_keep(&entry.material, &entry.provenance))
        });
        self.index = self
            .materials
            .iter()
            .enumerate()
            .map(|(position, entry)| (entry.material.clone(), position))
            .collect();
        let removed = before - self.materials.len();
        if removed > 0 {
            info!("[Material Filter] Stripped {removed} of {before} materials");
        }
        removed
    }

    /// Turns the collected materials into variants.
    ///
    /// Each material's live keywords are narrowed to the shader's vocabulary
    /// and reduced once per distinct keyword set and shader. Manual keyword
    /// combinations are then checked against every shader seen. Replaces any
    /// previously collected variants; on error none are kept.
    pub fn collect_variants(&mut self) -> Result<usize, CollectionError> {
        self.shader_cache.clear();
        self.processed_keys.clear();
        self.variants.clear();

        let Self {
            oracle,
            materials,
            manual_combinations,
            shader_cache,
            processed_keys,
            variants,
            progress_callback,
            ..
        } = self;
        let reducer = KeywordCombinationReducer::new(&*oracle);

        {
            let scope = ProgressScope::new(Stage::CollectVariants, progress_callback.clone());
            let total = materials.len();
            for (index, entry) in materials.iter().enumerate() {
                let material = &entry.material;
                scope.update(index, total, material.name.as_str());

                let info = match shader_info(&*oracle, shader_cache, &material.shader) {
                    Ok(info) => info,
                    Err(source) => {
                        error!(
                            "[Material Variant Conversion] Failed on material {} (#{index}): {source}",
                            material.name
                        );
                        variants.clear();
                        return Err(CollectionError::Reduction {
                            material: material.name.clone(),
                            index,
                            source,
                        });
                    }
                };

                let candidates: KeywordSet = material
                    .keywords
                    .iter()
                    .filter(|keyword| info.vocabulary.contains(*keyword))
                    .cloned()
                    .collect();
                if !processed_keys.insert((material.shader.clone(), candidates.canonical_key())) {
                    debug!(
                        "{}: [{candidates}] already reduced, skipping {}",
                        material.shader, material.name
                    );
                    continue;
                }
                reducer.collect_into(&material.shader, &info.passes, &candidates, variants);
            }
        }

        if !manual_combinations.is_empty() {
            let scope = ProgressScope::new(Stage::ManualCombinations, progress_callback.clone());
            let mut seen = HashSet::new();
            let shaders: Vec<&ShaderId> = materials
                .iter()
                .map(|entry| &entry.material.shader)
                .filter(|shader| seen.insert(*shader))
                .collect();
            let total = shaders.len();
            let mut added = 0;

            for (index, shader) in shaders.into_iter().enumerate() {
                scope.update(index, total, shader.as_str());
                // Every shader here was described while reducing its materials.
                let Some(info) = shader_cache.get(shader) else {
                    continue;
                };

                for combination in manual_combinations.iter() {
                    if !combination
                        .iter()
                        .all(|keyword| info.vocabulary.contains(keyword))
                    {
                        continue;
                    }
                    for &pass in &info.passes {
                        if reducer.probe(shader, pass, combination)
                            && variants.add(Variant::new(shader.clone(), pass, combination.clone()))
                        {
                            added += 1;
                        }
                    }
                }
            }
            info!(
                "[Manual Keywords] Processed {} combinations over {total} shaders, added {added} variants",
                manual_combinations.len()
            );
        }

        info!(
            "[Material Variant Conversion] Added {} total variants",
            variants.len()
        );
        Ok(variants.len())
    }

    /// Drops every variant that at least one filter votes to strip.
    ///
    /// Returns the number of variants removed.
    pub fn filter_variants(&mut self, filters: &[Box<dyn VariantFilter>]) -> usize {
        let before = self.variants.len();
        let removed = self
            .variants
            .retain(|variant| filters.iter().all(|filter| filter.should_keep(variant)));
        if removed > 0 {
            info!("[Variant Filter] Stripped {removed} of {before} variants");
        }
        removed
    }

    /// Persists every variant to `sink`, clearing it first in overwrite mode.
    ///
    /// A failure part way through leaves whatever was already persisted in
    /// the sink.
    pub fn emit(&self, sink: &mut dyn Sink) -> Result<usize, CollectionError> {
        let scope = ProgressScope::new(Stage::Emit, self.progress_callback.clone());
        if self.overwrite {
            sink.clear()?;
        }
        let total = self.variants.len();
        for (index, variant) in self.variants.iter().enumerate() {
            scope.update(index, total, variant.shader.as_str());
            sink.persist(variant)?;
        }
        sink.flush()?;
        info!(
            "[Emit] Wrote {total} variants ({})",
            if self.overwrite { "overwrite" } else { "merge" }
        );
        Ok(total)
    }

    /// Runs every step in order.
    pub fn run(
        &mut self,
        collectors: &[Box<dyn Collector>],
        material_filters: &[Box<dyn MaterialFilter>],
        variant_filters: &[Box<dyn VariantFilter>],
        sink: &mut dyn Sink,
    ) -> Result<RunSummary, CollectionError> {
        let materials_collected = self.collect_materials(collectors)?;
        let materials_filtered = self.filter_materials(material_filters);
        let variants_collected = self.collect_variants()?;
        let variants_filtered = self.filter_variants(variant_filters);
        let variants_emitted = self.emit(sink)?;
        Ok(RunSummary {
            materials_collected,
            materials_filtered,
            variants_collected,
            variants_filtered,
            variants_emitted,
        })
    }

    pub fn material_count(&self) -> usize {
        self.materials.len()
    }

    pub fn variant_count(&self) -> usize {
        self.variants.len()
    }

    /// Collected materials in collection order.
    pub fn materials(&self) -> impl Iterator<Item = &Material> {
        self.materials.iter().map(|entry| &entry.material)
    }

    pub const fn variants(&self) -> &VariantSet {
        &self.variants
    }

    /// The collectors that contributed `material`; empty if it was not
    /// collected.
    pub fn provenance_of(&self, material: &Material) -> &[CollectorTag] {
        self.index
            .get(material)
            .map_or(&[], |&position| self.materials[position].provenance.as_slice())
    }

    /// Collected materials whose live keywords include `keyword`, optionally
    /// restricted to one shader.
    pub fn materials_referencing_keyword(
        &self,
        keyword: &str,
        shader: Option<&ShaderId>,
    ) -> Vec<&Material> {
        self.materials()
            .filter(|material| shader.map_or(true, |shader| &material.shader == shader))
            .filter(|material| material.has_keyword(keyword))
            .collect()
    }
}

fn shader_info<'c, O: ValidityOracle + ?Sized>(
    oracle: &O,
    cache: &'c mut HashMap<ShaderId, ShaderInfo>,
    shader: &ShaderId,
) -> Result<&'c ShaderInfo, OracleError> {
    match cache.entry(shader.clone()) {
        Entry::Occupied(entry) => Ok(&*entry.into_mut()),
        Entry::Vacant(entry) => {
            let vocabulary: HashSet<Keyword> = oracle.vocabulary(shader)?.into_iter().collect();
            let mut passes = oracle.passes(shader)?;
            passes.sort_unstable();
            passes.dedup();
            debug!(
                "{shader}: {} keywords, {} passes",
                vocabulary.len(),
                passes.len()
            );
            Ok(&*entry.insert(ShaderInfo { vocabulary, passes }))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collaborators::MemorySink;
    use crate::oracle::CatalogOracle;
    use svc_rules::{KeywordGroup, PassDefinition, ShaderCatalog, ShaderDefinition};

    fn oracle() -> CatalogOracle {
        let lit = ShaderDefinition::new(
            "Lit",
            vec![
                PassDefinition::new(
                    PassType::ForwardBase,
                    vec![KeywordGroup::new(["_NORMALMAP"], true)],
                ),
                PassDefinition::new(PassType::ShadowCaster, Vec::new()),
            ],
        );
        CatalogOracle::new(ShaderCatalog::new(vec![lit]).unwrap())
    }

    struct Fixed(&'static str, Vec<Material>);

    impl Collector for Fixed {
        fn name(&self) -> &str {
            self.0
        }

        fn contribute(&self, out: &mut Vec<Material>) -> Result<(), crate::CollectorError> {
            out.extend(self.1.iter().cloned());
            Ok(())
        }
    }

    #[test]
    fn test_provenance_lists_each_collector_once() {
        let floor = Material::new("Floor", "Lit", ["_NORMALMAP"]);
        let collectors: Vec<Box<dyn Collector>> = vec![
            Box::new(Fixed("a", vec![floor.clone(), floor.clone()])),
            Box::new(Fixed("b", vec![floor.clone()])),
        ];
        let mut engine = MaterialVariantCollectionEngine::new(oracle());
        assert_eq!(engine.collect_materials(&collectors).unwrap(), 1);
        assert_eq!(
            engine.provenance_of(&floor),
            &[CollectorTag::new(0, "a"), CollectorTag::new(1, "b")]
        );
        assert!(engine
            .provenance_of(&Material::new("Other", "Lit", ["_NORMALMAP"]))
            .is_empty());
    }

    #[test]
    fn test_run_reports_counts() {
        let collectors: Vec<Box<dyn Collector>> = vec![Box::new(Fixed(
            "a",
            vec![
                Material::new("Floor", "Lit", ["_NORMALMAP"]),
                Material::new("Wall", "Lit", Vec::<Keyword>::new()),
            ],
        ))];
        let mut engine = MaterialVariantCollectionEngine::new(oracle());
        let mut sink = MemorySink::new();
        let summary = engine.run(&collectors, &[], &[], &mut sink).unwrap();
        // Floor: ForwardBase {_NORMALMAP}; Wall: ForwardBase {} and ShadowCaster {}.
        assert_eq!(
            summary,
            RunSummary {
                materials_collected: 2,
                materials_filtered: 0,
                variants_collected: 3,
                variants_filtered: 0,
                variants_emitted: 3,
            }
        );
        assert_eq!(sink.variants().len(), 3);
        assert_eq!(sink.flush_count(), 1);
    }
}

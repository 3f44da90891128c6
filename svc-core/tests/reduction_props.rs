// svc-core/tests/reduction_props.rs
use proptest::prelude::*;
use std::collections::HashSet;
use svc_core::{CatalogOracle, Collector, CollectorError, MaterialVariantCollectionEngine, ValidityOracle};
use svc_rules::{KeywordGroup, Material, PassDefinition, PassType, ShaderCatalog, ShaderDefinition};

const POOL: [&str; 7] = [
    "_NORMALMAP",
    "FOG_LINEAR",
    "FOG_EXP",
    "SHADOWS_SOFT",
    "LIGHTMAP_ON",
    "DIRLIGHTMAP",
    "UNUSED",
];

fn oracle() -> CatalogOracle {
    let lit = ShaderDefinition::new(
        "Lit",
        vec![
            PassDefinition::new(
                PassType::ForwardBase,
                vec![
                    KeywordGroup::new(["_NORMALMAP"], true),
                    KeywordGroup::new(["FOG_LINEAR", "FOG_EXP"], true),
                    KeywordGroup::new(["SHADOWS_SOFT"], true),
                    KeywordGroup::new(["LIGHTMAP_ON"], true),
                ],
            ),
            PassDefinition::new(
                PassType::ForwardAdd,
                vec![
                    KeywordGroup::new(["SHADOWS_SOFT"], true),
                    KeywordGroup::new(["FOG_LINEAR", "FOG_EXP"], true),
                ],
            ),
            PassDefinition::new(
                PassType::Meta,
                vec![KeywordGroup::new(["LIGHTMAP_ON", "DIRLIGHTMAP"], false)],
            ),
        ],
    );
    CatalogOracle::new(ShaderCatalog::new(vec![lit]).unwrap())
}

struct Fixed(Vec<Material>);

impl Collector for Fixed {
    fn name(&self) -> &str {
        "fixed"
    }

    fn contribute(&self, out: &mut Vec<Material>) -> Result<(), CollectorError> {
        out.extend(self.0.iter().cloned());
        Ok(())
    }
}

fn materials_strategy() -> impl Strategy<Value = Vec<Vec<&'static str>>> {
    prop::collection::vec(prop::collection::vec(prop::sample::select(POOL.to_vec()), 0..6), 1..5)
}

fn run(keyword_lists: &[Vec<&'static str>]) -> MaterialVariantCollectionEngine<CatalogOracle> {
    let materials = keyword_lists
        .iter()
        .enumerate()
        .map(|(i, keywords)| Material::new(format!("M{i}"), "Lit", keywords.iter().copied()))
        .collect();
    let collectors: Vec<Box<dyn Collector>> = vec![Box::new(Fixed(materials))];
    let mut engine = MaterialVariantCollectionEngine::new(oracle());
    engine.collect_materials(&collectors).unwrap();
    engine.collect_variants().unwrap();
    engine
}

proptest! {
    #[test]
    fn prop_variants_are_valid_and_unique(lists in materials_strategy()) {
        let engine = run(&lists);
        let mut seen = HashSet::new();
        for variant in engine.variants() {
            prop_assert_eq!(
                engine.oracle().is_valid(&variant.shader, variant.pass, &variant.keywords),
                Ok(true)
            );
            prop_assert!(seen.insert(variant.clone()), "duplicate {}", variant);
        }
    }

    #[test]
    fn prop_keyword_order_within_material_is_irrelevant(lists in materials_strategy()) {
        let reversed: Vec<Vec<&'static str>> = lists
            .iter()
            .map(|keywords| keywords.iter().rev().copied().collect())
            .collect();
        let forward = run(&lists);
        let backward = run(&reversed);
        prop_assert_eq!(forward.variants().as_slice(), backward.variants().as_slice());
    }
}

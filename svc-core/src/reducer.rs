//! Growth search that turns an observed keyword set into valid combinations.

use crate::oracle::ValidityOracle;
use crate::variant::{Variant, VariantSet};
use log::{debug, warn};
use svc_rules::{Keyword, KeywordSet, PassType, ShaderId};

/// Expands observed keyword sets into maximal valid keyword combinations.
///
/// For every seed keyword that is valid on its own in a pass, the reducer
/// grows one combination by trying each remaining candidate in turn and
/// keeping it only if the oracle still accepts the result. This yields at
/// most one combination per seed and pass instead of searching every subset.
///
/// Candidates are taken from a `KeywordSet`, so they are always visited in
/// sorted order. The oracle need not be monotone, which makes that order
/// decide the outcome when keywords interact.
#[derive(Debug)]
pub struct KeywordCombinationReducer<'a, O: ValidityOracle + ?Sized> {
    oracle: &'a O,
}

impl<'a, O: ValidityOracle + ?Sized> KeywordCombinationReducer<'a, O> {
    /// Creates a reducer that queries `oracle`.
    pub fn new(oracle: &'a O) -> Self {
        Self { oracle }
    }

    /// Asks the oracle about one triple, reading any fault as `false`.
    pub fn probe(&self, shader: &ShaderId, pass: PassType, keywords: &KeywordSet) -> bool {
        match self.oracle.is_valid(shader, pass, keywords) {
            Ok(valid) => valid,
            Err(err) => {
                warn!("Oracle fault probing {shader} {pass} [{keywords}], treating as invalid: {err}");
                false
            }
        }
    }

    /// Grows `seed` into a combination by adding each other candidate that
    /// keeps the combination valid.
    pub fn grow(
        &self,
        shader: &ShaderId,
        pass: PassType,
        seed: &Keyword,
        candidates: &KeywordSet,
    ) -> KeywordSet {
        let mut combination = KeywordSet::single(seed.clone());
        for candidate in candidates {
            if candidate == seed {
                continue;
            }
            combination.insert(candidate.clone());
            if !self.probe(shader, pass, &combination) {
                combination.remove(candidate.as_str());
            }
        }
        combination
    }

    /// Reduces `candidates` for a single pass.
    ///
    /// Returns the distinct combinations in seed order. An empty candidate
    /// set yields the empty combination if the pass exists without keywords.
    pub fn reduce(
        &self,
        shader: &ShaderId,
        pass: PassType,
        candidates: &KeywordSet,
    ) -> Vec<KeywordSet> {
        if candidates.is_empty() {
            let empty = KeywordSet::empty();
            return if self.probe(shader, pass, &empty) {
                vec![empty]
            } else {
                Vec::new()
            };
        }

        let mut combinations: Vec<KeywordSet> = Vec::new();
        for seed in candidates {
            if !self.probe(shader, pass, &KeywordSet::single(seed.clone())) {
                continue;
            }
            let combination = self.grow(shader, pass, seed, candidates);
            if !combinations.contains(&combination) {
                combinations.push(combination);
            }
        }
        combinations
    }

    /// Reduces `candidates` over every pass in `passes` and adds the results
    /// to `variants`.
    ///
    /// Seeds are walked in the outer loop and passes in the inner one, which
    /// fixes the insertion order of the resulting variants. Returns the
    /// number of variants that were not already present.
    pub fn collect_into(
        &self,
        shader: &ShaderId,
        passes: &[PassType],
        candidates: &KeywordSet,
        variants: &mut VariantSet,
    ) -> usize {
        let mut added = 0;

        if candidates.is_empty() {
            let empty = KeywordSet::empty();
            for &pass in passes {
                if self.probe(shader, pass, &empty)
                    && variants.add(Variant::new(shader.clone(), pass, empty.clone()))
                {
                    added += 1;
                }
            }
            debug!("{shader}: empty keyword set added {added} variants");
            return added;
        }

        for seed in candidates {
            let single = KeywordSet::single(seed.clone());
            for &pass in passes {
                if !self.probe(shader, pass, &single) {
                    continue;
                }
                let combination = self.grow(shader, pass, seed, candidates);
                if variants.add(Variant::new(shader.clone(), pass, combination)) {
                    added += 1;
                }
            }
        }
        debug!("{shader}: [{candidates}] added {added} variants");
        added
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::oracle::OracleError;
    use std::collections::HashSet;

    /// Oracle backed by an explicit list of accepted keyword sets per pass.
    struct TableOracle {
        accepted: HashSet<(PassType, KeywordSet)>,
    }

    impl TableOracle {
        fn new(entries: &[(PassType, &str)]) -> Self {
            Self {
                accepted: entries
                    .iter()
                    .map(|(pass, keywords)| (*pass, keywords.parse().unwrap()))
                    .collect(),
            }
        }
    }

    impl ValidityOracle for TableOracle {
        fn is_valid(
            &self,
            _shader: &ShaderId,
            pass: PassType,
            keywords: &KeywordSet,
        ) -> Result<bool, OracleError> {
            Ok(self.accepted.contains(&(pass, keywords.clone())))
        }

        fn vocabulary(&self, _shader: &ShaderId) -> Result<Vec<Keyword>, OracleError> {
            Ok(Vec::new())
        }

        fn passes(&self, _shader: &ShaderId) -> Result<Vec<PassType>, OracleError> {
            Ok(PassType::ALL.to_vec())
        }
    }

    fn set(raw: &str) -> KeywordSet {
        raw.parse().unwrap()
    }

    #[test]
    fn test_growth_follows_sorted_order() {
        // A+B and A+C are both valid, A+B+C is not: B is tried first.
        let oracle = TableOracle::new(&[
            (PassType::Normal, "A"),
            (PassType::Normal, "A B"),
            (PassType::Normal, "A C"),
        ]);
        let reducer = KeywordCombinationReducer::new(&oracle);
        let shader = ShaderId::new("S");
        let grown = reducer.grow(&shader, PassType::Normal, &Keyword::new("A"), &set("C B A"));
        assert_eq!(grown, set("A B"));
    }

    #[test]
    fn test_reduce_one_combination_per_valid_seed() {
        let oracle = TableOracle::new(&[
            (PassType::Normal, "A"),
            (PassType::Normal, "B"),
            (PassType::Normal, "A B"),
        ]);
        let reducer = KeywordCombinationReducer::new(&oracle);
        let combinations = reducer.reduce(&ShaderId::new("S"), PassType::Normal, &set("A B C"));
        // Seeds A and B both grow to {A, B}; C is not valid alone.
        assert_eq!(combinations, vec![set("A B")]);
    }

    #[test]
    fn test_reduce_empty_candidates() {
        let oracle = TableOracle::new(&[(PassType::ForwardBase, "")]);
        let reducer = KeywordCombinationReducer::new(&oracle);
        let shader = ShaderId::new("S");
        assert_eq!(
            reducer.reduce(&shader, PassType::ForwardBase, &KeywordSet::empty()),
            vec![KeywordSet::empty()]
        );
        assert!(reducer
            .reduce(&shader, PassType::ShadowCaster, &KeywordSet::empty())
            .is_empty());
    }

    #[test]
    fn test_collect_into_walks_seeds_then_passes() {
        let oracle = TableOracle::new(&[
            (PassType::ForwardBase, "A"),
            (PassType::ShadowCaster, "A"),
            (PassType::ForwardBase, "B"),
        ]);
        let reducer = KeywordCombinationReducer::new(&oracle);
        let mut variants = VariantSet::new();
        let added = reducer.collect_into(
            &ShaderId::new("S"),
            &[PassType::ForwardBase, PassType::ShadowCaster],
            &set("A B"),
            &mut variants,
        );
        assert_eq!(added, 3);
        let order: Vec<(PassType, String)> = variants
            .iter()
            .map(|v| (v.pass, v.keywords.canonical_key()))
            .collect();
        assert_eq!(
            order,
            vec![
                (PassType::ForwardBase, "A".to_owned()),
                (PassType::ShadowCaster, "A".to_owned()),
                (PassType::ForwardBase, "B".to_owned()),
            ]
        );
    }
}

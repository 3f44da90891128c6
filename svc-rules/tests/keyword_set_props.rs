use proptest::prelude::*;
use svc_rules::KeywordSet;

fn keyword_list() -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec("[A-Z_]{1,6}", 0..12)
}

proptest! {
    #[test]
    fn set_equality_ignores_order(mut keywords in keyword_list()) {
        let forward = KeywordSet::from_keywords(keywords.clone());
        keywords.reverse();
        let backward = KeywordSet::from_keywords(keywords);
        prop_assert_eq!(forward, backward);
    }

    #[test]
    fn canonical_key_round_trips(keywords in keyword_list()) {
        let set = KeywordSet::from_keywords(keywords);
        let reparsed: KeywordSet = set.canonical_key().parse().unwrap();
        prop_assert_eq!(reparsed, set);
    }

    #[test]
    fn set_is_sorted_and_distinct(keywords in keyword_list()) {
        let set = KeywordSet::from_keywords(keywords);
        prop_assert!(set.as_slice().windows(2).all(|w| w[0] < w[1]));
    }
}

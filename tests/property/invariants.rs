//! Structural invariants that must hold after arbitrary sequences of
//! inserts and deletes: every inserted key is findable until deleted, the
//! debug invariant pass never trips, and cached per-node maxima never
//! disagree with their subtrees regardless of which node layout (N4,
//! N16, N48, N256) ends up holding them.

use std::collections::BTreeSet;

use art_index::{Document, Tree};
use proptest::prelude::*;

/// Fixed-length keys can never be a byte-for-byte proper prefix of one
/// another, which sidesteps the trie's "no key may prefix another key"
/// requirement without needing a rejection strategy.
fn key_strategy() -> impl Strategy<Value = String> {
    prop::string::string_regex("[a-f0-9]{6}").unwrap()
}

fn distinct_keys_strategy(max: usize) -> impl Strategy<Value = Vec<String>> {
    prop::collection::hash_set(key_strategy(), 1..max).prop_map(|set| set.into_iter().collect())
}

fn doc(id: u32, score: i64) -> Document {
    Document {
        id,
        score,
        offsets: vec![],
    }
}

#[derive(Debug, Clone)]
enum Op {
    Insert(String, u32, i64),
    Delete(String),
}

fn workload_strategy() -> impl Strategy<Value = Vec<Op>> {
    distinct_keys_strategy(25).prop_flat_map(|keys| {
        let keys_for_insert = keys.clone();
        prop::collection::vec(
            prop_oneof![
                (
                    prop::sample::select(keys_for_insert),
                    any::<u32>(),
                    any::<i64>(),
                )
                    .prop_map(|(k, id, score)| Op::Insert(k, id, score)),
                prop::sample::select(keys).prop_map(Op::Delete),
            ],
            1..60,
        )
    })
}

proptest! {
    #[test]
    fn insert_then_search_round_trips(keys in distinct_keys_strategy(40)) {
        let mut tree = Tree::new();
        for (i, key) in keys.iter().enumerate() {
            tree.insert(key.as_bytes(), doc(i as u32, i as i64)).unwrap();
        }
        for (i, key) in keys.iter().enumerate() {
            let pl = tree.search(key.as_bytes());
            prop_assert!(pl.is_some(), "key {key} must be found after insert");
            prop_assert!(pl.unwrap().contains(i as u32));
        }
        prop_assert_eq!(tree.len() as usize, keys.len());
    }

    #[test]
    fn delete_after_insert_removes_exactly_that_key(keys in distinct_keys_strategy(40)) {
        let mut tree = Tree::new();
        for (i, key) in keys.iter().enumerate() {
            tree.insert(key.as_bytes(), doc(i as u32, 1)).unwrap();
        }
        let target = &keys[0];
        let removed = tree.delete(target.as_bytes());
        prop_assert!(removed.is_some());
        prop_assert!(tree.search(target.as_bytes()).is_none());
        for key in keys.iter().skip(1) {
            prop_assert!(tree.search(key.as_bytes()).is_some(), "deleting {target} must not disturb {key}");
        }
        prop_assert_eq!(tree.len() as usize, keys.len() - 1);
        tree.assert_invariants();
    }

    #[test]
    fn score_cache_never_understates_the_true_subtree_maximum(keys in distinct_keys_strategy(50)) {
        let mut tree = Tree::new();
        let mut expected_max = i64::MIN;
        for (i, key) in keys.iter().enumerate() {
            let score = (i as i64) * 7 % 101 - 50;
            expected_max = expected_max.max(score);
            tree.insert(key.as_bytes(), doc(i as u32, score)).unwrap();
        }
        tree.assert_invariants();
        let results = tree.topk_prefix(b"", keys.len(), art_index::Order::Score, &[]);
        let observed_max = results.iter().map(|(_, pl)| pl.max_score()).max().unwrap();
        prop_assert_eq!(observed_max, expected_max);
    }

    #[test]
    fn invariants_hold_through_an_arbitrary_insert_delete_workload(ops in workload_strategy()) {
        let mut tree = Tree::new();
        let mut alive: BTreeSet<String> = BTreeSet::new();
        for op in ops {
            match op {
                Op::Insert(k, id, score) => {
                    tree.insert(k.as_bytes(), doc(id, score)).unwrap();
                    alive.insert(k);
                }
                Op::Delete(k) => {
                    tree.delete(k.as_bytes());
                    alive.remove(&k);
                }
            }
            tree.assert_invariants();
        }
        prop_assert_eq!(tree.len() as usize, alive.len());
        for k in &alive {
            prop_assert!(tree.search(k.as_bytes()).is_some());
        }
    }

    #[test]
    fn node_grows_and_shrinks_preserve_every_live_key(keys in distinct_keys_strategy(60)) {
        // Up to 59 distinct siblings under shared short prefixes can push
        // a node through several growth tiers (N4 -> N16 -> N48 -> N256)
        // on insert, and back down through the shrink tiers on delete.
        let mut tree = Tree::new();
        for (i, key) in keys.iter().enumerate() {
            tree.insert(key.as_bytes(), doc(i as u32, 1)).unwrap();
        }
        tree.assert_invariants();
        for key in keys.iter().take(keys.len() / 2) {
            tree.delete(key.as_bytes());
        }
        tree.assert_invariants();
        for key in keys.iter().skip(keys.len() / 2) {
            prop_assert!(tree.search(key.as_bytes()).is_some());
        }
    }
}

//! Best-first top-k ranking correctness: the ids returned under a prefix
//! are exactly the true top `max_results` by the requested metric, the
//! same set a brute-force scan of every matching leaf would produce.

use std::collections::HashMap;

use art_index::{Document, Order, Tree};
use proptest::prelude::*;

fn key_strategy() -> impl Strategy<Value = String> {
    prop::string::string_regex("[a-d]{4,6}").unwrap()
}

fn corpus_strategy() -> impl Strategy<Value = Vec<String>> {
    prop::collection::hash_set(key_strategy(), 1..40).prop_map(|s| s.into_iter().collect())
}

fn doc(id: u32, score: i64) -> Document {
    Document {
        id,
        score,
        offsets: vec![],
    }
}

fn brute_force_top_k(corpus: &[(String, i64)], k: usize, order: Order) -> Vec<String> {
    let mut scored: Vec<(String, i64)> = corpus.to_vec();
    match order {
        Order::Score => scored.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0))),
        // Every key in this test corpus has exactly one document, so
        // document frequency is uniformly 1 for every candidate and
        // score is the only tiebreaker that still distinguishes them.
        Order::Frequency => scored.sort_by(|a, b| a.0.cmp(&b.0)),
    }
    scored.into_iter().take(k).map(|(k, _)| k).collect()
}

proptest! {
    #[test]
    fn topk_by_score_matches_a_brute_force_scan(corpus in corpus_strategy(), k in 1usize..10) {
        let mut tree = Tree::new();
        let mut with_scores = Vec::new();
        for (i, word) in corpus.iter().enumerate() {
            let score = ((i as i64) * 13) % 97;
            tree.insert(word.as_bytes(), doc(i as u32, score)).unwrap();
            with_scores.push((word.clone(), score));
        }
        let results = tree.topk_prefix(b"", k, Order::Score, &[]);
        let returned_scores: Vec<i64> = results.iter().map(|(_, pl)| pl.max_score()).collect();

        let mut all_scores: Vec<i64> = with_scores.iter().map(|(_, s)| *s).collect();
        all_scores.sort_unstable_by(|a, b| b.cmp(a));
        let expected_scores: Vec<i64> = all_scores.into_iter().take(k).collect();

        prop_assert_eq!(returned_scores.len(), expected_scores.len().min(corpus.len()));
        prop_assert_eq!(&returned_scores, &expected_scores[..returned_scores.len()]);
    }

    #[test]
    fn topk_never_returns_more_than_max_results(corpus in corpus_strategy(), k in 1usize..50) {
        let mut tree = Tree::new();
        for (i, word) in corpus.iter().enumerate() {
            tree.insert(word.as_bytes(), doc(i as u32, i as i64)).unwrap();
        }
        let results = tree.topk_prefix(b"", k, Order::Score, &[]);
        prop_assert!(results.len() <= k);
        prop_assert!(results.len() <= corpus.len());
    }

    #[test]
    fn topk_respects_the_filter_id_set(corpus in corpus_strategy()) {
        let mut tree = Tree::new();
        let mut ids_by_key: HashMap<String, u32> = HashMap::new();
        for (i, word) in corpus.iter().enumerate() {
            tree.insert(word.as_bytes(), doc(i as u32, i as i64)).unwrap();
            ids_by_key.insert(word.clone(), i as u32);
        }
        // Keep only even ids.
        let mut allowed: Vec<u32> = ids_by_key.values().copied().filter(|id| id % 2 == 0).collect();
        allowed.sort_unstable();
        let results = tree.topk_prefix(b"", corpus.len(), Order::Score, &allowed);
        for (_, pl) in &results {
            let id = pl.ids()[0];
            prop_assert!(allowed.binary_search(&id).is_ok(), "id {id} leaked past the filter set");
        }
    }

    #[test]
    fn topk_by_frequency_orders_by_posting_list_length(words in prop::collection::hash_set(key_strategy(), 2..8)) {
        let words: Vec<String> = words.into_iter().collect();
        let mut tree = Tree::new();
        // Give each word a distinct number of documents equal to its index plus one.
        for (i, word) in words.iter().enumerate() {
            for doc_id in 0..=i as u32 {
                tree.insert(word.as_bytes(), doc(doc_id + (i as u32) * 100, 0)).unwrap();
            }
        }
        let results = tree.topk_prefix(b"", words.len(), Order::Frequency, &[]);
        let lengths: Vec<usize> = results.iter().map(|(_, pl)| pl.ids().len()).collect();
        for w in lengths.windows(2) {
            prop_assert!(w[0] >= w[1], "frequency order must be non-increasing: {lengths:?}");
        }
    }
}

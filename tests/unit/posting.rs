//! Posting-list folding behavior, exercised through `Tree::insert`/
//! `Tree::search` since `PostingList` itself has no public constructor
//! outside the crate other than via a `Document`.

use art_index::{Document, Tree};

fn doc(id: u32, score: i64, offsets: &[u32]) -> Document {
    Document {
        id,
        score,
        offsets: offsets.to_vec(),
    }
}

#[test]
fn ids_are_sorted_ascending_regardless_of_insert_order() {
    let mut tree = Tree::new();
    for id in [5u32, 1, 3, 2, 4] {
        tree.insert(b"term", doc(id, 1, &[])).unwrap();
    }
    assert_eq!(tree.search(b"term").unwrap().ids(), &[1, 2, 3, 4, 5]);
}

#[test]
fn max_score_tracks_the_highest_folded_score() {
    let mut tree = Tree::new();
    tree.insert(b"term", doc(1, 5, &[])).unwrap();
    tree.insert(b"term", doc(2, 50, &[])).unwrap();
    tree.insert(b"term", doc(3, 20, &[])).unwrap();
    assert_eq!(tree.search(b"term").unwrap().max_score(), 50);
}

#[test]
fn reinserting_an_existing_id_is_idempotent_past_max_score() {
    let mut tree = Tree::new();
    tree.insert(b"term", doc(1, 10, &[0, 1])).unwrap();
    tree.insert(b"term", doc(1, 99, &[2, 3])).unwrap();

    let pl = tree.search(b"term").unwrap();
    assert_eq!(pl.ids(), &[1]);
    assert_eq!(pl.max_score(), 99);
}

#[test]
fn offsets_for_returns_none_for_an_absent_id() {
    let mut tree = Tree::new();
    tree.insert(b"term", doc(1, 10, &[4, 8])).unwrap();
    let pl = tree.search(b"term").unwrap();
    assert_eq!(pl.offsets_for(1), Some(&[4, 8][..]));
    assert_eq!(pl.offsets_for(2), None);
}

#[test]
fn num_found_of_counts_intersection_with_a_sorted_filter_set() {
    let mut tree = Tree::new();
    for id in [1u32, 2, 3, 4, 5] {
        tree.insert(b"term", doc(id, 1, &[])).unwrap();
    }
    let pl = tree.search(b"term").unwrap();
    assert_eq!(pl.num_found_of(&[2, 4, 6]), 2);
    assert_eq!(pl.num_found_of(&[]), 0);
    assert_eq!(pl.num_found_of(&[10, 20]), 0);
}

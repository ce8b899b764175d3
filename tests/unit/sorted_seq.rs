//! The underlying sorted-sequence type has no public surface of its own —
//! it backs `PostingList::ids`. These tests exercise its ordering and
//! dedup guarantees through that surface.

use art_index::{Document, Tree};

fn doc(id: u32) -> Document {
    Document {
        id,
        score: 1,
        offsets: vec![],
    }
}

#[test]
fn sequence_stays_sorted_after_interleaved_inserts() {
    let mut tree = Tree::new();
    for id in [42u32, 7, 100, 1, 99, 2] {
        tree.insert(b"k", doc(id)).unwrap();
    }
    let ids = tree.search(b"k").unwrap().ids().to_vec();
    let mut sorted = ids.clone();
    sorted.sort_unstable();
    assert_eq!(ids, sorted, "ids must already be sorted, not merely sortable");
}

#[test]
fn duplicate_id_does_not_grow_the_sequence() {
    let mut tree = Tree::new();
    tree.insert(b"k", doc(1)).unwrap();
    tree.insert(b"k", doc(1)).unwrap();
    tree.insert(b"k", doc(1)).unwrap();
    assert_eq!(tree.search(b"k").unwrap().ids(), &[1]);
}

#[test]
fn large_run_of_ascending_inserts_stays_contiguous() {
    let mut tree = Tree::new();
    for id in 0u32..500 {
        tree.insert(b"k", doc(id)).unwrap();
    }
    let ids = tree.search(b"k").unwrap().ids();
    let expected: Vec<u32> = (0..500).collect();
    assert_eq!(ids, expected.as_slice());
}

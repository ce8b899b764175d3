//! Insertion, exact search, and prefix iteration, plus a few edge cases
//! around empty keys and deletion. Node-layout internals (N4 growth, header
//! prefixes) are covered by `#[cfg(test)]` modules inside `src/`, which can
//! see crate-private fields this integration test cannot.

use std::ops::ControlFlow;

use art_index::{ArtError, Document, Tree};

fn doc(id: u32, score: i64, offsets: &[u32]) -> Document {
    Document {
        id,
        score,
        offsets: offsets.to_vec(),
    }
}

#[test]
fn insert_and_search_round_trips() {
    let mut tree = Tree::new();
    tree.insert(b"cat", doc(1, 10, &[2, 5])).unwrap();
    tree.insert(b"car", doc(2, 20, &[1])).unwrap();

    assert_eq!(tree.search(b"cat").unwrap().ids(), &[1]);
    assert_eq!(tree.search(b"car").unwrap().ids(), &[2]);
    assert!(tree.search(b"ca").is_none());
    assert!(tree.search(b"catalog").is_none());
}

#[test]
fn prefix_iteration_visits_keys_in_ascending_order() {
    let mut tree = Tree::new();
    tree.insert(b"cat", doc(1, 10, &[2, 5])).unwrap();
    tree.insert(b"car", doc(2, 20, &[1])).unwrap();

    let mut seen = Vec::new();
    tree.iter_prefix(b"ca", |key, _| {
        seen.push(key.to_vec());
        ControlFlow::Continue(())
    });

    assert_eq!(seen, vec![b"car".to_vec(), b"cat".to_vec()]);
}

#[test]
fn prefix_iteration_excludes_non_matching_siblings() {
    let mut tree = Tree::new();
    for key in ["cat", "car", "dog"] {
        tree.insert(key.as_bytes(), doc(1, 1, &[])).unwrap();
    }

    let mut seen = Vec::new();
    tree.iter_prefix(b"ca", |key, _| {
        seen.push(key.to_vec());
        ControlFlow::Continue(())
    });

    assert_eq!(seen, vec![b"car".to_vec(), b"cat".to_vec()]);
}

#[test]
fn empty_key_is_rejected() {
    let mut tree = Tree::new();
    assert_eq!(tree.insert(b"", doc(1, 1, &[])), Err(ArtError::EmptyKey));
}

#[test]
fn delete_removes_key_and_shrinks_size() {
    let mut tree = Tree::new();
    tree.insert(b"cat", doc(1, 10, &[])).unwrap();
    tree.insert(b"car", doc(2, 20, &[])).unwrap();
    assert_eq!(tree.len(), 2);

    let removed = tree.delete(b"cat").unwrap();
    assert_eq!(removed.ids(), &[1]);
    assert_eq!(tree.len(), 1);
    assert!(tree.search(b"cat").is_none());
    assert!(tree.search(b"car").is_some());

    assert!(tree.delete(b"cat").is_none());
}

#[test]
fn minimum_and_maximum_track_lexicographic_order() {
    let mut tree = Tree::new();
    for key in ["banana", "apple", "cherry"] {
        tree.insert(key.as_bytes(), doc(1, 1, &[])).unwrap();
    }
    assert_eq!(tree.minimum().unwrap().key, b"apple");
    assert_eq!(tree.maximum().unwrap().key, b"cherry");
}

#[test]
fn repeated_insert_folds_documents_into_one_posting_list() {
    let mut tree = Tree::new();
    tree.insert(b"cat", doc(1, 10, &[0])).unwrap();
    let prev = tree.insert(b"cat", doc(2, 30, &[5])).unwrap();

    assert!(prev.is_some(), "second insert of an existing key returns the prior list");
    let pl = tree.search(b"cat").unwrap();
    assert_eq!(pl.ids(), &[1, 2]);
    assert_eq!(pl.max_score(), 30);
}

//! Order-preserving scalar encodings and the range search that descends
//! them, including the signed/unsigned boundary around zero.

use art_index::encoding::Comparator;
use art_index::{Document, Tree};

fn doc(id: u32) -> Document {
    Document {
        id,
        score: id as i64,
        offsets: vec![],
    }
}

#[test]
fn range_ge_over_unsigned_int32_keys() {
    let mut tree = Tree::new();
    for (i, value) in [-5i32, 0, 3, 7].into_iter().enumerate() {
        tree.insert(&art_index::encoding::encode_i32(value), doc(i as u32))
            .unwrap();
    }
    // id 0 -> -5, id 1 -> 0, id 2 -> 3, id 3 -> 7.
    // Byte-wise, -5's encoding starts with a top nibble of 0xF, which sorts
    // above every non-negative encoding, so it wrongly qualifies for >= 3
    // alongside the true matches 3 and 7.
    let mut ids: Vec<u32> = tree
        .int32_search(3, Comparator::Ge)
        .into_iter()
        .map(|(_, pl)| pl.ids()[0])
        .collect();
    ids.sort_unstable();
    assert_eq!(ids, vec![0, 2, 3]);
}

#[test]
fn signed_range_handles_the_sign_boundary() {
    let mut tree = Tree::new();
    for (i, value) in [-5i32, 0, 3, 7].into_iter().enumerate() {
        tree.insert(&art_index::encoding::encode_i32_signed(value), doc(i as u32))
            .unwrap();
    }
    let mut ids: Vec<u32> = tree
        .int32_search_signed(3, Comparator::Ge)
        .into_iter()
        .map(|(_, pl)| pl.ids()[0])
        .collect();
    ids.sort_unstable();
    assert_eq!(ids, vec![2, 3], "3 and 7 dominate 3 once sign order is preserved");

    let mut lt_ids: Vec<u32> = tree
        .int32_search_signed(0, Comparator::Lt)
        .into_iter()
        .map(|(_, pl)| pl.ids()[0])
        .collect();
    lt_ids.sort_unstable();
    assert_eq!(lt_ids, vec![0], "only -5 is strictly less than 0");
}

#[test]
fn eq_comparator_matches_only_the_exact_value() {
    let mut tree = Tree::new();
    for value in [-5i32, 0, 3, 7] {
        tree.insert(&art_index::encoding::encode_i32_signed(value), doc((value + 5) as u32))
            .unwrap();
    }
    let results = tree.int32_search_signed(3, Comparator::Eq);
    assert_eq!(results.len(), 1);
}

#[test]
fn float_range_search_preserves_order_across_zero() {
    let mut tree = Tree::new();
    for (i, value) in [-2.5f32, -0.5, 0.0, 1.5, 3.0].into_iter().enumerate() {
        tree.insert(&art_index::encoding::encode_f32(value), doc(i as u32))
            .unwrap();
    }
    let mut ids: Vec<u32> = tree
        .float_search(0.0, Comparator::Gt)
        .into_iter()
        .map(|(_, pl)| pl.ids()[0])
        .collect();
    ids.sort_unstable();
    assert_eq!(ids, vec![3, 4]);
}

#[test]
fn int64_range_search() {
    let mut tree = Tree::new();
    for (i, value) in [10i64, 20, 30, 40].into_iter().enumerate() {
        tree.insert(&art_index::encoding::encode_i64(value), doc(i as u32))
            .unwrap();
    }
    let mut ids: Vec<u32> = tree
        .int64_search(20, Comparator::Le)
        .into_iter()
        .map(|(_, pl)| pl.ids()[0])
        .collect();
    ids.sort_unstable();
    assert_eq!(ids, vec![0, 1]);
}

//! Randomized and boundary tests for the indexed property store

use pretty_assertions::assert_eq;
use quicksilver_core::runtime::indexed::{MAX_DENSE_LENGTH, MAX_LENGTH};
use quicksilver_core::runtime::{IndexedMap, Representation};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::BTreeMap;

/// An empty map that has already switched to sparse storage
fn forced_sparse() -> IndexedMap<u32> {
    let mut map = IndexedMap::new();
    map.put(MAX_DENSE_LENGTH + 5, 0);
    map.remove(MAX_DENSE_LENGTH + 5);
    assert_eq!(map.representation(), Representation::Sparse);
    assert_eq!(map.length(), 0);
    map
}

fn assert_agrees(map: &IndexedMap<u32>, model: &BTreeMap<u64, u32>, step: usize) {
    let expected_length = model.keys().next_back().map_or(0, |&k| k + 1);
    assert_eq!(map.length(), expected_length, "length at step {step}");
    assert_eq!(map.count(), model.len(), "count at step {step}");
    let forward: Vec<(u64, u32)> = map.iter().map(|(k, v)| (k, *v)).collect();
    let expected: Vec<(u64, u32)> = model.iter().map(|(k, v)| (*k, *v)).collect();
    assert_eq!(forward, expected, "entries at step {step}");
}

mod equivalence {
    use super::*;
    use pretty_assertions::assert_eq;

    const KEY_SPACE: u64 = 320;

    #[test]
    fn test_dense_and_sparse_agree_with_model() {
        let mut rng = StdRng::seed_from_u64(0x5EED);
        let mut dense: IndexedMap<u32> = IndexedMap::new();
        let mut sparse = forced_sparse();
        let mut model = BTreeMap::new();

        // a full prefix keeps occupancy high enough for dense storage
        for key in 0..256u64 {
            dense.put(key, key as u32);
            sparse.put(key, key as u32);
            model.insert(key, key as u32);
        }
        assert_eq!(dense.representation(), Representation::Dense);

        for step in 0..10_000 {
            let key = rng.gen_range(0..KEY_SPACE);
            if rng.gen_bool(0.6) {
                let value = rng.gen::<u32>();
                let expected = model.insert(key, value);
                assert_eq!(dense.put(key, value), expected);
                assert_eq!(sparse.put(key, value), expected);
            } else {
                let expected = model.remove(&key);
                assert_eq!(dense.remove(key), expected);
                assert_eq!(sparse.remove(key), expected);
            }
            for nearby in [key, key.saturating_sub(1), key + 1] {
                assert_eq!(dense.get(nearby), model.get(&nearby));
                assert_eq!(sparse.get(nearby), model.get(&nearby));
                assert_eq!(dense.has(nearby), model.contains_key(&nearby));
            }
            if step % 100 == 0 {
                assert_eq!(dense.representation(), Representation::Dense, "step {step}");
                assert_eq!(sparse.representation(), Representation::Sparse, "step {step}");
                assert_agrees(&dense, &model, step);
                assert_agrees(&sparse, &model, step);
            }
        }
        assert_eq!(dense.representation(), Representation::Dense);
        assert_eq!(sparse.representation(), Representation::Sparse);
        assert_agrees(&dense, &model, 10_000);
        assert_agrees(&sparse, &model, 10_000);
    }

    #[test]
    fn test_ranges_agree_in_both_directions() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut dense: IndexedMap<u32> = IndexedMap::new();
        let mut sparse = forced_sparse();
        for key in 0..1_000u64 {
            dense.put(key, key as u32);
            sparse.put(key, key as u32);
        }
        for _ in 0..400 {
            let key = rng.gen_range(0..1_000);
            assert_eq!(dense.remove(key), sparse.remove(key));
        }
        assert_eq!(dense.representation(), Representation::Dense);
        assert_eq!(sparse.representation(), Representation::Sparse);

        for _ in 0..200 {
            let a = rng.gen_range(0..1_200);
            let b = rng.gen_range(0..1_200);
            let (from, to) = (a.min(b), a.max(b));
            let d: Vec<(u64, u32)> = dense.range(from, to).map(|(k, v)| (k, *v)).collect();
            let s: Vec<(u64, u32)> = sparse.range(from, to).map(|(k, v)| (k, *v)).collect();
            assert_eq!(d, s);
            let d_rev: Vec<u64> = dense.range(from, to).rev().map(|(k, _)| k).collect();
            let s_rev: Vec<u64> = sparse.range(from, to).rev().map(|(k, _)| k).collect();
            let mut expected: Vec<u64> = s.iter().map(|(k, _)| *k).collect();
            expected.reverse();
            assert_eq!(d_rev, expected);
            assert_eq!(s_rev, expected);
        }
    }

    #[test]
    fn test_make_dense_preserves_contents() {
        let mut map = forced_sparse();
        for key in [3, 1, 40, 7] {
            map.put(key, key as u32 * 10);
        }
        let before: Vec<(u64, u32)> = map.iter().map(|(k, v)| (k, *v)).collect();
        assert!(map.make_dense());
        assert_eq!(map.representation(), Representation::Dense);
        let after: Vec<(u64, u32)> = map.iter().map(|(k, v)| (k, *v)).collect();
        assert_eq!(before, after);
    }
}

mod transitions {
    use super::*;
    use pretty_assertions::assert_eq;

    fn filled(count: u64) -> IndexedMap<u32> {
        let mut map = IndexedMap::new();
        for key in 0..count {
            map.put(key, key as u32);
        }
        assert_eq!(map.representation(), Representation::Dense);
        map
    }

    #[test]
    fn test_trailing_holes_are_trimmed_and_storage_stays_dense() {
        let mut map = filled(64);
        for key in (7..64).rev() {
            map.remove(key);
        }
        assert_eq!(map.representation(), Representation::Dense);
        assert_eq!(map.length(), 7);
        assert_eq!(map.keys().collect::<Vec<_>>(), (0..7).collect::<Vec<_>>());
        map.put(20, 20);
        assert_eq!(map.representation(), Representation::Dense);
        assert_eq!(map.length(), 21);
    }

    #[test]
    fn test_interior_holes_switch_to_sparse() {
        let mut map = filled(64);
        for key in 1..58 {
            map.remove(key);
        }
        assert_eq!(map.representation(), Representation::Sparse);
        assert_eq!(map.keys().collect::<Vec<_>>(), vec![0, 58, 59, 60, 61, 62, 63]);
        assert_eq!(map.length(), 64);
    }

    #[test]
    fn test_far_put_on_small_dense_storage_switches_to_sparse() {
        let mut map = filled(1);
        map.put(100, 100);
        assert_eq!(map.representation(), Representation::Sparse);
        assert_eq!(map.keys().collect::<Vec<_>>(), vec![0, 100]);
        assert_eq!(map.length(), 101);
    }
}

mod boundaries {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_largest_key() {
        let mut map = IndexedMap::new();
        map.put(MAX_LENGTH - 1, "last");
        assert_eq!(map.length(), MAX_LENGTH);
        assert_eq!(map.get(MAX_LENGTH - 1), Some(&"last"));
        assert!(!map.make_dense());
    }

    #[test]
    #[should_panic(expected = "out of range")]
    fn test_key_past_the_end_panics() {
        let mut map = IndexedMap::new();
        map.put(MAX_LENGTH, ());
    }

    #[test]
    fn test_widen_and_truncate_length() {
        let mut map = IndexedMap::new();
        for key in 0..10u64 {
            map.put(key, key);
        }
        map.set_length(100);
        assert_eq!(map.length(), 100);
        assert_eq!(map.count(), 10);
        map.set_length(4);
        assert_eq!(map.keys().collect::<Vec<_>>(), vec![0, 1, 2, 3]);
    }
}

// ChainedHashMap integration test suite.
//
// Each test documents what behavior is being verified and which
// invariants are assumed or asserted. The core invariants exercised:
// - Uniqueness: `add` rejects an existing key without side effects.
// - Replace: `add_or_replace`/`set` overwrite in place and report it.
// - Growth: capacity doubles right before an insert that would take the
//   load above 0.75, never on replace or failed add.
// - Removal: `remove` never shrinks; `clear` resets to the default.
// - Enumeration: every live entry exactly once, restartable.
use chained_hashmap::{ChainedHashMap, Entry, Error, DEFAULT_CAPACITY, LOAD_FACTOR};
use std::collections::{BTreeMap, BTreeSet};
use std::hash::{Hash, Hasher};

// Test: count tracks distinct adds and every key is reachable.
// Assumes: keys are distinct.
// Verifies: len, find, get and contains_key agree for each key.
#[test]
fn distinct_adds_are_all_found() {
    let mut m = ChainedHashMap::new();
    for i in 0..500u32 {
        m.add(i, format!("v{i}")).expect("distinct key");
        assert_eq!(m.len(), i as usize + 1);
    }
    for i in 0..500u32 {
        let expected = format!("v{i}");
        assert_eq!(m.find(&i).map(Entry::value), Some(&expected));
        assert_eq!(m.get(&i), Ok(&expected));
        assert!(m.contains_key(&i));
    }
    assert!(!m.contains_key(&500));
}

// Test: unique keys policy.
// Assumes: duplicate insertion is rejected without side effects.
// Verifies: DuplicateKey error; len and stored value unchanged.
#[test]
fn duplicate_add_rejected() {
    let mut m = ChainedHashMap::new();
    m.add("dup".to_string(), 1).unwrap();
    match m.add("dup".to_string(), 2) {
        Err(Error::DuplicateKey) => {}
        other => panic!("expected duplicate add to error, got {other:?}"),
    }
    assert_eq!(m.len(), 1);
    assert_eq!(m["dup"], 1);
}

// Test: add_or_replace reports insert vs replace.
// Verifies: false on replace, value visible immediately through get.
#[test]
fn add_or_replace_overwrites_in_place() {
    let mut m = ChainedHashMap::new();
    assert!(m.add_or_replace("k", 1));
    assert!(!m.add_or_replace("k", 2));
    assert_eq!(m.get("k"), Ok(&2));
    assert_eq!(m.len(), 1);

    // Indexer write path.
    m.set("k", 3);
    m.set("j", 4);
    assert_eq!(m["k"], 3);
    assert_eq!(m["j"], 4);
    assert_eq!(m.len(), 2);
}

// Test: get/try_get on absent keys.
// Verifies: KeyNotFound, default value from try_get, map untouched.
#[test]
fn absent_key_lookups() {
    let mut m: ChainedHashMap<&str, String> = ChainedHashMap::new();
    m.add("a", "x".to_string()).unwrap();
    assert_eq!(m.get("b"), Err(Error::KeyNotFound));
    assert_eq!(m.get_mut("b"), Err(Error::KeyNotFound));
    assert_eq!(m.try_get("b"), (false, String::new()));
    assert_eq!(m.try_get("a"), (true, "x".to_string()));
    assert!(m.find("b").is_none());
    assert_eq!(m.len(), 1);
}

// Test: read-by-key on a missing key panics like `get` fails.
#[test]
#[should_panic(expected = "key not found")]
fn index_missing_key_panics() {
    let m: ChainedHashMap<u8, u8> = ChainedHashMap::new();
    let _ = m[&1];
}

// Test: mutation through returned references.
// Assumes: get_mut/find_mut borrow the stored value.
// Verifies: writes are visible to later lookups.
#[test]
fn mutation_through_borrows_is_visible() {
    let mut m = ChainedHashMap::new();
    m.add(1u8, vec![1]).unwrap();
    m.get_mut(&1).unwrap().push(2);
    m.find_mut(&1).unwrap().value_mut().push(3);
    assert_eq!(m[&1], vec![1, 2, 3]);
    let old = m.find_mut(&1).unwrap().replace_value(vec![]);
    assert_eq!(old, vec![1, 2, 3]);
    assert!(m[&1].is_empty());
}

// Test: removal semantics.
// Verifies: true + decrement for present keys; false + no change for
// absent keys; capacity never shrinks.
#[test]
fn remove_present_and_absent() {
    let mut m = ChainedHashMap::new();
    for i in 0..40 {
        m.add(i, i).unwrap();
    }
    let cap = m.capacity();
    assert!(m.remove(&7));
    assert_eq!(m.len(), 39);
    assert!(!m.contains_key(&7));
    assert!(!m.remove(&7));
    assert_eq!(m.len(), 39);
    for i in 0..40 {
        m.remove(&i);
    }
    assert!(m.is_empty());
    assert_eq!(m.capacity(), cap);
    assert_eq!(m.remove_entry(&3), None);
}

// Test: remove_entry hands back ownership.
#[test]
fn remove_entry_returns_pair() {
    let mut m = ChainedHashMap::new();
    m.add("k".to_string(), vec![1, 2]).unwrap();
    assert_eq!(m.remove_entry("k"), Some(("k".to_string(), vec![1, 2])));
    assert!(m.is_empty());
}

// Test: growth boundary at the default capacity.
// Verifies: 12 inserts keep 16 slots; the 13th grows to 32 first.
#[test]
fn growth_boundary_from_sixteen() {
    let mut m = ChainedHashMap::new();
    assert_eq!(m.capacity(), DEFAULT_CAPACITY);
    for i in 0..12 {
        m.add(i, ()).unwrap();
    }
    assert_eq!(m.capacity(), 16);
    assert_eq!(m.load_factor(), LOAD_FACTOR);
    m.add(12, ()).unwrap();
    assert_eq!(m.capacity(), 32);
    assert_eq!(m.len(), 13);
}

// Test: replacing at the threshold is not an insert.
// Verifies: add_or_replace on an existing key never grows.
#[test]
fn replace_at_threshold_does_not_grow() {
    let mut m = ChainedHashMap::new();
    for i in 0..12 {
        m.add(i, 0).unwrap();
    }
    assert!(!m.add_or_replace(5, 1));
    assert_eq!(m.capacity(), 16);
    assert!(m.add_or_replace(12, 1));
    assert_eq!(m.capacity(), 32);
}

// Test: clear on a populated map.
// Verifies: count 0, default capacity, no previous key present.
#[test]
fn clear_resets_to_default() {
    let mut m = ChainedHashMap::with_capacity(5).unwrap();
    for i in 0..5 {
        m.add(i, i).unwrap();
    }
    m.clear();
    assert_eq!(m.len(), 0);
    assert_eq!(m.capacity(), 16);
    for i in 0..5 {
        assert!(!m.contains_key(&i));
    }
    assert_eq!(m.iter().count(), 0);
}

// Test: construction arguments.
// Verifies: zero capacity fails fast; any positive capacity works.
#[test]
fn capacity_must_be_positive() {
    match ChainedHashMap::<u8, u8>::with_capacity(0) {
        Err(Error::InvalidArgument(msg)) => assert!(msg.contains("capacity")),
        other => panic!("expected InvalidArgument, got {other:?}"),
    }
    let m = ChainedHashMap::<u8, u8>::with_capacity(7).unwrap();
    assert_eq!(m.capacity(), 7);
}

// Test: enumeration round-trip.
// Verifies: N distinct inserts enumerate to exactly those N pairs, and a
// second traversal sees the same thing.
#[test]
fn enumeration_round_trip_and_restart() {
    let mut m = ChainedHashMap::new();
    let expected: BTreeMap<u32, u32> = (0..300).map(|i| (i, i * 3)).collect();
    for (&k, &v) in &expected {
        m.add(k, v).unwrap();
    }
    let first: BTreeMap<u32, u32> = m.iter().map(|(k, v)| (*k, *v)).collect();
    let second: Vec<(u32, u32)> = (&m).into_iter().map(|(k, v)| (*k, *v)).collect();
    assert_eq!(first, expected);
    assert_eq!(second.len(), 300);
    assert_eq!(m.iter().map(|(k, v)| (*k, *v)).collect::<Vec<_>>(), second);

    let keys: BTreeSet<u32> = m.keys().copied().collect();
    let values: BTreeSet<u32> = m.values().copied().collect();
    assert_eq!(keys, expected.keys().copied().collect());
    assert_eq!(values, expected.values().copied().collect());

    let entries: Vec<(u32, u32)> = m.entries().map(|e| (*e.key(), *e.value())).collect();
    assert_eq!(entries, second);

    let owned: BTreeMap<u32, u32> = m.into_iter().collect();
    assert_eq!(owned, expected);
}

// Test: iter_mut and values_mut write through.
#[test]
fn mutable_iteration() {
    let mut m: ChainedHashMap<u32, u32> = (0..20).map(|i| (i, i)).collect();
    for (k, v) in &mut m {
        *v += *k;
    }
    for v in m.values_mut() {
        *v += 1;
    }
    for i in 0..20 {
        assert_eq!(m[&i], 2 * i + 1);
    }
}

// Test: Extend/FromIterator go through add_or_replace.
// Verifies: later pairs win, no duplicates.
#[test]
fn from_iter_and_extend_replace_duplicates() {
    let mut m: ChainedHashMap<&str, i32> = [("a", 1), ("b", 2), ("a", 3)].into_iter().collect();
    assert_eq!(m.len(), 2);
    assert_eq!(m["a"], 3);
    m.extend([("b", 5), ("c", 6)]);
    assert_eq!(m.len(), 3);
    assert_eq!(m["b"], 5);
}

// A key whose hash is constant: every instance collides.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Collider(u32);
impl Hash for Collider {
    fn hash<H: Hasher>(&self, state: &mut H) {
        0u8.hash(state);
    }
}

// Test: degenerate Hash impl.
// Assumes: all keys share one hash, hence one bucket.
// Verifies: correctness is preserved across growth and removal.
#[test]
fn colliding_keys_stay_correct() {
    let mut m = ChainedHashMap::new();
    for i in 0..64 {
        m.add(Collider(i), i).unwrap();
    }
    assert_eq!(m.add(Collider(10), 0), Err(Error::DuplicateKey));
    for i in (0..64).step_by(2) {
        assert!(m.remove(&Collider(i)));
    }
    assert_eq!(m.len(), 32);
    for i in 0..64 {
        assert_eq!(m.contains_key(&Collider(i)), i % 2 == 1);
    }
    // One chain, append order preserved after removals.
    let order: Vec<u32> = m.keys().map(|c| c.0).collect();
    let expected: Vec<u32> = (0..64).filter(|i| i % 2 == 1).collect();
    assert_eq!(order, expected);
}

// Test: handles identify entries across growth and go stale on removal.
#[test]
fn handles_follow_entry_lifetime() {
    let mut m = ChainedHashMap::with_capacity(1).unwrap();
    let h = m.add("first".to_string(), 1).unwrap();
    for i in 0..100 {
        m.add(format!("k{i}"), i).unwrap();
    }
    assert_eq!(h.key(&m).map(String::as_str), Some("first"));
    assert_eq!(h.value(&m), Some(&1));
    assert!(m.remove("first"));
    assert!(h.value(&m).is_none());
    assert!(m.handle("first").is_none());
}

// Test: entries can be cloned into other containers.
#[test]
fn cloned_map_is_independent() {
    let mut a = ChainedHashMap::new();
    a.add(1, "one").unwrap();
    let mut b = a.clone();
    b.set(1, "uno");
    b.set(2, "dos");
    assert_eq!(a[&1], "one");
    assert_eq!(a.len(), 1);
    assert_eq!(b[&1], "uno");
    assert_eq!(b.len(), 2);
}

// Test: mutable borrows from iter_mut coexist.
// Assumes: iter_mut hands out disjoint `&mut V`s.
// Verifies: holding all of them at once, then writing through each, updates
// every entry exactly once.
#[test]
fn iter_mut_borrows_held_together() {
    let mut m: ChainedHashMap<String, u32> = (0..64).map(|i| (format!("k{i}"), i)).collect();
    let mut held: Vec<(&String, &mut u32)> = m.iter_mut().collect();
    assert_eq!(held.len(), 64);
    for (_, v) in held.iter_mut() {
        **v *= 2;
    }
    for (k, v) in held {
        *v += k.len() as u32;
    }
    for i in 0..64u32 {
        let k = format!("k{i}");
        assert_eq!(m[k.as_str()], i * 2 + k.len() as u32);
    }
}

#![cfg(test)]

// Property tests for ChainedHashMap kept inside the crate so they can check
// the structural invariants that are not part of the public API.

use crate::chained_hash_map::{ChainedHashMap, Handle};
use crate::error::Error;
use crate::DEFAULT_CAPACITY;
use proptest::prelude::*;
use proptest::test_runner::TestCaseError;
use std::collections::{BTreeSet, HashMap};
use std::fmt;
use std::hash::{BuildHasher, Hasher};

// Key newtype with Borrow<str> to exercise borrowed lookup.
#[derive(Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
struct Key(String);
impl fmt::Debug for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}
impl std::borrow::Borrow<str> for Key {
    fn borrow(&self) -> &str {
        &self.0
    }
}

// Pool-indexed operations so shrinking moves toward earlier keys and
// shorter op lists.
#[derive(Clone, Debug)]
enum OpI {
    Add(usize, i32),
    AddOrReplace(usize, i32),
    Remove(usize),
    RemoveHandle(usize),
    Get(usize),
    TryGet(usize),
    Contains(String),
    Mutate(usize, i32),
    Iterate,
    Clear,
}

fn key_from(pool: &[String], i: usize) -> Key {
    Key(pool[i].clone())
}

fn arb_scenario() -> impl Strategy<Value = (usize, Vec<String>, Vec<OpI>)> {
    let pool = proptest::collection::vec("[a-z]{0,4}", 1..=40);
    (1usize..=20, pool).prop_flat_map(|(capacity, pool)| {
        let idxs: Vec<usize> = (0..pool.len()).collect();
        let idx = proptest::sample::select(idxs);
        let contains_pool = proptest::sample::select(pool.clone());
        let op = prop_oneof![
            6 => (idx.clone(), any::<i32>()).prop_map(|(i, v)| OpI::Add(i, v)),
            4 => (idx.clone(), any::<i32>()).prop_map(|(i, v)| OpI::AddOrReplace(i, v)),
            2 => idx.clone().prop_map(OpI::Remove),
            1 => idx.clone().prop_map(OpI::RemoveHandle),
            2 => idx.clone().prop_map(OpI::Get),
            1 => idx.clone().prop_map(OpI::TryGet),
            1 => prop_oneof![contains_pool, "[a-z]{0,4}"].prop_map(OpI::Contains),
            1 => (idx.clone(), any::<i32>()).prop_map(|(i, d)| OpI::Mutate(i, d)),
            1 => Just(OpI::Iterate),
            1 => Just(OpI::Clear),
        ];
        proptest::collection::vec(op, 1..120).prop_map(move |ops| (capacity, pool.clone(), ops))
    })
}

// Capacity is `base` doubled zero or more times.
fn is_doubling_of(capacity: usize, base: usize) -> bool {
    let mut c = capacity;
    while c > base && c % 2 == 0 {
        c /= 2;
    }
    c == base
}

// State-machine equivalence against std::collections::HashMap.
// Invariants exercised across random operation sequences:
// - `add` rejects duplicates without touching len, capacity or the value.
// - `add_or_replace` reports insert vs replace and stores the new value.
// - `remove`/`remove_handle` parity with the model; handles go stale.
// - Enumeration yields each live pair exactly once.
// - After every op: internal invariants hold, len parity, load <= 0.75,
//   capacity is the current base doubled.
fn run_scenario<S>(
    mut sut: ChainedHashMap<Key, i32, S>,
    base: usize,
    pool: &[String],
    ops: Vec<OpI>,
) -> Result<(), TestCaseError>
where
    S: BuildHasher,
{
    let mut base = base;
    let mut model: HashMap<Key, i32> = HashMap::new();
    let mut live: HashMap<Key, Handle> = HashMap::new();
    let mut stale: Vec<Handle> = Vec::new();

    for op in ops {
        match op {
            OpI::Add(i, v) => {
                let k = key_from(pool, i);
                let already = model.contains_key(&k);
                let cap_before = sut.capacity();
                match sut.add(k.clone(), v) {
                    Ok(h) => {
                        prop_assert!(!already, "add must fail on duplicate");
                        prop_assert!(live.insert(k.clone(), h).is_none());
                        model.insert(k, v);
                    }
                    Err(e) => {
                        prop_assert_eq!(e, Error::DuplicateKey);
                        prop_assert!(already, "duplicate error only when key exists");
                        prop_assert_eq!(sut.capacity(), cap_before);
                        prop_assert_eq!(sut.get(&k).ok(), model.get(&k));
                    }
                }
            }
            OpI::AddOrReplace(i, v) => {
                let k = key_from(pool, i);
                let inserted = sut.add_or_replace(k.clone(), v);
                let prev = model.insert(k.clone(), v);
                prop_assert_eq!(inserted, prev.is_none());
                if inserted {
                    let h = sut.handle(&k).expect("inserted key has a handle");
                    live.insert(k.clone(), h);
                }
                prop_assert_eq!(sut.get(&k), Ok(&v));
            }
            OpI::Remove(i) => {
                let k = key_from(pool, i);
                let removed = sut.remove(&k);
                prop_assert_eq!(removed, model.remove(&k).is_some());
                if let Some(h) = live.remove(&k) {
                    stale.push(h);
                }
                prop_assert!(!sut.contains_key(&k));
            }
            OpI::RemoveHandle(i) => {
                let k = key_from(pool, i);
                if let Some(h) = live.remove(&k) {
                    let (kk, vv) = sut.remove_handle(h).expect("live handle removes");
                    prop_assert!(kk == k);
                    prop_assert_eq!(Some(vv), model.remove(&k));
                    stale.push(h);
                } else {
                    prop_assert!(sut.handle(&k).is_none());
                }
            }
            OpI::Get(i) => {
                let k = key_from(pool, i);
                match model.get(&k) {
                    Some(v) => {
                        prop_assert_eq!(sut.get(&k), Ok(v));
                        let entry = sut.find(&k).expect("find agrees with get");
                        prop_assert_eq!(entry.value(), v);
                        prop_assert_eq!(sut.handle(&k), live.get(&k).copied());
                    }
                    None => {
                        prop_assert_eq!(sut.get(&k), Err(Error::KeyNotFound));
                        prop_assert!(sut.find(&k).is_none());
                    }
                }
            }
            OpI::TryGet(i) => {
                let k = key_from(pool, i);
                let expected = match model.get(&k) {
                    Some(&v) => (true, v),
                    None => (false, 0),
                };
                prop_assert_eq!(sut.try_get(&k), expected);
            }
            OpI::Contains(s) => {
                let has_model = model.keys().any(|k| k.0 == s);
                prop_assert_eq!(sut.contains_key(s.as_str()), has_model);
            }
            OpI::Mutate(i, d) => {
                let k = key_from(pool, i);
                if let Some(&h) = live.get(&k) {
                    let vr = h.value_mut(&mut sut).expect("live handle resolves");
                    *vr = vr.wrapping_add(d);
                    if let Some(mv) = model.get_mut(&k) {
                        *mv = mv.wrapping_add(d);
                    }
                }
            }
            OpI::Iterate => {
                let pairs: Vec<(Key, i32)> = sut.iter().map(|(k, v)| (k.clone(), *v)).collect();
                prop_assert_eq!(pairs.len(), model.len());
                let s_keys: BTreeSet<_> = pairs.iter().map(|(k, _)| k.clone()).collect();
                prop_assert_eq!(s_keys.len(), pairs.len(), "no duplicates");
                for (k, v) in &pairs {
                    prop_assert_eq!(model.get(k), Some(v));
                }
                prop_assert_eq!(sut.keys().count(), sut.values().count());
            }
            OpI::Clear => {
                sut.clear();
                model.clear();
                stale.extend(live.drain().map(|(_, h)| h));
                base = DEFAULT_CAPACITY;
                prop_assert_eq!(sut.capacity(), DEFAULT_CAPACITY);
            }
        }

        sut.assert_invariants();
        for &h in &stale {
            prop_assert!(h.value(&sut).is_none());
        }
        prop_assert_eq!(sut.len(), model.len());
        prop_assert_eq!(sut.is_empty(), model.is_empty());
        prop_assert!(sut.load_factor() <= crate::LOAD_FACTOR);
        prop_assert!(
            is_doubling_of(sut.capacity(), base),
            "capacity {} is not {} doubled",
            sut.capacity(),
            base
        );
    }
    Ok(())
}

proptest! {
    #![proptest_config(ProptestConfig { cases: 64, .. ProptestConfig::default() })]
    #[test]
    fn prop_state_machine((capacity, pool, ops) in arb_scenario()) {
        let sut: ChainedHashMap<Key, i32> =
            ChainedHashMap::with_capacity(capacity).expect("positive capacity");
        run_scenario(sut, capacity, &pool, ops)?;
    }
}

// Collision variant using a constant hasher to stress equality resolution.
#[derive(Clone, Default)]
struct ConstBuildHasher;
struct ConstHasher;
impl BuildHasher for ConstBuildHasher {
    type Hasher = ConstHasher;
    fn build_hasher(&self) -> Self::Hasher {
        ConstHasher
    }
}
impl Hasher for ConstHasher {
    fn write(&mut self, _bytes: &[u8]) {}
    fn finish(&self) -> u64 {
        0
    }
}

// Same invariants under worst-case collisions: every entry shares slot 0,
// so only `Eq` tells keys apart.
proptest! {
    #![proptest_config(ProptestConfig { cases: 64, .. ProptestConfig::default() })]
    #[test]
    fn prop_state_machine_with_collisions((capacity, pool, ops) in arb_scenario()) {
        let sut: ChainedHashMap<Key, i32, ConstBuildHasher> =
            ChainedHashMap::with_capacity_and_hasher(capacity, ConstBuildHasher)
                .expect("positive capacity");
        run_scenario(sut, capacity, &pool, ops)?;
    }
}

//! SlotArray: the fixed-length array of collision chains.
//!
//! Buckets hold arena keys, not entries; the caller owns the arena and
//! supplies the cached hash of each entry. A slot array never changes
//! length. Growth builds a new one and the owner swaps it in.

use slotmap::DefaultKey;

/// Default number of slots for a new or cleared map.
pub const DEFAULT_CAPACITY: usize = 16;

/// Maximum ratio of entries to slots before growth.
pub const LOAD_FACTOR: f64 = 0.75;

// LOAD_FACTOR as an exact fraction for integer comparisons.
const LOAD_NUM: u128 = 3;
const LOAD_DEN: u128 = 4;

/// Chain of entries colliding on one slot, in append order.
pub(crate) type Bucket = Vec<DefaultKey>;

#[derive(Clone, Debug)]
pub(crate) struct SlotArray {
    buckets: Vec<Bucket>,
}

/// True when inserting one more entry into `count` entries would push the
/// load above `LOAD_FACTOR`.
#[inline]
pub(crate) fn needs_growth(count: usize, capacity: usize) -> bool {
    (count as u128 + 1) * LOAD_DEN > capacity as u128 * LOAD_NUM
}

impl SlotArray {
    pub(crate) fn with_capacity(capacity: usize) -> Self {
        debug_assert!(capacity > 0, "slot array needs at least one slot");
        Self {
            buckets: (0..capacity).map(|_| Bucket::new()).collect(),
        }
    }

    #[inline]
    pub(crate) fn capacity(&self) -> usize {
        self.buckets.len()
    }

    /// `hash mod capacity`. The hash is unsigned so no sign fixup is needed.
    #[inline]
    pub(crate) fn index_for(&self, hash: u64) -> usize {
        (hash % self.buckets.len() as u64) as usize
    }

    #[inline]
    pub(crate) fn bucket(&self, hash: u64) -> &Bucket {
        &self.buckets[self.index_for(hash)]
    }

    /// Append `key` to the chain for `hash`. Does not check for duplicates.
    pub(crate) fn place(&mut self, hash: u64, key: DefaultKey) {
        let idx = self.index_for(hash);
        self.buckets[idx].push(key);
    }

    /// Remove `key` from the chain for `hash`, keeping the order of the
    /// remaining entries. Returns false if it was not linked there.
    pub(crate) fn unlink(&mut self, hash: u64, key: DefaultKey) -> bool {
        let idx = self.index_for(hash);
        let bucket = &mut self.buckets[idx];
        match bucket.iter().position(|&k| k == key) {
            Some(pos) => {
                bucket.remove(pos);
                true
            }
            None => false,
        }
    }

    /// Build a slot array with twice the capacity holding the same keys.
    /// Keys are visited in enumeration order and re-placed with `place`,
    /// so entries sharing a new slot keep their relative order.
    pub(crate) fn grown<F>(&self, hash_of: F) -> SlotArray
    where
        F: Fn(DefaultKey) -> u64,
    {
        let mut next = SlotArray::with_capacity(self.capacity() * 2);
        for &key in self.keys() {
            next.place(hash_of(key), key);
        }
        next
    }

    pub(crate) fn buckets(&self) -> &[Bucket] {
        &self.buckets
    }

    /// Arena keys in slot-ascending, then append, order.
    pub(crate) fn keys(&self) -> impl Iterator<Item = &DefaultKey> + '_ {
        self.buckets.iter().flatten()
    }

    pub(crate) fn into_buckets(self) -> Vec<Bucket> {
        self.buckets
    }

    pub(crate) fn occupied(&self) -> usize {
        self.buckets.iter().map(Vec::len).sum()
    }
}

impl Default for SlotArray {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }
}

//! Entry: one key/value pair owned by the map.

use core::fmt;
use core::hash::{BuildHasher, Hash, Hasher};

/// A key/value pair stored in a `ChainedHashMap`.
///
/// The key is fixed for the life of the entry; the value may be replaced or
/// mutated in place. The hash of the key is computed once on insertion and
/// cached, so growth never calls back into `K: Hash`.
#[derive(Clone, Debug)]
pub struct Entry<K, V> {
    pub(crate) key: K,
    pub(crate) value: V,
    pub(crate) hash: u64,
}

impl<K, V> Entry<K, V> {
    pub(crate) fn new(key: K, value: V, hash: u64) -> Self {
        Self { key, value, hash }
    }

    pub fn key(&self) -> &K {
        &self.key
    }

    pub fn value(&self) -> &V {
        &self.value
    }

    pub fn value_mut(&mut self) -> &mut V {
        &mut self.value
    }

    /// Replace the value, returning the previous one.
    pub fn replace_value(&mut self, value: V) -> V {
        core::mem::replace(&mut self.value, value)
    }

    pub fn into_pair(self) -> (K, V) {
        (self.key, self.value)
    }

    /// Hash of this entry as a whole: the key's and the value's hashes
    /// combined order-sensitively. Unrelated to slot indexing.
    pub fn combined_hash<S>(&self, hasher: &S) -> u64
    where
        K: Hash,
        V: Hash,
        S: BuildHasher,
    {
        combine_hashes(hasher.hash_one(&self.key), hasher.hash_one(&self.value))
    }
}

/// `(h1 * 33) ^ h2`; swapping the arguments changes the result.
#[inline]
pub(crate) fn combine_hashes(h1: u64, h2: u64) -> u64 {
    (h1 << 5).wrapping_add(h1) ^ h2
}

// Equality is over key and value; the cached hash is derived from the key
// and never participates.
impl<K: PartialEq, V: PartialEq> PartialEq for Entry<K, V> {
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key && self.value == other.value
    }
}

impl<K: Eq, V: Eq> Eq for Entry<K, V> {}

impl<K: Hash, V: Hash> Hash for Entry<K, V> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.key.hash(state);
        self.value.hash(state);
    }
}

impl<K: fmt::Display, V: fmt::Display> fmt::Display for Entry<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, " [{} -> {}]", self.key, self.value)
    }
}

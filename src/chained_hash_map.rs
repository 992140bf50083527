//! ChainedHashMap: separate-chaining map over a generational entry arena.

use crate::entry::Entry;
use crate::error::{Error, Result};
use crate::iter::{Entries, IntoIter, Iter, IterMut, Keys, Values, ValuesMut};
use crate::slot_array::{needs_growth, SlotArray};
use core::borrow::Borrow;
use core::fmt;
use core::hash::{BuildHasher, Hash};
use core::ops::Index;
use hashbrown::hash_map::DefaultHashBuilder;
use log::trace;
use slotmap::{DefaultKey, SlotMap};

/// Stable reference to one entry of a `ChainedHashMap`.
///
/// Handles survive growth. After the entry is removed, or the map is
/// cleared, the handle no longer resolves, even if the arena slot is reused.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct Handle(DefaultKey);

impl Handle {
    pub fn key<'a, K, V, S>(&self, map: &'a ChainedHashMap<K, V, S>) -> Option<&'a K> {
        map.entries.get(self.0).map(Entry::key)
    }

    pub fn value<'a, K, V, S>(&self, map: &'a ChainedHashMap<K, V, S>) -> Option<&'a V> {
        map.entries.get(self.0).map(Entry::value)
    }

    pub fn value_mut<'a, K, V, S>(
        &self,
        map: &'a mut ChainedHashMap<K, V, S>,
    ) -> Option<&'a mut V> {
        map.entries.get_mut(self.0).map(Entry::value_mut)
    }
}

/// Hash map resolving collisions by chaining.
///
/// The slot array holds `capacity` buckets; an entry with hash `h` lives in
/// bucket `h % capacity`. Before an insertion that would push
/// `len / capacity` above [`LOAD_FACTOR`](crate::LOAD_FACTOR) the slot array
/// is rebuilt at twice the capacity. Capacity never shrinks except through
/// [`clear`](Self::clear).
#[derive(Clone)]
pub struct ChainedHashMap<K, V, S = DefaultHashBuilder> {
    hasher: S,
    slots: SlotArray,
    entries: SlotMap<DefaultKey, Entry<K, V>>,
}

impl<K, V> ChainedHashMap<K, V, DefaultHashBuilder> {
    /// Empty map with [`DEFAULT_CAPACITY`](crate::DEFAULT_CAPACITY) slots.
    pub fn new() -> Self {
        Self::with_hasher(DefaultHashBuilder::default())
    }

    /// Empty map with `capacity` slots. Fails if `capacity` is zero.
    pub fn with_capacity(capacity: usize) -> Result<Self> {
        Self::with_capacity_and_hasher(capacity, DefaultHashBuilder::default())
    }
}

impl<K, V, S: Default> Default for ChainedHashMap<K, V, S> {
    fn default() -> Self {
        Self::with_hasher(S::default())
    }
}

// Accessors that never hash.
impl<K, V, S> ChainedHashMap<K, V, S> {
    pub fn with_hasher(hasher: S) -> Self {
        Self {
            hasher,
            slots: SlotArray::default(),
            entries: SlotMap::with_key(),
        }
    }

    pub fn with_capacity_and_hasher(capacity: usize, hasher: S) -> Result<Self> {
        if capacity == 0 {
            return Err(Error::InvalidArgument(
                "capacity must be a positive integer".into(),
            ));
        }
        Ok(Self {
            hasher,
            slots: SlotArray::with_capacity(capacity),
            entries: SlotMap::with_key(),
        })
    }

    pub fn hasher(&self) -> &S {
        &self.hasher
    }

    /// Number of live entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of slots (buckets), not a bound on `len`.
    pub fn capacity(&self) -> usize {
        self.slots.capacity()
    }

    pub fn load_factor(&self) -> f64 {
        self.len() as f64 / self.capacity() as f64
    }

    /// Drop every entry and go back to a fresh slot array of the default
    /// capacity. Outstanding handles stop resolving.
    pub fn clear(&mut self) {
        trace!(
            "clearing chained map: {} entries, {} slots",
            self.entries.len(),
            self.slots.capacity()
        );
        self.slots = SlotArray::default();
        self.entries.clear();
    }

    /// Entries in slot order, then chain order.
    pub fn entries(&self) -> Entries<'_, K, V> {
        Entries::new(self.slots.buckets(), &self.entries)
    }

    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter {
            inner: self.entries(),
        }
    }

    pub fn iter_mut(&mut self) -> IterMut<'_, K, V> {
        IterMut::new(self.slots.buckets(), &mut self.entries)
    }

    pub fn keys(&self) -> Keys<'_, K, V> {
        Keys {
            inner: self.entries(),
        }
    }

    pub fn values(&self) -> Values<'_, K, V> {
        Values {
            inner: self.entries(),
        }
    }

    pub fn values_mut(&mut self) -> ValuesMut<'_, K, V> {
        ValuesMut {
            inner: self.iter_mut(),
        }
    }

    /// Remove the entry `handle` refers to, if it is still live.
    pub fn remove_handle(&mut self, handle: Handle) -> Option<(K, V)> {
        let entry = self.entries.remove(handle.0)?;
        let linked = self.slots.unlink(entry.hash, handle.0);
        debug_assert!(linked, "live entry missing from its bucket");
        Some(entry.into_pair())
    }

    /// Check every structural invariant, panicking on the first violation.
    #[cfg(test)]
    pub(crate) fn assert_invariants(&self) {
        assert_eq!(self.slots.occupied(), self.entries.len(), "count drift");
        for (idx, bucket) in self.slots.buckets().iter().enumerate() {
            for &k in bucket {
                let entry = self.entries.get(k).expect("bucket links a dead entry");
                assert_eq!(self.slots.index_for(entry.hash), idx, "misplaced entry");
            }
        }
        assert!(
            self.entries.len() as u128 * 4 <= self.slots.capacity() as u128 * 3,
            "load factor exceeded: {}/{}",
            self.entries.len(),
            self.slots.capacity()
        );
    }
}

impl<K, V, S> ChainedHashMap<K, V, S>
where
    K: Eq + Hash,
    S: BuildHasher,
{
    fn make_hash<Q>(&self, q: &Q) -> u64
    where
        Q: ?Sized + Hash,
    {
        self.hasher.hash_one(q)
    }

    /// Scan the bucket for `hash`; only key equality decides a match.
    fn locate<Q>(&self, hash: u64, q: &Q) -> Option<DefaultKey>
    where
        K: Borrow<Q>,
        Q: ?Sized + Eq,
    {
        self.slots.bucket(hash).iter().copied().find(|&k| {
            self.entries
                .get(k)
                .map(|e| e.hash == hash && e.key.borrow() == q)
                .unwrap_or(false)
        })
    }

    fn grow_if_needed(&mut self) {
        if needs_growth(self.entries.len(), self.slots.capacity()) {
            let entries = &self.entries;
            // Every linked key is live; indexing panics if that ever breaks.
            let next = self.slots.grown(|k| entries[k].hash);
            trace!(
                "growing chained map from {} to {} slots with {} entries",
                self.slots.capacity(),
                next.capacity(),
                entries.len()
            );
            self.slots = next;
        }
    }

    // Caller has established that `key` is absent.
    fn insert_new(&mut self, hash: u64, key: K, value: V) -> Handle {
        self.grow_if_needed();
        let k = self.entries.insert(Entry::new(key, value, hash));
        self.slots.place(hash, k);
        Handle(k)
    }

    /// Insert a new entry. Fails with [`Error::DuplicateKey`] if `key` is
    /// already present, in which case nothing changes, capacity included.
    pub fn add(&mut self, key: K, value: V) -> Result<Handle> {
        let hash = self.make_hash(&key);
        if self.locate(hash, &key).is_some() {
            return Err(Error::DuplicateKey);
        }
        Ok(self.insert_new(hash, key, value))
    }

    /// Insert, or overwrite the value of an existing entry in place.
    /// Returns `true` when a new entry was inserted.
    pub fn add_or_replace(&mut self, key: K, value: V) -> bool {
        let hash = self.make_hash(&key);
        if let Some(k) = self.locate(hash, &key) {
            if let Some(entry) = self.entries.get_mut(k) {
                entry.value = value;
                return false;
            }
        }
        self.insert_new(hash, key, value);
        true
    }

    /// Write-by-key; same as [`add_or_replace`](Self::add_or_replace).
    pub fn set(&mut self, key: K, value: V) {
        self.add_or_replace(key, value);
    }

    pub fn find<Q>(&self, q: &Q) -> Option<&Entry<K, V>>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let k = self.locate(self.make_hash(q), q)?;
        self.entries.get(k)
    }

    pub fn find_mut<Q>(&mut self, q: &Q) -> Option<&mut Entry<K, V>>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let k = self.locate(self.make_hash(q), q)?;
        self.entries.get_mut(k)
    }

    pub fn handle<Q>(&self, q: &Q) -> Option<Handle>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.locate(self.make_hash(q), q).map(Handle)
    }

    pub fn get<Q>(&self, q: &Q) -> Result<&V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.find(q).map(Entry::value).ok_or(Error::KeyNotFound)
    }

    pub fn get_mut<Q>(&mut self, q: &Q) -> Result<&mut V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.find_mut(q)
            .map(Entry::value_mut)
            .ok_or(Error::KeyNotFound)
    }

    /// `(true, value)` if present, `(false, V::default())` otherwise. The
    /// value is cloned out of the map.
    pub fn try_get<Q>(&self, q: &Q) -> (bool, V)
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
        V: Clone + Default,
    {
        match self.find(q) {
            Some(entry) => (true, entry.value.clone()),
            None => (false, V::default()),
        }
    }

    pub fn contains_key<Q>(&self, q: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.find(q).is_some()
    }

    /// Remove the entry for `q`. Returns `false` if there was none.
    pub fn remove<Q>(&mut self, q: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.remove_entry(q).is_some()
    }

    pub fn remove_entry<Q>(&mut self, q: &Q) -> Option<(K, V)>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let hash = self.make_hash(q);
        let k = self.locate(hash, q)?;
        let linked = self.slots.unlink(hash, k);
        debug_assert!(linked, "live entry missing from its bucket");
        self.entries.remove(k).map(Entry::into_pair)
    }
}

impl<K, Q, V, S> Index<&Q> for ChainedHashMap<K, V, S>
where
    K: Eq + Hash + Borrow<Q>,
    Q: ?Sized + Hash + Eq,
    S: BuildHasher,
{
    type Output = V;

    /// # Panics
    ///
    /// Panics if the key is not present.
    fn index(&self, key: &Q) -> &V {
        match self.get(key) {
            Ok(v) => v,
            Err(_) => panic!("key not found in ChainedHashMap"),
        }
    }
}

impl<K, V, S> fmt::Debug for ChainedHashMap<K, V, S>
where
    K: fmt::Debug,
    V: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<K, V, S> Extend<(K, V)> for ChainedHashMap<K, V, S>
where
    K: Eq + Hash,
    S: BuildHasher,
{
    fn extend<T: IntoIterator<Item = (K, V)>>(&mut self, iter: T) {
        for (k, v) in iter {
            self.add_or_replace(k, v);
        }
    }
}

impl<K, V, S> FromIterator<(K, V)> for ChainedHashMap<K, V, S>
where
    K: Eq + Hash,
    S: BuildHasher + Default,
{
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        let mut map = Self::default();
        map.extend(iter);
        map
    }
}

impl<'a, K, V, S> IntoIterator for &'a ChainedHashMap<K, V, S> {
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<'a, K, V, S> IntoIterator for &'a mut ChainedHashMap<K, V, S> {
    type Item = (&'a K, &'a mut V);
    type IntoIter = IterMut<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter_mut()
    }
}

impl<K, V, S> IntoIterator for ChainedHashMap<K, V, S> {
    type Item = (K, V);
    type IntoIter = IntoIter<K, V>;

    fn into_iter(self) -> Self::IntoIter {
        IntoIter::new(self.slots.into_buckets(), self.entries)
    }
}

//! Iterators over `ChainedHashMap`.
//!
//! All of them walk the slot array in ascending slot order and each chain in
//! append order, resolving arena keys as they go. A fresh call starts a
//! fresh traversal. No `unsafe`: `IterMut` splits borrows through the
//! arena's own `iter_mut`.

use crate::entry::Entry;
use crate::slot_array::Bucket;
use core::iter::{Flatten, FusedIterator};
use slotmap::{DefaultKey, SecondaryMap, SlotMap};

type Arena<K, V> = SlotMap<DefaultKey, Entry<K, V>>;

/// Iterator over `&Entry<K, V>`.
pub struct Entries<'a, K, V> {
    keys: Flatten<core::slice::Iter<'a, Bucket>>,
    entries: &'a Arena<K, V>,
    remaining: usize,
}

impl<'a, K, V> Entries<'a, K, V> {
    pub(crate) fn new(buckets: &'a [Bucket], entries: &'a Arena<K, V>) -> Self {
        Self {
            keys: buckets.iter().flatten(),
            remaining: entries.len(),
            entries,
        }
    }
}

impl<'a, K, V> Clone for Entries<'a, K, V> {
    fn clone(&self) -> Self {
        Self {
            keys: self.keys.clone(),
            entries: self.entries,
            remaining: self.remaining,
        }
    }
}

impl<'a, K, V> Iterator for Entries<'a, K, V> {
    type Item = &'a Entry<K, V>;
    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        let &k = self.keys.next()?;
        self.remaining -= 1;
        self.entries.get(k)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K, V> ExactSizeIterator for Entries<'_, K, V> {}
impl<K, V> FusedIterator for Entries<'_, K, V> {}

/// Iterator over `(&K, &V)`.
#[derive(Clone)]
pub struct Iter<'a, K, V> {
    pub(crate) inner: Entries<'a, K, V>,
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);
    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|e| (&e.key, &e.value))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V> ExactSizeIterator for Iter<'_, K, V> {}
impl<K, V> FusedIterator for Iter<'_, K, V> {}

/// Iterator over `(&K, &mut V)`.
///
/// The arena's own `iter_mut` splits the borrows; they are parked by arena
/// key and handed out as the slot array is walked.
pub struct IterMut<'a, K, V> {
    keys: Flatten<core::slice::Iter<'a, Bucket>>,
    by_key: SecondaryMap<DefaultKey, &'a mut Entry<K, V>>,
}

impl<'a, K, V> IterMut<'a, K, V> {
    pub(crate) fn new(buckets: &'a [Bucket], entries: &'a mut Arena<K, V>) -> Self {
        Self {
            keys: buckets.iter().flatten(),
            by_key: entries.iter_mut().collect(),
        }
    }
}

impl<'a, K, V> Iterator for IterMut<'a, K, V> {
    type Item = (&'a K, &'a mut V);
    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let &k = self.keys.next()?;
            if let Some(entry) = self.by_key.remove(k) {
                return Some((&entry.key, &mut entry.value));
            }
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.by_key.len(), Some(self.by_key.len()))
    }
}

impl<K, V> ExactSizeIterator for IterMut<'_, K, V> {}
impl<K, V> FusedIterator for IterMut<'_, K, V> {}

/// Iterator over keys.
#[derive(Clone)]
pub struct Keys<'a, K, V> {
    pub(crate) inner: Entries<'a, K, V>,
}

impl<'a, K, V> Iterator for Keys<'a, K, V> {
    type Item = &'a K;
    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(Entry::key)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V> ExactSizeIterator for Keys<'_, K, V> {}
impl<K, V> FusedIterator for Keys<'_, K, V> {}

/// Iterator over values.
#[derive(Clone)]
pub struct Values<'a, K, V> {
    pub(crate) inner: Entries<'a, K, V>,
}

impl<'a, K, V> Iterator for Values<'a, K, V> {
    type Item = &'a V;
    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(Entry::value)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V> ExactSizeIterator for Values<'_, K, V> {}
impl<K, V> FusedIterator for Values<'_, K, V> {}

/// Iterator over mutable values.
pub struct ValuesMut<'a, K, V> {
    pub(crate) inner: IterMut<'a, K, V>,
}

impl<'a, K, V> Iterator for ValuesMut<'a, K, V> {
    type Item = &'a mut V;
    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(_, v)| v)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V> ExactSizeIterator for ValuesMut<'_, K, V> {}
impl<K, V> FusedIterator for ValuesMut<'_, K, V> {}

/// Owning iterator; drains the map in enumeration order.
pub struct IntoIter<K, V> {
    keys: Flatten<std::vec::IntoIter<Bucket>>,
    entries: Arena<K, V>,
}

impl<K, V> IntoIter<K, V> {
    pub(crate) fn new(buckets: Vec<Bucket>, entries: Arena<K, V>) -> Self {
        Self {
            keys: buckets.into_iter().flatten(),
            entries,
        }
    }
}

impl<K, V> Iterator for IntoIter<K, V> {
    type Item = (K, V);
    fn next(&mut self) -> Option<Self::Item> {
        let k = self.keys.next()?;
        self.entries.remove(k).map(Entry::into_pair)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.entries.len(), Some(self.entries.len()))
    }
}

impl<K, V> ExactSizeIterator for IntoIter<K, V> {}
impl<K, V> FusedIterator for IntoIter<K, V> {}

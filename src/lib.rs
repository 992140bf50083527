//! chained-hashmap: a single-threaded hash map that resolves collisions by
//! separate chaining and grows its slot array by doubling.
//!
//! Internal Design:
//!
//! Summary
//! - Goal: a small, fully checkable hash table whose growth policy and
//!   collision handling are explicit rather than hidden behind a probing
//!   scheme.
//! - Layers:
//!   - Entry<K, V>: one key/value pair plus the cached hash of its key.
//!   - SlotArray: fixed-length vector of buckets; each bucket is the chain
//!     of arena keys whose hash maps to that slot. Knows nothing about
//!     keys or values.
//!   - ChainedHashMap<K, V, S>: owns the hasher, the slot array, and a
//!     generational arena (`slotmap`) holding the entries. Public API.
//!
//! Indexing
//! - `slot = hash(key) % capacity` on the 64-bit hash. Equal hashes are
//!   only a hint; a bucket match requires `K: Eq`. A hasher that sends
//!   every key to one slot degrades to linear scans but stays correct.
//!
//! Growth
//! - Before an insertion, if `(len + 1) / capacity > LOAD_FACTOR` the map
//!   builds a second slot array of twice the capacity, re-places every arena
//!   key with the same routine insertion uses, and swaps it in. Entries do
//!   not move in the arena, so `Handle`s survive growth.
//! - No shrink path: removal never reduces capacity. `clear()` resets to
//!   `DEFAULT_CAPACITY`.
//!
//! Hasher and rehashing invariants
//! - Each entry stores its `u64` hash, and growth uses the stored hash;
//!   `K: Hash` is never invoked after insertion.
//!
//! Ownership
//! - The map owns every entry. `find`/`get` hand out borrows, so writes
//!   through `get_mut`/`find_mut`/`iter_mut` are visible in the map.
//!   `try_get` clones because its miss case returns an owned default.
//! - Handles are generational: after `remove`/`clear` they resolve to
//!   `None` rather than to whatever reuses the arena slot.
//!
//! Notes and non-goals
//! - Single-threaded; no internal locking.
//! - Iteration order is slot order then append order, never insertion
//!   order.

mod chained_hash_map;
mod chained_hash_map_proptest;
mod entry;
mod error;
pub mod iter;
mod slot_array;

// Public surface
pub use chained_hash_map::{ChainedHashMap, Handle};
pub use entry::Entry;
pub use error::{Error, Result};
pub use slot_array::{DEFAULT_CAPACITY, LOAD_FACTOR};

//! KeyTable: structural layer mapping `HashKey`s to stored values.
//!
//! Entries live directly in a `hashbrown::HashTable`, each carrying the
//! `HashKey` it was stored under. The table hash is derived from that key
//! with the configured `BuildHasher`, so rehashing never calls user code:
//! keys are plain integers compared by value.

use crate::HashKey;
use hashbrown::hash_table;
use hashbrown::HashTable;
use std::collections::hash_map::RandomState;
use std::hash::BuildHasher;

#[derive(Clone, Debug)]
struct Entry<V> {
    key: HashKey,
    value: V,
}

#[derive(Clone)]
pub(crate) struct KeyTable<V, S = RandomState> {
    hasher: S,
    table: HashTable<Entry<V>>,
}

impl<V> KeyTable<V> {
    pub fn new() -> Self {
        Self::with_capacity_and_hasher(0, RandomState::new())
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self::with_capacity_and_hasher(capacity, RandomState::new())
    }
}

/// Iterator over `(HashKey, &V)` pairs in table order.
pub(crate) struct Iter<'a, V> {
    it: hash_table::Iter<'a, Entry<V>>,
}

impl<'a, V> Iterator for Iter<'a, V> {
    type Item = (HashKey, &'a V);
    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.it.next().map(|e| (e.key, &e.value))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.it.size_hint()
    }
}

impl<'a, V> ExactSizeIterator for Iter<'a, V> {}

/// Owning iterator over stored values.
pub(crate) struct IntoValues<V> {
    it: hash_table::IntoIter<Entry<V>>,
}

impl<V> Iterator for IntoValues<V> {
    type Item = V;
    #[inline]
    fn next(&mut self) -> Option<V> {
        self.it.next().map(|e| e.value)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.it.size_hint()
    }
}

impl<V> ExactSizeIterator for IntoValues<V> {}

impl<V, S> KeyTable<V, S>
where
    S: BuildHasher,
{
    pub fn with_capacity_and_hasher(capacity: usize, hasher: S) -> Self {
        Self {
            hasher,
            table: HashTable::with_capacity(capacity),
        }
    }

    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    pub fn contains_key(&self, key: HashKey) -> bool {
        self.get(key).is_some()
    }

    pub fn get(&self, key: HashKey) -> Option<&V> {
        let hash = self.hasher.hash_one(key);
        self.table
            .find(hash, |e| e.key == key)
            .map(|e| &e.value)
    }

    /// Inserts `value` under `key` unless the key is taken. On a taken key
    /// the value is handed back untouched.
    pub fn insert_unique(&mut self, key: HashKey, value: V) -> Result<(), V> {
        let hasher = &self.hasher;
        let hash = hasher.hash_one(key);
        match self
            .table
            .entry(hash, |e| e.key == key, |e| hasher.hash_one(e.key))
        {
            hash_table::Entry::Occupied(_) => Err(value),
            hash_table::Entry::Vacant(v) => {
                let _ = v.insert(Entry { key, value });
                Ok(())
            }
        }
    }

    /// Writes `value` under `key`, returning the value it replaced.
    pub fn upsert(&mut self, key: HashKey, value: V) -> Option<V> {
        let hasher = &self.hasher;
        let hash = hasher.hash_one(key);
        match self
            .table
            .entry(hash, |e| e.key == key, |e| hasher.hash_one(e.key))
        {
            hash_table::Entry::Occupied(o) => {
                Some(core::mem::replace(&mut o.into_mut().value, value))
            }
            hash_table::Entry::Vacant(v) => {
                let _ = v.insert(Entry { key, value });
                None
            }
        }
    }

    pub fn remove(&mut self, key: HashKey) -> Option<V> {
        let hash = self.hasher.hash_one(key);
        let found = self.table.find_entry(hash, |e| e.key == key).ok()?;
        let (entry, _) = found.remove();
        Some(entry.value)
    }

    pub fn clear(&mut self) {
        self.table.clear();
    }

    pub fn iter(&self) -> Iter<'_, V> {
        Iter {
            it: self.table.iter(),
        }
    }

    pub fn into_values(self) -> IntoValues<V> {
        IntoValues {
            it: self.table.into_iter(),
        }
    }
}

//! HashList: a list-shaped collection whose "index" is the element's hash key.

use crate::error::{HashListError, Result};
use crate::key_table::{self, KeyTable};
use crate::strategy::{IdentityHash, KeyStrategy};
use crate::HashKey;
use core::fmt;
use core::ops::Index;

/// Returned by [`HashList::index_of`] when the element is not stored.
///
/// `-1` is also a valid hash key; callers that must tell the two apart use
/// [`HashList::contains`] or [`HashList::key_of`].
pub const NOT_FOUND: HashKey = -1;

/// A collection of unique elements addressed by their hash keys.
///
/// Each element is stored under the `HashKey` its strategy `H` computes for
/// it at insertion time. The key doubles as the element's "index": `get`,
/// `remove_at` and `index_of` all speak in keys, never in positions, and
/// there is no way to address the n-th inserted element.
///
/// Keys are not recomputed after insertion. The public API only hands out
/// shared references, but an element with interior mutability can still
/// change its hash while stored; its entry then stays under the old key.
/// Use [`HashList::rekey`] after such a change.
///
/// Iteration order is unspecified and may change between mutations.
pub struct HashList<T, H = IdentityHash> {
    entries: KeyTable<T>,
    strategy: H,
}

impl<T> HashList<T>
where
    IdentityHash: KeyStrategy<T>,
{
    pub fn new() -> Self {
        Self::with_strategy(IdentityHash::new())
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self::with_capacity_and_strategy(capacity, IdentityHash::new())
    }

    /// Builds a list from `elements`, failing on the first element whose key
    /// is already taken.
    pub fn from_elements<I>(elements: I) -> Result<Self>
    where
        I: IntoIterator<Item = T>,
    {
        Self::from_elements_with(elements, IdentityHash::new())
    }
}

impl<T, H> Default for HashList<T, H>
where
    H: KeyStrategy<T> + Default,
{
    fn default() -> Self {
        Self::with_strategy(H::default())
    }
}

impl<T, H> HashList<T, H>
where
    H: KeyStrategy<T>,
{
    pub fn with_strategy(strategy: H) -> Self {
        Self {
            entries: KeyTable::new(),
            strategy,
        }
    }

    pub fn with_capacity_and_strategy(capacity: usize, strategy: H) -> Self {
        Self {
            entries: KeyTable::with_capacity(capacity),
            strategy,
        }
    }

    pub fn from_elements_with<I>(elements: I, strategy: H) -> Result<Self>
    where
        I: IntoIterator<Item = T>,
    {
        let mut list = Self::with_strategy(strategy);
        list.try_extend(elements)?;
        Ok(list)
    }

    pub fn strategy(&self) -> &H {
        &self.strategy
    }

    pub fn count(&self) -> usize {
        self.entries.len()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The key `element` has (or would have) in this list.
    pub fn key_of(&self, element: &T) -> Result<HashKey> {
        self.strategy.key(element)
    }

    /// Stores `element` under its key and returns the key.
    ///
    /// Fails with `DuplicateKey` when the key is taken, whether by an equal
    /// element or by a colliding one. The list is unchanged on failure.
    pub fn add(&mut self, element: T) -> Result<HashKey> {
        let key = self.strategy.key(&element)?;
        match self.entries.insert_unique(key, element) {
            Ok(()) => {
                tracing::trace!(key, "element added");
                Ok(key)
            }
            Err(_rejected) => {
                tracing::debug!(key, "add rejected: hash key already present");
                Err(HashListError::DuplicateKey(key))
            }
        }
    }

    /// Adds every element in order, stopping at the first failure. Elements
    /// added before the failure stay in the list.
    pub fn try_extend<I>(&mut self, elements: I) -> Result<()>
    where
        I: IntoIterator<Item = T>,
    {
        for element in elements {
            self.add(element)?;
        }
        Ok(())
    }

    pub fn get(&self, key: HashKey) -> Result<&T> {
        self.entries
            .get(key)
            .ok_or(HashListError::KeyNotFound(key))
    }

    /// Writes `element` under `key` unconditionally and returns the element
    /// it replaced.
    ///
    /// `key` is not checked against the element's own key. After a `set`
    /// with a mismatched key, `contains(&element)` may be false while
    /// `get(key)` returns it; keeping the two in step is up to the caller.
    pub fn set(&mut self, key: HashKey, element: T) -> Option<T> {
        let previous = self.entries.upsert(key, element);
        tracing::trace!(key, replaced = previous.is_some(), "element set");
        previous
    }

    /// Whether an entry exists under `element`'s key. Fails only when the
    /// strategy cannot key the element.
    pub fn contains(&self, element: &T) -> Result<bool> {
        let key = self.strategy.key(element)?;
        Ok(self.entries.contains_key(key))
    }

    /// The key of `element` if an entry exists under it, else [`NOT_FOUND`].
    ///
    /// The result is a hash key, not a position.
    pub fn index_of(&self, element: &T) -> Result<HashKey> {
        let key = self.strategy.key(element)?;
        if self.entries.contains_key(key) {
            Ok(key)
        } else {
            Ok(NOT_FOUND)
        }
    }

    /// Removes the entry under `element`'s key. Returns whether one existed.
    pub fn remove(&mut self, element: &T) -> Result<bool> {
        let key = self.strategy.key(element)?;
        let removed = self.entries.remove(key).is_some();
        if removed {
            tracing::trace!(key, "element removed");
        }
        Ok(removed)
    }

    /// Removes and returns the element stored under `key`.
    pub fn remove_at(&mut self, key: HashKey) -> Result<T> {
        let element = self
            .entries
            .remove(key)
            .ok_or(HashListError::KeyNotFound(key))?;
        tracing::trace!(key, "element removed");
        Ok(element)
    }

    /// Positional insertion has no meaning when the index is a hash key;
    /// this always fails with `UnsupportedOperation` and drops `element`.
    pub fn insert_at(&mut self, key: HashKey, element: T) -> Result<()> {
        drop(element);
        tracing::debug!(key, "insert_at rejected");
        Err(HashListError::UnsupportedOperation(
            "inserting by index is not supported by HashList",
        ))
    }

    /// Moves the element stored under `key` to its freshly computed key and
    /// returns that key.
    ///
    /// Fails with `KeyNotFound` if nothing is stored under `key`, and with
    /// `DuplicateKey` if the new key belongs to another entry; the list is
    /// unchanged on failure.
    pub fn rekey(&mut self, key: HashKey) -> Result<HashKey> {
        let element = self.get(key)?;
        let fresh = self.strategy.key(element)?;
        if fresh == key {
            return Ok(key);
        }
        if self.entries.contains_key(fresh) {
            return Err(HashListError::DuplicateKey(fresh));
        }
        let element = self.remove_at(key)?;
        self.entries
            .insert_unique(fresh, element)
            .map_err(|_| HashListError::DuplicateKey(fresh))?;
        tracing::trace!(from = key, to = fresh, "element rekeyed");
        Ok(fresh)
    }
}

impl<T, H> HashList<T, H> {
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Iterates stored elements in unspecified order.
    pub fn iter(&self) -> Iter<'_, T> {
        Iter {
            inner: self.entries.iter(),
        }
    }

    pub fn keys(&self) -> Keys<'_, T> {
        Keys {
            inner: self.entries.iter(),
        }
    }

    /// Iterates `(key, element)` pairs in unspecified order.
    pub fn entries(&self) -> Entries<'_, T> {
        Entries {
            inner: self.entries.iter(),
        }
    }

    /// Clones every element into `buffer` starting at `offset`.
    ///
    /// Fails with `InvalidArgument` when `offset` is negative, past the end
    /// of `buffer`, or leaves fewer than `count()` slots. Nothing is written
    /// on failure.
    pub fn copy_to(&self, buffer: &mut [T], offset: isize) -> Result<()>
    where
        T: Clone,
    {
        let start = usize::try_from(offset).map_err(|_| HashListError::InvalidArgument {
            name: "offset",
            reason: "must not be negative",
        })?;
        if start > buffer.len() {
            return Err(HashListError::InvalidArgument {
                name: "offset",
                reason: "is past the end of the buffer",
            });
        }
        if buffer.len() - start < self.entries.len() {
            return Err(HashListError::InvalidArgument {
                name: "buffer",
                reason: "is too small for the elements",
            });
        }
        for (slot, element) in buffer[start..].iter_mut().zip(self.iter()) {
            slot.clone_from(element);
        }
        Ok(())
    }

    pub fn to_vec(&self) -> Vec<T>
    where
        T: Clone,
    {
        self.iter().cloned().collect()
    }
}

/// Panicking key lookup, mirroring `HashMap`'s `Index`.
///
/// # Panics
///
/// Panics if no element is stored under `key`.
impl<T, H> Index<HashKey> for HashList<T, H>
where
    H: KeyStrategy<T>,
{
    type Output = T;

    fn index(&self, key: HashKey) -> &T {
        match self.get(key) {
            Ok(element) => element,
            Err(e) => panic!("{e}"),
        }
    }
}

impl<T: Clone, H: Clone> Clone for HashList<T, H> {
    fn clone(&self) -> Self {
        Self {
            entries: self.entries.clone(),
            strategy: self.strategy.clone(),
        }
    }
}

impl<T: fmt::Debug, H> fmt::Debug for HashList<T, H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.entries.iter()).finish()
    }
}

/// Iterator over stored elements. Each call to [`HashList::iter`] starts a
/// fresh pass; mutating the list while one is alive is rejected by the
/// borrow checker.
pub struct Iter<'a, T> {
    inner: key_table::Iter<'a, T>,
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;
    #[inline]
    fn next(&mut self) -> Option<&'a T> {
        self.inner.next().map(|(_, v)| v)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<'a, T> ExactSizeIterator for Iter<'a, T> {}

pub struct Keys<'a, T> {
    inner: key_table::Iter<'a, T>,
}

impl<'a, T> Iterator for Keys<'a, T> {
    type Item = HashKey;
    #[inline]
    fn next(&mut self) -> Option<HashKey> {
        self.inner.next().map(|(k, _)| k)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<'a, T> ExactSizeIterator for Keys<'a, T> {}

pub struct Entries<'a, T> {
    inner: key_table::Iter<'a, T>,
}

impl<'a, T> Iterator for Entries<'a, T> {
    type Item = (HashKey, &'a T);
    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<'a, T> ExactSizeIterator for Entries<'a, T> {}

/// Owning iterator returned by `HashList::into_iter`.
pub struct IntoIter<T> {
    inner: key_table::IntoValues<T>,
}

impl<T> Iterator for IntoIter<T> {
    type Item = T;
    #[inline]
    fn next(&mut self) -> Option<T> {
        self.inner.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<T> ExactSizeIterator for IntoIter<T> {}

impl<'a, T, H> IntoIterator for &'a HashList<T, H> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;
    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<T, H> IntoIterator for HashList<T, H> {
    type Item = T;
    type IntoIter = IntoIter<T>;
    fn into_iter(self) -> Self::IntoIter {
        IntoIter {
            inner: self.entries.into_values(),
        }
    }
}

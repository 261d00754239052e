//! Key strategies: how an element turns into its `HashKey`.

use crate::error::{HashListError, Result};
use crate::HashKey;
use std::collections::hash_map::DefaultHasher;
use std::hash::{BuildHasher, BuildHasherDefault, Hash};

/// Derives the `HashKey` of an element.
///
/// Implementations must be deterministic for a given strategy value: equal
/// elements map to equal keys. Distinct elements may collide; `HashList`
/// rejects the second one rather than merging them.
pub trait KeyStrategy<T: ?Sized> {
    fn key(&self, element: &T) -> Result<HashKey>;
}

/// Zero-seeded SipHash builder. Keys built with it are identical across
/// collection instances and runs of the same build.
pub type FixedState = BuildHasherDefault<DefaultHasher>;

/// Keys an element by its own `Hash` implementation.
#[derive(Clone, Debug, Default)]
pub struct IdentityHash<S = FixedState> {
    hasher: S,
}

impl IdentityHash {
    pub fn new() -> Self {
        Self::with_hasher(FixedState::default())
    }
}

impl<S> IdentityHash<S> {
    /// Uses `hasher` for every element. A randomized builder such as
    /// `RandomState` makes keys differ between strategy values.
    pub const fn with_hasher(hasher: S) -> Self {
        Self { hasher }
    }

    pub fn hasher(&self) -> &S {
        &self.hasher
    }
}

impl<T, S> KeyStrategy<T> for IdentityHash<S>
where
    T: ?Sized + Hash,
    S: BuildHasher,
{
    #[inline]
    fn key(&self, element: &T) -> Result<HashKey> {
        Ok(fold_u64(self.hasher.hash_one(element)))
    }
}

/// Keeps the low 32 bits of a 64-bit hash.
#[inline]
pub(crate) fn fold_u64(hash: u64) -> HashKey {
    hash as u32 as HashKey
}

/// Strategy for optional elements: `Some(v)` is keyed by the inner strategy,
/// `None` has no key and fails with `InvalidElement`.
#[derive(Clone, Debug, Default)]
pub struct PresentOnly<K> {
    inner: K,
}

impl<K> PresentOnly<K> {
    pub const fn new(inner: K) -> Self {
        Self { inner }
    }

    pub fn inner(&self) -> &K {
        &self.inner
    }
}

impl<T, K> KeyStrategy<Option<T>> for PresentOnly<K>
where
    K: KeyStrategy<T>,
{
    fn key(&self, element: &Option<T>) -> Result<HashKey> {
        match element {
            Some(v) => self.inner.key(v),
            None => Err(HashListError::InvalidElement("absent element has no hash key")),
        }
    }
}

//! hash-list: a list-shaped collection that stores unique elements under a
//! hash of their content instead of a position.
//!
//! Internal Design:
//!
//! Summary
//! - Goal: set-like uniqueness with list-style enumeration and bulk
//!   operations, where the "index" of an element is its 32-bit hash key.
//! - Layers:
//!   - KeyTable<V, S>: structural storage. A `hashbrown::HashTable` of
//!     entries keyed by `HashKey`. Never calls user code; keys are plain
//!     integers.
//!   - KeyStrategy<T>: turns an element into its `HashKey`. Two strategies
//!     ship with the crate:
//!     - IdentityHash<S>: the element's own `Hash`, fed through a
//!       `BuildHasher` (zero-seeded SipHash by default), low 32 bits kept.
//!     - ContentHash: canonical JSON via serde, SHA-512, first four digest
//!       bytes little-endian. Behind the `content-hash` feature.
//!   - HashList<T, H>: public API. Computes the key with `H`, then performs
//!     exactly one map access or mutation.
//!
//! Constraints
//! - Unique keys: `add` of an element whose key is taken fails with
//!   `DuplicateKey`, whether the occupant is equal or merely collides.
//! - Keys are computed once, at insertion. `set` writes under a caller
//!   chosen key without checking it.
//! - No positional access. `get`, `remove_at` and `index_of` take or return
//!   hash keys; `insert_at` is always `UnsupportedOperation`.
//! - Iteration order is unspecified.
//! - Every failure is reported before the collection is touched.
//!
//! Key drift
//! - Stored elements are only reachable through `&T`; there is no
//!   `get_mut`/`iter_mut`. An element with interior mutability can still
//!   change its hash after insertion. Its entry stays under the old key
//!   until `rekey` moves it.
//!
//! Concurrency
//! - No internal locking. All mutators take `&mut self`; sharing across
//!   threads needs an external lock.

mod error;
mod hash_list;
mod hash_list_proptest;
mod key_table;
pub mod strategy;

#[cfg(feature = "content-hash")]
pub mod content;

/// The 32-bit key an element is stored under; also its public "index".
pub type HashKey = i32;

// Public surface
pub use error::{HashListError, Result};
pub use hash_list::{Entries, HashList, IntoIter, Iter, Keys, NOT_FOUND};
pub use strategy::{FixedState, IdentityHash, KeyStrategy, PresentOnly};

#[cfg(feature = "content-hash")]
pub use content::ContentHash;

/// A `HashList` keyed by the SHA-512 digest of each element's canonical JSON.
#[cfg(feature = "content-hash")]
pub type ContentHashList<T> = HashList<T, ContentHash>;

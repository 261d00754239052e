//! Error type shared by every `HashList` operation.

use crate::HashKey;

/// Failures reported by `HashList` and its key strategies.
///
/// Every error is raised before the collection is touched, so a failed
/// call leaves the collection exactly as it was.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum HashListError {
    /// An entry already occupies the key computed for the element. The
    /// occupant may be equal to the element or merely collide with it.
    #[error("an element with hash key {0} already exists")]
    DuplicateKey(HashKey),

    #[error("no element stored under hash key {0}")]
    KeyNotFound(HashKey),

    /// Malformed `copy_to` parameters.
    #[error("invalid argument `{name}`: {reason}")]
    InvalidArgument {
        name: &'static str,
        reason: &'static str,
    },

    #[error("unsupported operation: {0}")]
    UnsupportedOperation(&'static str),

    /// The content strategy could not canonicalize the element.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// The element is in a state where no key is defined for it.
    #[error("invalid element: {0}")]
    InvalidElement(&'static str),
}

pub type Result<T> = core::result::Result<T, HashListError>;

//! Content hashing: canonical JSON, SHA-512, folded to a `HashKey`.
//!
//! Elements are first converted to a `serde_json::Value`. Objects in a
//! `Value` keep their keys sorted, so a `HashMap` field encodes the same way
//! regardless of its iteration order. The encoded bytes are digested with
//! SHA-512 and the first four digest bytes, read little-endian, form the key.
//!
//! Keys depend only on the element's serialized form (and the optional
//! domain tag), so they are stable across collection instances, processes
//! and builds. Enabling `serde_json/preserve_order` anywhere in the
//! dependency graph disables key sorting and with it map canonicalization.

use crate::error::{HashListError, Result};
use crate::strategy::KeyStrategy;
use crate::HashKey;
use core::fmt;
use serde::ser::{self, Serialize, Serializer};
use sha2::{Digest, Sha512};

/// Length in bytes of a SHA-512 digest.
pub const DIGEST_LEN: usize = 64;

/// Keys elements by a SHA-512 digest of their canonical JSON encoding.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ContentHash {
    domain: Option<&'static str>,
}

impl ContentHash {
    pub const fn new() -> Self {
        Self { domain: None }
    }

    /// Prefixes every digest input with `"{domain}:"`. Equal elements hashed
    /// under different domains get unrelated keys.
    pub const fn with_domain(domain: &'static str) -> Self {
        Self {
            domain: Some(domain),
        }
    }

    pub fn domain(&self) -> Option<&'static str> {
        self.domain
    }

    /// Canonical byte encoding of `value`.
    ///
    /// Fails on non-finite floats: JSON has no encoding for them and
    /// `serde_json` would otherwise write `null`, merging them with `None`.
    pub fn canonical_bytes<T>(value: &T) -> Result<Vec<u8>>
    where
        T: ?Sized + Serialize,
    {
        value.serialize(FiniteCheck).map_err(|e| {
            tracing::debug!(error = %e, "element has no canonical encoding");
            HashListError::Serialization(e.0)
        })?;
        let tree = serde_json::to_value(value).map_err(serialization_error)?;
        serde_json::to_vec(&tree).map_err(serialization_error)
    }

    /// SHA-512 of `bytes`, domain-separated when a domain is set.
    pub fn digest(&self, bytes: &[u8]) -> [u8; DIGEST_LEN] {
        let mut hasher = Sha512::new();
        if let Some(domain) = self.domain {
            hasher.update(domain.as_bytes());
            hasher.update(b":");
        }
        hasher.update(bytes);
        let mut out = [0u8; DIGEST_LEN];
        out.copy_from_slice(&hasher.finalize());
        out
    }
}

impl<T> KeyStrategy<T> for ContentHash
where
    T: ?Sized + Serialize,
{
    fn key(&self, element: &T) -> Result<HashKey> {
        let bytes = Self::canonical_bytes(element)?;
        Ok(fold_digest(&self.digest(&bytes)))
    }
}

fn fold_digest(digest: &[u8; DIGEST_LEN]) -> HashKey {
    HashKey::from_le_bytes([digest[0], digest[1], digest[2], digest[3]])
}

/// Error raised by `FiniteCheck`.
#[derive(Debug)]
struct NonCanonical(String);

impl fmt::Display for NonCanonical {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::error::Error for NonCanonical {}

impl ser::Error for NonCanonical {
    fn custom<M: fmt::Display>(msg: M) -> Self {
        NonCanonical(msg.to_string())
    }
}

/// Serializer that produces nothing and only walks the value, rejecting
/// floats without a JSON encoding. Everything else is left to `serde_json`.
#[derive(Clone, Copy)]
struct FiniteCheck;

type Check = core::result::Result<(), NonCanonical>;

fn check_float(v: f64) -> Check {
    if v.is_finite() {
        Ok(())
    } else {
        Err(NonCanonical(format!(
            "non-finite float {v} has no canonical encoding"
        )))
    }
}

impl Serializer for FiniteCheck {
    type Ok = ();
    type Error = NonCanonical;
    type SerializeSeq = Self;
    type SerializeTuple = Self;
    type SerializeTupleStruct = Self;
    type SerializeTupleVariant = Self;
    type SerializeMap = Self;
    type SerializeStruct = Self;
    type SerializeStructVariant = Self;

    fn serialize_bool(self, _v: bool) -> Check {
        Ok(())
    }
    fn serialize_i8(self, _v: i8) -> Check {
        Ok(())
    }
    fn serialize_i16(self, _v: i16) -> Check {
        Ok(())
    }
    fn serialize_i32(self, _v: i32) -> Check {
        Ok(())
    }
    fn serialize_i64(self, _v: i64) -> Check {
        Ok(())
    }
    fn serialize_i128(self, _v: i128) -> Check {
        Ok(())
    }
    fn serialize_u8(self, _v: u8) -> Check {
        Ok(())
    }
    fn serialize_u16(self, _v: u16) -> Check {
        Ok(())
    }
    fn serialize_u32(self, _v: u32) -> Check {
        Ok(())
    }
    fn serialize_u64(self, _v: u64) -> Check {
        Ok(())
    }
    fn serialize_u128(self, _v: u128) -> Check {
        Ok(())
    }
    fn serialize_f32(self, v: f32) -> Check {
        check_float(f64::from(v))
    }
    fn serialize_f64(self, v: f64) -> Check {
        check_float(v)
    }
    fn serialize_char(self, _v: char) -> Check {
        Ok(())
    }
    fn serialize_str(self, _v: &str) -> Check {
        Ok(())
    }
    fn serialize_bytes(self, _v: &[u8]) -> Check {
        Ok(())
    }
    fn serialize_none(self) -> Check {
        Ok(())
    }
    fn serialize_some<T: ?Sized + Serialize>(self, value: &T) -> Check {
        value.serialize(self)
    }
    fn serialize_unit(self) -> Check {
        Ok(())
    }
    fn serialize_unit_struct(self, _name: &'static str) -> Check {
        Ok(())
    }
    fn serialize_unit_variant(
        self,
        _name: &'static str,
        _index: u32,
        _variant: &'static str,
    ) -> Check {
        Ok(())
    }
    fn serialize_newtype_struct<T: ?Sized + Serialize>(
        self,
        _name: &'static str,
        value: &T,
    ) -> Check {
        value.serialize(self)
    }
    fn serialize_newtype_variant<T: ?Sized + Serialize>(
        self,
        _name: &'static str,
        _index: u32,
        _variant: &'static str,
        value: &T,
    ) -> Check {
        value.serialize(self)
    }
    fn serialize_seq(self, _len: Option<usize>) -> core::result::Result<Self, NonCanonical> {
        Ok(self)
    }
    fn serialize_tuple(self, _len: usize) -> core::result::Result<Self, NonCanonical> {
        Ok(self)
    }
    fn serialize_tuple_struct(
        self,
        _name: &'static str,
        _len: usize,
    ) -> core::result::Result<Self, NonCanonical> {
        Ok(self)
    }
    fn serialize_tuple_variant(
        self,
        _name: &'static str,
        _index: u32,
        _variant: &'static str,
        _len: usize,
    ) -> core::result::Result<Self, NonCanonical> {
        Ok(self)
    }
    fn serialize_map(self, _len: Option<usize>) -> core::result::Result<Self, NonCanonical> {
        Ok(self)
    }
    fn serialize_struct(
        self,
        _name: &'static str,
        _len: usize,
    ) -> core::result::Result<Self, NonCanonical> {
        Ok(self)
    }
    fn serialize_struct_variant(
        self,
        _name: &'static str,
        _index: u32,
        _variant: &'static str,
        _len: usize,
    ) -> core::result::Result<Self, NonCanonical> {
        Ok(self)
    }
}

impl ser::SerializeSeq for FiniteCheck {
    type Ok = ();
    type Error = NonCanonical;
    fn serialize_element<T: ?Sized + Serialize>(&mut self, value: &T) -> Check {
        value.serialize(*self)
    }
    fn end(self) -> Check {
        Ok(())
    }
}

impl ser::SerializeTuple for FiniteCheck {
    type Ok = ();
    type Error = NonCanonical;
    fn serialize_element<T: ?Sized + Serialize>(&mut self, value: &T) -> Check {
        value.serialize(*self)
    }
    fn end(self) -> Check {
        Ok(())
    }
}

impl ser::SerializeTupleStruct for FiniteCheck {
    type Ok = ();
    type Error = NonCanonical;
    fn serialize_field<T: ?Sized + Serialize>(&mut self, value: &T) -> Check {
        value.serialize(*self)
    }
    fn end(self) -> Check {
        Ok(())
    }
}

impl ser::SerializeTupleVariant for FiniteCheck {
    type Ok = ();
    type Error = NonCanonical;
    fn serialize_field<T: ?Sized + Serialize>(&mut self, value: &T) -> Check {
        value.serialize(*self)
    }
    fn end(self) -> Check {
        Ok(())
    }
}

impl ser::SerializeMap for FiniteCheck {
    type Ok = ();
    type Error = NonCanonical;
    fn serialize_key<T: ?Sized + Serialize>(&mut self, key: &T) -> Check {
        key.serialize(*self)
    }
    fn serialize_value<T: ?Sized + Serialize>(&mut self, value: &T) -> Check {
        value.serialize(*self)
    }
    fn end(self) -> Check {
        Ok(())
    }
}

impl ser::SerializeStruct for FiniteCheck {
    type Ok = ();
    type Error = NonCanonical;
    fn serialize_field<T: ?Sized + Serialize>(&mut self, _key: &'static str, value: &T) -> Check {
        value.serialize(*self)
    }
    fn end(self) -> Check {
        Ok(())
    }
}

impl ser::SerializeStructVariant for FiniteCheck {
    type Ok = ();
    type Error = NonCanonical;
    fn serialize_field<T: ?Sized + Serialize>(&mut self, _key: &'static str, value: &T) -> Check {
        value.serialize(*self)
    }
    fn end(self) -> Check {
        Ok(())
    }
}

fn serialization_error(e: serde_json::Error) -> HashListError {
    tracing::debug!(error = %e, "element has no canonical encoding");
    HashListError::Serialization(e.to_string())
}

//! Immutable value types used throughout the governance contract.

use serde::{Deserialize, Serialize};
use std::fmt;

pub use primitive_types::U256;

/// A 20-byte account address (owner address, node identity key).
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Address(pub [u8; 20]);

impl Address {
    /// The zero address.
    pub const ZERO: Self = Self([0u8; 20]);

    /// Creates an address from a 20-byte array.
    #[must_use]
    pub const fn new(bytes: [u8; 20]) -> Self {
        Self(bytes)
    }

    /// Returns true if this is the zero address.
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.0 == [0u8; 20]
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x")?;
        for byte in &self.0 {
            write!(f, "{byte:02x}")?;
        }
        Ok(())
    }
}

/// A 32-byte hash (node-id, storage word, CRS value).
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Hash32(pub [u8; 32]);

impl Hash32 {
    /// The zero hash.
    pub const ZERO: Self = Self([0u8; 32]);

    /// Creates a hash from a 32-byte array.
    #[must_use]
    pub const fn new(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }
}

impl fmt::Debug for Hash32 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x")?;
        for byte in &self.0[..4] {
            write!(f, "{byte:02x}")?;
        }
        write!(f, "..")
    }
}

impl From<[u8; 32]> for Hash32 {
    fn from(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }
}

impl From<Hash32> for [u8; 32] {
    fn from(h: Hash32) -> Self {
        h.0
    }
}

/// Variable-length byte vector, used for public keys, signatures and
/// DKG artifacts (which have no fixed width).
#[derive(Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Bytes(pub Vec<u8>);

impl Bytes {
    /// Creates an empty `Bytes`.
    #[must_use]
    pub fn new() -> Self {
        Self(Vec::new())
    }

    /// Returns the length in bytes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Debug for Bytes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Bytes({} bytes)", self.0.len())
    }
}

impl From<Vec<u8>> for Bytes {
    fn from(v: Vec<u8>) -> Self {
        Self(v)
    }
}

impl AsRef<[u8]> for Bytes {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

/// A bounded-length text field, matching the original contract's
/// `name`/`email`/`location`/`url` storage limits.
#[derive(Clone, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct BoundedString(String);

impl BoundedString {
    /// Builds a bounded string. `max_len` is the configured limit constant
    /// (32/32/32/128 per field); the original contract rejects when
    /// `len >= max_len`, so the longest accepted value is `max_len - 1`
    /// bytes — this off-by-one is load-bearing storage-layout compatibility,
    /// not a bug, and is preserved verbatim.
    pub fn new(value: impl Into<String>, max_len: usize) -> Result<Self, crate::domain::GovernanceError> {
        let value = value.into();
        if value.len() >= max_len {
            return Err(crate::domain::GovernanceError::TextTooLong {
                max_len,
                actual_len: value.len(),
            });
        }
        Ok(Self(value))
    }

    /// Returns the underlying string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_address_zero() {
        assert!(Address::ZERO.is_zero());
        assert!(!Address::new([1u8; 20]).is_zero());
    }

    #[test]
    fn test_bounded_string_boundary() {
        // len=31 accepted, len=32 penalized, matching the original
        // `len(name) >= 32` revert condition (spec §8 boundary scenario).
        let ok = BoundedString::new("a".repeat(31), 32);
        assert!(ok.is_ok());
        let rejected = BoundedString::new("a".repeat(32), 32);
        assert!(rejected.is_err());
    }
}

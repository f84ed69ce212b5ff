//! Content hashing for atom interning.
//!
//! Provides deterministic structural hashing with domain separation and
//! length prefixing, so that two structurally identical atoms always receive
//! the same content hash across fresh builds. The store keys its intern table
//! on these hashes, which makes exact structural equality of interned terms
//! an identifier comparison.
//!
//! # Citations
//! - SHA-256: NIST FIPS 180-4 (2015)
//! - Domain separation & length prefixing: Bernstein et al., "How to hash into elliptic curves" (2009)
//! - Content addressing: Git object model (Chacon & Straub, "Pro Git", 2014)

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// A 256-bit hash value.
///
/// Wraps a byte array for type safety. Comparison and hashing are over the
/// raw bytes.
#[repr(transparent)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HashValue(pub [u8; 32]);

impl HashValue {
    /// Creates a zero hash (all zeros).
    #[inline]
    pub fn zero() -> Self {
        Self([0u8; 32])
    }

    /// Creates a hash from a raw byte array.
    #[inline]
    pub const fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Returns the raw byte array.
    #[inline]
    pub const fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Computes SHA-256 of the given data with domain separation.
    ///
    /// The domain prefix is applied as `b"PRD:<domain>:v1" || length_prefix(data) || data`.
    /// Length prefix is a 64-bit little-endian count of bytes.
    pub fn hash_with_domain(domain: &[u8], data: &[u8]) -> Self {
        let mut hasher = Sha256::new();
        // Domain tag
        hasher.update(b"PRD:");
        hasher.update(domain);
        hasher.update(b":v1");
        // Length prefix (64-bit little-endian)
        let len = data.len() as u64;
        hasher.update(len.to_le_bytes());
        // Data
        hasher.update(data);
        Self(hasher.finalize().into())
    }
}

impl std::fmt::Display for HashValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "HashValue({:02x}{:02x}{:02x}{:02x}…)",
            self.0[0], self.0[1], self.0[2], self.0[3]
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deterministic_across_calls() {
        let a = HashValue::hash_with_domain(b"NODE", b"cat");
        let b = HashValue::hash_with_domain(b"NODE", b"cat");
        assert_eq!(a, b);
    }

    #[test]
    fn domain_separation() {
        let node = HashValue::hash_with_domain(b"NODE", b"cat");
        let link = HashValue::hash_with_domain(b"LINK", b"cat");
        assert_ne!(node, link);
    }

    #[test]
    fn hashes_differ_by_content() {
        let cat = HashValue::hash_with_domain(b"NODE", b"cat");
        let dog = HashValue::hash_with_domain(b"NODE", b"dog");
        assert_ne!(cat, dog);
    }
}

//! Structural fingerprints for diagrams and rewrites.
//!
//! Provides deterministic structural hashing with domain separation and length
//! prefixing, so that structurally equal values built along different call
//! paths always receive identical fingerprints.
//!
//! Fingerprints are an acceleration only: differing fingerprints prove two
//! values unequal, but equal fingerprints are always confirmed by a full
//! structural comparison.
//!
//! # Citations
//! - SHA-256: NIST FIPS 180-4 (2015)
//! - Domain separation & length prefixing: Bernstein et al., "How to hash into elliptic curves" (2009)
//! - Hash-consing: Filliâtre & Conchon, "Type-safe modular hash-consing" (2006)

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// A 256‑bit hash value.
#[repr(transparent)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HashValue(pub [u8; 32]);

impl HashValue {
    /// Returns the raw byte array.
    #[inline]
    pub const fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Computes SHA‑256 of the given data with domain separation.
    ///
    /// Domain separation prefix is applied as `b"NFD:<domain>:v1" || length_prefix(data) || data`.
    /// Length prefix is a 64‑bit little‑endian count of bytes.
    pub fn hash_with_domain(domain: &[u8], data: &[u8]) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(b"NFD:");
        hasher.update(domain);
        hasher.update(b":v1");
        let len = data.len() as u64;
        hasher.update(len.to_le_bytes());
        hasher.update(data);
        Self(hasher.finalize().into())
    }
}

impl std::fmt::Display for HashValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // First 4 bytes are enough to tell values apart in logs.
        write!(
            f,
            "HashValue({:02x}{:02x}{:02x}{:02x}…)",
            self.0[0], self.0[1], self.0[2], self.0[3]
        )
    }
}

/// Values with a deterministic structural fingerprint.
///
/// Implementations must be a pure function of structure: equal values yield
/// equal fingerprints.
pub trait Fingerprint {
    /// Returns the structural fingerprint of `self`.
    fn fingerprint(&self) -> HashValue;
}

/// Byte accumulator for canonical encodings.
///
/// Sequences are length-prefixed so that adjacent sequences cannot be
/// confused with one another.
#[derive(Debug, Default)]
pub(crate) struct CanonicalBytes(Vec<u8>);

impl CanonicalBytes {
    pub(crate) fn new() -> Self {
        Self(Vec::with_capacity(128))
    }

    pub(crate) fn number(&mut self, value: usize) -> &mut Self {
        self.0.extend_from_slice(&(value as u64).to_le_bytes());
        self
    }

    pub(crate) fn raw(&mut self, bytes: &[u8]) -> &mut Self {
        self.0.extend_from_slice(bytes);
        self
    }

    pub(crate) fn digest(&mut self, hash: HashValue) -> &mut Self {
        self.raw(hash.as_bytes())
    }

    /// Appends a length-prefixed sequence of fingerprints.
    pub(crate) fn sequence<'a, T, I>(&mut self, items: I) -> &mut Self
    where
        T: Fingerprint + 'a,
        I: ExactSizeIterator<Item = &'a T>,
    {
        self.number(items.len());
        for item in items {
            self.digest(item.fingerprint());
        }
        self
    }

    pub(crate) fn finish(&self, domain: &[u8]) -> HashValue {
        HashValue::hash_with_domain(domain, &self.0)
    }
}

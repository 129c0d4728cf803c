//! Content hashing using SHA-1.

use crate::error::{Error, Result};
use sha1::{Digest as _, Sha1};
use std::fmt;

/// Digest size in bytes (SHA-1 produces 160-bit hashes).
pub const DIGEST_SIZE: usize = 20;

/// A 20-byte SHA-1 digest identifying an object's canonical serialization.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Digest([u8; DIGEST_SIZE]);

impl Digest {
    /// Create a Digest from raw bytes.
    pub fn from_bytes(bytes: [u8; DIGEST_SIZE]) -> Self {
        Digest(bytes)
    }

    /// Create a Digest from a hex string (40 hex characters).
    pub fn from_hex(hex_str: &str) -> Result<Self> {
        if hex_str.len() != DIGEST_SIZE * 2 {
            return Err(Error::invalid_hash(format!(
                "Expected {} hex characters, got {}",
                DIGEST_SIZE * 2,
                hex_str.len()
            )));
        }

        let bytes =
            hex::decode(hex_str).map_err(|e| Error::invalid_hash(format!("Invalid hex: {}", e)))?;

        let mut digest = [0u8; DIGEST_SIZE];
        digest.copy_from_slice(&bytes);
        Ok(Digest(digest))
    }

    /// Convert to a lowercase hex string (40 characters).
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Get the first 2 hex characters (for directory sharding).
    pub fn prefix(&self) -> String {
        hex::encode(&self.0[..1])
    }

    /// Get the remaining 38 hex characters (for the object file name).
    pub fn suffix(&self) -> String {
        hex::encode(&self.0[1..])
    }

    /// Get the raw bytes.
    pub fn as_bytes(&self) -> &[u8; DIGEST_SIZE] {
        &self.0
    }

    /// Hash raw bytes using SHA-1.
    pub fn hash_bytes(data: &[u8]) -> Self {
        let mut hasher = Sha1::new();
        hasher.update(data);
        Digest(hasher.finalize().into())
    }
}

impl fmt::Display for Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

impl fmt::Debug for Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Digest({})", self.to_hex())
    }
}

impl serde::Serialize for Digest {
    /// Serialize as the lowercase hex string.
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_hex())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_empty() {
        let digest = Digest::hash_bytes(b"");
        assert_eq!(digest.to_hex().len(), 40);
    }

    #[test]
    fn test_hash_hello_world() {
        let digest = Digest::hash_bytes(b"hello world");

        // SHA-1 of "hello world"
        assert_eq!(
            digest.to_hex(),
            "2aae6c35c94fcfb415dbe95f408b9ce91ee846ed"
        );
    }

    #[test]
    fn test_from_hex_roundtrip() {
        let original = Digest::hash_bytes(b"test data");
        let hex = original.to_hex();
        let parsed = Digest::from_hex(&hex).unwrap();
        assert_eq!(original, parsed);
    }

    #[test]
    fn test_from_hex_invalid_length() {
        assert!(Digest::from_hex("abcd").is_err());
        assert!(Digest::from_hex("").is_err());
    }

    #[test]
    fn test_from_hex_invalid_chars() {
        let invalid = "z".repeat(40);
        assert!(Digest::from_hex(&invalid).is_err());
    }

    #[test]
    fn test_prefix_suffix() {
        let digest = Digest::hash_bytes(b"test");
        let prefix = digest.prefix();
        let suffix = digest.suffix();

        assert_eq!(prefix.len(), 2);
        assert_eq!(suffix.len(), 38);

        // Concatenated should equal full hex
        let full = format!("{}{}", prefix, suffix);
        assert_eq!(full, digest.to_hex());
    }

    #[test]
    fn test_serialize_as_hex() {
        let digest = Digest::hash_bytes(b"test");
        let json = serde_json::to_value(digest).unwrap();
        assert_eq!(json, serde_json::Value::String(digest.to_hex()));
    }

    // Property-based tests
    use proptest::prelude::*;

    proptest! {
        #![proptest_config(ProptestConfig {
            cases: 256,
            max_shrink_iters: 10000,
            ..ProptestConfig::default()
        })]

        /// Hash determinism - hashing the same data always produces the same digest
        #[test]
        fn prop_hash_deterministic(data: Vec<u8>) {
            let digest1 = Digest::hash_bytes(&data);
            let digest2 = Digest::hash_bytes(&data);
            prop_assert_eq!(digest1, digest2);
        }

        /// Hex encoding is bijective - round-trip through hex preserves the digest
        #[test]
        fn prop_hex_roundtrip(bytes in prop::array::uniform20(any::<u8>())) {
            let digest = Digest::from_bytes(bytes);
            let hex = digest.to_hex();
            let parsed = Digest::from_hex(&hex)?;
            prop_assert_eq!(digest, parsed);
        }

        /// Prefix + suffix reconstruction equals full hex
        #[test]
        fn prop_prefix_suffix_concat(bytes in prop::array::uniform20(any::<u8>())) {
            let digest = Digest::from_bytes(bytes);
            let full = digest.to_hex();
            let reconstructed = format!("{}{}", digest.prefix(), digest.suffix());
            prop_assert_eq!(full, reconstructed);
        }

        /// Invalid hex length always fails
        #[test]
        fn prop_invalid_hex_length_fails(
            s in "[0-9a-f]{0,39}|[0-9a-f]{41,96}"
        ) {
            prop_assert!(Digest::from_hex(&s).is_err());
        }
    }
}

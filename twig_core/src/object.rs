//! Canonical object serialization.
//!
//! Every object serializes as:
//!
//! ```text
//! <kind> <payload-len>\0<payload>
//! ```
//!
//! where `<kind>` is `blob`, `tree`, or `commit` and `<payload-len>` is the
//! decimal byte length of the payload. The SHA-1 digest of the entire buffer,
//! header included, is the object's identity.

use crate::error::{Error, Result};
use std::fmt;

/// Object kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObjectKind {
    /// A blob (file content).
    Blob,
    /// A tree (directory structure).
    Tree,
    /// A commit (tree snapshot plus ancestry and metadata).
    Commit,
}

impl ObjectKind {
    /// Get the string name of this object kind, as used in the header.
    pub fn as_str(&self) -> &'static str {
        match self {
            ObjectKind::Blob => "blob",
            ObjectKind::Tree => "tree",
            ObjectKind::Commit => "commit",
        }
    }

    /// Parse an object kind from its header name.
    pub fn parse(s: &str) -> Result<Self> {
        match s {
            "blob" => Ok(ObjectKind::Blob),
            "tree" => Ok(ObjectKind::Tree),
            "commit" => Ok(ObjectKind::Commit),
            _ => Err(Error::malformed_object(format!(
                "Unknown object kind: {:?}",
                s
            ))),
        }
    }
}

impl fmt::Display for ObjectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Encode an object to its canonical serialization.
pub fn encode_object(kind: ObjectKind, payload: &[u8]) -> Vec<u8> {
    let header = format!("{} {}\0", kind.as_str(), payload.len());
    let mut buf = Vec::with_capacity(header.len() + payload.len());
    buf.extend_from_slice(header.as_bytes());
    buf.extend_from_slice(payload);
    buf
}

/// Decode a canonical serialization into its kind and payload.
///
/// Fails with `MalformedObject` if the NUL separator is missing, the header
/// is not `<kind> <len>`, the kind is unknown, or the declared length does
/// not match the payload length.
pub fn decode_object(raw: &[u8]) -> Result<(ObjectKind, Vec<u8>)> {
    let nul = raw
        .iter()
        .position(|&b| b == 0)
        .ok_or_else(|| Error::malformed_object("Missing NUL header separator"))?;

    let header = std::str::from_utf8(&raw[..nul])
        .map_err(|_| Error::malformed_object("Header is not valid UTF-8"))?;

    let (kind_str, len_str) = header
        .split_once(' ')
        .ok_or_else(|| Error::malformed_object(format!("Header missing length: {:?}", header)))?;

    let kind = ObjectKind::parse(kind_str)?;

    let declared: usize = len_str.parse().map_err(|_| {
        Error::malformed_object(format!("Invalid length in header: {:?}", len_str))
    })?;

    let payload = &raw[nul + 1..];
    if declared != payload.len() {
        return Err(Error::malformed_object(format!(
            "Declared length {} does not match payload length {}",
            declared,
            payload.len()
        )));
    }

    Ok((kind, payload.to_vec()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hash::Digest;

    #[test]
    fn test_encode_blob_layout() {
        let encoded = encode_object(ObjectKind::Blob, b"hello");
        assert_eq!(encoded, b"blob 5\0hello");
    }

    #[test]
    fn test_encode_empty_payload() {
        let encoded = encode_object(ObjectKind::Tree, b"");
        assert_eq!(encoded, b"tree 0\0");
    }

    #[test]
    fn test_git_known_digests() {
        // Digests are byte-compatible with git for identical content.
        let empty_blob = Digest::hash_bytes(&encode_object(ObjectKind::Blob, b""));
        assert_eq!(
            empty_blob.to_hex(),
            "e69de29bb2d1d6434b8b29ae775ad8c2e48c5391"
        );

        let hello_blob = Digest::hash_bytes(&encode_object(ObjectKind::Blob, b"hello\n"));
        assert_eq!(
            hello_blob.to_hex(),
            "ce013625030ba8dba906f756967f9e9ca394464a"
        );

        let empty_tree = Digest::hash_bytes(&encode_object(ObjectKind::Tree, b""));
        assert_eq!(
            empty_tree.to_hex(),
            "4b825dc642cb6eb9a060e54bf8d69288fbee4904"
        );
    }

    #[test]
    fn test_decode_roundtrip_all_kinds() {
        for kind in [ObjectKind::Blob, ObjectKind::Tree, ObjectKind::Commit] {
            let encoded = encode_object(kind, b"payload bytes");
            let (decoded_kind, payload) = decode_object(&encoded).unwrap();
            assert_eq!(decoded_kind, kind);
            assert_eq!(payload, b"payload bytes");
        }
    }

    #[test]
    fn test_decode_missing_nul() {
        assert!(decode_object(b"blob 5 hello").is_err());
        assert!(decode_object(b"").is_err());
    }

    #[test]
    fn test_decode_missing_length() {
        assert!(decode_object(b"blob\0hello").is_err());
    }

    #[test]
    fn test_decode_unknown_kind() {
        assert!(decode_object(b"tag 5\0hello").is_err());
    }

    #[test]
    fn test_decode_invalid_length_field() {
        assert!(decode_object(b"blob five\0hello").is_err());
        assert!(decode_object(b"blob -1\0hello").is_err());
    }

    #[test]
    fn test_decode_length_mismatch() {
        assert!(decode_object(b"blob 4\0hello").is_err());
        assert!(decode_object(b"blob 6\0hello").is_err());
    }

    #[test]
    fn test_payload_may_contain_nul() {
        let payload = b"a\0b\0c";
        let encoded = encode_object(ObjectKind::Blob, payload);
        let (kind, decoded) = decode_object(&encoded).unwrap();
        assert_eq!(kind, ObjectKind::Blob);
        assert_eq!(decoded, payload);
    }

    #[test]
    fn test_kind_parse() {
        assert_eq!(ObjectKind::parse("blob").unwrap(), ObjectKind::Blob);
        assert_eq!(ObjectKind::parse("tree").unwrap(), ObjectKind::Tree);
        assert_eq!(ObjectKind::parse("commit").unwrap(), ObjectKind::Commit);
        assert!(ObjectKind::parse("Blob").is_err());
        assert!(ObjectKind::parse("").is_err());
    }

    // Property-based tests
    use proptest::prelude::*;

    fn arb_kind() -> impl Strategy<Value = ObjectKind> {
        prop::sample::select(vec![ObjectKind::Blob, ObjectKind::Tree, ObjectKind::Commit])
    }

    proptest! {
        #![proptest_config(ProptestConfig {
            cases: 256,
            max_shrink_iters: 10000,
            ..ProptestConfig::default()
        })]

        /// Object serialization round-trip
        #[test]
        fn prop_object_roundtrip(
            kind in arb_kind(),
            payload in prop::collection::vec(any::<u8>(), 0..2048),
        ) {
            let encoded = encode_object(kind, &payload);
            let (decoded_kind, decoded_payload) = decode_object(&encoded)?;
            prop_assert_eq!(decoded_kind, kind);
            prop_assert_eq!(decoded_payload, payload);
        }

        /// Identical serialized bytes yield identical digests
        #[test]
        fn prop_digest_deterministic(
            kind in arb_kind(),
            payload in prop::collection::vec(any::<u8>(), 0..2048),
        ) {
            let a = Digest::hash_bytes(&encode_object(kind, &payload));
            let b = Digest::hash_bytes(&encode_object(kind, &payload));
            prop_assert_eq!(a, b);
        }

        /// Truncating or extending the payload breaks the declared length
        #[test]
        fn prop_length_mismatch_rejected(
            kind in arb_kind(),
            payload in prop::collection::vec(any::<u8>(), 0..256),
            extra in 1usize..8,
        ) {
            let mut encoded = encode_object(kind, &payload);
            encoded.extend(std::iter::repeat_n(0xAA, extra));
            prop_assert!(decode_object(&encoded).is_err());
        }
    }
}

//! Object persistence and retrieval.

use crate::error::{Error, Result};
use crate::hash::Digest;
use crate::object::{self, ObjectKind};
use crate::repo::Repo;
use crate::tree::{self, TreeEntry};
use flate2::Compression;
use flate2::read::ZlibDecoder;
use flate2::write::ZlibEncoder;
use std::fs;
use std::io::{Read, Write};
use std::path::PathBuf;

impl Repo {
    /// Get the path to an object file given its digest.
    ///
    /// Returns: `objects/{prefix}/{suffix}`
    pub fn object_path(&self, digest: &Digest) -> PathBuf {
        self.root()
            .join("objects")
            .join(digest.prefix())
            .join(digest.suffix())
    }

    /// Serialize, hash, and persist an object; returns its digest.
    ///
    /// Writing is idempotent: content for a digest is always byte-identical,
    /// so an object whose path already exists is left untouched.
    pub fn put_object(&self, kind: ObjectKind, payload: &[u8]) -> Result<Digest> {
        let serialized = object::encode_object(kind, payload);
        let digest = Digest::hash_bytes(&serialized);

        let obj_path = self.object_path(&digest);
        if obj_path.exists() {
            return Ok(digest);
        }

        self.write_object_atomic(&digest, &serialized)?;

        Ok(digest)
    }

    /// Write a serialized object atomically using tempfile.
    ///
    /// Concurrent writers racing on the same digest persist byte-identical
    /// content, so whichever rename lands last wins harmlessly.
    fn write_object_atomic(&self, digest: &Digest, serialized: &[u8]) -> Result<()> {
        let shard_dir = self.root().join("objects").join(digest.prefix());
        fs::create_dir_all(&shard_dir)?;

        let mut temp_file = tempfile::NamedTempFile::new_in(&shard_dir)?;
        temp_file.write_all(&compress_zlib(serialized)?)?;
        temp_file.flush()?;

        temp_file.persist(shard_dir.join(digest.suffix()))?;

        Ok(())
    }

    /// Read the raw canonical serialization of an object.
    pub fn read_serialized(&self, digest: &Digest) -> Result<Vec<u8>> {
        let obj_path = self.object_path(digest);

        if !obj_path.exists() {
            return Err(Error::object_not_found(digest.to_hex()));
        }

        let compressed = fs::read(&obj_path)?;

        let mut decoder = ZlibDecoder::new(compressed.as_slice());
        let mut serialized = Vec::new();
        decoder.read_to_end(&mut serialized).map_err(|e| {
            Error::corrupt_object(&obj_path, format!("zlib inflate failed: {}", e))
        })?;

        Ok(serialized)
    }

    /// Read an object, returning its kind and payload.
    pub fn read_object(&self, digest: &Digest) -> Result<(ObjectKind, Vec<u8>)> {
        let serialized = self.read_serialized(digest)?;
        object::decode_object(&serialized)
    }

    /// Store a tree from a list of entries.
    ///
    /// Entries are sorted by name for canonical ordering before hashing.
    pub fn put_tree(&self, entries: Vec<TreeEntry>) -> Result<Digest> {
        let payload = tree::encode_tree(entries);
        self.put_object(ObjectKind::Tree, &payload)
    }

    /// Read a tree object, returning its entries.
    pub fn read_tree(&self, digest: &Digest) -> Result<Vec<TreeEntry>> {
        let (kind, payload) = self.read_object(digest)?;

        if kind != ObjectKind::Tree {
            return Err(Error::invalid_object_type(
                ObjectKind::Tree.as_str(),
                kind.as_str(),
            ));
        }

        tree::decode_tree(&payload)
    }
}

/// Compress data with zlib.
fn compress_zlib(data: &[u8]) -> Result<Vec<u8>> {
    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(data)?;
    Ok(encoder.finish()?)
}

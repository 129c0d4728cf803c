//! Tree entries and canonical tree encoding.

use crate::error::{Error, Result};
use crate::hash::{DIGEST_SIZE, Digest};
use std::fmt;

/// File mode of a tree entry, carrying git's mode strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileMode {
    /// Subdirectory.
    Directory,
    /// Regular file without execute bits.
    Regular,
    /// Regular file with any execute bit set.
    Executable,
    /// Symbolic link.
    Symlink,
}

impl FileMode {
    /// Get the mode string used in the tree payload.
    pub fn as_str(&self) -> &'static str {
        match self {
            FileMode::Directory => "40000",
            FileMode::Regular => "100644",
            FileMode::Executable => "100755",
            FileMode::Symlink => "120000",
        }
    }

    /// Parse a mode string from a tree payload.
    pub fn parse(s: &str) -> Result<Self> {
        match s {
            "40000" => Ok(FileMode::Directory),
            "100644" => Ok(FileMode::Regular),
            "100755" => Ok(FileMode::Executable),
            "120000" => Ok(FileMode::Symlink),
            _ => Err(Error::invalid_tree_entry(format!(
                "Unknown file mode: {:?}",
                s
            ))),
        }
    }

    /// Whether this mode points at a subtree rather than a blob.
    pub fn is_tree(&self) -> bool {
        matches!(self, FileMode::Directory)
    }
}

impl fmt::Display for FileMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// An entry in a tree (file, symlink, or subdirectory).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeEntry {
    /// File mode.
    pub mode: FileMode,
    /// Name of the entry: a single path segment.
    pub name: String,
    /// Digest of the referenced blob or tree.
    pub digest: Digest,
}

impl TreeEntry {
    /// Create a new tree entry.
    pub fn new(mode: FileMode, name: String, digest: Digest) -> Result<Self> {
        if name.is_empty() {
            return Err(Error::invalid_tree_entry("Name cannot be empty"));
        }

        if name.len() > 255 {
            return Err(Error::invalid_tree_entry(format!(
                "Name too long: {} bytes (max 255)",
                name.len()
            )));
        }

        if name.contains('\0') {
            return Err(Error::invalid_tree_entry("Name cannot contain null bytes"));
        }

        if name.contains('/') {
            return Err(Error::invalid_tree_entry(
                "Name cannot contain path separators",
            ));
        }

        Ok(Self { mode, name, digest })
    }

    /// Encode the entry into the payload buffer.
    ///
    /// Format: `<mode> <name>\0<20 raw digest bytes>`.
    fn encode_into(&self, buf: &mut Vec<u8>) {
        buf.extend_from_slice(self.mode.as_str().as_bytes());
        buf.push(b' ');
        buf.extend_from_slice(self.name.as_bytes());
        buf.push(0);
        buf.extend_from_slice(self.digest.as_bytes());
    }
}

impl PartialOrd for TreeEntry {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for TreeEntry {
    /// Compare by name (bytewise ascending) for canonical ordering.
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.name.as_bytes().cmp(other.name.as_bytes())
    }
}

/// Encode a list of tree entries, sorted by name.
///
/// Two directories with identical `(mode, name, digest)` sets always encode
/// to identical bytes, whatever order the entries arrive in.
pub fn encode_tree(mut entries: Vec<TreeEntry>) -> Vec<u8> {
    entries.sort();

    let mut buf = Vec::new();
    for entry in &entries {
        entry.encode_into(&mut buf);
    }
    buf
}

/// Decode a tree payload into its entries.
pub fn decode_tree(data: &[u8]) -> Result<Vec<TreeEntry>> {
    let mut entries = Vec::new();
    let mut rest = data;

    while !rest.is_empty() {
        let sp = rest
            .iter()
            .position(|&b| b == b' ')
            .ok_or_else(|| Error::malformed_object("Tree entry missing mode separator"))?;
        let mode_str = std::str::from_utf8(&rest[..sp])
            .map_err(|_| Error::malformed_object("Tree entry mode is not valid UTF-8"))?;
        let mode = FileMode::parse(mode_str)?;
        rest = &rest[sp + 1..];

        let nul = rest
            .iter()
            .position(|&b| b == 0)
            .ok_or_else(|| Error::malformed_object("Tree entry missing name terminator"))?;
        let name = std::str::from_utf8(&rest[..nul])
            .map_err(|_| Error::malformed_object("Tree entry name is not valid UTF-8"))?
            .to_string();
        rest = &rest[nul + 1..];

        if rest.len() < DIGEST_SIZE {
            return Err(Error::malformed_object(format!(
                "Tree entry digest truncated: {} bytes",
                rest.len()
            )));
        }
        let mut raw = [0u8; DIGEST_SIZE];
        raw.copy_from_slice(&rest[..DIGEST_SIZE]);
        rest = &rest[DIGEST_SIZE..];

        entries.push(TreeEntry::new(mode, name, Digest::from_bytes(raw))?);
    }

    Ok(entries)
}

//! Filesystem walking and tree construction.

use crate::error::{Error, Result};
use crate::hash::Digest;
use crate::object::ObjectKind;
use crate::repo::{REPO_DIR, Repo};
use crate::tree::{FileMode, TreeEntry};
use std::fs;
use std::path::Path;

/// Maximum directory nesting accepted by `write_tree`.
const MAX_DEPTH: usize = 256;

impl Repo {
    /// Store one file's content as a blob and return its digest.
    ///
    /// Symbolic links are stored as blobs holding the link target path, not
    /// the target's content.
    pub fn create_blob(&self, path: &Path) -> Result<Digest> {
        let metadata = fs::symlink_metadata(path)?;

        let payload = if metadata.file_type().is_symlink() {
            fs::read_link(path)?.into_os_string().into_encoded_bytes()
        } else {
            fs::read(path)?
        };

        self.put_object(ObjectKind::Blob, &payload)
    }

    /// Build and store the tree for a directory, returning its digest.
    ///
    /// Walks depth-first, post-order: every file becomes a blob and every
    /// subdirectory a tree before the parent tree is encoded. Entries named
    /// `.twig` are skipped, and a subdirectory whose own tree is empty
    /// contributes no entry. The root tree is stored even when empty.
    pub fn write_tree(&self, dir: &Path) -> Result<Digest> {
        let entries = self.collect_entries(dir, 0)?;
        self.put_tree(entries)
    }

    /// Collect the tree entries of one directory level.
    fn collect_entries(&self, dir: &Path, depth: usize) -> Result<Vec<TreeEntry>> {
        if depth > MAX_DEPTH {
            return Err(Error::depth_limit_exceeded(dir, MAX_DEPTH));
        }

        let mut entries = Vec::new();

        // One level of children; filters stay off so the tree hash is a
        // function of directory contents alone.
        let walker = ignore::WalkBuilder::new(dir)
            .max_depth(Some(1))
            .standard_filters(false)
            .build();

        for entry in walker {
            let entry = entry?;
            let entry_path = entry.path();

            // Skip the directory itself
            if entry_path == dir {
                continue;
            }

            let file_name = entry_path
                .file_name()
                .and_then(|n| n.to_str())
                .ok_or_else(|| {
                    Error::invalid_tree_entry(format!(
                        "Non-UTF-8 file name: {}",
                        entry_path.display()
                    ))
                })?
                .to_string();

            if file_name == REPO_DIR {
                continue;
            }

            let metadata = fs::symlink_metadata(entry_path)?;

            if metadata.is_dir() {
                let child_entries = self.collect_entries(entry_path, depth + 1)?;
                if child_entries.is_empty() {
                    continue;
                }
                let digest = self.put_tree(child_entries)?;
                entries.push(TreeEntry::new(FileMode::Directory, file_name, digest)?);
            } else {
                let digest = self.create_blob(entry_path)?;
                entries.push(TreeEntry::new(entry_mode(&metadata), file_name, digest)?);
            }
        }

        Ok(entries)
    }
}

/// Derive the tree-entry mode from filesystem metadata.
#[cfg(unix)]
fn entry_mode(metadata: &fs::Metadata) -> FileMode {
    use std::os::unix::fs::PermissionsExt;

    if metadata.file_type().is_symlink() {
        return FileMode::Symlink;
    }

    if metadata.permissions().mode() & 0o111 != 0 {
        FileMode::Executable
    } else {
        FileMode::Regular
    }
}

/// Derive the tree-entry mode (non-Unix fallback: no execute bits).
#[cfg(not(unix))]
fn entry_mode(metadata: &fs::Metadata) -> FileMode {
    if metadata.file_type().is_symlink() {
        FileMode::Symlink
    } else {
        FileMode::Regular
    }
}

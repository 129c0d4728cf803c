//! Repository layout and bootstrap.

use crate::error::{Error, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// Name of the repository metadata directory. Tree builds skip any entry
/// with this name so repository state never hashes into a snapshot.
pub const REPO_DIR: &str = ".twig";

/// Reference installed into HEAD by `init`.
const DEFAULT_HEAD: &str = "ref: refs/heads/main\n";

/// Handle to an on-disk repository.
///
/// The repository directory holds:
/// - `HEAD` — symbolic reference, `ref: refs/heads/main\n` after init
/// - `objects/<2 hex>/<38 hex>` — zlib-compressed object files
/// - `refs/` — named references (created empty; management out of scope)
///
/// The directory is always passed in explicitly; nothing is discovered from
/// the process working directory.
#[derive(Debug)]
pub struct Repo {
    root: PathBuf,
}

impl Repo {
    /// Initialize a repository at the given directory.
    ///
    /// Creates `objects/` and `refs/` and writes the HEAD file. Re-running
    /// init on an existing repository leaves its HEAD untouched.
    pub fn init<P: AsRef<Path>>(root: P) -> Result<Self> {
        let root = root.as_ref().to_path_buf();

        fs::create_dir_all(root.join("objects"))?;
        fs::create_dir_all(root.join("refs"))?;

        let head_path = root.join("HEAD");
        if !head_path.exists() {
            fs::write(&head_path, DEFAULT_HEAD)?;
        }

        Ok(Self { root })
    }

    /// Open an existing repository, validating its layout.
    pub fn open<P: AsRef<Path>>(root: P) -> Result<Self> {
        let root = root.as_ref().to_path_buf();

        if !root.exists() {
            return Err(Error::invalid_store(&root, "directory does not exist"));
        }

        if !root.join("objects").exists() {
            return Err(Error::invalid_store(&root, "objects directory missing"));
        }

        if !root.join("refs").exists() {
            return Err(Error::invalid_store(&root, "refs directory missing"));
        }

        let head_path = root.join("HEAD");
        if !head_path.exists() {
            return Err(Error::invalid_store(&root, "HEAD file missing"));
        }

        let head = fs::read_to_string(&head_path)?;
        Self::parse_head(&root, &head)?;

        Ok(Self { root })
    }

    /// Read the reference HEAD points at.
    pub fn head_ref(&self) -> Result<String> {
        let head = fs::read_to_string(self.root.join("HEAD"))?;
        Self::parse_head(&self.root, &head)
    }

    /// Parse the HEAD file, returning the reference it names.
    fn parse_head(root: &Path, content: &str) -> Result<String> {
        let target = content
            .strip_prefix("ref: ")
            .ok_or_else(|| Error::invalid_store(root, "HEAD is not a symbolic reference"))?
            .trim_end();

        if target.is_empty() {
            return Err(Error::invalid_store(root, "HEAD names an empty reference"));
        }

        Ok(target.to_string())
    }

    /// Get the repository directory.
    pub fn root(&self) -> &Path {
        &self.root
    }
}

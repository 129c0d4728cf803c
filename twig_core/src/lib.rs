//! # Twig Core
//!
//! A minimal Git-style content-addressable object store and commit builder.
//!
//! Files become immutable blob objects identified by the SHA-1 digest of
//! their canonical serialization (`"<kind> <len>\0<payload>"`); directories
//! become tree objects whose digest depends only on their sorted entries;
//! commits link a tree snapshot to an optional parent. Objects are
//! zlib-compressed and stored under a sharded `objects/` directory, written
//! at most once per distinct content.
//!
//! ## Example
//!
//! ```no_run
//! use chrono::Local;
//! use std::path::Path;
//! use twig_core::{Identity, Repo};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! // Initialize a repository
//! let repo = Repo::init("./project/.twig")?;
//!
//! // Snapshot a directory as a tree
//! let tree = repo.write_tree(Path::new("./project"))?;
//!
//! // Link the snapshot into history
//! let author = Identity::new("Ada", "ada@example.com")?;
//! let commit = repo.commit_tree(&tree, None, &author, Local::now().fixed_offset(), "initial snapshot")?;
//! println!("{}", commit);
//! # Ok(())
//! # }
//! ```

mod commit;
mod error;
mod hash;
mod object;
mod repo;
mod store;
mod tree;
mod walk;

pub use commit::{Identity, encode_commit};
pub use error::{Error, Result};
pub use hash::{DIGEST_SIZE, Digest};
pub use object::{ObjectKind, decode_object, encode_object};
pub use repo::{REPO_DIR, Repo};
pub use tree::{FileMode, TreeEntry, decode_tree, encode_tree};

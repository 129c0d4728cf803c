//! Commit objects.

use crate::error::{Error, Result};
use crate::hash::Digest;
use crate::object::ObjectKind;
use crate::repo::Repo;
use chrono::{DateTime, FixedOffset};
use serde::Serialize;
use std::fmt;

/// Author/committer identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Identity {
    /// Display name.
    pub name: String,
    /// Email address.
    pub email: String,
}

impl Identity {
    /// Create an identity, rejecting characters that would corrupt the
    /// commit header line.
    pub fn new(name: impl Into<String>, email: impl Into<String>) -> Result<Self> {
        let name = name.into();
        let email = email.into();

        if name.trim().is_empty() {
            return Err(Error::invalid_identity("Name cannot be empty"));
        }

        for (field, value) in [("name", &name), ("email", &email)] {
            if value.contains(['\n', '\0', '<', '>']) {
                return Err(Error::invalid_identity(format!(
                    "Identity {} contains forbidden characters",
                    field
                )));
            }
        }

        Ok(Self { name, email })
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} <{}>", self.name, self.email)
    }
}

/// Encode a commit payload.
///
/// Layout: a `tree` line, a `parent` line when a parent is given, `author`
/// and `committer` lines carrying the identity with Unix seconds and
/// timezone offset, a blank line, then the message with a trailing newline.
pub fn encode_commit(
    tree: &Digest,
    parent: Option<&Digest>,
    identity: &Identity,
    timestamp: DateTime<FixedOffset>,
    message: &str,
) -> Vec<u8> {
    let signature = format!(
        "{} {} {}",
        identity,
        timestamp.timestamp(),
        timestamp.format("%z")
    );

    let mut payload = String::new();
    payload.push_str(&format!("tree {}\n", tree));
    if let Some(parent) = parent {
        payload.push_str(&format!("parent {}\n", parent));
    }
    payload.push_str(&format!("author {}\n", signature));
    payload.push_str(&format!("committer {}\n", signature));
    payload.push('\n');
    payload.push_str(message);
    if !message.ends_with('\n') {
        payload.push('\n');
    }

    payload.into_bytes()
}

impl Repo {
    /// Build and store a commit object; returns its digest.
    ///
    /// Composition is purely syntactic: the tree and parent digests are not
    /// checked against the store. Referential integrity is the caller's
    /// responsibility.
    pub fn commit_tree(
        &self,
        tree: &Digest,
        parent: Option<&Digest>,
        identity: &Identity,
        timestamp: DateTime<FixedOffset>,
        message: &str,
    ) -> Result<Digest> {
        let payload = encode_commit(tree, parent, identity, timestamp, message);
        self.put_object(ObjectKind::Commit, &payload)
    }
}

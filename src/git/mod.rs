//! Git operations abstraction layer
//!
//! This module provides a trait-based abstraction over the repository data
//! the tag resolver consumes, allowing for multiple implementations including
//! real Git repositories and an in-memory mock for testing.
//!
//! # Overview
//!
//! The primary abstraction is the [Repository] trait. The concrete
//! implementations are:
//!
//! - [repository::Git2Repository]: A real implementation using the `git2` crate
//! - [mock::MockRepository]: An in-memory implementation for testing
//!
//! The resolver never walks history itself. It asks the collaborator to
//! resolve references, enumerate tags, and (in ancestry mode) answer
//! ancestor queries.
//!
//! ```rust
//! # use semver_git::git::Repository;
//! # fn example<R: Repository>(repo: &R) -> semver_git::Result<()> {
//! let head = repo.resolve_commit("HEAD")?;
//! for tag in repo.list_tags()? {
//!     println!("{} -> {}", tag.name, tag.target);
//! }
//! println!("HEAD is {} at {}", head.id, head.time());
//! # Ok(())
//! # }
//! ```

pub mod mock;
pub mod repository;

pub use mock::MockRepository;
pub use repository::Git2Repository;

use crate::error::Result;
use git2::Oid;

/// Name, email and timestamp of a committer or tagger
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub name: String,
    pub email: String,
    /// Seconds since the Unix epoch
    pub time: i64,
    /// Timezone offset from UTC in minutes
    pub offset_minutes: i32,
}

impl Identity {
    pub fn new(name: impl Into<String>, email: impl Into<String>, time: i64) -> Self {
        Identity {
            name: name.into(),
            email: email.into(),
            time,
            offset_minutes: 0,
        }
    }
}

/// A resolved commit: stable hash plus committer identity
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitInfo {
    pub id: Oid,
    pub committer: Identity,
}

impl CommitInfo {
    /// Committer timestamp in seconds since the Unix epoch
    pub fn time(&self) -> i64 {
        self.committer.time
    }
}

/// A tag reference as enumerated from the repository.
///
/// `target` is the object the reference points at: the commit itself for a
/// lightweight tag, the tag object for an annotated one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagRef {
    /// Short tag name, e.g. `release/v1.0.0`
    pub name: String,
    /// Full reference name, e.g. `refs/tags/release/v1.0.0`
    pub reference: String,
    pub target: Oid,
}

impl TagRef {
    pub fn new(name: impl Into<String>, target: Oid) -> Self {
        let name = name.into();
        TagRef {
            reference: format!("refs/tags/{}", name),
            name,
            target,
        }
    }
}

/// Message and tagger for an annotated tag
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagAnnotation {
    pub message: String,
    pub tagger: Identity,
}

/// Repository collaborator used by the tag resolver
///
/// All calls are synchronous. Implementations map their underlying errors
/// (like `git2::Error`) to repository errors in [crate::error::SemverGitError].
pub trait Repository {
    /// Resolve a revision to a commit
    ///
    /// Accepts `HEAD`, branch names, tag names (annotated tags are peeled to
    /// their target commit), full reference names, and commit hashes.
    ///
    /// # Returns
    /// * `Ok(CommitInfo)` - The resolved commit
    /// * `Err` - If the revision cannot be resolved to a commit
    fn resolve_commit(&self, spec: &str) -> Result<CommitInfo>;

    /// Enumerate every tag reference in the repository
    fn list_tags(&self) -> Result<Vec<TagRef>>;

    /// Create a tag named `name` at commit `target`
    ///
    /// With an annotation this creates a tag object carrying the message and
    /// tagger; without one it creates a lightweight reference. An existing
    /// tag of the same name is never overwritten and surfaces as an error.
    fn create_tag(&self, name: &str, target: Oid, annotation: Option<&TagAnnotation>)
        -> Result<()>;

    /// Whether `ancestor` is `descendant` or reachable from it through parents
    fn is_ancestor(&self, ancestor: Oid, descendant: Oid) -> Result<bool>;

    /// Push a single tag to the named remote
    fn push_tag(&self, remote: &str, tag_name: &str) -> Result<()>;
}

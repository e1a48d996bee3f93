//! Git operations abstraction layer
//!
//! This module provides a trait-based abstraction over the git operations
//! git-release needs, so the resolver and the orchestrator can run against
//! a real repository ([repository::Git2Repository]) or an in-memory one
//! ([mock::MockRepository]) in tests.
//!
//! The tool is strictly local: it reads history, tags and status, and
//! writes stage/commit/tag. It never touches a remote.

pub mod mock;
pub mod repository;

pub use mock::MockRepository;
pub use repository::Git2Repository;

use std::path::{Path, PathBuf};

use crate::error::Result;

/// Commit information for analysis
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitInfo {
    /// Full commit hash
    pub sha: String,
    /// The commit message
    pub message: String,
}

/// A tag and the commit it points at (annotated tags peeled)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagInfo {
    pub name: String,
    pub target_sha: String,
}

/// Common git operation trait for abstraction
///
/// All methods return [crate::error::Result] so git2 failures surface as
/// [crate::error::ReleaseError::Git]. One invocation owns one repository
/// handle for its whole lifetime; nothing here is shared across threads.
pub trait Repository {
    /// Root of the working tree
    fn workdir(&self) -> &Path;

    /// Commit hash `HEAD` points at, or `None` on an unborn branch
    fn head_sha(&self) -> Result<Option<String>>;

    /// Commits reachable from `HEAD`, newest first, excluding everything
    /// reachable from `anchor_sha` when one is given. The anchor commit
    /// itself is excluded, `HEAD` is included.
    fn commits_since(&self, anchor_sha: Option<&str>) -> Result<Vec<CommitInfo>>;

    /// All tags in the repository with their peeled target commits
    fn tags(&self) -> Result<Vec<TagInfo>>;

    /// Whether the working tree has uncommitted or untracked changes
    fn is_dirty(&self) -> Result<bool>;

    /// Stage the given paths (relative to [Repository::workdir])
    fn stage(&self, paths: &[PathBuf]) -> Result<()>;

    /// Commit the staged changes on `HEAD`, returning the new commit hash
    fn commit(&self, message: &str) -> Result<String>;

    /// Create a lightweight tag pointing at `target_sha`
    fn tag(&self, name: &str, target_sha: &str) -> Result<()>;
}

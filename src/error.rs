use std::path::PathBuf;

use thiserror::Error;

/// Unified error type for git-release operations.
///
/// Every variant is fatal: the user has to fix the repository state before
/// retrying. Expected stops (no significant change, next version already
/// tagged) are not errors and live in [crate::resolver::SkipReason] instead.
#[derive(Error, Debug)]
pub enum ReleaseError {
    #[error("Directory {} or any parent directory do not contain a git working copy", .0.display())]
    NoWorkingCopy(PathBuf),

    #[error("Repository {} is dirty. Please commit your changes.", .0.display())]
    DirtyWorkingCopy(PathBuf),

    #[error("Could not find any project files in {} that have a <Version> defined in their csproj file.", .0.display())]
    NoManifestsFound(PathBuf),

    #[error("Some projects in {} have an inconsistent <Version> defined in their csproj file. Please update all versions to be consistent or remove the <Version> elements from projects that should not be versioned", .0.display())]
    InconsistentVersions(PathBuf),

    #[error("Version parsing error: {0}")]
    Version(String),

    #[error("Git operation failed: {0}")]
    Git(#[from] git2::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience type alias for Results in git-release
pub type Result<T> = std::result::Result<T, ReleaseError>;

impl ReleaseError {
    /// Create a version error with context
    pub fn version(msg: impl Into<String>) -> Self {
        ReleaseError::Version(msg.into())
    }
}

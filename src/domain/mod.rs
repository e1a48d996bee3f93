//! Domain logic - pure business rules independent of git operations

pub mod commit;
pub mod tag;
pub mod version;

pub use commit::ConventionalCommit;
pub use tag::ReleaseTag;
pub use version::{BumpLevel, Version};

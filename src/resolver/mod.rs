//! Version resolution - reconciling tags, manifests and the commit log

pub mod version_resolver;

pub use version_resolver::{
    ReleasePlan, Resolution, SkipReason, VersionResolver, VersionSource,
};

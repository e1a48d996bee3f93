use crate::domain::Version;

/// A git tag that marks a shipped release.
///
/// Only tags of the form `<prefix><major>.<minor>.<patch>` (prefix "v" by
/// default) qualify; anything else is ignored by the resolver.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReleaseTag {
    pub name: String,
    pub version: Version,
    pub target_sha: String,
}

impl ReleaseTag {
    /// Interpret a tag as a release tag, or `None` if it does not match
    /// the `<prefix>X.Y.Z` pattern.
    pub fn parse(name: &str, target_sha: &str, prefix: &str) -> Option<ReleaseTag> {
        let rest = name.strip_prefix(prefix)?;
        let version = Version::parse(rest).ok()?;

        Some(ReleaseTag {
            name: name.to_string(),
            version,
            target_sha: target_sha.to_string(),
        })
    }

    /// Tag name for a version, e.g. 1.2.3 -> "v1.2.3"
    pub fn format(version: Version, prefix: &str) -> String {
        format!("{}{}", prefix, version)
    }
}

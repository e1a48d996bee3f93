use std::collections::HashSet;
use std::fmt;

use crate::domain::{BumpLevel, ConventionalCommit, ReleaseTag, Version};
use crate::error::Result;
use crate::git::Repository;

/// Which of {git tag, project manifest} is authoritative when they
/// disagree about the current version.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum VersionSource {
    /// Whichever of manifest and tag is higher
    #[default]
    Default,
    /// The most recent release tag reachable from HEAD
    GitTag,
    /// The version declared in the project files
    Csproj,
}

impl VersionSource {
    /// Case-insensitive parse; blank input means [VersionSource::Default],
    /// anything unrecognized is `None` so the caller can warn and fall
    /// back.
    pub fn parse(input: &str) -> Option<VersionSource> {
        match input.trim().to_lowercase().as_str() {
            "" | "default" => Some(VersionSource::Default),
            "gittag" => Some(VersionSource::GitTag),
            "csproj" => Some(VersionSource::Csproj),
            _ => None,
        }
    }
}

/// The resolver's output: what to release and why.
///
/// Never persisted anywhere until the orchestrator decides to apply it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReleasePlan {
    pub next_version: Version,
    pub bump: BumpLevel,
    /// Commits justifying the bump, deduplicated, newest first
    pub commits: Vec<ConventionalCommit>,
}

/// Outcome of a resolution attempt.
///
/// The two expected stops are ordinary values, not errors: callers decide
/// on them without exception-style dispatch, and both exit with code 0.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    Release(ReleasePlan),
    Skipped(SkipReason),
}

/// Why a resolution stopped without producing a release.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    NoSignificantChange { current: Version },
    AlreadyTagged { next: Version },
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::NoSignificantChange { current } => write!(
                f,
                "Version was not affected by commits since last release ({}), since you specified to ignore insignificant changes, no action will be performed.",
                current
            ),
            SkipReason::AlreadyTagged { next } => {
                write!(f, "The next version {} has been tagged already.", next)
            }
        }
    }
}

/// Derives the next version from a repository, the manifest version and a
/// version source.
pub struct VersionResolver<'a, R: Repository> {
    repo: &'a R,
    tag_prefix: &'a str,
}

impl<'a, R: Repository> VersionResolver<'a, R> {
    pub fn new(repo: &'a R, tag_prefix: &'a str) -> Self {
        VersionResolver { repo, tag_prefix }
    }

    /// Compute the release plan.
    ///
    /// The baseline version and the commit range are picked per source;
    /// the range is always exclusive of its anchor commit and inclusive of
    /// `HEAD`. An explicit version wins unconditionally. Without one, the
    /// combined bump level of the range decides: `None` either stops
    /// (`ignore_insignificant`) or yields a plan at the unchanged baseline
    /// that the orchestrator will not apply.
    pub fn resolve(
        &self,
        manifest_version: Version,
        source: VersionSource,
        explicit_version: Option<Version>,
        ignore_insignificant: bool,
    ) -> Result<Resolution> {
        let release_tags = self.release_tags()?;
        let latest_tag = self.latest_release_tag(&release_tags)?;

        let (baseline, anchor) = match source {
            VersionSource::Csproj => manifest_baseline(manifest_version, &release_tags),
            VersionSource::GitTag => tag_baseline(latest_tag.as_ref()),
            VersionSource::Default => {
                let tag_version = latest_tag
                    .as_ref()
                    .map(|tag| tag.version)
                    .unwrap_or(Version::ZERO);
                if manifest_version > tag_version {
                    manifest_baseline(manifest_version, &release_tags)
                } else {
                    // on a tie the tag wins: it anchors a commit precisely,
                    // a manifest version does not
                    tag_baseline(latest_tag.as_ref())
                }
            }
        };

        let commits = self.classified_commits(anchor.as_deref())?;

        if let Some(next_version) = explicit_version {
            // manual override always wins; the level is only recorded to
            // label the changelog
            let bump = label_bump(baseline, next_version);
            return Ok(Resolution::Release(ReleasePlan {
                next_version,
                bump,
                commits,
            }));
        }

        let bump = commits
            .iter()
            .map(ConventionalCommit::bump_level)
            .max()
            .unwrap_or(BumpLevel::None);

        if bump == BumpLevel::None {
            if ignore_insignificant {
                return Ok(Resolution::Skipped(SkipReason::NoSignificantChange {
                    current: manifest_version,
                }));
            }
            return Ok(Resolution::Release(ReleasePlan {
                next_version: baseline,
                bump,
                commits,
            }));
        }

        let next_version = baseline.bump(bump);
        if release_tags.iter().any(|tag| tag.version == next_version) {
            return Ok(Resolution::Skipped(SkipReason::AlreadyTagged {
                next: next_version,
            }));
        }

        Ok(Resolution::Release(ReleasePlan {
            next_version,
            bump,
            commits,
        }))
    }

    fn release_tags(&self) -> Result<Vec<ReleaseTag>> {
        Ok(self
            .repo
            .tags()?
            .iter()
            .filter_map(|tag| ReleaseTag::parse(&tag.name, &tag.target_sha, self.tag_prefix))
            .collect())
    }

    /// The most recent release tag reachable from HEAD, found by walking
    /// the history newest first until a tagged commit shows up.
    fn latest_release_tag(&self, tags: &[ReleaseTag]) -> Result<Option<ReleaseTag>> {
        if tags.is_empty() {
            return Ok(None);
        }

        for commit in self.repo.commits_since(None)? {
            // several release tags on one commit: the highest version wins
            let found = tags
                .iter()
                .filter(|tag| tag.target_sha == commit.sha)
                .max_by_key(|tag| tag.version);
            if let Some(tag) = found {
                return Ok(Some(tag.clone()));
            }
        }

        Ok(None)
    }

    /// Classify the commit range, deduplicating by sha while keeping the
    /// newest-first order. Duplicates show up when the same commit is
    /// reachable through several parents in a merge-heavy history.
    fn classified_commits(&self, anchor_sha: Option<&str>) -> Result<Vec<ConventionalCommit>> {
        let mut seen = HashSet::new();
        Ok(self
            .repo
            .commits_since(anchor_sha)?
            .into_iter()
            .filter(|commit| seen.insert(commit.sha.clone()))
            .map(|commit| ConventionalCommit::parse(commit.sha.as_str(), &commit.message))
            .collect())
    }
}

/// Baseline and range when the manifest is authoritative: anchored at the
/// tag that shipped the manifest version, or the full history when that
/// version was never tagged.
fn manifest_baseline(
    manifest_version: Version,
    tags: &[ReleaseTag],
) -> (Version, Option<String>) {
    let anchor = tags
        .iter()
        .find(|tag| tag.version == manifest_version)
        .map(|tag| tag.target_sha.clone());
    (manifest_version, anchor)
}

/// Baseline and range when the latest reachable tag is authoritative.
fn tag_baseline(latest: Option<&ReleaseTag>) -> (Version, Option<String>) {
    match latest {
        Some(tag) => (tag.version, Some(tag.target_sha.clone())),
        None => (Version::ZERO, None),
    }
}

/// Changelog label for an explicitly requested version.
fn label_bump(baseline: Version, next: Version) -> BumpLevel {
    if next.major != baseline.major {
        BumpLevel::Major
    } else if next.minor != baseline.minor {
        BumpLevel::Minor
    } else {
        BumpLevel::Patch
    }
}

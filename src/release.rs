//! Release orchestration.
//!
//! Drives one release start to finish: discover the working copy, validate
//! its state, resolve the next version, compose the changelog and apply
//! file, commit and tag side effects - or stop early. Everything runs
//! synchronously against a single repository handle; there is no partial
//! application beyond what an interrupted process leaves behind, which the
//! next run's dirty check refuses to build on.

use std::path::PathBuf;

use chrono::Local;

use crate::changelog::{self, Changelog};
use crate::config::Config;
use crate::domain::{BumpLevel, ReleaseTag, Version};
use crate::error::{ReleaseError, Result};
use crate::git::{Git2Repository, Repository};
use crate::manifest;
use crate::reporter::Reporter;
use crate::resolver::{Resolution, SkipReason, VersionResolver, VersionSource};

/// Everything the orchestrator needs to know for one invocation.
#[derive(Debug, Clone)]
pub struct ReleaseOptions {
    /// Where to start looking for the working copy
    pub working_dir: PathBuf,
    /// Report the plan without touching anything
    pub dry_run: bool,
    pub skip_dirty_check: bool,
    /// Update files but create neither commit nor tag
    pub skip_commit: bool,
    /// Manual version override
    pub release_as: Option<Version>,
    pub version_source: VersionSource,
    /// Stop gracefully when no significant commit is found
    pub ignore_insignificant: bool,
    /// Changelog lists every commit, not just features/fixes/breaking
    pub changelog_all: bool,
}

impl Default for ReleaseOptions {
    fn default() -> Self {
        ReleaseOptions {
            working_dir: PathBuf::from("."),
            dry_run: false,
            skip_dirty_check: false,
            skip_commit: false,
            release_as: None,
            version_source: VersionSource::Default,
            ignore_insignificant: false,
            changelog_all: false,
        }
    }
}

/// How an invocation ended.
///
/// Expected stops are values here, not errors; every variant exits 0.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReleaseOutcome {
    /// Files rewritten; commit and tag created unless skipped
    Applied {
        version: Version,
        tag: Option<String>,
    },
    /// Dry run: the plan was reported, nothing was touched
    Planned { version: Version },
    /// Nothing significant happened and no ignore flag was given
    NoOp { version: Version },
    /// One of the two graceful resolver stops
    Skipped(SkipReason),
}

/// Discover the working copy and run the release against it.
pub fn run(options: &ReleaseOptions, config: &Config, reporter: &Reporter) -> Result<ReleaseOutcome> {
    let repo = Git2Repository::discover(&options.working_dir)?;
    run_with_repo(&repo, options, config, reporter)
}

/// The state machine proper, generic over the repository implementation.
pub fn run_with_repo<R: Repository>(
    repo: &R,
    options: &ReleaseOptions,
    config: &Config,
    reporter: &Reporter,
) -> Result<ReleaseOutcome> {
    let root = repo.workdir().to_path_buf();

    // Validating
    if !options.skip_dirty_check && repo.is_dirty()? {
        return Err(ReleaseError::DirtyWorkingCopy(root));
    }

    let manifests = manifest::discover(&root)?;
    let current = manifest::consistent_version(&manifests, &root)?;
    reporter.message(&format!(
        "Discovered {} versionable projects",
        manifests.len()
    ));

    // Resolving
    let resolver = VersionResolver::new(repo, &config.tag_prefix);
    let plan = match resolver.resolve(
        current,
        options.version_source,
        options.release_as,
        options.ignore_insignificant,
    )? {
        Resolution::Skipped(reason) => {
            reporter.message(&reason.to_string());
            return Ok(ReleaseOutcome::Skipped(reason));
        }
        Resolution::Release(plan) => plan,
    };

    if plan.bump == BumpLevel::None && options.release_as.is_none() {
        reporter.message(&format!(
            "Version was not affected by commits since last release ({})",
            current
        ));
        return Ok(ReleaseOutcome::NoOp { version: current });
    }

    reporter.message(&format!(
        "Bumping version from {} to {}",
        current, plan.next_version
    ));

    // Composing
    let section = changelog::render(&plan, options.changelog_all, Local::now().date_naive());

    // Applying
    if options.dry_run {
        reporter.message("Dry run requested: no file, commit or tag was touched");
        return Ok(ReleaseOutcome::Planned {
            version: plan.next_version,
        });
    }

    for project in &manifests {
        manifest::write_version(project, plan.next_version)?;
    }

    let changelog_file = Changelog::at(&root, &config.changelog);
    changelog_file.prepend(&section)?;
    reporter.message(&format!("Updated {}", config.changelog));

    // Committing and Tagging
    if options.skip_commit {
        reporter.success(&format!(
            "Version {} written, commit and tag skipped",
            plan.next_version
        ));
        return Ok(ReleaseOutcome::Applied {
            version: plan.next_version,
            tag: None,
        });
    }

    let mut staged: Vec<PathBuf> = manifests
        .iter()
        .map(|project| {
            project
                .path
                .strip_prefix(&root)
                .unwrap_or(&project.path)
                .to_path_buf()
        })
        .collect();
    staged.push(PathBuf::from(&config.changelog));

    repo.stage(&staged)?;
    let sha = repo.commit(&config.commit.format(plan.next_version))?;

    let tag_name = ReleaseTag::format(plan.next_version, &config.tag_prefix);
    repo.tag(&tag_name, &sha)?;

    reporter.success(&format!("Released {} (tag {})", plan.next_version, tag_name));
    Ok(ReleaseOutcome::Applied {
        version: plan.next_version,
        tag: Some(tag_name),
    })
}

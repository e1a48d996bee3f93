//! Changelog composition and file handling.
//!
//! Rendering is a pure function of the release plan; the orchestrator
//! injects the release date so the output stays deterministic under test.
//! Existing changelog content is never reparsed - a new section is only
//! ever prepended.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;

use crate::domain::{BumpLevel, ConventionalCommit};
use crate::error::Result;
use crate::resolver::ReleasePlan;

/// Render the changelog section for a plan.
///
/// Sections appear in fixed order - Features, Bug Fixes, BREAKING CHANGES
/// and, when `include_all` is set, Other - and a section with no entries
/// is omitted entirely. Entries keep the plan's newest-first order.
pub fn render(plan: &ReleasePlan, include_all: bool, date: NaiveDate) -> String {
    let mut output = format!(
        "## {} ({})\n",
        plan.next_version,
        date.format("%Y-%m-%d")
    );

    let features: Vec<&ConventionalCommit> = plan
        .commits
        .iter()
        .filter(|c| !c.is_breaking_change && c.bump_level() == BumpLevel::Minor)
        .collect();
    let fixes: Vec<&ConventionalCommit> = plan
        .commits
        .iter()
        .filter(|c| !c.is_breaking_change && c.bump_level() == BumpLevel::Patch)
        .collect();
    let breaking: Vec<&ConventionalCommit> = plan
        .commits
        .iter()
        .filter(|c| c.is_breaking_change)
        .collect();

    push_section(&mut output, "Features", &features);
    push_section(&mut output, "Bug Fixes", &fixes);
    push_section(&mut output, "BREAKING CHANGES", &breaking);

    if include_all {
        let other: Vec<&ConventionalCommit> = plan
            .commits
            .iter()
            .filter(|c| !c.is_breaking_change && c.bump_level() == BumpLevel::None)
            .collect();
        push_section(&mut output, "Other", &other);
    }

    output
}

fn push_section(output: &mut String, title: &str, commits: &[&ConventionalCommit]) {
    if commits.is_empty() {
        return;
    }

    output.push_str(&format!("\n### {}\n\n", title));
    for commit in commits {
        output.push_str(&entry(commit));
    }
}

fn entry(commit: &ConventionalCommit) -> String {
    match &commit.scope {
        Some(scope) => format!(
            "* **{}:** {} ({})\n",
            scope,
            commit.description,
            commit.short_sha()
        ),
        None => format!("* {} ({})\n", commit.description, commit.short_sha()),
    }
}

/// The changelog file of a working copy.
pub struct Changelog {
    pub path: PathBuf,
}

impl Changelog {
    pub fn at(root: &Path, file_name: &str) -> Changelog {
        Changelog {
            path: root.join(file_name),
        }
    }

    /// Current content, empty when the file does not exist yet
    pub fn read(&self) -> Result<String> {
        match fs::read_to_string(&self.path) {
            Ok(content) => Ok(content),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(String::new()),
            Err(e) => Err(e.into()),
        }
    }

    /// Insert a new section above the existing content.
    pub fn prepend(&self, section: &str) -> Result<()> {
        let existing = self.read()?;
        let content = if existing.is_empty() {
            format!("{}\n", section.trim_end())
        } else {
            format!("{}\n\n{}", section.trim_end(), existing)
        };
        fs::write(&self.path, content)?;
        Ok(())
    }
}

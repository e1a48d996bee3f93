//! Project manifest store.
//!
//! A versionable project is a `.csproj` file declaring a `<Version>`
//! element. All manifests in a working copy must agree on that version;
//! disagreement is a hard error, never something the resolver papers over.

use std::fs;
use std::path::{Path, PathBuf};

use regex::Regex;
use walkdir::WalkDir;

use crate::domain::Version;
use crate::error::{ReleaseError, Result};

const VERSION_ELEMENT: &str = r"<Version>\s*([^<]*?)\s*</Version>";

/// A project file and the version it declares
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectManifest {
    pub path: PathBuf,
    pub version: Version,
}

/// Discover every versionable project under `root`.
///
/// Walks the tree skipping dot-directories and build output (`bin`,
/// `obj`). Project files without a parsable `<Version>` element are not
/// versionable and are silently ignored.
pub fn discover(root: &Path) -> Result<Vec<ProjectManifest>> {
    let version_re = Regex::new(VERSION_ELEMENT).expect("valid version element pattern");
    let mut manifests = Vec::new();

    for entry in WalkDir::new(root)
        .follow_links(false)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| e.depth() == 0 || !is_ignored(e.path()))
    {
        let entry = entry.map_err(|e| std::io::Error::other(e.to_string()))?;
        if !entry.file_type().is_file() {
            continue;
        }
        if entry.path().extension().map_or(true, |ext| ext != "csproj") {
            continue;
        }

        let content = fs::read_to_string(entry.path())?;
        let declared = version_re
            .captures(&content)
            .and_then(|captures| captures.get(1))
            .and_then(|m| Version::parse(m.as_str()).ok());

        if let Some(version) = declared {
            manifests.push(ProjectManifest {
                path: entry.path().to_path_buf(),
                version,
            });
        }
    }

    Ok(manifests)
}

fn is_ignored(path: &Path) -> bool {
    path.file_name()
        .and_then(|name| name.to_str())
        .is_some_and(|name| {
            (name.starts_with('.') && name.len() > 1) || name == "bin" || name == "obj"
        })
}

/// The single version all manifests agree on.
///
/// Fails with [ReleaseError::NoManifestsFound] when the list is empty and
/// [ReleaseError::InconsistentVersions] when any two manifests disagree -
/// before any file is touched.
pub fn consistent_version(manifests: &[ProjectManifest], root: &Path) -> Result<Version> {
    let first = manifests
        .first()
        .ok_or_else(|| ReleaseError::NoManifestsFound(root.to_path_buf()))?;

    if manifests.iter().any(|m| m.version != first.version) {
        return Err(ReleaseError::InconsistentVersions(root.to_path_buf()));
    }

    Ok(first.version)
}

/// Rewrite the manifest's `<Version>` element in place, leaving the rest
/// of the file untouched.
pub fn write_version(manifest: &ProjectManifest, version: Version) -> Result<()> {
    let version_re = Regex::new(VERSION_ELEMENT).expect("valid version element pattern");

    let content = fs::read_to_string(&manifest.path)?;
    let updated = version_re.replace(&content, format!("<Version>{}</Version>", version));
    fs::write(&manifest.path, updated.as_bytes())?;

    Ok(())
}

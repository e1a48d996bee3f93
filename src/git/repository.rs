use std::path::{Path, PathBuf};

use git2::{Oid, Repository as Git2Repo, StatusOptions};

use crate::error::{ReleaseError, Result};
use crate::git::{CommitInfo, TagInfo};

/// Wrapper around git2::Repository with our trait interface
pub struct Git2Repository {
    repo: Git2Repo,
    workdir: PathBuf,
}

impl Git2Repository {
    /// Discover the working copy containing `start_dir`, walking parent
    /// directories up to the filesystem root.
    pub fn discover<P: AsRef<Path>>(start_dir: P) -> Result<Self> {
        let start = start_dir.as_ref();
        let repo = Git2Repo::discover(start)
            .map_err(|_| ReleaseError::NoWorkingCopy(start.to_path_buf()))?;

        // Bare repositories have no working tree to version
        let workdir = repo
            .workdir()
            .ok_or_else(|| ReleaseError::NoWorkingCopy(start.to_path_buf()))?
            .to_path_buf();

        Ok(Git2Repository { repo, workdir })
    }
}

impl super::Repository for Git2Repository {
    fn workdir(&self) -> &Path {
        &self.workdir
    }

    fn head_sha(&self) -> Result<Option<String>> {
        match self.repo.head() {
            Ok(head) => Ok(head.target().map(|oid| oid.to_string())),
            Err(e)
                if e.code() == git2::ErrorCode::UnbornBranch
                    || e.code() == git2::ErrorCode::NotFound =>
            {
                Ok(None)
            }
            Err(e) => Err(e.into()),
        }
    }

    fn commits_since(&self, anchor_sha: Option<&str>) -> Result<Vec<CommitInfo>> {
        if self.head_sha()?.is_none() {
            return Ok(Vec::new());
        }

        let mut revwalk = self.repo.revwalk()?;
        revwalk.set_sorting(git2::Sort::TOPOLOGICAL | git2::Sort::TIME)?;
        revwalk.push_head()?;

        if let Some(anchor) = anchor_sha {
            // Hide everything reachable from the anchor: the range is
            // exclusive of the anchor commit and inclusive of HEAD.
            revwalk.hide(Oid::from_str(anchor)?)?;
        }

        let mut commits = Vec::new();
        for oid in revwalk {
            let oid = oid?;
            let commit = self.repo.find_commit(oid)?;
            commits.push(CommitInfo {
                sha: oid.to_string(),
                message: commit.message().unwrap_or("").to_string(),
            });
        }

        Ok(commits)
    }

    fn tags(&self) -> Result<Vec<TagInfo>> {
        let names = self.repo.tag_names(None)?;
        let mut tags = Vec::new();

        for name in names.iter().flatten() {
            // Peel to the commit so annotated and lightweight tags behave
            // the same.
            if let Ok(reference) = self.repo.find_reference(&format!("refs/tags/{}", name)) {
                if let Ok(object) = reference.peel(git2::ObjectType::Commit) {
                    tags.push(TagInfo {
                        name: name.to_string(),
                        target_sha: object.id().to_string(),
                    });
                }
            }
        }

        Ok(tags)
    }

    fn is_dirty(&self) -> Result<bool> {
        let mut options = StatusOptions::new();
        options.include_untracked(true).include_ignored(false);

        let statuses = self.repo.statuses(Some(&mut options))?;
        Ok(!statuses.is_empty())
    }

    fn stage(&self, paths: &[PathBuf]) -> Result<()> {
        let mut index = self.repo.index()?;
        for path in paths {
            index.add_path(path)?;
        }
        index.write()?;
        Ok(())
    }

    fn commit(&self, message: &str) -> Result<String> {
        let signature = self.repo.signature()?;

        let mut index = self.repo.index()?;
        let tree_id = index.write_tree()?;
        let tree = self.repo.find_tree(tree_id)?;

        let parent = match self.head_sha()? {
            Some(sha) => Some(self.repo.find_commit(Oid::from_str(&sha)?)?),
            None => None,
        };
        let parents: Vec<&git2::Commit> = parent.iter().collect();

        let oid = self.repo.commit(
            Some("HEAD"),
            &signature,
            &signature,
            message,
            &tree,
            &parents,
        )?;

        Ok(oid.to_string())
    }

    fn tag(&self, name: &str, target_sha: &str) -> Result<()> {
        let object = self.repo.find_object(Oid::from_str(target_sha)?, None)?;
        self.repo.tag_lightweight(name, &object, false)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_discover_fails_outside_a_repository() {
        let dir = tempfile::tempdir().unwrap();
        let result = Git2Repository::discover(dir.path());
        assert!(matches!(result, Err(ReleaseError::NoWorkingCopy(_))));
    }
}

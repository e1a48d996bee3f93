use std::cell::RefCell;
use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::git::{CommitInfo, Repository, TagInfo};

/// Mock repository for testing without actual git operations
///
/// History is an ordered list, newest first, the way a revwalk from `HEAD`
/// yields it. Write operations are recorded so tests can assert on them.
pub struct MockRepository {
    workdir: PathBuf,
    commits: Vec<CommitInfo>,
    tags: Vec<TagInfo>,
    dirty: bool,
    staged: RefCell<Vec<PathBuf>>,
    created_commits: RefCell<Vec<String>>,
    created_tags: RefCell<Vec<TagInfo>>,
}

impl MockRepository {
    /// Create a new empty mock repository
    pub fn new() -> Self {
        MockRepository {
            workdir: PathBuf::from("."),
            commits: Vec::new(),
            tags: Vec::new(),
            dirty: false,
            staged: RefCell::new(Vec::new()),
            created_commits: RefCell::new(Vec::new()),
            created_tags: RefCell::new(Vec::new()),
        }
    }

    pub fn with_workdir(mut self, workdir: impl Into<PathBuf>) -> Self {
        self.workdir = workdir.into();
        self
    }

    /// Add a commit on top of the current history (becomes the new HEAD)
    pub fn add_commit(&mut self, sha: impl Into<String>, message: impl Into<String>) {
        self.commits.insert(
            0,
            CommitInfo {
                sha: sha.into(),
                message: message.into(),
            },
        );
    }

    /// Add a tag pointing at a commit
    pub fn add_tag(&mut self, name: impl Into<String>, target_sha: impl Into<String>) {
        self.tags.push(TagInfo {
            name: name.into(),
            target_sha: target_sha.into(),
        });
    }

    pub fn set_dirty(&mut self, dirty: bool) {
        self.dirty = dirty;
    }

    /// Paths staged through the trait
    pub fn staged_paths(&self) -> Vec<PathBuf> {
        self.staged.borrow().clone()
    }

    /// Messages of commits created through the trait
    pub fn created_commits(&self) -> Vec<String> {
        self.created_commits.borrow().clone()
    }

    /// Tags created through the trait
    pub fn created_tags(&self) -> Vec<TagInfo> {
        self.created_tags.borrow().clone()
    }
}

impl Default for MockRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl Repository for MockRepository {
    fn workdir(&self) -> &Path {
        &self.workdir
    }

    fn head_sha(&self) -> Result<Option<String>> {
        Ok(self.commits.first().map(|c| c.sha.clone()))
    }

    fn commits_since(&self, anchor_sha: Option<&str>) -> Result<Vec<CommitInfo>> {
        let commits = match anchor_sha {
            Some(anchor) => self
                .commits
                .iter()
                .take_while(|c| c.sha != anchor)
                .cloned()
                .collect(),
            None => self.commits.clone(),
        };
        Ok(commits)
    }

    fn tags(&self) -> Result<Vec<TagInfo>> {
        Ok(self.tags.clone())
    }

    fn is_dirty(&self) -> Result<bool> {
        Ok(self.dirty)
    }

    fn stage(&self, paths: &[PathBuf]) -> Result<()> {
        self.staged.borrow_mut().extend(paths.iter().cloned());
        Ok(())
    }

    fn commit(&self, message: &str) -> Result<String> {
        let sha = format!("mock{:07}", self.created_commits.borrow().len() + 1);
        self.created_commits.borrow_mut().push(message.to_string());
        Ok(sha)
    }

    fn tag(&self, name: &str, target_sha: &str) -> Result<()> {
        self.created_tags.borrow_mut().push(TagInfo {
            name: name.to_string(),
            target_sha: target_sha.to_string(),
        });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mock_repository_history_is_newest_first() {
        let mut repo = MockRepository::new();
        repo.add_commit("aaa", "feat: first");
        repo.add_commit("bbb", "fix: second");

        assert_eq!(repo.head_sha().unwrap(), Some("bbb".to_string()));

        let all = repo.commits_since(None).unwrap();
        assert_eq!(all[0].sha, "bbb");
        assert_eq!(all[1].sha, "aaa");
    }

    #[test]
    fn test_mock_repository_commits_since_anchor() {
        let mut repo = MockRepository::new();
        repo.add_commit("aaa", "feat: first");
        repo.add_commit("bbb", "fix: second");
        repo.add_commit("ccc", "fix: third");

        let since = repo.commits_since(Some("aaa")).unwrap();
        assert_eq!(since.len(), 2);
        assert_eq!(since[0].sha, "ccc");
        assert_eq!(since[1].sha, "bbb");
    }

    #[test]
    fn test_mock_repository_records_writes() {
        let repo = MockRepository::new();

        repo.stage(&[PathBuf::from("a.csproj")]).unwrap();
        let sha = repo.commit("chore(release): 1.0.0").unwrap();
        repo.tag("v1.0.0", &sha).unwrap();

        assert_eq!(repo.staged_paths(), vec![PathBuf::from("a.csproj")]);
        assert_eq!(repo.created_commits(), vec!["chore(release): 1.0.0"]);
        assert_eq!(repo.created_tags()[0].name, "v1.0.0");
        assert_eq!(repo.created_tags()[0].target_sha, sha);
    }

    #[test]
    fn test_mock_repository_tags() {
        let mut repo = MockRepository::new();
        repo.add_tag("v1.0.0", "aaa");

        let tags = repo.tags().unwrap();
        assert_eq!(tags.len(), 1);
        assert_eq!(tags[0].name, "v1.0.0");
    }
}

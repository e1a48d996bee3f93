// Full release flows against real git repositories: discovery, validation,
// apply, commit and tag, plus the idempotence guarantee.

use std::fs;
use std::path::Path;

use git2::Repository;
use serial_test::serial;
use tempfile::TempDir;

use git_release::config::Config;
use git_release::domain::Version;
use git_release::error::ReleaseError;
use git_release::release::{self, ReleaseOptions, ReleaseOutcome};
use git_release::reporter::Reporter;

fn init_repo() -> (TempDir, Repository) {
    let dir = TempDir::new().expect("Could not create temp dir");
    let repo = Repository::init(dir.path()).expect("Could not init git repo");

    {
        let mut config = repo.config().expect("Could not get config");
        config.set_str("user.name", "Gitty McGitface").unwrap();
        config.set_str("user.email", "noreply@git.com").unwrap();
    }

    (dir, repo)
}

fn write_project(root: &Path, name: &str, version: &str) {
    let path = root.join(name);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(
        &path,
        format!(
            "<Project Sdk=\"Microsoft.NET.Sdk\">\n  <PropertyGroup>\n    <Version>{}</Version>\n  </PropertyGroup>\n</Project>\n",
            version
        ),
    )
    .unwrap();
}

fn commit_all(repo: &Repository, message: &str) -> git2::Oid {
    let mut index = repo.index().unwrap();
    index
        .add_all(["*"], git2::IndexAddOption::DEFAULT, None)
        .unwrap();
    index.write().unwrap();

    let tree_id = index.write_tree().unwrap();
    let tree = repo.find_tree(tree_id).unwrap();
    let signature = repo.signature().unwrap();

    let parent = repo
        .head()
        .ok()
        .and_then(|head| head.target())
        .map(|oid| repo.find_commit(oid).unwrap());
    let parents: Vec<&git2::Commit> = parent.iter().collect();

    repo.commit(Some("HEAD"), &signature, &signature, message, &tree, &parents)
        .unwrap()
}

fn run_in(dir: &Path, options: ReleaseOptions) -> git_release::Result<ReleaseOutcome> {
    let options = ReleaseOptions {
        working_dir: dir.to_path_buf(),
        ..options
    };
    release::run(&options, &Config::default(), &Reporter::new(true))
}

#[test]
fn test_full_release_flow() {
    let (dir, repo) = init_repo();
    write_project(dir.path(), "app/app.csproj", "1.0.0");
    write_project(dir.path(), "lib/lib.csproj", "1.0.0");
    commit_all(&repo, "feat: initial");
    repo.tag_lightweight(
        "v1.0.0",
        repo.head().unwrap().peel_to_commit().unwrap().as_object(),
        false,
    )
    .unwrap();

    fs::write(dir.path().join("feature.txt"), "new").unwrap();
    commit_all(&repo, "feat(core): add feature");
    fs::write(dir.path().join("bugfix.txt"), "fixed").unwrap();
    commit_all(&repo, "fix: squash bug");

    let outcome = run_in(dir.path(), ReleaseOptions::default()).unwrap();
    assert_eq!(
        outcome,
        ReleaseOutcome::Applied {
            version: Version::new(1, 1, 0),
            tag: Some("v1.1.0".to_string()),
        }
    );

    // both manifests rewritten to the same version
    for name in ["app/app.csproj", "lib/lib.csproj"] {
        let content = fs::read_to_string(dir.path().join(name)).unwrap();
        assert!(content.contains("<Version>1.1.0</Version>"), "{}", name);
    }

    // changelog carries both sections, features first
    let changelog = fs::read_to_string(dir.path().join("CHANGELOG.md")).unwrap();
    assert!(changelog.starts_with("## 1.1.0"));
    let features = changelog.find("### Features").unwrap();
    let fixes = changelog.find("### Bug Fixes").unwrap();
    assert!(features < fixes);
    assert!(changelog.contains("**core:** add feature"));
    assert!(changelog.contains("squash bug"));

    // release commit exists, the working copy is clean again and the tag
    // points at the release commit
    let head = repo.head().unwrap().peel_to_commit().unwrap();
    assert_eq!(head.message().unwrap(), "chore(release): 1.1.0");

    let tag_target = repo
        .find_reference("refs/tags/v1.1.0")
        .unwrap()
        .peel_to_commit()
        .unwrap();
    assert_eq!(tag_target.id(), head.id());

    let statuses = repo.statuses(None).unwrap();
    assert!(statuses.is_empty());
}

#[test]
fn test_second_run_without_new_commits_is_a_noop() {
    let (dir, repo) = init_repo();
    write_project(dir.path(), "app.csproj", "1.0.0");
    commit_all(&repo, "fix: commit some fix");

    let first = run_in(dir.path(), ReleaseOptions::default()).unwrap();
    assert!(matches!(first, ReleaseOutcome::Applied { .. }));
    let head_after_release = repo.head().unwrap().target().unwrap();

    // nothing new happened: the second run must not create a commit
    let second = run_in(dir.path(), ReleaseOptions::default()).unwrap();
    assert_eq!(
        second,
        ReleaseOutcome::NoOp {
            version: Version::new(1, 0, 1)
        }
    );
    assert_eq!(repo.head().unwrap().target().unwrap(), head_after_release);

    // and with the ignore flag it stops gracefully instead
    let third = run_in(
        dir.path(),
        ReleaseOptions {
            ignore_insignificant: true,
            ..ReleaseOptions::default()
        },
    )
    .unwrap();
    assert!(matches!(third, ReleaseOutcome::Skipped(_)));
    assert_eq!(repo.head().unwrap().target().unwrap(), head_after_release);
}

#[test]
fn test_dirty_working_copy_is_refused() {
    let (dir, repo) = init_repo();
    write_project(dir.path(), "app.csproj", "1.0.0");
    commit_all(&repo, "feat: initial");

    // an uncommitted file makes the working copy dirty
    fs::write(dir.path().join("uncommitted.txt"), "wip").unwrap();

    let result = run_in(dir.path(), ReleaseOptions::default());
    assert!(matches!(result, Err(ReleaseError::DirtyWorkingCopy(_))));

    // with the skip flag the same state is accepted
    let outcome = run_in(
        dir.path(),
        ReleaseOptions {
            skip_dirty_check: true,
            dry_run: true,
            ..ReleaseOptions::default()
        },
    )
    .unwrap();
    assert!(matches!(outcome, ReleaseOutcome::Planned { .. }));
}

#[test]
fn test_skip_commit_leaves_the_working_copy_dirty() {
    let (dir, repo) = init_repo();
    write_project(dir.path(), "app.csproj", "1.0.0");
    commit_all(&repo, "fix: a bug");

    let outcome = run_in(
        dir.path(),
        ReleaseOptions {
            skip_commit: true,
            ..ReleaseOptions::default()
        },
    )
    .unwrap();
    assert_eq!(
        outcome,
        ReleaseOutcome::Applied {
            version: Version::new(1, 0, 1),
            tag: None,
        }
    );

    // files were rewritten but no commit or tag was created; the next
    // plain run refuses on the dirty tree, which is the safety net
    assert!(fs::read_to_string(dir.path().join("app.csproj"))
        .unwrap()
        .contains("<Version>1.0.1</Version>"));
    assert!(repo.find_reference("refs/tags/v1.0.1").is_err());

    let result = run_in(dir.path(), ReleaseOptions::default());
    assert!(matches!(result, Err(ReleaseError::DirtyWorkingCopy(_))));
}

#[test]
fn test_no_working_copy() {
    let dir = TempDir::new().unwrap();
    let result = run_in(dir.path(), ReleaseOptions::default());
    assert!(matches!(result, Err(ReleaseError::NoWorkingCopy(_))));
}

#[test]
fn test_no_versionable_projects() {
    let (dir, repo) = init_repo();
    fs::write(dir.path().join("README.md"), "readme").unwrap();
    commit_all(&repo, "docs: readme");

    let result = run_in(dir.path(), ReleaseOptions::default());
    assert!(matches!(result, Err(ReleaseError::NoManifestsFound(_))));
}

#[test]
fn test_inconsistent_project_versions() {
    let (dir, repo) = init_repo();
    write_project(dir.path(), "project1/project1.csproj", "1.1.0");
    write_project(dir.path(), "project2/project2.csproj", "2.0.0");
    commit_all(&repo, "feat: initial");

    let result = run_in(dir.path(), ReleaseOptions::default());
    assert!(matches!(result, Err(ReleaseError::InconsistentVersions(_))));

    // nothing was touched
    assert!(fs::read_to_string(dir.path().join("project1/project1.csproj"))
        .unwrap()
        .contains("<Version>1.1.0</Version>"));
    assert!(!dir.path().join("CHANGELOG.md").exists());
}

#[test]
fn test_changelog_accumulates_releases() {
    let (dir, repo) = init_repo();
    write_project(dir.path(), "app.csproj", "0.1.0");
    commit_all(&repo, "feat: first feature");

    run_in(dir.path(), ReleaseOptions::default()).unwrap();

    fs::write(dir.path().join("more.txt"), "more").unwrap();
    commit_all(&repo, "fix: follow-up fix");

    run_in(dir.path(), ReleaseOptions::default()).unwrap();

    let changelog = fs::read_to_string(dir.path().join("CHANGELOG.md")).unwrap();
    let newer = changelog.find("## 0.2.1").unwrap();
    let older = changelog.find("## 0.2.0").unwrap();
    assert!(newer < older, "newest release section on top");
    assert!(changelog.contains("first feature"));
    assert!(changelog.contains("follow-up fix"));
}

#[test]
#[serial]
fn test_discovery_walks_up_from_a_subdirectory() {
    let (dir, repo) = init_repo();
    write_project(dir.path(), "app.csproj", "1.0.0");
    let nested = dir.path().join("src").join("deep");
    fs::create_dir_all(&nested).unwrap();
    fs::write(nested.join("code.txt"), "code").unwrap();
    commit_all(&repo, "fix: a bug");

    // run from inside the nested directory, as a user would
    let original_dir = std::env::current_dir().unwrap();
    std::env::set_current_dir(&nested).unwrap();

    let outcome = release::run(
        &ReleaseOptions {
            working_dir: std::path::PathBuf::from("."),
            dry_run: true,
            ..ReleaseOptions::default()
        },
        &Config::default(),
        &Reporter::new(true),
    );

    std::env::set_current_dir(original_dir).unwrap();

    assert_eq!(
        outcome.unwrap(),
        ReleaseOutcome::Planned {
            version: Version::new(1, 0, 1)
        }
    );
}

use std::path::Path;
use std::process::Command;
use std::time::Duration;

use gutter_git::{GitCli, GitError, GitVersion};
use tempfile::TempDir;

fn git_available() -> bool {
    Command::new("git")
        .arg("--version")
        .output()
        .is_ok_and(|output| output.status.success())
}

fn git(dir: &Path, args: &[&str]) {
    let status = Command::new("git")
        .args(["-c", "user.name=Test", "-c", "user.email=test@example.com"])
        .args(args)
        .current_dir(dir)
        .env("GIT_CONFIG_NOSYSTEM", "1")
        .status()
        .expect("run git");
    assert!(status.success(), "git {args:?} failed");
}

fn fixture_repo() -> TempDir {
    let temp = TempDir::new().expect("tempdir");
    git(temp.path(), &["init", "-q", "-b", "main"]);
    std::fs::write(temp.path().join("file.txt"), "one\ntwo\n").expect("write file");
    git(temp.path(), &["add", "file.txt"]);
    git(temp.path(), &["commit", "-q", "-m", "Initial commit"]);
    git(temp.path(), &["tag", "v1.0"]);
    temp
}

#[test]
fn real_git_reports_version_and_content() {
    if !git_available() {
        return;
    }
    let repo = fixture_repo();
    let cli = GitCli::default();

    let version = cli.version().expect("git version");
    assert!(version >= GitVersion::new(1, 0, 0));

    let content = cli
        .show(repo.path(), "HEAD", "file.txt")
        .expect("show file")
        .expect("file exists at HEAD");
    assert_eq!(content, "one\ntwo\n");

    let missing = cli.show(repo.path(), "HEAD", "absent.txt").expect("show missing");
    assert!(missing.is_none());
}

#[test]
fn real_git_lists_revisions_and_status() {
    if !git_available() {
        return;
    }
    let repo = fixture_repo();
    std::fs::write(repo.path().join("file.txt"), "one\n2\n").expect("modify file");
    let cli = GitCli::default();

    let commits = cli.commits(repo.path(), 10).expect("list commits");
    assert_eq!(commits.len(), 1);
    assert_eq!(commits[0].summary.as_deref(), Some("Initial commit"));

    let file_commits = cli
        .file_commits(repo.path(), "file.txt", 10)
        .expect("list file commits");
    assert_eq!(file_commits[0].reference, commits[0].reference);

    let branches = cli.branches(repo.path()).expect("list branches");
    assert_eq!(branches[0].reference, "main");

    let tags = cli.tags(repo.path()).expect("list tags");
    assert_eq!(tags[0].reference, "v1.0");

    let status = cli.status(repo.path(), "file.txt").expect("status");
    assert_eq!(status.branch.as_deref(), Some("main"));
    assert_eq!(status.status_text(), "modified");
}

#[test]
fn missing_binary_fails_to_spawn() {
    let cli = GitCli::new("/nonexistent/git-binary");
    assert!(matches!(cli.version(), Err(GitError::Spawn { .. })));
}

#[cfg(unix)]
mod mock {
    use std::fs;
    use std::os::unix::fs::PermissionsExt;
    use std::path::PathBuf;

    use super::*;

    fn mock_git(dir: &TempDir, body: &str) -> PathBuf {
        let path = dir.path().join("git");
        fs::write(&path, format!("#!/bin/sh\n{body}\n")).expect("write mock git");
        let mut perms = fs::metadata(&path).expect("mock metadata").permissions();
        perms.set_mode(0o755);
        fs::set_permissions(&path, perms).expect("chmod mock git");
        path
    }

    #[test]
    fn version_is_parsed_from_mock() {
        let dir = TempDir::new().expect("tempdir");
        let binary = mock_git(&dir, "echo 'git version 2.40.1 (Apple Git-143)'");
        let version = GitCli::new(binary).version().expect("version");
        assert_eq!(version, GitVersion::new(2, 40, 1));
    }

    #[test]
    fn failing_command_carries_stderr() {
        let dir = TempDir::new().expect("tempdir");
        let binary = mock_git(&dir, "echo 'fatal: not a git repository' >&2\nexit 128");
        match GitCli::new(binary).version() {
            Err(GitError::Failed { code, stderr, .. }) => {
                assert_eq!(code, "128");
                assert_eq!(stderr, "fatal: not a git repository");
            }
            other => panic!("expected failure, got {other:?}"),
        }
    }

    #[test]
    fn missing_path_maps_to_none() {
        let dir = TempDir::new().expect("tempdir");
        let binary = mock_git(
            &dir,
            "echo \"fatal: path 'x.txt' does not exist in 'HEAD'\" >&2\nexit 128",
        );
        let shown = GitCli::new(binary)
            .show(dir.path(), "HEAD", "x.txt")
            .expect("show");
        assert!(shown.is_none());
    }

    #[test]
    fn slow_command_times_out() {
        let dir = TempDir::new().expect("tempdir");
        let binary = mock_git(&dir, "sleep 5");
        let cli = GitCli::new(binary).with_timeout(Duration::from_millis(200));
        assert!(matches!(cli.version(), Err(GitError::Timeout { .. })));
    }
}

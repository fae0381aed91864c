//! Git repository fixtures.
//!
//! All fixtures with history are built with the `git` CLI so they match what
//! the server itself sees at runtime.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

use tempfile::TempDir;

/// Run `git <args>` in `dir`, panicking with stderr on failure.
///
/// # Panics
/// Panics if git cannot be spawned or exits non-zero.
pub fn git(dir: &Path, args: &[&str]) -> String {
    let output = Command::new("git")
        .args(args)
        .current_dir(dir)
        .output()
        .unwrap_or_else(|e| panic!("git: failed to run `git {args:?}`: {e}"));
    if !output.status.success() {
        panic!(
            "git: `git {args:?}` failed in {}:\n{}",
            dir.display(),
            String::from_utf8_lossy(&output.stderr)
        );
    }
    String::from_utf8_lossy(&output.stdout).into_owned()
}

/// Write `contents` to `root/relative`, creating parent directories.
///
/// # Panics
/// Panics if the filesystem operations fail.
pub fn write_file(root: &Path, relative: &str, contents: &str) {
    let path = root.join(relative);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .unwrap_or_else(|e| panic!("write_file: failed to create {}: {e}", parent.display()));
    }
    fs::write(&path, contents)
        .unwrap_or_else(|e| panic!("write_file: failed to write {}: {e}", path.display()));
}

/// Initialises a real git repository using `git2` (no commits, no remotes).
///
/// Use for: tests that need a valid repository where any network-facing
/// operation is expected to fail.
///
/// # Panics
/// Panics if `git2::Repository::init` fails.
pub fn real_git_repo(path: &Path) -> git2::Repository {
    git2::Repository::init(path).unwrap_or_else(|e| {
        panic!(
            "real_git_repo: failed to init repository at {}: {e}",
            path.display()
        )
    })
}

/// Initialises a git repository on branch `main` with one commit holding
/// `files`.
///
/// - Runs `git init` and points `HEAD` at `refs/heads/main`
/// - Configures `user.email`, `user.name`, and `commit.gpgsign = false`
/// - Writes every `(path, contents)` pair and commits them
///
/// # Panics
/// Panics if any git operation fails.
pub fn real_git_repo_with_commit(path: &Path, files: &[(&str, &str)]) {
    git(path, &["init", "--quiet"]);
    git(path, &["symbolic-ref", "HEAD", "refs/heads/main"]);
    git(path, &["config", "user.email", "test@test.com"]);
    git(path, &["config", "user.name", "Test User"]);
    git(path, &["config", "commit.gpgsign", "false"]);

    write_file(path, "README.md", "# Components");
    for (relative, contents) in files {
        write_file(path, relative, contents);
    }

    git(path, &["add", "--all"]);
    git(path, &["commit", "--quiet", "-m", "Initial commit"]);
}

/// An upstream repository and a clone of it whose `origin` points back at
/// the upstream.
///
/// Commits made with [`UpstreamFixture::commit_upstream`] are invisible to
/// the clone until it fetches, which is exactly what update checks observe.
///
/// # Example
///
/// ```rust,no_run
/// use catalog_test_utils::UpstreamFixture;
///
/// let fixture = UpstreamFixture::new(&[("specs/index.json", "{}")]);
/// fixture.write_upstream("Sources/Components/NewView.swift", "final class NewView {}");
/// fixture.commit_upstream("Add NewView");
/// ```
pub struct UpstreamFixture {
    _temp: TempDir,
    upstream: PathBuf,
    local: PathBuf,
}

impl UpstreamFixture {
    /// Create the upstream with one commit holding `files`, then clone it.
    ///
    /// # Panics
    /// Panics if any filesystem or git operation fails.
    pub fn new(files: &[(&str, &str)]) -> Self {
        let temp = TempDir::new().unwrap_or_else(|e| panic!("UpstreamFixture: tempdir: {e}"));
        let upstream = temp.path().join("upstream");
        let local = temp.path().join("local");
        fs::create_dir_all(&upstream)
            .unwrap_or_else(|e| panic!("UpstreamFixture: failed to create upstream: {e}"));

        real_git_repo_with_commit(&upstream, files);

        let upstream_str = upstream.to_string_lossy().into_owned();
        let local_str = local.to_string_lossy().into_owned();
        git(
            temp.path(),
            &["clone", "--quiet", "--branch", "main", &upstream_str, &local_str],
        );

        Self {
            _temp: temp,
            upstream,
            local,
        }
    }

    /// Working copy the server inspects.
    pub fn local(&self) -> &Path {
        &self.local
    }

    /// Repository standing in for the remote.
    pub fn upstream(&self) -> &Path {
        &self.upstream
    }

    /// Write a file in the upstream working tree (not yet committed).
    pub fn write_upstream(&self, relative: &str, contents: &str) {
        write_file(&self.upstream, relative, contents);
    }

    /// Delete a tracked file from the upstream (not yet committed).
    pub fn remove_upstream(&self, relative: &str) {
        git(&self.upstream, &["rm", "--quiet", relative]);
    }

    /// Stage everything in the upstream and commit it.
    pub fn commit_upstream(&self, message: &str) {
        git(&self.upstream, &["add", "--all"]);
        git(&self.upstream, &["commit", "--quiet", "-m", message]);
    }

    /// Fast-forward the clone's `main` to the upstream tip.
    pub fn pull_local(&self) {
        git(&self.local, &["pull", "--quiet", "--ff-only", "origin", "main"]);
    }
}

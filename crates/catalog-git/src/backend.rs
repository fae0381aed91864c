//! Version-control backend trait

use async_trait::async_trait;

use crate::Result;

/// Paths changed between two revisions, split by kind of change.
///
/// The three lists are disjoint; each path appears in at most one.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PathChanges {
    pub added: Vec<String>,
    pub modified: Vec<String>,
    pub deleted: Vec<String>,
}

impl PathChanges {
    /// True when no path changed at all.
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.modified.is_empty() && self.deleted.is_empty()
    }
}

/// The narrow set of version-control queries update checks need.
///
/// [`GitCli`](crate::GitCli) runs the `git` binary; tests provide fakes so
/// report assembly can be exercised without a repository.
#[async_trait]
pub trait VcsBackend: Send + Sync {
    /// Update remote-tracking refs for `branch` on `remote`.
    ///
    /// Never checks out, merges, or resets.
    async fn fetch_remote_refs(&self, remote: &str, branch: &str) -> Result<()>;

    /// Number of commits reachable from `remote_ref` but not from `local_ref`.
    async fn count_ahead_commits(&self, local_ref: &str, remote_ref: &str) -> Result<u64>;

    /// Files added, modified and deleted on `to` since it diverged from `from`.
    async fn diff_paths(&self, from: &str, to: &str) -> Result<PathChanges>;

    /// One line per commit on `to` but not on `from`, newest first, formatted
    /// as `<short-hash> <subject> (<author>, <relative-time>)`.
    async fn format_log(&self, from: &str, to: &str) -> Result<String>;
}

//! Update check assembly and rendering
//!
//! [`compute_update_report`] runs the backend queries in order and degrades
//! step by step: a failed fetch ends the check with an advisory, while a
//! failed count, diff, or log only blanks out that step's contribution.

use std::fmt;

use crate::backend::{PathChanges, VcsBackend};
use crate::filter::PathFilter;

/// Which branches to compare and which paths to highlight.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateCheckOptions {
    /// Remote to fetch from
    pub remote: String,

    /// Branch on the remote to compare against
    pub branch: String,

    /// Local ref representing what the user already has
    pub local_ref: String,

    /// Paths worth naming individually
    pub filter: PathFilter,
}

impl UpdateCheckOptions {
    /// Remote-tracking ref for the compared branch, e.g. `origin/main`.
    pub fn remote_ref(&self) -> String {
        format!("{}/{}", self.remote, self.branch)
    }
}

impl Default for UpdateCheckOptions {
    fn default() -> Self {
        Self {
            remote: "origin".to_string(),
            branch: "main".to_string(),
            local_ref: "main".to_string(),
            filter: PathFilter::default(),
        }
    }
}

/// What changed upstream, computed fresh for one check.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UpdateReport {
    /// Remote-tracking ref the report compares against
    pub remote_ref: String,

    /// Commits on the remote branch that the local branch lacks
    pub commits_behind: u64,

    pub new_files: Vec<String>,
    pub modified_files: Vec<String>,
    pub deleted_files: Vec<String>,

    /// Changed paths outside the interesting prefixes
    pub other_changed_files: Vec<String>,

    /// One line per commit, newest first
    pub commit_log: String,
}

impl UpdateReport {
    /// True when at least one of the interesting path lists has entries.
    pub fn has_named_changes(&self) -> bool {
        !(self.new_files.is_empty() && self.modified_files.is_empty() && self.deleted_files.is_empty())
    }
}

fn file_line(label: &str, paths: &[String]) -> Option<String> {
    if paths.is_empty() {
        None
    } else {
        Some(format!("{label} ({}): {}", paths.len(), paths.join(", ")))
    }
}

impl fmt::Display for UpdateReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut sections = vec![format!(
            "Found {} new commit(s) on {}.",
            self.commits_behind, self.remote_ref
        )];

        let mut lines: Vec<String> = [
            file_line("New", &self.new_files),
            file_line("Modified", &self.modified_files),
            file_line("Deleted", &self.deleted_files),
        ]
        .into_iter()
        .flatten()
        .collect();

        if lines.is_empty()
            && let Some(line) = file_line("Changed files", &self.other_changed_files)
        {
            lines.push(line);
        }
        if !lines.is_empty() {
            sections.push(lines.join("\n"));
        }

        if !self.commit_log.trim().is_empty() {
            sections.push(format!("Commits:\n{}", self.commit_log.trim_end()));
        }

        f.write_str(&sections.join("\n\n"))
    }
}

/// Outcome of an update check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpdateCheck {
    /// Remote refs could not be refreshed; nothing else was attempted
    FetchFailed { remote: String, reason: String },

    /// The local branch already contains every remote commit
    UpToDate { remote_ref: String },

    /// The remote branch has commits the local branch lacks
    Updates(UpdateReport),
}

impl fmt::Display for UpdateCheck {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UpdateCheck::FetchFailed { remote, reason } => {
                write!(f, "Could not fetch updates from {remote}: {reason}")
            }
            UpdateCheck::UpToDate { remote_ref } => {
                write!(f, "Already up to date with {remote_ref}.")
            }
            UpdateCheck::Updates(report) => fmt::Display::fmt(report, f),
        }
    }
}

/// Compare the local branch against the freshly fetched remote branch.
///
/// Never fails: every backend error is logged and folded into the result.
pub async fn compute_update_report(
    vcs: &dyn VcsBackend,
    options: &UpdateCheckOptions,
) -> UpdateCheck {
    let remote_ref = options.remote_ref();

    if let Err(e) = vcs.fetch_remote_refs(&options.remote, &options.branch).await {
        tracing::warn!(remote = %options.remote, branch = %options.branch, error = %e, "Fetching remote refs failed");
        return UpdateCheck::FetchFailed {
            remote: options.remote.clone(),
            reason: e.to_string(),
        };
    }

    let commits_behind = vcs
        .count_ahead_commits(&options.local_ref, &remote_ref)
        .await
        .unwrap_or_else(|e| {
            tracing::warn!(error = %e, "Counting upstream commits failed");
            0
        });

    if commits_behind == 0 {
        tracing::debug!(%remote_ref, "No upstream commits");
        return UpdateCheck::UpToDate { remote_ref };
    }

    let changes = vcs
        .diff_paths(&options.local_ref, &remote_ref)
        .await
        .unwrap_or_else(|e| {
            tracing::warn!(error = %e, "Listing changed paths failed");
            PathChanges::default()
        });

    let commit_log = vcs
        .format_log(&options.local_ref, &remote_ref)
        .await
        .unwrap_or_else(|e| {
            tracing::warn!(error = %e, "Formatting upstream log failed");
            String::new()
        });

    let (new_files, mut other_changed_files) = options.filter.partition(changes.added);
    let (modified_files, other_modified) = options.filter.partition(changes.modified);
    let (deleted_files, other_deleted) = options.filter.partition(changes.deleted);
    other_changed_files.extend(other_modified);
    other_changed_files.extend(other_deleted);

    tracing::info!(
        %remote_ref,
        commits_behind,
        new = new_files.len(),
        modified = modified_files.len(),
        deleted = deleted_files.len(),
        "Upstream has new commits"
    );

    UpdateCheck::Updates(UpdateReport {
        remote_ref,
        commits_behind,
        new_files,
        modified_files,
        deleted_files,
        other_changed_files,
        commit_log,
    })
}

//! Update checks against real git repositories

use std::time::Duration;

use catalog_git::{
    Error, GitCli, PathFilter, UpdateCheck, UpdateCheckOptions, VcsBackend, compute_update_report,
};
use catalog_test_utils::{UpstreamFixture, real_git_repo};
use pretty_assertions::assert_eq;
use tempfile::TempDir;

const INITIAL_FILES: &[(&str, &str)] = &[
    ("Sources/Components/OldView.swift", "final class OldView {}\n"),
    ("specs/index.json", "{\"components\": []}\n"),
];

fn backend(fixture: &UpstreamFixture) -> GitCli {
    GitCli::new(fixture.local())
}

/// Upstream adds NewView, edits the index and drops OldView in one commit.
fn push_component_changes(fixture: &UpstreamFixture) {
    fixture.write_upstream(
        "Sources/Components/NewView.swift",
        "final class NewView {}\n",
    );
    fixture.write_upstream(
        "specs/index.json",
        "{\"components\": [{\"name\": \"NewView\"}]}\n",
    );
    fixture.remove_upstream("Sources/Components/OldView.swift");
    fixture.commit_upstream("Replace OldView with NewView");
}

// ============================================================================
// Report assembly
// ============================================================================

#[tokio::test]
async fn test_fresh_clone_is_up_to_date() {
    let fixture = UpstreamFixture::new(INITIAL_FILES);
    let vcs = backend(&fixture);

    let check = compute_update_report(&vcs, &UpdateCheckOptions::default()).await;
    assert_eq!(
        check,
        UpdateCheck::UpToDate {
            remote_ref: "origin/main".to_string()
        }
    );
}

#[tokio::test]
async fn test_repeated_checks_stay_up_to_date() {
    let fixture = UpstreamFixture::new(INITIAL_FILES);
    let vcs = backend(&fixture);
    let options = UpdateCheckOptions::default();

    let first = compute_update_report(&vcs, &options).await;
    let second = compute_update_report(&vcs, &options).await;

    assert!(matches!(first, UpdateCheck::UpToDate { .. }));
    assert_eq!(first, second);
}

#[tokio::test]
async fn test_upstream_changes_are_classified() {
    let fixture = UpstreamFixture::new(INITIAL_FILES);
    push_component_changes(&fixture);
    let vcs = backend(&fixture);

    let check = compute_update_report(&vcs, &UpdateCheckOptions::default()).await;

    let UpdateCheck::Updates(report) = &check else {
        panic!("expected Updates, got {check:?}");
    };
    assert_eq!(report.commits_behind, 1);
    assert_eq!(report.new_files, vec!["Sources/Components/NewView.swift"]);
    assert_eq!(report.modified_files, vec!["specs/index.json"]);
    assert_eq!(report.deleted_files, vec!["Sources/Components/OldView.swift"]);
    assert!(report.other_changed_files.is_empty());

    let log_lines: Vec<&str> = report.commit_log.lines().collect();
    assert_eq!(log_lines.len(), 1);
    assert!(log_lines[0].contains("Replace OldView with NewView (Test User, "));

    let text = check.to_string();
    assert!(text.starts_with("Found 1 new commit(s) on origin/main."));
    assert!(text.contains("New (1): Sources/Components/NewView.swift"));
    assert!(text.contains("Commits:\n"));
}

#[tokio::test]
async fn test_repeated_checks_do_not_double_count() {
    let fixture = UpstreamFixture::new(INITIAL_FILES);
    push_component_changes(&fixture);
    let vcs = backend(&fixture);
    let options = UpdateCheckOptions::default();

    let first = compute_update_report(&vcs, &options).await;
    let second = compute_update_report(&vcs, &options).await;

    assert!(matches!(first, UpdateCheck::Updates(_)));
    assert_eq!(first, second);
}

#[tokio::test]
async fn test_pulling_clears_updates() {
    let fixture = UpstreamFixture::new(INITIAL_FILES);
    push_component_changes(&fixture);
    let vcs = backend(&fixture);
    let options = UpdateCheckOptions::default();

    assert!(matches!(
        compute_update_report(&vcs, &options).await,
        UpdateCheck::Updates(_)
    ));

    fixture.pull_local();

    assert!(matches!(
        compute_update_report(&vcs, &options).await,
        UpdateCheck::UpToDate { .. }
    ));
}

#[tokio::test]
async fn test_commit_log_is_newest_first() {
    let fixture = UpstreamFixture::new(INITIAL_FILES);
    fixture.write_upstream("specs/components/A.json", "{}\n");
    fixture.commit_upstream("First upstream commit");
    fixture.write_upstream("specs/components/B.json", "{}\n");
    fixture.commit_upstream("Second upstream commit");
    let vcs = backend(&fixture);

    let check = compute_update_report(&vcs, &UpdateCheckOptions::default()).await;

    let UpdateCheck::Updates(report) = check else {
        panic!("expected Updates");
    };
    assert_eq!(report.commits_behind, 2);
    let lines: Vec<&str> = report.commit_log.lines().collect();
    assert_eq!(lines.len(), 2);
    assert!(lines[0].contains("Second upstream commit"));
    assert!(lines[1].contains("First upstream commit"));
}

#[tokio::test]
async fn test_only_uninteresting_changes_use_fallback_line() {
    let fixture = UpstreamFixture::new(INITIAL_FILES);
    fixture.write_upstream("GalleryApp/AppDelegate.swift", "// app\n");
    fixture.commit_upstream("Gallery tweak");
    let vcs = backend(&fixture);

    let text = compute_update_report(&vcs, &UpdateCheckOptions::default())
        .await
        .to_string();

    assert!(text.contains("Changed files (1): GalleryApp/AppDelegate.swift"));
    assert!(!text.contains("New ("));
}

#[tokio::test]
async fn test_custom_prefixes_are_honoured() {
    let fixture = UpstreamFixture::new(INITIAL_FILES);
    fixture.write_upstream("GalleryApp/AppDelegate.swift", "// app\n");
    fixture.commit_upstream("Gallery tweak");
    let vcs = backend(&fixture);
    let options = UpdateCheckOptions {
        filter: PathFilter::new(["GalleryApp/"]),
        ..Default::default()
    };

    let text = compute_update_report(&vcs, &options).await.to_string();
    assert!(text.contains("New (1): GalleryApp/AppDelegate.swift"));
}

#[tokio::test]
async fn test_local_branch_untouched_by_check() {
    let fixture = UpstreamFixture::new(INITIAL_FILES);
    push_component_changes(&fixture);
    let vcs = backend(&fixture);

    compute_update_report(&vcs, &UpdateCheckOptions::default()).await;

    // Working tree still has the old file; only refs moved
    assert!(fixture.local().join("Sources/Components/OldView.swift").exists());
    assert!(!fixture.local().join("Sources/Components/NewView.swift").exists());
}

// ============================================================================
// Failure paths
// ============================================================================

#[tokio::test]
async fn test_repository_without_remote_reports_fetch_failure() {
    let temp = TempDir::new().unwrap();
    real_git_repo(temp.path());
    let vcs = GitCli::new(temp.path());

    let check = compute_update_report(&vcs, &UpdateCheckOptions::default()).await;

    match check {
        UpdateCheck::FetchFailed { remote, reason } => {
            assert_eq!(remote, "origin");
            assert!(reason.contains("git fetch"), "reason: {reason}");
        }
        other => panic!("expected FetchFailed, got {other:?}"),
    }
}

#[tokio::test]
async fn test_missing_directory_reports_fetch_failure() {
    let temp = TempDir::new().unwrap();
    let vcs = GitCli::new(temp.path().join("does-not-exist"));

    let check = compute_update_report(&vcs, &UpdateCheckOptions::default()).await;
    assert!(matches!(check, UpdateCheck::FetchFailed { .. }));
}

#[tokio::test]
async fn test_unknown_local_ref_degrades() {
    let fixture = UpstreamFixture::new(INITIAL_FILES);
    push_component_changes(&fixture);
    let vcs = backend(&fixture);
    let options = UpdateCheckOptions {
        local_ref: "no-such-branch".to_string(),
        ..Default::default()
    };

    // Counting fails, which degrades to zero
    let check = compute_update_report(&vcs, &options).await;
    assert!(matches!(check, UpdateCheck::UpToDate { .. }));
}

#[tokio::test]
async fn test_command_failure_carries_stderr() {
    let fixture = UpstreamFixture::new(INITIAL_FILES);
    let vcs = backend(&fixture);

    let err = vcs
        .count_ahead_commits("main", "origin/no-such-branch")
        .await
        .unwrap_err();
    match err {
        Error::CommandFailed { command, stderr, .. } => {
            assert!(command.starts_with("rev-list"));
            assert!(!stderr.is_empty());
        }
        other => panic!("expected CommandFailed, got {other:?}"),
    }
}

#[tokio::test]
async fn test_zero_timeout_is_reported() {
    let fixture = UpstreamFixture::new(INITIAL_FILES);
    let vcs = GitCli::new(fixture.local()).with_timeout(Duration::ZERO);

    let err = vcs.count_ahead_commits("main", "origin/main").await.unwrap_err();
    assert!(matches!(err, Error::Timeout { .. }), "got {err:?}");
}

// ============================================================================
// Backend queries
// ============================================================================

#[tokio::test]
async fn test_backend_queries_after_fetch() {
    let fixture = UpstreamFixture::new(INITIAL_FILES);
    push_component_changes(&fixture);
    let vcs = backend(&fixture);

    vcs.fetch_remote_refs("origin", "main").await.unwrap();

    assert_eq!(vcs.count_ahead_commits("main", "origin/main").await.unwrap(), 1);
    assert_eq!(vcs.count_ahead_commits("origin/main", "main").await.unwrap(), 0);

    let changes = vcs.diff_paths("main", "origin/main").await.unwrap();
    assert_eq!(changes.added, vec!["Sources/Components/NewView.swift"]);
    assert_eq!(changes.modified, vec!["specs/index.json"]);
    assert_eq!(changes.deleted, vec!["Sources/Components/OldView.swift"]);

    let log = vcs.format_log("main", "origin/main").await.unwrap();
    let (hash, rest) = log.split_once(' ').unwrap();
    assert!(hash.len() >= 7 && hash.chars().all(|c| c.is_ascii_hexdigit()));
    assert!(rest.starts_with("Replace OldView with NewView (Test User, "));
    assert!(rest.ends_with(')'));
}

#[tokio::test]
async fn test_local_only_commits_are_not_reported() {
    let fixture = UpstreamFixture::new(INITIAL_FILES);
    // Local work the remote does not have
    catalog_test_utils::git::git(fixture.local(), &["config", "user.email", "me@test.com"]);
    catalog_test_utils::git::git(fixture.local(), &["config", "user.name", "Me"]);
    catalog_test_utils::git::git(fixture.local(), &["config", "commit.gpgsign", "false"]);
    catalog_test_utils::git::write_file(fixture.local(), "Sources/Components/Local.swift", "//\n");
    catalog_test_utils::git::git(fixture.local(), &["add", "--all"]);
    catalog_test_utils::git::git(fixture.local(), &["commit", "--quiet", "-m", "Local work"]);

    push_component_changes(&fixture);
    let vcs = backend(&fixture);

    let check = compute_update_report(&vcs, &UpdateCheckOptions::default()).await;
    let UpdateCheck::Updates(report) = check else {
        panic!("expected Updates");
    };
    assert_eq!(report.commits_behind, 1);
    assert!(!report.new_files.contains(&"Sources/Components/Local.swift".to_string()));
    assert!(!report.commit_log.contains("Local work"));
}

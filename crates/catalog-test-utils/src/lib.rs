//! Shared test utilities for the component catalog workspace.
//!
//! This crate is a dev-dependency only and is never published.
//!
//! # Modules
//!
//! - [`git`] - git repositories with real history, including an
//!   upstream/clone pair for update checks
//! - [`http`] - [`StubCatalogServer`], a local HTTP host serving canned
//!   catalog documents

pub mod git;
pub mod http;

pub use git::{UpstreamFixture, real_git_repo, real_git_repo_with_commit};
pub use http::{StubCatalogServer, StubResponse, unreachable_base_url};

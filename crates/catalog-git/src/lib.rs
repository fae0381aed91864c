//! Upstream update detection for the component catalog working copy
//!
//! Answers "what changed upstream?" by fetching the remote branch and
//! comparing it against the local branch, without touching the local branch
//! or working tree. The only mutation is the fetch itself, which updates
//! remote-tracking refs.

pub mod backend;
pub mod cli;
pub mod error;
pub mod filter;
pub mod report;
pub mod root;

pub use backend::{PathChanges, VcsBackend};
pub use cli::{DEFAULT_GIT_TIMEOUT, GitCli};
pub use error::{Error, Result};
pub use filter::{DEFAULT_INTERESTING_PREFIXES, PathFilter};
pub use report::{UpdateCheck, UpdateCheckOptions, UpdateReport, compute_update_report};
pub use root::discover_working_copy;

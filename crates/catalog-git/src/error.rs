//! Error types for catalog-git

use std::path::PathBuf;

/// Result type for catalog-git operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while inspecting the working copy
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("failed to run `git {command}`: {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("`git {command}` exited with status {code}: {stderr}")]
    CommandFailed {
        command: String,
        code: i32,
        stderr: String,
    },

    #[error("`git {command}` timed out after {secs}s")]
    Timeout { command: String, secs: u64 },

    #[error("unexpected output from `git {command}`: {output}")]
    UnexpectedOutput { command: String, output: String },

    #[error("Git error: {0}")]
    Git(#[from] git2::Error),

    #[error("Repository at {path} has no working directory")]
    BareRepository { path: PathBuf },
}

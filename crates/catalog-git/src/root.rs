//! Working-copy discovery

use std::path::{Path, PathBuf};

use git2::Repository;

use crate::{Error, Result};

/// Find the working directory of the repository containing `start`.
///
/// Walks up from `start` the way `git` itself does.
pub fn discover_working_copy(start: &Path) -> Result<PathBuf> {
    let repo = Repository::discover(start)?;
    repo.workdir()
        .map(Path::to_path_buf)
        .ok_or_else(|| Error::BareRepository {
            path: repo.path().to_path_buf(),
        })
}

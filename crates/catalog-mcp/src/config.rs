//! Server configuration
//!
//! Every setting has a default, so the server runs without any file. When
//! present, `.catalog-mcp.toml` in the working-copy root (or the file given
//! with `--config`) overrides individual keys:
//!
//! ```toml
//! [catalog]
//! base_url = "https://raw.githubusercontent.com/evgenyshkuratov-rgb/ios-components/main/specs"
//! timeout_secs = 30
//!
//! [updates]
//! remote = "origin"
//! branch = "main"
//! timeout_secs = 15
//! interesting_prefixes = ["Sources/Components/", "specs/"]
//! ```

use std::path::{Path, PathBuf};
use std::time::Duration;

use catalog_git::{DEFAULT_INTERESTING_PREFIXES, PathFilter, UpdateCheckOptions};
use serde::Deserialize;

use crate::{Error, Result};

/// Top-level configuration file contents
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ServerConfig {
    pub catalog: CatalogConfig,
    pub updates: UpdatesConfig,
}

/// `[catalog]` section: where component documents are fetched from
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CatalogConfig {
    /// Base URL holding `index.json` and `components/`
    pub base_url: String,

    /// Per-request deadline in seconds
    pub timeout_secs: u64,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            base_url: catalog_client::DEFAULT_BASE_URL.to_string(),
            timeout_secs: catalog_client::DEFAULT_TIMEOUT.as_secs(),
        }
    }
}

/// `[updates]` section: how `check_updates` compares against upstream
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct UpdatesConfig {
    pub remote: String,
    pub branch: String,

    /// Local ref to compare against; defaults to `branch`
    pub local_ref: Option<String>,

    /// Per-command deadline in seconds for git invocations
    pub timeout_secs: u64,

    /// Path prefixes whose changes are named individually in reports
    pub interesting_prefixes: Vec<String>,
}

impl Default for UpdatesConfig {
    fn default() -> Self {
        Self {
            remote: "origin".to_string(),
            branch: "main".to_string(),
            local_ref: None,
            timeout_secs: catalog_git::DEFAULT_GIT_TIMEOUT.as_secs(),
            interesting_prefixes: DEFAULT_INTERESTING_PREFIXES
                .iter()
                .map(|p| p.to_string())
                .collect(),
        }
    }
}

impl ServerConfig {
    /// File name looked up in the working-copy root.
    pub const FILE_NAME: &'static str = ".catalog-mcp.toml";

    /// Load configuration from a TOML file.
    ///
    /// Timeouts must be at least one second.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|source| Error::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Self = toml::from_str(&content).map_err(|source| Error::ConfigParse {
            path: path.to_path_buf(),
            source,
        })?;

        for (key, secs) in [
            ("catalog.timeout_secs", config.catalog.timeout_secs),
            ("updates.timeout_secs", config.updates.timeout_secs),
        ] {
            if secs == 0 {
                return Err(Error::ConfigInvalid {
                    path: path.to_path_buf(),
                    message: format!("{key} must be greater than 0"),
                });
            }
        }

        Ok(config)
    }

    /// Resolve the configuration for a working copy.
    ///
    /// An explicit path must exist. Otherwise `<root>/.catalog-mcp.toml` is
    /// used when present, and defaults when not.
    pub fn resolve(root: &Path, explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            tracing::info!(path = ?path, "Loading config");
            return Self::load(path);
        }

        let candidate: PathBuf = root.join(Self::FILE_NAME);
        if candidate.is_file() {
            tracing::info!(path = ?candidate, "Loading config");
            Self::load(&candidate)
        } else {
            tracing::debug!(root = ?root, "No config file, using defaults");
            Ok(Self::default())
        }
    }

    pub fn catalog_timeout(&self) -> Duration {
        Duration::from_secs(self.catalog.timeout_secs)
    }

    pub fn git_timeout(&self) -> Duration {
        Duration::from_secs(self.updates.timeout_secs)
    }

    /// Options for the update check derived from `[updates]`.
    pub fn update_options(&self) -> UpdateCheckOptions {
        let updates = &self.updates;
        UpdateCheckOptions {
            remote: updates.remote.clone(),
            branch: updates.branch.clone(),
            local_ref: updates
                .local_ref
                .clone()
                .unwrap_or_else(|| updates.branch.clone()),
            filter: PathFilter::new(updates.interesting_prefixes.iter().cloned()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let config = ServerConfig::default();
        assert_eq!(config.catalog.base_url, catalog_client::DEFAULT_BASE_URL);
        assert_eq!(config.catalog_timeout(), Duration::from_secs(30));
        assert_eq!(config.git_timeout(), Duration::from_secs(15));
        assert_eq!(config.update_options(), UpdateCheckOptions::default());
    }

    #[test]
    fn test_partial_file_keeps_other_defaults() {
        let config: ServerConfig = toml::from_str(
            r#"
            [updates]
            branch = "develop"
            interesting_prefixes = ["Sources/"]
            "#,
        )
        .unwrap();

        assert_eq!(config.catalog, CatalogConfig::default());
        let options = config.update_options();
        assert_eq!(options.remote, "origin");
        assert_eq!(options.branch, "develop");
        assert_eq!(options.local_ref, "develop");
        assert_eq!(options.remote_ref(), "origin/develop");
        assert!(options.filter.is_interesting("Sources/Theme/Colors.swift"));
        assert!(!options.filter.is_interesting("specs/index.json"));
    }

    #[test]
    fn test_explicit_local_ref() {
        let config: ServerConfig = toml::from_str(
            r#"
            [updates]
            local_ref = "HEAD"
            "#,
        )
        .unwrap();
        assert_eq!(config.update_options().local_ref, "HEAD");
    }

    #[test]
    fn test_unknown_keys_rejected() {
        let result = toml::from_str::<ServerConfig>("[catalog]\nbase = \"x\"\n");
        assert!(result.is_err());
    }

    #[test]
    fn test_resolve_without_file_uses_defaults() {
        let temp = TempDir::new().unwrap();
        let config = ServerConfig::resolve(temp.path(), None).unwrap();
        assert_eq!(config, ServerConfig::default());
    }

    #[test]
    fn test_resolve_reads_root_file() {
        let temp = TempDir::new().unwrap();
        std::fs::write(
            temp.path().join(ServerConfig::FILE_NAME),
            "[catalog]\nbase_url = \"http://localhost:9/specs\"\ntimeout_secs = 5\n",
        )
        .unwrap();

        let config = ServerConfig::resolve(temp.path(), None).unwrap();
        assert_eq!(config.catalog.base_url, "http://localhost:9/specs");
        assert_eq!(config.catalog_timeout(), Duration::from_secs(5));
    }

    #[test]
    fn test_resolve_explicit_missing_file_fails() {
        let temp = TempDir::new().unwrap();
        let missing = temp.path().join("nope.toml");
        let err = ServerConfig::resolve(temp.path(), Some(&missing)).unwrap_err();
        assert!(matches!(err, Error::ConfigRead { .. }));
    }

    #[test]
    fn test_zero_timeout_rejected() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join(ServerConfig::FILE_NAME);

        std::fs::write(&path, "[catalog]\ntimeout_secs = 0\n").unwrap();
        let err = ServerConfig::resolve(temp.path(), None).unwrap_err();
        assert!(matches!(err, Error::ConfigInvalid { .. }));
        assert!(err.to_string().contains("catalog.timeout_secs"));

        std::fs::write(&path, "[updates]\ntimeout_secs = 0\n").unwrap();
        let err = ServerConfig::load(&path).unwrap_err();
        assert!(err.to_string().contains("updates.timeout_secs"));
    }

    #[test]
    fn test_resolve_invalid_file_fails() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join(ServerConfig::FILE_NAME);
        std::fs::write(&path, "[updates\n").unwrap();

        let err = ServerConfig::resolve(temp.path(), None).unwrap_err();
        assert!(matches!(err, Error::ConfigParse { .. }));
        assert!(err.to_string().contains(".catalog-mcp.toml"));
    }
}

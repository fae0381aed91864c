//! Classification of changed paths

/// Directories whose changes are named in update reports by default:
/// component sources and the published spec documents.
pub const DEFAULT_INTERESTING_PREFIXES: &[&str] = &["Sources/Components/", "specs/"];

/// Decides which changed paths are worth naming individually.
///
/// A path is interesting when it starts with one of the configured
/// prefixes. An empty prefix list makes every path interesting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathFilter {
    prefixes: Vec<String>,
}

impl PathFilter {
    pub fn new<I, S>(prefixes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            prefixes: prefixes.into_iter().map(Into::into).collect(),
        }
    }

    pub fn prefixes(&self) -> &[String] {
        &self.prefixes
    }

    pub fn is_interesting(&self, path: &str) -> bool {
        self.prefixes.is_empty() || self.prefixes.iter().any(|p| path.starts_with(p.as_str()))
    }

    /// Split `paths` into `(interesting, other)`, keeping relative order.
    pub fn partition(&self, paths: Vec<String>) -> (Vec<String>, Vec<String>) {
        paths.into_iter().partition(|p| self.is_interesting(p))
    }
}

impl Default for PathFilter {
    fn default() -> Self {
        Self::new(DEFAULT_INTERESTING_PREFIXES.iter().copied())
    }
}

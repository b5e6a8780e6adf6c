//! Exclusion rules for tree walking

use globset::{Glob, GlobSet, GlobSetBuilder};

use crate::error::ConfigError;

/// Decides whether an entry (and its subtree) is left out of the scan.
///
/// Paths are relative to the scan root and `/`-separated.
#[derive(Debug, Clone)]
pub struct PathFilter {
    names: Vec<String>,
    globs: GlobSet,
    glob_count: usize,
}

impl PathFilter {
    /// Compile the exclusion rules. Blank entries in either list are ignored.
    pub fn new(excluded_paths: &[String], excluded_globs: &[String]) -> Result<Self, ConfigError> {
        let names = excluded_paths
            .iter()
            .map(|p| p.trim().trim_matches('/').to_string())
            .filter(|p| !p.is_empty())
            .collect();

        let mut builder = GlobSetBuilder::new();
        let mut glob_count = 0;
        for pattern in excluded_globs.iter().map(|g| g.trim()).filter(|g| !g.is_empty()) {
            let glob = Glob::new(pattern).map_err(|e| ConfigError::InvalidGlob {
                pattern: pattern.to_string(),
                reason: e.kind().to_string(),
            })?;
            builder.add(glob);
            glob_count += 1;
        }
        let globs = builder.build().map_err(|e| ConfigError::InvalidGlob {
            pattern: excluded_globs.join(";"),
            reason: e.to_string(),
        })?;

        Ok(Self {
            names,
            globs,
            glob_count,
        })
    }

    /// A filter that excludes nothing.
    pub fn allow_all() -> Self {
        Self {
            names: Vec::new(),
            globs: GlobSet::empty(),
            glob_count: 0,
        }
    }

    /// Check if a relative path should be excluded. The root (`""`) never is.
    pub fn should_exclude(&self, path: &str) -> bool {
        if path.is_empty() {
            return false;
        }
        self.matches_name(path) || self.matches_glob(path)
    }

    fn matches_name(&self, path: &str) -> bool {
        self.names.iter().any(|name| {
            if name.contains('/') {
                path == name
                    || path
                        .strip_prefix(name.as_str())
                        .is_some_and(|rest| rest.starts_with('/'))
            } else {
                path.split('/').any(|component| component == name)
            }
        })
    }

    fn matches_glob(&self, path: &str) -> bool {
        if self.glob_count == 0 {
            return false;
        }
        let name = path.rsplit('/').next().unwrap_or(path);
        self.globs.is_match(path) || self.globs.is_match(name)
    }
}

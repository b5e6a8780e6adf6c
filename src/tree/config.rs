//! Configuration types for tree walking

/// Names excluded when the caller does not supply its own list: common
/// build output, dependency and editor directories plus lockfiles.
pub const DEFAULT_EXCLUDED_PATHS: &[&str] = &[
    "node_modules",
    "bower_components",
    "dist",
    "out",
    "build",
    "eject",
    ".next",
    ".netlify",
    ".yarn",
    ".git",
    ".vscode",
    "package-lock.json",
    "yarn.lock",
];

/// Configuration for tree walking behavior.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WalkerConfig {
    /// Bare names or `/`-separated path fragments to exclude.
    pub excluded_paths: Vec<String>,
    /// Glob patterns to exclude.
    pub excluded_globs: Vec<String>,
    /// Number of parallel workers for sibling directories.
    /// 0 = auto-detect (use all available cores)
    /// 1 = sequential (no parallelism)
    /// N = use N worker threads
    pub parallel_workers: usize,
}

impl WalkerConfig {
    /// A config that excludes nothing.
    pub fn unfiltered() -> Self {
        Self {
            excluded_paths: Vec::new(),
            ..Default::default()
        }
    }
}

impl Default for WalkerConfig {
    fn default() -> Self {
        Self {
            excluded_paths: DEFAULT_EXCLUDED_PATHS.iter().map(|s| s.to_string()).collect(),
            excluded_globs: Vec::new(),
            parallel_workers: 0,
        }
    }
}

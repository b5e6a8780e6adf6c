//! Error and warning types for the diagram pipeline

use std::path::PathBuf;

use thiserror::Error;

/// Invalid input, detected before any scanning begins.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid max depth '{value}': expected an integer")]
    InvalidMaxDepth { value: String },

    #[error("invalid exclusion glob '{pattern}': {reason}")]
    InvalidGlob { pattern: String, reason: String },

    #[error("malformed file colors: {0}")]
    MalformedFileColors(String),

    #[error("invalid color '{value}' for extension '{extension}': expected #rgb or #rrggbb")]
    InvalidColor { extension: String, value: String },

    #[error("unknown color encoding '{0}': expected type, extension or none")]
    UnknownColorEncoding(String),

    #[error("canvas sides must be positive and at most 1000000, got {width}x{height}")]
    InvalidCanvas { width: f64, height: f64 },
}

/// Fatal problems with the scan root, or an aborted scan.
#[derive(Debug, Error)]
pub enum ScanError {
    #[error("cannot access '{}': no such file or directory", .0.display())]
    RootNotFound(PathBuf),

    #[error("cannot read '{}': {source}", path.display())]
    Unreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("'{}' is not a directory", .0.display())]
    NotADirectory(PathBuf),

    #[error("scan cancelled")]
    Cancelled,
}

/// Problems turning a finished tree into a document.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("nothing to draw: '{0}' has no entries left after filtering")]
    EmptyTree(String),

    #[error("node '{path}' has no {missing} assigned")]
    Incomplete { path: String, missing: &'static str },
}

/// Any fatal pipeline failure.
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Scan(#[from] ScanError),

    #[error(transparent)]
    Render(#[from] RenderError),
}

/// A recovered, per-entry problem. The entry is left out of the tree and the
/// scan carries on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScanWarning {
    /// An entry could not be stat'ed or listed (permissions, dangling
    /// symlink, transient I/O).
    EntryRead { path: PathBuf, reason: String },
    /// A directory resolves to one of its own ancestors.
    CycleDetected { path: PathBuf, target: PathBuf },
}

impl std::fmt::Display for ScanWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ScanWarning::EntryRead { path, reason } => {
                write!(f, "skipped '{}': {}", path.display(), reason)
            }
            ScanWarning::CycleDetected { path, target } => write!(
                f,
                "skipped '{}': links back to ancestor '{}'",
                path.display(),
                target.display()
            ),
        }
    }
}

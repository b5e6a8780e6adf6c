//! Directory listing and cycle tracking used by the tree builder.

use std::fs::DirEntry;
use std::io;
use std::path::{Path, PathBuf};

use crate::error::ScanWarning;

/// Canonical real paths of the directories on the current traversal stack.
///
/// Each recursion level pushes a frame that borrows its parent, so sibling
/// tasks running on different workers each see only their own ancestors.
#[derive(Debug, Clone, Copy)]
pub struct Ancestors<'a> {
    real: &'a Path,
    parent: Option<&'a Ancestors<'a>>,
}

impl<'a> Ancestors<'a> {
    pub fn root(real: &'a Path) -> Self {
        Self { real, parent: None }
    }

    pub fn push(&'a self, real: &'a Path) -> Ancestors<'a> {
        Ancestors {
            real,
            parent: Some(self),
        }
    }

    /// Check if `real` is this directory or any directory above it.
    pub fn contains(&self, real: &Path) -> bool {
        let mut frame = Some(self);
        while let Some(f) = frame {
            if f.real == real {
                return true;
            }
            frame = f.parent;
        }
        false
    }

    /// Owned copy of the whole chain, innermost first.
    pub fn to_vec(&self) -> Vec<PathBuf> {
        let mut chain = Vec::new();
        let mut frame = Some(self);
        while let Some(f) = frame {
            chain.push(f.real.to_path_buf());
            frame = f.parent;
        }
        chain
    }
}

/// Read directory entries sorted by file name.
///
/// Entries the OS fails to yield are reported as warnings instead of
/// failing the whole listing.
pub fn read_sorted_entries(path: &Path) -> io::Result<(Vec<DirEntry>, Vec<ScanWarning>)> {
    let mut warnings = Vec::new();
    let mut entries: Vec<DirEntry> = std::fs::read_dir(path)?
        .filter_map(|entry| match entry {
            Ok(e) => Some(e),
            Err(e) => {
                warnings.push(ScanWarning::EntryRead {
                    path: path.to_path_buf(),
                    reason: e.to_string(),
                });
                None
            }
        })
        .collect();
    entries.sort_by_key(|a| a.file_name());
    Ok((entries, warnings))
}

/// Name of the scan root, defaulting to "." when the path has none.
pub fn root_name(path: &Path) -> String {
    path.file_name()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| ".".to_string())
}

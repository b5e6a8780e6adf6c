//! Test utilities for creating temporary directory trees.
//!
//! This module is only compiled for tests and benchmarks.

use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// A temporary directory tree for testing.
///
/// Files are filled with a given number of bytes so size aggregation is
/// easy to assert on. The tree is removed when dropped.
pub struct TestTree {
    dir: TempDir,
}

impl TestTree {
    /// Create a new empty temporary directory.
    pub fn new() -> Self {
        let dir = TempDir::new().expect("Failed to create temp dir");
        Self { dir }
    }

    /// Get the path to the temporary directory.
    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Add a file of `size` bytes.
    ///
    /// Creates parent directories as needed.
    pub fn add_file(&self, path: &str, size: usize) -> PathBuf {
        let full_path = self.dir.path().join(path);
        if let Some(parent) = full_path.parent() {
            fs::create_dir_all(parent).expect("Failed to create parent dirs");
        }
        fs::write(&full_path, vec![b'x'; size]).expect("Failed to write file");
        full_path
    }

    /// Add an empty directory.
    pub fn add_dir(&self, path: &str) -> PathBuf {
        let full_path = self.dir.path().join(path);
        fs::create_dir_all(&full_path).expect("Failed to create dir");
        full_path
    }

    /// Create a symlink at `link` pointing to `target` (taken verbatim).
    #[cfg(unix)]
    pub fn add_symlink(&self, target: &str, link: &str) -> PathBuf {
        let link_path = self.dir.path().join(link);
        if let Some(parent) = link_path.parent() {
            fs::create_dir_all(parent).expect("Failed to create parent dirs");
        }
        std::os::unix::fs::symlink(target, &link_path).expect("Failed to create symlink");
        link_path
    }

    /// Build a tree with `dirs` directories of `files_per_dir` files each,
    /// nested `depth` levels deep.
    pub fn populate(&self, dirs: usize, files_per_dir: usize, depth: usize) {
        for d in 0..dirs {
            let mut prefix = format!("dir_{}", d);
            for level in 0..depth {
                for f in 0..files_per_dir {
                    let ext = ["rs", "js", "md", "png"][f % 4];
                    self.add_file(&format!("{}/file_{}.{}", prefix, f, ext), 64 * (f + 1));
                }
                prefix = format!("{}/level_{}", prefix, level);
            }
        }
    }
}

impl Default for TestTree {
    fn default() -> Self {
        Self::new()
    }
}

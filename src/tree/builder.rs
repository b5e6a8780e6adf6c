//! TreeBuilder - scans a directory into a size-aggregated node tree

use std::fs::{self, DirEntry};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use rayon::prelude::*;
use tracing::{debug, info, trace, warn};

use crate::error::{ConfigError, ScanError, ScanWarning};

use super::cancel::CancellationToken;
use super::collapse::{DEFAULT_MAX_DEPTH, MAX_DEPTH_LIMIT};
use super::config::WalkerConfig;
use super::filter::PathFilter;
use super::node::{Node, child_path};
use super::traversal::{Ancestors, read_sorted_entries, root_name};

/// Stack size for scan workers. Recursion is bounded by `MAX_DEPTH_LIMIT`.
const SCAN_STACK_SIZE: usize = 32 * 1024 * 1024;

/// Called with the number of entries visited so far.
type ProgressFn = dyn Fn(u64) + Send + Sync;

/// Result of a successful scan: the tree plus every recovered problem.
#[derive(Debug)]
pub struct ScanOutcome {
    pub root: Node,
    pub warnings: Vec<ScanWarning>,
}

/// Partial result for one directory entry. Each worker fills in only its
/// own subtree; parents merge them in child order.
#[derive(Debug, Default)]
struct Scanned {
    node: Option<Node>,
    warnings: Vec<ScanWarning>,
}

impl Scanned {
    fn node(node: Node) -> Self {
        Self {
            node: Some(node),
            warnings: Vec::new(),
        }
    }

    fn warning(warning: ScanWarning) -> Self {
        warn!("{}", warning);
        Self {
            node: None,
            warnings: vec![warning],
        }
    }
}

/// Totals for everything below the depth limit.
#[derive(Debug, Default)]
struct Hidden {
    bytes: u64,
    nodes: usize,
    warnings: Vec<ScanWarning>,
}

impl Hidden {
    fn warn(&mut self, warning: ScanWarning) {
        warn!("{}", warning);
        self.warnings.push(warning);
    }
}

enum Step {
    Enter { entry: DirEntry, parent_rel: String },
    Leave,
}

/// Builds the tree in memory, down to a maximum depth.
///
/// Symlinks are followed; a link that resolves to a directory already on
/// the current traversal stack is cut off with a warning. Directories at
/// the depth limit become leaves carrying the size and node count of
/// everything beneath them.
pub struct TreeBuilder {
    filter: PathFilter,
    parallel_workers: usize,
    max_depth: usize,
    cancel: CancellationToken,
    progress: Option<Arc<ProgressFn>>,
    visited: AtomicU64,
}

impl TreeBuilder {
    pub fn new(filter: PathFilter) -> Self {
        Self {
            filter,
            parallel_workers: 0,
            max_depth: DEFAULT_MAX_DEPTH,
            cancel: CancellationToken::new(),
            progress: None,
            visited: AtomicU64::new(0),
        }
    }

    /// Compile the exclusion rules of `config` and adopt its worker count.
    pub fn from_config(config: &WalkerConfig) -> Result<Self, ConfigError> {
        let filter = PathFilter::new(&config.excluded_paths, &config.excluded_globs)?;
        Ok(Self::new(filter).with_workers(config.parallel_workers))
    }

    pub fn with_workers(mut self, workers: usize) -> Self {
        self.parallel_workers = workers;
        self
    }

    /// Deepest level that gets its own nodes, capped at `MAX_DEPTH_LIMIT`.
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth.min(MAX_DEPTH_LIMIT);
        self
    }

    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = token;
        self
    }

    /// Report progress after every visited entry. The callback runs on
    /// scan workers.
    pub fn with_progress<F>(mut self, progress: F) -> Self
    where
        F: Fn(u64) + Send + Sync + 'static,
    {
        self.progress = Some(Arc::new(progress));
        self
    }

    pub fn build(&self, root: &Path) -> Result<ScanOutcome, ScanError> {
        let meta = fs::metadata(root).map_err(|e| root_error(root, e))?;
        if !meta.is_dir() {
            return Err(ScanError::NotADirectory(root.to_path_buf()));
        }
        let real = fs::canonicalize(root).map_err(|e| root_error(root, e))?;
        let (entries, mut warnings) =
            read_sorted_entries(root).map_err(|e| root_error(root, e))?;

        info!("Scanning {} down to depth {}", root.display(), self.max_depth);
        for w in &warnings {
            warn!("{}", w);
        }
        self.visited.store(0, Ordering::Relaxed);

        let name = root_name(&real);
        let ancestors = Ancestors::root(&real);
        let scan = || -> Result<(Node, Vec<ScanWarning>), ScanError> {
            if self.max_depth == 0 {
                let hidden = self.measure_hidden("", entries, &ancestors)?;
                let node = Node::collapsed(String::new(), name, 0, hidden.bytes, hidden.nodes);
                return Ok((node, hidden.warnings));
            }
            let (children, child_warnings) = self.scan_children(root, "", 0, entries, &ancestors)?;
            Ok((Node::directory(String::new(), name, 0, children), child_warnings))
        };

        // 0 workers lets rayon pick the thread count
        let (root, child_warnings) = match rayon::ThreadPoolBuilder::new()
            .num_threads(self.parallel_workers)
            .stack_size(SCAN_STACK_SIZE)
            .build()
        {
            Ok(pool) => pool.install(scan)?,
            Err(e) => {
                // Fall back to rayon's global pool if custom pool creation fails
                warn!("Cannot start {} workers ({}), using default pool", self.parallel_workers, e);
                scan()?
            }
        };
        warnings.extend(child_warnings);

        info!(
            "Scanned {} entries, {} bytes, {} warnings",
            self.visited.load(Ordering::Relaxed),
            root.size_bytes,
            warnings.len()
        );
        Ok(ScanOutcome { root, warnings })
    }

    /// Stop if cancelled, otherwise count one more entry.
    fn checkpoint(&self) -> Result<(), ScanError> {
        if self.cancel.is_cancelled() {
            return Err(ScanError::Cancelled);
        }
        let visited = self.visited.fetch_add(1, Ordering::Relaxed) + 1;
        if let Some(progress) = &self.progress {
            progress(visited);
        }
        Ok(())
    }

    /// Scan the entries of one directory. `depth` is the directory's own
    /// depth; its children sit one level below.
    fn scan_children(
        &self,
        dir: &Path,
        rel: &str,
        depth: usize,
        entries: Vec<DirEntry>,
        ancestors: &Ancestors<'_>,
    ) -> Result<(Vec<Node>, Vec<ScanWarning>), ScanError> {
        debug!("Processing directory: {}", dir.display());

        let scanned: Vec<Scanned> = entries
            .into_par_iter()
            .map(|entry| self.scan_entry(entry, rel, depth + 1, ancestors))
            .collect::<Result<Vec<_>, ScanError>>()?;

        let mut children = Vec::with_capacity(scanned.len());
        let mut warnings = Vec::new();
        for s in scanned {
            children.extend(s.node);
            warnings.extend(s.warnings);
        }
        Ok((children, warnings))
    }

    fn scan_entry(
        &self,
        entry: DirEntry,
        parent_rel: &str,
        depth: usize,
        ancestors: &Ancestors<'_>,
    ) -> Result<Scanned, ScanError> {
        self.checkpoint()?;

        let name = entry.file_name().to_string_lossy().to_string();
        let rel = child_path(parent_rel, &name);
        if self.filter.should_exclude(&rel) {
            trace!("Excluded {}", rel);
            return Ok(Scanned::default());
        }

        let path = entry.path();
        // Follows symlinks, so a dangling link fails here.
        let meta = match fs::metadata(&path) {
            Ok(m) => m,
            Err(e) => {
                return Ok(Scanned::warning(ScanWarning::EntryRead {
                    path,
                    reason: e.to_string(),
                }));
            }
        };

        if meta.is_file() {
            return Ok(Scanned::node(Node::file(rel, name, meta.len(), depth)));
        }
        if !meta.is_dir() {
            trace!("Skipping special file {}", rel);
            return Ok(Scanned::default());
        }

        let real = match fs::canonicalize(&path) {
            Ok(r) => r,
            Err(e) => {
                return Ok(Scanned::warning(ScanWarning::EntryRead {
                    path,
                    reason: e.to_string(),
                }));
            }
        };
        if ancestors.contains(&real) {
            return Ok(Scanned::warning(ScanWarning::CycleDetected { path, target: real }));
        }

        let (listing, mut warnings) = match read_sorted_entries(&path) {
            Ok(l) => l,
            Err(e) => {
                return Ok(Scanned::warning(ScanWarning::EntryRead {
                    path,
                    reason: e.to_string(),
                }));
            }
        };
        for w in &warnings {
            warn!("{}", w);
        }

        let frame = ancestors.push(&real);
        if depth >= self.max_depth {
            let hidden = self.measure_hidden(&rel, listing, &frame)?;
            warnings.extend(hidden.warnings);
            return Ok(Scanned {
                node: Some(Node::collapsed(rel, name, depth, hidden.bytes, hidden.nodes)),
                warnings,
            });
        }

        let (children, child_warnings) = self.scan_children(&path, &rel, depth, listing, &frame)?;
        warnings.extend(child_warnings);

        Ok(Scanned {
            node: Some(Node::directory(rel, name, depth, children)),
            warnings,
        })
    }

    /// Total up everything below a directory at the depth limit without
    /// building nodes. Walks with an explicit stack so arbitrarily deep
    /// trees cannot exhaust the thread stack.
    fn measure_hidden(
        &self,
        rel: &str,
        listing: Vec<DirEntry>,
        ancestors: &Ancestors<'_>,
    ) -> Result<Hidden, ScanError> {
        let mut hidden = Hidden::default();
        let mut chain: Vec<PathBuf> = ancestors.to_vec();
        let mut stack: Vec<Step> = listing
            .into_iter()
            .rev()
            .map(|entry| Step::Enter {
                entry,
                parent_rel: rel.to_string(),
            })
            .collect();

        while let Some(step) = stack.pop() {
            let (entry, parent_rel) = match step {
                Step::Enter { entry, parent_rel } => (entry, parent_rel),
                Step::Leave => {
                    chain.pop();
                    continue;
                }
            };
            self.checkpoint()?;

            let name = entry.file_name().to_string_lossy().to_string();
            let entry_rel = child_path(&parent_rel, &name);
            if self.filter.should_exclude(&entry_rel) {
                trace!("Excluded {}", entry_rel);
                continue;
            }

            let path = entry.path();
            let meta = match fs::metadata(&path) {
                Ok(m) => m,
                Err(e) => {
                    hidden.warn(ScanWarning::EntryRead {
                        path,
                        reason: e.to_string(),
                    });
                    continue;
                }
            };
            if meta.is_file() {
                hidden.bytes += meta.len();
                hidden.nodes += 1;
                continue;
            }
            if !meta.is_dir() {
                continue;
            }

            let real = match fs::canonicalize(&path) {
                Ok(r) => r,
                Err(e) => {
                    hidden.warn(ScanWarning::EntryRead {
                        path,
                        reason: e.to_string(),
                    });
                    continue;
                }
            };
            if chain.contains(&real) {
                hidden.warn(ScanWarning::CycleDetected { path, target: real });
                continue;
            }
            let (entries, warnings) = match read_sorted_entries(&path) {
                Ok(l) => l,
                Err(e) => {
                    hidden.warn(ScanWarning::EntryRead {
                        path,
                        reason: e.to_string(),
                    });
                    continue;
                }
            };
            for w in warnings {
                hidden.warn(w);
            }

            hidden.nodes += 1;
            chain.push(real);
            stack.push(Step::Leave);
            stack.extend(entries.into_iter().rev().map(|entry| Step::Enter {
                entry,
                parent_rel: entry_rel.clone(),
            }));
        }

        if hidden.nodes > 0 {
            debug!("Hid {} nodes under '{}'", hidden.nodes, rel);
        }
        Ok(hidden)
    }
}

fn root_error(root: &Path, e: io::Error) -> ScanError {
    if e.kind() == io::ErrorKind::NotFound {
        ScanError::RootNotFound(root.to_path_buf())
    } else {
        ScanError::Unreadable {
            path: root.to_path_buf(),
            source: e,
        }
    }
}

//! Directory tree scanning
//!
//! This module turns a directory on disk into an in-memory `Node` tree:
//!
//! - `PathFilter`: exclusion by name, path fragment or glob
//! - `TreeBuilder`: parallel, cycle-safe scan with size aggregation
//! - `collapse`: depth limiting that keeps size totals intact

mod builder;
mod cancel;
mod collapse;
mod config;
mod filter;
mod node;
mod traversal;
mod utils;

// Re-export public types
pub use builder::{ScanOutcome, TreeBuilder};
pub use cancel::CancellationToken;
pub use collapse::{DEFAULT_MAX_DEPTH, MAX_DEPTH_LIMIT, collapse};
pub use config::{DEFAULT_EXCLUDED_PATHS, WalkerConfig};
pub use filter::PathFilter;
pub use node::{Node, NodeIter, NodeKind, extension_of};
pub use utils::format_size;

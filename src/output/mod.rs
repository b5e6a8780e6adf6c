//! Diagram output
//!
//! - `config` - Output configuration types
//! - `svg` - Standalone SVG document rendering
//! - `json` - JSON dump of the node tree
//! - `summary` - Colored end-of-run report for the terminal

mod config;
mod json;
mod summary;
mod svg;

// Re-export public types and functions
pub use config::OutputConfig;
pub use json::{print_json, write_json};
pub use summary::{RunSummary, print_summary, print_warnings, write_summary, write_warnings};
pub use svg::{Element, escape, render};

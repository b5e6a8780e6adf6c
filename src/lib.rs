//! Orchard - turn a directory tree into a standalone SVG diagram

pub mod category;
pub mod color;
pub mod config;
pub mod error;
pub mod layout;
pub mod output;
pub mod pipeline;
pub mod tree;

#[cfg(feature = "test-utils")]
pub mod test_utils;

pub use color::{Color, ColorEncoder, ColorEncoding, Legend, LegendEntry};
pub use config::{DiagramConfig, RawInputs};
pub use error::{ConfigError, Error, RenderError, ScanError, ScanWarning};
pub use layout::{LayoutEngine, Rect};
pub use output::{OutputConfig, RunSummary, print_json, print_summary, print_warnings, render};
pub use pipeline::{Diagram, generate, scan};
pub use tree::{
    CancellationToken, Node, NodeKind, PathFilter, ScanOutcome, TreeBuilder, WalkerConfig,
    collapse,
};

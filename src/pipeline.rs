//! End-to-end diagram generation
//!
//! scan (depth-limited) → reject empty → layout → color → render. Any
//! fatal error aborts the run before a document exists.

use tracing::{debug, info};

use crate::color::{ColorEncoder, Legend};
use crate::config::DiagramConfig;
use crate::error::{Error, RenderError, ScanWarning};
use crate::layout::LayoutEngine;
use crate::output::render;
use crate::tree::{CancellationToken, Node, TreeBuilder};

/// A finished diagram and the model it was drawn from.
#[derive(Debug)]
pub struct Diagram {
    pub svg: String,
    pub tree: Node,
    pub legend: Legend,
    pub warnings: Vec<ScanWarning>,
    /// Nodes dropped for exceeding the depth limit.
    pub hidden: usize,
}

/// Scan and filter down to the depth limit, without laying out or coloring.
pub fn scan(
    config: &DiagramConfig,
    cancel: &CancellationToken,
) -> Result<(Node, Vec<ScanWarning>, usize), Error> {
    config.validate()?;
    let builder = TreeBuilder::from_config(&config.walker)?
        .with_max_depth(config.max_depth)
        .with_cancellation(cancel.clone());

    let outcome = builder.build(&config.root)?;
    let root = outcome.root;
    if root.children.is_empty() && root.hidden_descendants == 0 {
        return Err(RenderError::EmptyTree(root.name).into());
    }

    let hidden: usize = root.iter().map(|n| n.hidden_descendants).sum();
    if hidden > 0 {
        info!("Hid {} nodes deeper than {}", hidden, config.max_depth);
    }
    Ok((root, outcome.warnings, hidden))
}

/// Run the whole pipeline.
pub fn generate(config: &DiagramConfig, cancel: &CancellationToken) -> Result<Diagram, Error> {
    let (mut tree, warnings, hidden) = scan(config, cancel)?;

    LayoutEngine::new(config.width, config.height).layout(&mut tree);
    debug!("Laid out {} nodes on {}x{}", tree.count(), config.width, config.height);

    let encoder = ColorEncoder::new(config.color_encoding, &config.custom_file_colors);
    let legend = encoder.apply(&mut tree);
    debug!("Legend has {} entries", legend.entries.len());

    let svg = render(&tree, &legend, &config.output)?;
    info!("Rendered {} bytes of SVG", svg.len());

    Ok(Diagram {
        svg,
        tree,
        legend,
        warnings,
        hidden,
    })
}

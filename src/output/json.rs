//! JSON output formatting

use std::io::{self, Write};

use crate::tree::Node;

/// Write the node tree as pretty-printed JSON.
pub fn write_json<W: Write>(node: &Node, out: &mut W) -> io::Result<()> {
    serde_json::to_writer_pretty(&mut *out, node).map_err(io::Error::other)?;
    writeln!(out)
}

/// Print the node tree as pretty-printed JSON to stdout.
pub fn print_json(node: &Node) -> io::Result<()> {
    let stdout = io::stdout();
    let mut lock = stdout.lock();
    write_json(node, &mut lock)
}

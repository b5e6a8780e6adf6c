//! End-of-run report for the terminal

use std::io::{self, Write};

use termcolor::{Color, ColorChoice, ColorSpec, StandardStream, WriteColor};

use crate::error::ScanWarning;
use crate::tree::format_size;

/// What a finished run produced.
#[derive(Debug, Clone)]
pub struct RunSummary<'a> {
    /// Where the document went, e.g. a file path or "stdout".
    pub destination: &'a str,
    pub nodes: usize,
    pub total_bytes: u64,
    pub hidden: usize,
    pub warnings: &'a [ScanWarning],
}

/// Print the summary to stderr, keeping stdout free for the document.
pub fn print_summary(summary: &RunSummary<'_>, use_color: bool) -> io::Result<()> {
    let color_choice = if use_color {
        ColorChoice::Auto
    } else {
        ColorChoice::Never
    };
    let mut stderr = StandardStream::stderr(color_choice);
    write_summary(summary, &mut stderr)
}

pub fn write_summary<W: WriteColor>(summary: &RunSummary<'_>, out: &mut W) -> io::Result<()> {
    let mut bold = ColorSpec::new();
    bold.set_bold(true);
    let mut green = ColorSpec::new();
    green.set_fg(Some(Color::Green)).set_bold(true);

    out.set_color(&green)?;
    write!(out, "Wrote")?;
    out.reset()?;
    write!(out, " ")?;
    out.set_color(&bold)?;
    write!(out, "{}", summary.destination)?;
    out.reset()?;
    write!(
        out,
        ": {} nodes, {}",
        summary.nodes,
        format_size(summary.total_bytes)
    )?;
    if summary.hidden > 0 {
        write!(out, ", {} hidden beyond max depth", summary.hidden)?;
    }
    writeln!(out)?;

    write_warnings(summary.warnings, out)
}

/// Print recovered scan problems to stderr.
pub fn print_warnings(warnings: &[ScanWarning], use_color: bool) -> io::Result<()> {
    let color_choice = if use_color {
        ColorChoice::Auto
    } else {
        ColorChoice::Never
    };
    let mut stderr = StandardStream::stderr(color_choice);
    write_warnings(warnings, &mut stderr)
}

pub fn write_warnings<W: WriteColor>(warnings: &[ScanWarning], out: &mut W) -> io::Result<()> {
    let mut yellow = ColorSpec::new();
    yellow.set_fg(Some(Color::Yellow));

    for warning in warnings {
        out.set_color(&yellow)?;
        write!(out, "warning:")?;
        out.reset()?;
        writeln!(out, " {}", warning)?;
    }
    Ok(())
}

//! Standalone SVG rendering
//!
//! The diagram is assembled as a small tree of `Element`s and serialized
//! once. Nothing in the output references external files.

use std::borrow::Cow;
use std::fmt::Display;

use crate::color::{Color, Legend};
use crate::error::RenderError;
use crate::layout::{HEADER_HEIGHT, Rect, has_header};
use crate::tree::{Node, format_size};

use super::config::OutputConfig;

const SVG_NS: &str = "http://www.w3.org/2000/svg";
const FONT_FAMILY: &str = "-apple-system, 'Segoe UI', Helvetica, Arial, sans-serif";
const TITLE_BAND: f64 = 32.0;
const LEGEND_ROW: f64 = 20.0;
const LEGEND_PAD: f64 = 12.0;
const SWATCH: f64 = 12.0;
const BACKGROUND: Color = Color::rgb(0xff, 0xff, 0xff);
const TEXT: Color = Color::rgb(0x24, 0x29, 0x2f);
const DIR_STROKE: Color = Color::rgb(0x9a, 0xa5, 0xb1);
const FILE_STROKE: Color = Color::rgb(0xff, 0xff, 0xff);

/// One drawing primitive or container.
#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    name: &'static str,
    attrs: Vec<(&'static str, String)>,
    text: Option<String>,
    children: Vec<Element>,
}

impl Element {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            attrs: Vec::new(),
            text: None,
            children: Vec::new(),
        }
    }

    pub fn attr(mut self, key: &'static str, value: impl Display) -> Self {
        self.attrs.push((key, value.to_string()));
        self
    }

    /// Attribute holding a coordinate or length.
    pub fn num(self, key: &'static str, value: f64) -> Self {
        self.attr(key, fmt_num(value))
    }

    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    pub fn child(mut self, child: Element) -> Self {
        self.children.push(child);
        self
    }

    pub fn push(&mut self, child: Element) {
        self.children.push(child);
    }

    /// Serialize this element and its subtree.
    pub fn write_to(&self, out: &mut String) {
        out.push('<');
        out.push_str(self.name);
        for (key, value) in &self.attrs {
            out.push(' ');
            out.push_str(key);
            out.push_str("=\"");
            out.push_str(&escape(value));
            out.push('"');
        }
        if self.text.is_none() && self.children.is_empty() {
            out.push_str("/>");
            return;
        }
        out.push('>');
        if let Some(text) = &self.text {
            out.push_str(&escape(text));
        }
        for child in &self.children {
            child.write_to(out);
        }
        out.push_str("</");
        out.push_str(self.name);
        out.push('>');
    }

    pub fn to_markup(&self) -> String {
        let mut out = String::new();
        self.write_to(&mut out);
        out
    }
}

/// Escape text for use in XML content and attribute values.
pub fn escape(s: &str) -> Cow<'_, str> {
    if !s.contains(['&', '<', '>', '"', '\'']) {
        return Cow::Borrowed(s);
    }
    let mut out = String::with_capacity(s.len() + 8);
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    Cow::Owned(out)
}

fn fmt_num(v: f64) -> String {
    // Avoid "-0.00" so identical layouts always print identically.
    let v = if v.abs() < 0.005 { 0.0 } else { v };
    format!("{:.2}", v)
}

/// Render a laid-out, colored tree plus its legend as one SVG document.
pub fn render(root: &Node, legend: &Legend, config: &OutputConfig) -> Result<String, RenderError> {
    if root.children.is_empty() && root.hidden_descendants == 0 {
        return Err(RenderError::EmptyTree(root.name.clone()));
    }
    let canvas = region_of(root)?;

    let legend_layout = LegendLayout::new(legend, canvas.width, config);
    let width = canvas.width;
    let height = TITLE_BAND + canvas.height + legend_layout.height;
    let title = config
        .title
        .clone()
        .unwrap_or_else(|| format!("{} ({})", root.name, format_size(root.size_bytes)));

    let mut svg = Element::new("svg")
        .attr("xmlns", SVG_NS)
        .num("width", width)
        .num("height", height)
        .attr(
            "viewBox",
            format!("0 0 {} {}", fmt_num(width), fmt_num(height)),
        )
        .attr("font-family", FONT_FAMILY)
        .child(Element::new("title").text(title.clone()))
        .child(
            Element::new("rect")
                .num("width", width)
                .num("height", height)
                .attr("fill", BACKGROUND),
        )
        .child(
            Element::new("text")
                .num("x", 8.0)
                .num("y", TITLE_BAND - 10.0)
                .num("font-size", config.font_size + 5.0)
                .attr("font-weight", "bold")
                .attr("fill", TEXT)
                .text(title),
        );

    let mut nodes = Element::new("g")
        .attr("class", "nodes")
        .attr("transform", format!("translate(0,{})", fmt_num(TITLE_BAND)));
    push_node(&mut nodes, root, config)?;
    svg.push(nodes);

    svg.push(legend_layout.render(legend, TITLE_BAND + canvas.height, config));

    let mut out = String::from("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");
    svg.write_to(&mut out);
    out.push('\n');
    Ok(out)
}

fn region_of(node: &Node) -> Result<Rect, RenderError> {
    node.region.ok_or_else(|| RenderError::Incomplete {
        path: node.path.clone(),
        missing: "region",
    })
}

fn push_node(parent: &mut Element, node: &Node, config: &OutputConfig) -> Result<(), RenderError> {
    let region = region_of(node)?;
    let color = node.color.ok_or_else(|| RenderError::Incomplete {
        path: node.path.clone(),
        missing: "color",
    })?;

    let display_path = if node.path.is_empty() { node.name.as_str() } else { node.path.as_str() };
    let mut tooltip = format!("{} ({}, {})", display_path, format_size(node.size_bytes), node.kind.as_str());
    if node.hidden_descendants > 0 {
        tooltip.push_str(&format!(", {} deeper entries hidden", node.hidden_descendants));
    }

    let mut shape = Element::new("rect")
        .num("x", region.x)
        .num("y", region.y)
        .num("width", region.width)
        .num("height", region.height)
        .attr("fill", color)
        .attr("data-path", display_path)
        .attr("data-size", node.size_bytes)
        .attr("data-kind", node.kind.as_str());
    shape = if node.is_dir() {
        shape
            .attr("stroke", DIR_STROKE)
            .attr("stroke-width", "1")
            .attr("rx", "2")
    } else {
        shape.attr("stroke", FILE_STROKE).attr("stroke-width", "0.5")
    };
    if node.hidden_descendants > 0 {
        shape = shape
            .attr("stroke-dasharray", "3 2")
            .attr("data-hidden", node.hidden_descendants);
    }
    parent.push(shape.child(Element::new("title").text(tooltip)));

    if node.is_dir() {
        // Directory labels sit in the header band above their children.
        if has_header(region) && config.label_fits(&node.name, region.width, HEADER_HEIGHT + 4.0)
        {
            parent.push(
                Element::new("text")
                    .num("x", region.x + 4.0)
                    .num("y", region.y + HEADER_HEIGHT)
                    .num("font-size", config.font_size)
                    .attr("font-weight", "bold")
                    .attr("fill", TEXT)
                    .text(node.name.clone()),
            );
        }
    } else if config.label_fits(&node.name, region.width, region.height) {
        parent.push(
            Element::new("text")
                .num("x", region.x + region.width / 2.0)
                .num("y", region.y + region.height / 2.0)
                .num("font-size", config.font_size)
                .attr("text-anchor", "middle")
                .attr("dominant-baseline", "middle")
                .attr("fill", TEXT)
                .text(node.name.clone()),
        );
    }

    for child in &node.children {
        push_node(parent, child, config)?;
    }
    Ok(())
}

/// Legend entries flowed left to right, wrapping at the canvas width.
struct LegendLayout {
    positions: Vec<(f64, f64)>,
    height: f64,
}

impl LegendLayout {
    fn new(legend: &Legend, width: f64, config: &OutputConfig) -> Self {
        if legend.is_empty() {
            return Self {
                positions: Vec::new(),
                height: 0.0,
            };
        }
        let mut positions = Vec::with_capacity(legend.entries.len());
        let (mut x, mut y) = (LEGEND_PAD, LEGEND_PAD);
        for entry in &legend.entries {
            let item = SWATCH + 6.0 + config.text_width(&legend_text(&entry.label, entry.files)) + 16.0;
            if x > LEGEND_PAD && x + item > width {
                x = LEGEND_PAD;
                y += LEGEND_ROW;
            }
            positions.push((x, y));
            x += item;
        }
        Self {
            positions,
            height: y + LEGEND_ROW + LEGEND_PAD,
        }
    }

    fn render(&self, legend: &Legend, top: f64, config: &OutputConfig) -> Element {
        let mut group = Element::new("g")
            .attr("class", "legend")
            .attr("transform", format!("translate(0,{})", fmt_num(top)));
        for (entry, &(x, y)) in legend.entries.iter().zip(&self.positions) {
            group.push(
                Element::new("rect")
                    .num("x", x)
                    .num("y", y)
                    .num("width", SWATCH)
                    .num("height", SWATCH)
                    .attr("fill", entry.color)
                    .attr("data-label", &entry.label),
            );
            group.push(
                Element::new("text")
                    .num("x", x + SWATCH + 6.0)
                    .num("y", y + SWATCH - 2.0)
                    .num("font-size", config.font_size)
                    .attr("fill", TEXT)
                    .text(legend_text(&entry.label, entry.files)),
            );
        }
        group
    }
}

fn legend_text(label: &str, files: usize) -> String {
    format!("{} ({})", label, files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::LegendEntry;

    fn laid_out_tree() -> Node {
        let mut file = Node::file("a&b.rs".into(), "a&b.rs".into(), 10, 1);
        file.region = Some(Rect::new(10.0, 10.0, 100.0, 40.0));
        file.color = Some(Color::rgb(1, 2, 3));
        let mut root = Node::directory(String::new(), "repo".into(), 0, vec![file]);
        root.region = Some(Rect::new(0.0, 0.0, 200.0, 100.0));
        root.color = Some(Color::rgb(250, 250, 250));
        root
    }

    fn legend() -> Legend {
        Legend {
            entries: vec![LegendEntry {
                label: "code".into(),
                color: Color::rgb(1, 2, 3),
                files: 1,
            }],
        }
    }

    #[test]
    fn test_element_serialization() {
        let el = Element::new("g")
            .attr("id", "x\"y")
            .child(Element::new("rect").num("x", 1.0))
            .child(Element::new("text").text("<hi>"));
        assert_eq!(
            el.to_markup(),
            "<g id=\"x&quot;y\"><rect x=\"1.00\"/><text>&lt;hi&gt;</text></g>"
        );
    }

    #[test]
    fn test_negative_zero_normalized() {
        assert_eq!(fmt_num(-0.0001), "0.00");
        assert_eq!(fmt_num(12.5), "12.50");
    }

    #[test]
    fn test_render_one_rect_per_node() {
        let svg = render(&laid_out_tree(), &legend(), &OutputConfig::default()).unwrap();
        assert!(svg.starts_with("<?xml"));
        assert!(svg.contains("xmlns=\"http://www.w3.org/2000/svg\""));
        assert_eq!(svg.matches("data-path=").count(), 2);
        assert!(svg.contains("data-path=\"a&amp;b.rs\""));
        assert!(svg.contains("data-kind=\"directory\""));
        assert!(svg.contains("data-size=\"10\""));
        assert!(svg.contains("fill=\"#010203\""));
        assert!(svg.contains("code (1)"));
        assert!(!svg.contains("href"));
    }

    #[test]
    fn test_small_regions_get_no_label() {
        let mut root = laid_out_tree();
        root.children[0].region = Some(Rect::new(0.0, 0.0, 5.0, 5.0));
        let svg = render(&root, &legend(), &OutputConfig::default()).unwrap();
        assert!(!svg.contains(">a&amp;b.rs</text>"));
    }

    #[test]
    fn test_empty_tree_is_error() {
        let mut root = Node::directory(String::new(), "repo".into(), 0, Vec::new());
        root.region = Some(Rect::new(0.0, 0.0, 10.0, 10.0));
        root.color = Some(Color::rgb(0, 0, 0));
        let err = render(&root, &Legend::default(), &OutputConfig::default()).unwrap_err();
        assert!(matches!(err, RenderError::EmptyTree(_)));
    }

    #[test]
    fn test_collapsed_root_still_renders() {
        let mut root = laid_out_tree();
        root.children.clear();
        root.hidden_descendants = 1;
        let svg = render(&root, &Legend::default(), &OutputConfig::default()).unwrap();
        assert_eq!(svg.matches("data-path=").count(), 1);
        assert!(svg.contains("data-hidden=\"1\""));
        assert!(svg.contains("repo (10B, directory), 1 deeper entries hidden</title>"));
    }

    #[test]
    fn test_missing_layout_is_error() {
        let mut root = laid_out_tree();
        root.children[0].region = None;
        let err = render(&root, &legend(), &OutputConfig::default()).unwrap_err();
        assert!(matches!(err, RenderError::Incomplete { missing: "region", .. }));
    }
}

//! Nested squarified treemap layout
//!
//! Every directory shrinks its own rectangle by a small inset (plus a
//! header band for its label when there is room) and splits what is left
//! among its children in proportion to their size.

use std::cmp::Ordering;

use serde::Serialize;

use crate::tree::Node;

/// Share of a rectangle's shorter side taken by the inset at each level.
const INSET_FRACTION: f64 = 0.02;
/// Upper bound for the per-level inset, in canvas units.
const INSET_MAX: f64 = 4.0;
/// Height of the label band reserved at the top of a directory.
pub const HEADER_HEIGHT: f64 = 14.0;
/// A directory narrower than this gets no header band.
const HEADER_MIN_WIDTH: f64 = 48.0;
/// Smallest weight a child can have, as a share of its parent's total.
const MIN_SHARE: f64 = 0.002;

/// Axis-aligned rectangle in canvas units.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width: width.max(0.0),
            height: height.max(0.0),
        }
    }

    pub fn area(&self) -> f64 {
        self.width * self.height
    }

    pub fn is_empty(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }

    /// Check if `other` lies within `self`, allowing for float rounding.
    pub fn contains(&self, other: &Rect) -> bool {
        const EPS: f64 = 1e-6;
        other.x >= self.x - EPS
            && other.y >= self.y - EPS
            && other.x + other.width <= self.x + self.width + EPS
            && other.y + other.height <= self.y + self.height + EPS
    }
}

/// Assigns every node a region nested inside its parent's.
#[derive(Debug, Clone, Copy)]
pub struct LayoutEngine {
    width: f64,
    height: f64,
}

impl LayoutEngine {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    pub fn layout(&self, root: &mut Node) {
        layout_node(root, Rect::new(0.0, 0.0, self.width, self.height));
    }
}

/// Check if a directory drawn in `rect` gets a label band.
pub fn has_header(rect: Rect) -> bool {
    rect.height > HEADER_HEIGHT * 3.0 && rect.width > HEADER_MIN_WIDTH
}

/// Area left for a directory's children once its inset and header are taken.
pub fn content_area(rect: Rect) -> Rect {
    let inset = (rect.width.min(rect.height) * INSET_FRACTION).min(INSET_MAX);
    let header = if has_header(rect) { HEADER_HEIGHT } else { 0.0 };
    Rect::new(
        rect.x + inset,
        rect.y + inset + header,
        rect.width - 2.0 * inset,
        rect.height - 2.0 * inset - header,
    )
}

fn layout_node(node: &mut Node, rect: Rect) {
    node.region = Some(rect);
    if node.children.is_empty() {
        return;
    }

    let inner = content_area(rect);
    let floor = (node.size_bytes.max(1) as f64) * MIN_SHARE;
    let weights: Vec<f64> = node
        .children
        .iter()
        .map(|c| (c.size_bytes as f64).max(floor))
        .collect();

    // Stable: equal weights keep scan order.
    let mut order: Vec<usize> = (0..weights.len()).collect();
    order.sort_by(|&a, &b| weights[b].total_cmp(&weights[a]));

    let items: Vec<(usize, f64)> = order.into_iter().map(|i| (i, weights[i])).collect();
    for (idx, region) in squarify(&items, inner) {
        layout_node(&mut node.children[idx], region);
    }
}

/// Split `area` among `items` (index, weight), heaviest first.
fn squarify(items: &[(usize, f64)], area: Rect) -> Vec<(usize, Rect)> {
    let total: f64 = items.iter().map(|(_, w)| w).sum();
    if area.is_empty() || total <= 0.0 {
        return items
            .iter()
            .map(|&(i, _)| (i, Rect::new(area.x, area.y, 0.0, 0.0)))
            .collect();
    }

    let scale = area.area() / total;
    let scaled: Vec<(usize, f64)> = items.iter().map(|&(i, w)| (i, w * scale)).collect();

    let mut placed = Vec::with_capacity(items.len());
    let mut free = area;
    let mut start = 0;
    while start < scaled.len() {
        let side = free.width.min(free.height);
        let mut end = start + 1;
        let mut best = worst_ratio(&scaled[start..end], side);
        while end < scaled.len() {
            let next = worst_ratio(&scaled[start..=end], side);
            if next.total_cmp(&best) == Ordering::Greater {
                break;
            }
            best = next;
            end += 1;
        }
        free = place_row(&scaled[start..end], free, &mut placed);
        start = end;
    }
    placed
}

/// Worst aspect ratio of a row laid along a side of length `side`.
fn worst_ratio(row: &[(usize, f64)], side: f64) -> f64 {
    let sum: f64 = row.iter().map(|(_, a)| a).sum();
    if side <= 0.0 || sum <= 0.0 {
        return f64::INFINITY;
    }
    let (min, max) = row
        .iter()
        .fold((f64::INFINITY, 0.0f64), |(lo, hi), &(_, a)| (lo.min(a), hi.max(a)));
    let side2 = side * side;
    let sum2 = sum * sum;
    (side2 * max / sum2).max(sum2 / (side2 * min))
}

/// Lay one row along the shorter side of `free`; returns what is left.
fn place_row(row: &[(usize, f64)], free: Rect, placed: &mut Vec<(usize, Rect)>) -> Rect {
    let sum: f64 = row.iter().map(|(_, a)| a).sum();
    if free.width >= free.height {
        // Column on the left edge.
        let width = if free.height > 0.0 { (sum / free.height).min(free.width) } else { 0.0 };
        let mut y = free.y;
        for &(i, a) in row {
            let height = if width > 0.0 { a / width } else { 0.0 };
            placed.push((i, Rect::new(free.x, y, width, height)));
            y += height;
        }
        Rect::new(free.x + width, free.y, free.width - width, free.height)
    } else {
        // Row along the top edge.
        let height = if free.width > 0.0 { (sum / free.width).min(free.height) } else { 0.0 };
        let mut x = free.x;
        for &(i, a) in row {
            let width = if height > 0.0 { a / height } else { 0.0 };
            placed.push((i, Rect::new(x, free.y, width, height)));
            x += width;
        }
        Rect::new(free.x, free.y + height, free.width, free.height - height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn file(path: &str, size: u64, depth: usize) -> Node {
        let name = path.rsplit('/').next().unwrap().to_string();
        Node::file(path.to_string(), name, size, depth)
    }

    fn sample() -> Node {
        let lib = Node::directory(
            "lib".into(),
            "lib".into(),
            1,
            vec![file("lib/c.js", 200, 2), file("lib/empty.txt", 0, 2)],
        );
        Node::directory(
            String::new(),
            ".".into(),
            0,
            vec![file("a.js", 100, 1), file("b.png", 50, 1), lib],
        )
    }

    fn assert_nested(node: &Node) {
        let outer = node.region.expect("region assigned");
        for child in &node.children {
            let inner = child.region.expect("region assigned");
            assert!(outer.contains(&inner), "{} escapes {}", child.path, node.path);
            assert_nested(child);
        }
    }

    #[test]
    fn test_every_node_nested_in_parent() {
        let mut root = sample();
        LayoutEngine::new(800.0, 600.0).layout(&mut root);
        assert_eq!(root.region, Some(Rect::new(0.0, 0.0, 800.0, 600.0)));
        assert_nested(&root);
    }

    #[test]
    fn test_areas_proportional_to_size() {
        let mut root = Node::directory(
            String::new(),
            ".".into(),
            0,
            vec![file("big", 300, 1), file("small", 100, 1)],
        );
        LayoutEngine::new(400.0, 400.0).layout(&mut root);
        let big = root.children[0].region.unwrap().area();
        let small = root.children[1].region.unwrap().area();
        assert!((big / small - 3.0).abs() < 1e-6, "ratio was {}", big / small);

        let used = big + small;
        let available = content_area(root.region.unwrap()).area();
        assert!((used - available).abs() < 1e-6);
    }

    #[test]
    fn test_zero_size_still_visible() {
        let mut root = sample();
        LayoutEngine::new(800.0, 600.0).layout(&mut root);
        let empty = root.find("lib/empty.txt").unwrap().region.unwrap();
        assert!(empty.area() > 0.0);
    }

    #[test]
    fn test_equal_sizes_keep_order() {
        let mut root = Node::directory(
            String::new(),
            ".".into(),
            0,
            vec![file("first", 10, 1), file("second", 10, 1), file("third", 10, 1)],
        );
        LayoutEngine::new(300.0, 100.0).layout(&mut root);
        let xs: Vec<f64> = root.children.iter().map(|c| c.region.unwrap().x).collect();
        assert!(xs[0] < xs[1] && xs[1] < xs[2], "{:?}", xs);
    }

    #[test]
    fn test_layout_is_deterministic() {
        let mut a = sample();
        let mut b = sample();
        LayoutEngine::new(640.0, 480.0).layout(&mut a);
        LayoutEngine::new(640.0, 480.0).layout(&mut b);
        let ra: Vec<Option<Rect>> = a.iter().map(|n| n.region).collect();
        let rb: Vec<Option<Rect>> = b.iter().map(|n| n.region).collect();
        assert_eq!(ra, rb);
    }

    #[test]
    fn test_degenerate_canvas() {
        let mut root = sample();
        LayoutEngine::new(0.0, 0.0).layout(&mut root);
        assert!(root.iter().all(|n| n.region.is_some_and(|r| r.area() == 0.0)));
    }
}

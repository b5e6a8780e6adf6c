//! In-memory node tree shared by every pipeline stage

use serde::Serialize;

use crate::color::Color;
use crate::layout::Rect;

/// Whether a node is a leaf file or a container directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    File,
    Directory,
}

impl NodeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            NodeKind::File => "file",
            NodeKind::Directory => "directory",
        }
    }
}

/// One file or directory of the scanned tree.
///
/// `path` is relative to the scan root and always uses `/` separators; the
/// root itself has an empty path. `color` and `region` stay empty until the
/// color and layout stages run.
#[derive(Debug, Clone, Serialize)]
pub struct Node {
    pub path: String,
    pub name: String,
    pub kind: NodeKind,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub extension: String,
    pub size_bytes: u64,
    pub depth: usize,
    /// Number of nodes below this one that were dropped for exceeding the
    /// depth limit. `size_bytes` still counts them.
    #[serde(skip_serializing_if = "is_zero")]
    pub hidden_descendants: usize,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<Node>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<Color>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub region: Option<Rect>,
}

fn is_zero(n: &usize) -> bool {
    *n == 0
}

impl Node {
    pub fn file(path: String, name: String, size_bytes: u64, depth: usize) -> Self {
        let extension = extension_of(&name);
        Self {
            path,
            name,
            kind: NodeKind::File,
            extension,
            size_bytes,
            depth,
            hidden_descendants: 0,
            children: Vec::new(),
            color: None,
            region: None,
        }
    }

    /// A directory node whose size is the sum of `children`.
    pub fn directory(path: String, name: String, depth: usize, children: Vec<Node>) -> Self {
        let size_bytes = children.iter().map(|c| c.size_bytes).sum();
        Self {
            path,
            name,
            kind: NodeKind::Directory,
            extension: String::new(),
            size_bytes,
            depth,
            hidden_descendants: 0,
            children,
            color: None,
            region: None,
        }
    }

    /// A directory drawn without children: `hidden` nodes totalling
    /// `size_bytes` sit below it.
    pub fn collapsed(
        path: String,
        name: String,
        depth: usize,
        size_bytes: u64,
        hidden: usize,
    ) -> Self {
        Self {
            size_bytes,
            hidden_descendants: hidden,
            ..Self::directory(path, name, depth, Vec::new())
        }
    }

    pub fn is_dir(&self) -> bool {
        self.kind == NodeKind::Directory
    }

    /// Number of nodes in this subtree, including `self`.
    pub fn count(&self) -> usize {
        1 + self.children.iter().map(Node::count).sum::<usize>()
    }

    /// Depth-first, parent-before-children iteration.
    pub fn iter(&self) -> NodeIter<'_> {
        NodeIter { stack: vec![self] }
    }

    /// Look up a descendant by its relative path.
    pub fn find(&self, path: &str) -> Option<&Node> {
        self.iter().find(|n| n.path == path)
    }
}

pub struct NodeIter<'a> {
    stack: Vec<&'a Node>,
}

impl<'a> Iterator for NodeIter<'a> {
    type Item = &'a Node;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        self.stack.extend(node.children.iter().rev());
        Some(node)
    }
}

/// Lowercase suffix after the last `.` of a file name.
///
/// Dotfiles without a further `.` (`.gitignore`) and names without any `.`
/// have no extension.
pub fn extension_of(name: &str) -> String {
    let stem = name.strip_prefix('.').unwrap_or(name);
    match stem.rfind('.') {
        Some(idx) => stem[idx + 1..].to_lowercase(),
        None => String::new(),
    }
}

/// Join a parent's relative path with a child name.
pub fn child_path(parent: &str, name: &str) -> String {
    if parent.is_empty() {
        name.to_string()
    } else {
        format!("{}/{}", parent, name)
    }
}

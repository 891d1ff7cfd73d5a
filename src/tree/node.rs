//! Pure structural operations over the generated file tree.
//!
//! A node's identity is purely its path — the sequence of names from the
//! tree root. Every operation takes `&self` and returns a new tree; the
//! original is never modified, so a caller swapping its tree reference can
//! never expose a partially-mutated value. Path-resolution failures degrade
//! to no-ops rather than errors: edits are frequently issued against UI
//! state that may already have changed.

use serde::{Deserialize, Serialize};

/// One node in a generated project tree: a file with content, or a folder
/// with ordered children (insertion order is display and generation order).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FileNode {
    /// A file. Content may be empty while generation is pending.
    File {
        /// File name, unique among its siblings (case-sensitive).
        name: String,
        /// File contents.
        #[serde(default)]
        content: String,
    },
    /// A folder with ordered children.
    Folder {
        /// Folder name, unique among its siblings (case-sensitive).
        name: String,
        /// Children, in display and generation order.
        #[serde(default)]
        children: Vec<FileNode>,
    },
}

impl FileNode {
    /// Creates a file node.
    #[must_use]
    pub fn file(name: impl Into<String>, content: impl Into<String>) -> Self {
        FileNode::File { name: name.into(), content: content.into() }
    }

    /// Creates a folder node.
    #[must_use]
    pub fn folder(name: impl Into<String>, children: Vec<FileNode>) -> Self {
        FileNode::Folder { name: name.into(), children }
    }

    /// The node's name.
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            FileNode::File { name, .. } | FileNode::Folder { name, .. } => name,
        }
    }

    /// Returns `true` for file nodes.
    #[must_use]
    pub fn is_file(&self) -> bool {
        matches!(self, FileNode::File { .. })
    }
}

/// A generated project's file tree: the ordered sequence of root nodes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FileTree {
    #[serde(default)]
    roots: Vec<FileNode>,
}

impl FileTree {
    /// Creates a tree from its root-level nodes.
    #[must_use]
    pub fn new(roots: Vec<FileNode>) -> Self {
        Self { roots }
    }

    /// The ordered root-level nodes.
    #[must_use]
    pub fn roots(&self) -> &[FileNode] {
        &self.roots
    }

    /// Resolves a path to a node, or `None` if any component is missing or
    /// a file appears where a folder was expected.
    #[must_use]
    pub fn node(&self, path: &[String]) -> Option<&FileNode> {
        let (first, rest) = path.split_first()?;
        let mut current = self.roots.iter().find(|n| n.name() == *first)?;
        for component in rest {
            let FileNode::Folder { children, .. } = current else {
                return None;
            };
            current = children.iter().find(|n| n.name() == *component)?;
        }
        Some(current)
    }

    /// The ordered children of the folder at `path` (empty path = root).
    ///
    /// Returns an empty slice — never an error — when the path does not
    /// resolve to an existing folder, so callers can probe name
    /// availability defensively.
    #[must_use]
    pub fn children(&self, path: &[String]) -> &[FileNode] {
        self.folder_children(path).map_or(&[], Vec::as_slice)
    }

    /// Inserts `node` as the last child of the folder at `parent_path`.
    ///
    /// Returns the tree unchanged when a sibling with the same name exists
    /// (duplicate names are never created) or when the parent path does not
    /// resolve to a folder. Callers wanting a guaranteed insert pick a free
    /// name first (see [`super::available_name`]).
    #[must_use]
    pub fn add_node(&self, parent_path: &[String], node: FileNode) -> FileTree {
        let Some(siblings) = self.folder_children(parent_path) else {
            return self.clone();
        };
        if siblings.iter().any(|n| n.name() == node.name()) {
            return self.clone();
        }
        FileTree { roots: add_into(&self.roots, parent_path, &node) }
    }

    /// Renames the node at `path`, leaving position and content untouched.
    ///
    /// Performs no sibling-collision check; that is the caller's
    /// responsibility (see [`super::try_rename`]).
    #[must_use]
    pub fn rename_node(&self, path: &[String], new_name: &str) -> FileTree {
        if path.is_empty() {
            return self.clone();
        }
        FileTree { roots: rename_in(&self.roots, path, new_name) }
    }

    /// Removes the node at `path` from its parent's child sequence.
    #[must_use]
    pub fn delete_node(&self, path: &[String]) -> FileTree {
        if path.is_empty() {
            return self.clone();
        }
        FileTree { roots: delete_in(&self.roots, path) }
    }

    /// Replaces the content of the file at `path`; no-op if the path does
    /// not resolve to an existing file.
    #[must_use]
    pub fn update_file_content(&self, path: &[String], content: &str) -> FileTree {
        if path.is_empty() {
            return self.clone();
        }
        FileTree { roots: update_in(&self.roots, path, content) }
    }

    /// Full paths of every file node, depth-first in child order; folders
    /// are omitted.
    ///
    /// This is the canonical ordering used to drive per-file generation, so
    /// generation order is deterministic and equals display order.
    #[must_use]
    pub fn list_file_paths(&self) -> Vec<Vec<String>> {
        let mut paths = Vec::new();
        collect_file_paths(&self.roots, &mut Vec::new(), &mut paths);
        paths
    }

    fn folder_children(&self, path: &[String]) -> Option<&Vec<FileNode>> {
        if path.is_empty() {
            return Some(&self.roots);
        }
        match self.node(path)? {
            FileNode::Folder { children, .. } => Some(children),
            FileNode::File { .. } => None,
        }
    }
}

fn add_into(nodes: &[FileNode], path: &[String], node: &FileNode) -> Vec<FileNode> {
    if path.is_empty() {
        let mut out = nodes.to_vec();
        out.push(node.clone());
        return out;
    }
    nodes
        .iter()
        .map(|n| match n {
            FileNode::Folder { name, children } if *name == path[0] => FileNode::Folder {
                name: name.clone(),
                children: add_into(children, &path[1..], node),
            },
            other => other.clone(),
        })
        .collect()
}

fn rename_in(nodes: &[FileNode], path: &[String], new_name: &str) -> Vec<FileNode> {
    nodes
        .iter()
        .map(|n| {
            if n.name() != path[0] {
                return n.clone();
            }
            match (n, path.len()) {
                (FileNode::File { content, .. }, 1) => {
                    FileNode::File { name: new_name.to_string(), content: content.clone() }
                }
                (FileNode::Folder { children, .. }, 1) => {
                    FileNode::Folder { name: new_name.to_string(), children: children.clone() }
                }
                (FileNode::Folder { name, children }, _) => FileNode::Folder {
                    name: name.clone(),
                    children: rename_in(children, &path[1..], new_name),
                },
                (other, _) => other.clone(),
            }
        })
        .collect()
}

fn delete_in(nodes: &[FileNode], path: &[String]) -> Vec<FileNode> {
    if path.len() == 1 {
        return nodes.iter().filter(|n| n.name() != path[0]).cloned().collect();
    }
    nodes
        .iter()
        .map(|n| match n {
            FileNode::Folder { name, children } if *name == path[0] => FileNode::Folder {
                name: name.clone(),
                children: delete_in(children, &path[1..]),
            },
            other => other.clone(),
        })
        .collect()
}

fn update_in(nodes: &[FileNode], path: &[String], content: &str) -> Vec<FileNode> {
    nodes
        .iter()
        .map(|n| {
            if n.name() != path[0] {
                return n.clone();
            }
            match (n, path.len()) {
                (FileNode::File { name, .. }, 1) => {
                    FileNode::File { name: name.clone(), content: content.to_string() }
                }
                (FileNode::Folder { name, children }, len) if len > 1 => FileNode::Folder {
                    name: name.clone(),
                    children: update_in(children, &path[1..], content),
                },
                (other, _) => other.clone(),
            }
        })
        .collect()
}

fn collect_file_paths(
    nodes: &[FileNode],
    prefix: &mut Vec<String>,
    out: &mut Vec<Vec<String>>,
) {
    for node in nodes {
        match node {
            FileNode::File { name, .. } => {
                let mut path = prefix.clone();
                path.push(name.clone());
                out.push(path);
            }
            FileNode::Folder { name, children } => {
                prefix.push(name.clone());
                collect_file_paths(children, prefix, out);
                prefix.pop();
            }
        }
    }
}

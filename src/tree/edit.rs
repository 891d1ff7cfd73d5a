//! Edit policy boundary for tree mutations.
//!
//! The engine in `node.rs` is deliberately permissive; the checks a UI
//! needs before mutating — protected root files, sibling-name collisions,
//! unique-name choice — live here and report rejections as values, never
//! panics, so callers can show inline feedback and keep editing.

use thiserror::Error;

use super::{FileNode, FileTree};

/// Root-level files that may never be renamed or deleted (compared
/// case-insensitively).
pub const PROTECTED_ROOT_FILES: [&str; 2] = ["readme.md", "setup.md"];

/// A rejected tree edit. The tree is unchanged whenever one of these is
/// returned.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TreeEditError {
    /// The addressed node is protected by policy.
    #[error("'{name}' is protected and cannot be renamed or deleted")]
    Protected {
        /// Name of the protected node.
        name: String,
    },
    /// The requested name is already taken by a sibling.
    #[error("a sibling named '{name}' already exists")]
    NameTaken {
        /// The colliding name.
        name: String,
    },
}

fn is_protected(path: &[String]) -> bool {
    path.len() == 1 && PROTECTED_ROOT_FILES.iter().any(|f| path[0].eq_ignore_ascii_case(f))
}

/// Renames the node at `path` after checking policy: protected targets and
/// sibling-name collisions are rejected with the tree unchanged.
///
/// # Errors
///
/// [`TreeEditError::Protected`] for a protected root file,
/// [`TreeEditError::NameTaken`] when a different sibling already has
/// `new_name`.
pub fn try_rename(
    tree: &FileTree,
    path: &[String],
    new_name: &str,
) -> Result<FileTree, TreeEditError> {
    if is_protected(path) {
        return Err(TreeEditError::Protected { name: path[0].clone() });
    }
    let Some((current, parent)) = path.split_last() else {
        return Ok(tree.clone());
    };
    let collides = tree
        .children(parent)
        .iter()
        .any(|sibling| sibling.name() == new_name && sibling.name() != current);
    if collides {
        return Err(TreeEditError::NameTaken { name: new_name.to_string() });
    }
    Ok(tree.rename_node(path, new_name))
}

/// Deletes the node at `path` after checking policy.
///
/// # Errors
///
/// [`TreeEditError::Protected`] for a protected root file.
pub fn try_delete(tree: &FileTree, path: &[String]) -> Result<FileTree, TreeEditError> {
    if is_protected(path) {
        return Err(TreeEditError::Protected { name: path[0].clone() });
    }
    Ok(tree.delete_node(path))
}

/// Picks a name that is free among the children of `parent_path`: `base`
/// itself, or `base-1`, `base-2`, … for the first free suffix.
///
/// Used before [`FileTree::add_node`], which silently refuses duplicate
/// names.
#[must_use]
pub fn available_name(tree: &FileTree, parent_path: &[String], base: &str) -> String {
    let taken =
        |candidate: &str| tree.children(parent_path).iter().any(|n| n.name() == candidate);
    if !taken(base) {
        return base.to_string();
    }
    let mut suffix = 1usize;
    loop {
        let candidate = format!("{base}-{suffix}");
        if !taken(&candidate) {
            return candidate;
        }
        suffix += 1;
    }
}

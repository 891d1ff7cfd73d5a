//! `cursus tree` command: structural edits on a project environment.

use std::path::Path;

use crate::cli::TreeOp;
use crate::context::ServiceContext;
use crate::store::Library;
use crate::tree::{available_name, try_delete, try_rename, FileNode, FileTree};

use super::split_path;

/// Performs one structural edit (or prints the tree).
///
/// Edit rejections — protected files, name collisions — are printed as
/// inline feedback and do not fail the command: the rest of the edit
/// session is undisturbed.
///
/// # Errors
///
/// Returns an error string if the project cannot be loaded or saved.
pub fn run(ctx: &ServiceContext, root: &Path, id: &str, op: &TreeOp) -> Result<(), String> {
    let library = Library::new(ctx, root);
    let mut stored = library.load_project(id)?;
    let tree = &stored.spec.environment;

    let updated = match op {
        TreeOp::Show => {
            print_tree(tree);
            return Ok(());
        }
        TreeOp::Add { parent, name, folder } => {
            let parent = split_path(parent);
            let name = available_name(tree, &parent, name);
            let node = if *folder {
                FileNode::folder(name.clone(), Vec::new())
            } else {
                FileNode::file(name.clone(), "")
            };
            let updated = tree.add_node(&parent, node);
            if updated == *tree {
                println!("nothing added: '{}' is not a folder", parent.join("/"));
                return Ok(());
            }
            println!("added {}", join_under(&parent, &name));
            updated
        }
        TreeOp::Rename { path, new_name } => {
            let path = split_path(path);
            match try_rename(tree, &path, new_name) {
                Ok(updated) => {
                    println!("renamed {} to {new_name}", path.join("/"));
                    updated
                }
                Err(rejection) => {
                    println!("{rejection}");
                    return Ok(());
                }
            }
        }
        TreeOp::Delete { path } => {
            let path = split_path(path);
            match try_delete(tree, &path) {
                Ok(updated) => {
                    println!("deleted {}", path.join("/"));
                    updated
                }
                Err(rejection) => {
                    println!("{rejection}");
                    return Ok(());
                }
            }
        }
    };

    stored.spec.environment = updated;
    library.save_project(&stored)
}

fn join_under(parent: &[String], name: &str) -> String {
    if parent.is_empty() {
        name.to_string()
    } else {
        format!("{}/{name}", parent.join("/"))
    }
}

/// Prints the tree with two-space indentation, folders suffixed `/`.
pub(crate) fn print_tree(tree: &FileTree) {
    fn walk(nodes: &[FileNode], depth: usize) {
        for node in nodes {
            let indent = "  ".repeat(depth);
            match node {
                FileNode::File { name, .. } => println!("{indent}{name}"),
                FileNode::Folder { name, children } => {
                    println!("{indent}{name}/");
                    walk(children, depth + 1);
                }
            }
        }
    }
    walk(tree.roots(), 0);
}

//! File tree engine for generated starter environments.
//!
//! `node` holds the pure structural operations; `edit` is the policy
//! boundary (protected files, collision rejection) the CLI edits through.

mod edit;
mod node;

pub use edit::{available_name, try_delete, try_rename, TreeEditError, PROTECTED_ROOT_FILES};
pub use node::{FileNode, FileTree};

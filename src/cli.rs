//! CLI argument definitions.

use clap::{Parser, Subcommand};

/// Top-level CLI parser for `cursus`.
#[derive(Debug, Parser)]
#[command(name = "cursus", version, about = "Author lessons and capstone projects with AI")]
pub struct Cli {
    /// The command to execute.
    #[command(subcommand)]
    pub command: Command,
}

/// Supported top-level subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Generate a lesson plan and save it to the library.
    Lesson {
        /// Lesson topic.
        topic: String,
        /// Intended audience.
        #[arg(long)]
        audience: Option<String>,
        /// Target lesson length in minutes.
        #[arg(long)]
        minutes: Option<u32>,
    },
    /// Generate a capstone project (brief + starter environment).
    Project {
        /// Project topic.
        topic: String,
        /// Intended audience.
        #[arg(long)]
        audience: Option<String>,
    },
    /// Regenerate one lesson part, addressed by part id (e.g. `activation`,
    /// `quiz[1]`).
    Regen {
        /// Library id of the lesson.
        id: String,
        /// Part id to regenerate.
        part: String,
        /// Free-text instructions for the rewrite.
        #[arg(long)]
        instructions: Option<String>,
    },
    /// Append a freshly generated item to a lesson list field.
    Add {
        /// Library id of the lesson.
        id: String,
        /// List field to extend: `exercises` or `quiz`.
        field: String,
    },
    /// Regenerate the content of one environment file.
    RegenFile {
        /// Library id of the project.
        id: String,
        /// Slash-separated file path (e.g. `src/main.py`).
        path: String,
        /// Free-text instructions for the rewrite.
        #[arg(long)]
        instructions: Option<String>,
    },
    /// Edit a project's environment tree.
    Tree {
        /// Library id of the project.
        id: String,
        /// The structural operation to perform.
        #[command(subcommand)]
        op: TreeOp,
    },
    /// List stored documents.
    List,
    /// Print a stored document.
    Show {
        /// Library id.
        id: String,
    },
    /// Delete a stored document.
    Delete {
        /// Library id.
        id: String,
    },
    /// Fetch a debounced completion for a partially-typed prompt.
    Suggest {
        /// The text typed so far.
        draft: String,
    },
}

/// Structural operations on a project environment.
#[derive(Debug, Subcommand)]
pub enum TreeOp {
    /// Print the tree.
    Show,
    /// Add a file or folder under a parent path (empty parent = root).
    Add {
        /// Slash-separated parent folder path, or `/` for the root.
        parent: String,
        /// Name for the new node; suffixed `-1`, `-2`, … on collision.
        name: String,
        /// Create a folder instead of a file.
        #[arg(long)]
        folder: bool,
    },
    /// Rename the node at a path.
    Rename {
        /// Slash-separated node path.
        path: String,
        /// The new name.
        new_name: String,
    },
    /// Delete the node at a path.
    Delete {
        /// Slash-separated node path.
        path: String,
    },
}

#[cfg(test)]
mod tests {
    use super::{Cli, Command, TreeOp};
    use clap::Parser;

    #[test]
    fn parses_lesson_with_options() {
        let cli = Cli::parse_from([
            "cursus", "lesson", "recursion", "--audience", "beginners", "--minutes", "45",
        ]);
        let Command::Lesson { topic, audience, minutes } = cli.command else {
            panic!("expected lesson");
        };
        assert_eq!(topic, "recursion");
        assert_eq!(audience.as_deref(), Some("beginners"));
        assert_eq!(minutes, Some(45));
    }

    #[test]
    fn parses_regen_with_part_id() {
        let cli = Cli::parse_from(["cursus", "regen", "L-1", "quiz[1]", "--instructions", "harder"]);
        let Command::Regen { id, part, instructions } = cli.command else {
            panic!("expected regen");
        };
        assert_eq!(id, "L-1");
        assert_eq!(part, "quiz[1]");
        assert_eq!(instructions.as_deref(), Some("harder"));
    }

    #[test]
    fn parses_tree_rename() {
        let cli = Cli::parse_from(["cursus", "tree", "P-1", "rename", "src/main.py", "app.py"]);
        let Command::Tree { id, op } = cli.command else {
            panic!("expected tree");
        };
        assert_eq!(id, "P-1");
        let TreeOp::Rename { path, new_name } = op else {
            panic!("expected rename");
        };
        assert_eq!(path, "src/main.py");
        assert_eq!(new_name, "app.py");
    }

    #[test]
    fn rejects_unknown_subcommand() {
        assert!(Cli::try_parse_from(["cursus", "frobnicate"]).is_err());
    }
}

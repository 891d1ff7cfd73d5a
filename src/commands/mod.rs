//! Command dispatch and handlers.

pub mod lesson;
pub mod library;
pub mod project;
pub mod regen;
pub mod suggest;
pub mod tree;

use std::env;
use std::path::{Path, PathBuf};

use crate::cli::Command;
use crate::context::ServiceContext;
use crate::generate::ProgressSink;

/// Dispatch a parsed command to its handler.
///
/// The context is wired from the environment: `CURSUS_REPLAY=<tape>` serves
/// producer calls from a tape, `CURSUS_RECORD=<tape>` captures one, and
/// otherwise everything is live. `CURSUS_LIBRARY` overrides the library
/// root (default `.cursus`).
///
/// # Errors
///
/// Returns an error string if context construction or the selected command
/// handler fails.
pub fn dispatch(command: &Command) -> Result<(), String> {
    let ctx = build_context()?;
    let root = library_root();
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|e| format!("failed to start runtime: {e}"))?;
    runtime.block_on(dispatch_with_context(command, &ctx, &root))
}

/// Dispatch a command with the given service context and library root.
async fn dispatch_with_context(
    command: &Command,
    ctx: &ServiceContext,
    root: &Path,
) -> Result<(), String> {
    match command {
        Command::Lesson { topic, audience, minutes } => {
            lesson::run(ctx, root, topic, audience.as_deref(), *minutes).await
        }
        Command::Project { topic, audience } => {
            project::run(ctx, root, topic, audience.as_deref()).await
        }
        Command::Regen { id, part, instructions } => {
            regen::run_part(ctx, root, id, part, instructions.as_deref()).await
        }
        Command::Add { id, field } => regen::run_add(ctx, root, id, field).await,
        Command::RegenFile { id, path, instructions } => {
            regen::run_file(ctx, root, id, path, instructions.as_deref()).await
        }
        Command::Tree { id, op } => tree::run(ctx, root, id, op),
        Command::List => library::run_list(ctx, root),
        Command::Show { id } => library::run_show(ctx, root, id),
        Command::Delete { id } => library::run_delete(ctx, root, id),
        Command::Suggest { draft } => suggest::run(ctx, draft).await,
    }
}

fn build_context() -> Result<ServiceContext, String> {
    if let Ok(path) = env::var("CURSUS_REPLAY") {
        return ServiceContext::replaying(Path::new(&path));
    }
    if let Ok(path) = env::var("CURSUS_RECORD") {
        return Ok(ServiceContext::recording(Path::new(&path)));
    }
    Ok(ServiceContext::live())
}

fn library_root() -> PathBuf {
    env::var("CURSUS_LIBRARY").map_or_else(|_| PathBuf::from(".cursus"), PathBuf::from)
}

/// Progress sink that prints one line per stage or file.
pub(crate) struct PrintSink;

impl ProgressSink for PrintSink {
    fn report(&self, fraction: f64, message: &str) {
        println!("[{:3.0}%] {message}", fraction * 100.0);
    }
}

/// Splits a slash-separated CLI path into tree path components. `/` and
/// the empty string address the root.
pub(crate) fn split_path(raw: &str) -> Vec<String> {
    raw.split('/').filter(|part| !part.is_empty()).map(ToString::to_string).collect()
}

#[cfg(test)]
mod tests {
    use super::split_path;

    #[test]
    fn split_path_handles_root_and_nesting() {
        assert!(split_path("").is_empty());
        assert!(split_path("/").is_empty());
        assert_eq!(split_path("src/main.py"), vec!["src", "main.py"]);
        assert_eq!(split_path("/src/"), vec!["src"]);
    }
}

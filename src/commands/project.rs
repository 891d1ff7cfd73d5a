//! `cursus project` command.

use std::path::Path;

use tracing::info;

use crate::context::ServiceContext;
use crate::document::{ProjectRequest, ProjectSpec};
use crate::generate::{generate_brief, CancelFlag, EnvironmentSession};
use crate::store::{Library, StoredProject};

use super::library::print_project;
use super::PrintSink;

/// Generates a capstone project — brief, then starter environment — saves
/// it, and prints it.
///
/// # Errors
///
/// Returns an error string if a generation stage or the save fails.
pub async fn run(
    ctx: &ServiceContext,
    root: &Path,
    topic: &str,
    audience: Option<&str>,
) -> Result<(), String> {
    let request =
        ProjectRequest { topic: topic.to_string(), audience: audience.map(ToString::to_string) };
    info!(topic, "generating project");

    println!("[  0%] drafting brief");
    let brief = generate_brief(ctx, &request).await.map_err(|e| e.to_string())?;

    let sink = PrintSink;
    let session =
        EnvironmentSession::new(ctx, request.clone(), brief.clone(), CancelFlag::new(), &sink);
    let environment = session.run().await.map_err(|e| e.to_string())?;

    let mut spec = ProjectSpec::from_brief(brief);
    spec.environment = environment;

    let stored = StoredProject {
        id: ctx.id_gen.generate_id(),
        created_at: ctx.clock.now(),
        request,
        spec,
    };
    Library::new(ctx, root).save_project(&stored)?;

    println!("\nSaved project {}\n", stored.id);
    print_project(&stored);
    Ok(())
}

//! `cursus lesson` command.

use std::path::Path;

use tracing::info;

use crate::context::ServiceContext;
use crate::document::LessonRequest;
use crate::generate::{CancelFlag, DetailSession};
use crate::store::{Library, StoredLesson};

use super::library::print_lesson;
use super::PrintSink;

/// Generates a lesson plan, saves it, and prints it.
///
/// # Errors
///
/// Returns an error string if a generation stage or the save fails.
pub async fn run(
    ctx: &ServiceContext,
    root: &Path,
    topic: &str,
    audience: Option<&str>,
    minutes: Option<u32>,
) -> Result<(), String> {
    let request = LessonRequest {
        topic: topic.to_string(),
        audience: audience.map(ToString::to_string),
        minutes,
    };
    info!(topic, "generating lesson");

    let sink = PrintSink;
    let session = DetailSession::new(ctx, request.clone(), CancelFlag::new(), &sink);
    let plan = session.run().await.map_err(|e| e.to_string())?;

    let stored = StoredLesson {
        id: ctx.id_gen.generate_id(),
        created_at: ctx.clock.now(),
        request,
        plan,
    };
    Library::new(ctx, root).save_lesson(&stored)?;

    println!("\nSaved lesson {}\n", stored.id);
    print_lesson(&stored);
    Ok(())
}

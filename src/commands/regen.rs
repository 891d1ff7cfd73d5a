//! `cursus regen`, `cursus add`, and `cursus regen-file` commands.

use std::path::Path;

use crate::context::ServiceContext;
use crate::document::{ListField, ListItem, PartAddress};
use crate::generate::{generate_new_item, regenerate, regenerate_file};
use crate::store::Library;

use super::split_path;

/// Regenerates one lesson part and saves the patched lesson.
///
/// # Errors
///
/// Returns an error string for an unparseable part id, a stale address, or
/// a failed producer call.
pub async fn run_part(
    ctx: &ServiceContext,
    root: &Path,
    id: &str,
    part: &str,
    instructions: Option<&str>,
) -> Result<(), String> {
    let address = PartAddress::parse(part)
        .ok_or_else(|| format!("unknown part '{part}' (try e.g. 'activation' or 'quiz[1]')"))?;

    let library = Library::new(ctx, root);
    let mut stored = library.load_lesson(id)?;

    let patch = regenerate(ctx, &stored.request, &stored.plan, address, instructions)
        .await
        .map_err(|e| e.to_string())?;
    stored.plan.apply(patch);
    library.save_lesson(&stored)?;

    println!("Regenerated {} in lesson {id}", address.part_id());
    Ok(())
}

/// Appends a freshly generated item to a lesson list field and saves.
///
/// # Errors
///
/// Returns an error string for an unknown field name or a failed producer
/// call.
pub async fn run_add(
    ctx: &ServiceContext,
    root: &Path,
    id: &str,
    field: &str,
) -> Result<(), String> {
    let field = match field {
        "exercises" => ListField::Exercises,
        "quiz" => ListField::Quiz,
        other => return Err(format!("unknown list field '{other}' (exercises or quiz)")),
    };

    let library = Library::new(ctx, root);
    let mut stored = library.load_lesson(id)?;

    let item = generate_new_item(ctx, &stored.request, &stored.plan, field)
        .await
        .map_err(|e| e.to_string())?;
    match item {
        ListItem::Exercise(exercise) => stored.plan.exercises.push(exercise),
        ListItem::Question(question) => stored.plan.quiz.push(question),
    }
    library.save_lesson(&stored)?;

    let index = match field {
        ListField::Exercises => stored.plan.exercises.len() - 1,
        ListField::Quiz => stored.plan.quiz.len() - 1,
    };
    println!("Added {}[{index}] to lesson {id}", field.key());
    Ok(())
}

/// Regenerates one environment file's content and saves the project.
///
/// # Errors
///
/// Returns an error string for an unknown path or a failed producer call.
pub async fn run_file(
    ctx: &ServiceContext,
    root: &Path,
    id: &str,
    raw_path: &str,
    instructions: Option<&str>,
) -> Result<(), String> {
    let path = split_path(raw_path);

    let library = Library::new(ctx, root);
    let mut stored = library.load_project(id)?;

    let content = regenerate_file(ctx, &stored.request, &stored.spec, &path, instructions)
        .await
        .map_err(|e| e.to_string())?;
    stored.spec.environment = stored.spec.environment.update_file_content(&path, &content);
    library.save_project(&stored)?;

    println!("Regenerated {} in project {id}", path.join("/"));
    Ok(())
}

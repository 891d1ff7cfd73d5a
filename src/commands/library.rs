//! `cursus list`, `cursus show`, and `cursus delete` commands.

use std::path::Path;

use crate::context::ServiceContext;
use crate::store::{DocumentKind, Library, StoredLesson, StoredProject};

use super::tree::print_tree;

/// Lists stored documents.
///
/// # Errors
///
/// Returns an error string if the library cannot be listed.
pub fn run_list(ctx: &ServiceContext, root: &Path) -> Result<(), String> {
    let entries = Library::new(ctx, root).list()?;
    if entries.is_empty() {
        println!("library is empty");
        return Ok(());
    }
    for entry in entries {
        let kind = match entry.kind {
            DocumentKind::Lesson => "lesson",
            DocumentKind::Project => "project",
        };
        println!("{kind}  {}", entry.id);
    }
    Ok(())
}

/// Prints a stored document of either kind.
///
/// # Errors
///
/// Returns an error string if no document has this id.
pub fn run_show(ctx: &ServiceContext, root: &Path, id: &str) -> Result<(), String> {
    let library = Library::new(ctx, root);
    if let Ok(lesson) = library.load_lesson(id) {
        print_lesson(&lesson);
        return Ok(());
    }
    match library.load_project(id) {
        Ok(project) => {
            print_project(&project);
            Ok(())
        }
        Err(_) => Err(format!("no document with id {id}")),
    }
}

/// Deletes a stored document.
///
/// # Errors
///
/// Returns an error string if no document has this id or removal fails.
pub fn run_delete(ctx: &ServiceContext, root: &Path, id: &str) -> Result<(), String> {
    Library::new(ctx, root).delete(id)?;
    println!("deleted {id}");
    Ok(())
}

/// Prints a lesson with its part ids, so any line the user wants to
/// regenerate can be addressed directly.
pub(crate) fn print_lesson(stored: &StoredLesson) {
    println!("# {}", stored.request.topic);
    for (key, text) in [
        ("objectives", &stored.plan.objectives),
        ("activation", &stored.plan.activation),
        ("instruction", &stored.plan.instruction),
        ("closure", &stored.plan.closure),
    ] {
        println!("\n## {key}\n{text}");
    }
    println!("\n## exercises");
    for (i, exercise) in stored.plan.exercises.iter().enumerate() {
        println!("[exercises[{i}]] {} — {}", exercise.title, exercise.task);
    }
    println!("\n## quiz");
    for (i, question) in stored.plan.quiz.iter().enumerate() {
        println!("[quiz[{i}]] {}", question.prompt);
        for (j, option) in question.options.iter().enumerate() {
            let marker = if j == question.answer { "*" } else { " " };
            println!("  {marker} {option}");
        }
    }
}

/// Prints a project brief and its environment tree.
pub(crate) fn print_project(stored: &StoredProject) {
    println!("# {}", stored.request.topic);
    println!("\n## overview\n{}", stored.spec.overview);
    println!("\n## learning goals\n{}", stored.spec.learning_goals);
    println!("\n## milestones");
    for (i, milestone) in stored.spec.milestones.iter().enumerate() {
        println!("{}. {} — {}", i + 1, milestone.title, milestone.description);
    }
    println!("\n## environment");
    print_tree(&stored.spec.environment);
}

//! Regeneration dispatcher: one part address in, one patch out.

use tracing::debug;

use crate::context::ServiceContext;
use crate::document::{
    LessonPatch, LessonPlan, LessonRequest, ListField, ListItem, PartAddress, ProjectRequest,
    ProjectSpec, ScalarField,
};
use crate::ports::{PartRequest, ProducedPart};
use crate::tree::FileNode;

use super::error::GenerationError;

/// Regenerates the part at `address` and returns the patch to merge.
///
/// The field-to-operation table is the `match` over the closed field
/// enums. For a list address, the patch carries the full list with exactly
/// the addressed element replaced; every other element is the untouched
/// original. The index is validated against the list's current length
/// first — callers must capture it at click time and not reuse it across
/// an intervening delete or add.
///
/// # Errors
///
/// [`GenerationError::StaleAddress`] when a list index no longer fits;
/// otherwise the categorized producer failure for the one request made.
pub async fn regenerate(
    ctx: &ServiceContext,
    request: &LessonRequest,
    lesson: &LessonPlan,
    address: PartAddress,
    instructions: Option<&str>,
) -> Result<LessonPatch, GenerationError> {
    debug!(part = %address.part_id(), "regenerating lesson part");
    match address {
        PartAddress::Scalar(field) => regenerate_scalar(ctx, request, lesson, field, instructions).await,
        PartAddress::Item { field, index } => {
            regenerate_item(ctx, request, lesson, field, index, instructions).await
        }
    }
}

async fn regenerate_scalar(
    ctx: &ServiceContext,
    request: &LessonRequest,
    lesson: &LessonPlan,
    field: ScalarField,
    instructions: Option<&str>,
) -> Result<LessonPatch, GenerationError> {
    let part_request = PartRequest::LessonScalar {
        field,
        request: request.clone(),
        draft: lesson.clone(),
        instructions: instructions.map(ToString::to_string),
    };
    let produced = produce(ctx, &part_request).await?;
    let text = match produced {
        ProducedPart::Scalar(text) => text,
        other => return Err(GenerationError::wrong_shape(field.key(), other.variant_name())),
    };

    let mut patch = LessonPatch::default();
    match field {
        ScalarField::Objectives => patch.objectives = Some(text),
        ScalarField::Activation => patch.activation = Some(text),
        ScalarField::Instruction => patch.instruction = Some(text),
        ScalarField::Closure => patch.closure = Some(text),
    }
    Ok(patch)
}

async fn regenerate_item(
    ctx: &ServiceContext,
    request: &LessonRequest,
    lesson: &LessonPlan,
    field: ListField,
    index: usize,
    instructions: Option<&str>,
) -> Result<LessonPatch, GenerationError> {
    let len = match field {
        ListField::Exercises => lesson.exercises.len(),
        ListField::Quiz => lesson.quiz.len(),
    };
    if index >= len {
        return Err(GenerationError::StaleAddress { field: field.key(), index, len });
    }

    let current = match field {
        ListField::Exercises => ListItem::Exercise(lesson.exercises[index].clone()),
        ListField::Quiz => ListItem::Question(lesson.quiz[index].clone()),
    };
    let part_request = PartRequest::LessonListItem {
        field,
        request: request.clone(),
        current: Some(current),
        instructions: instructions.map(ToString::to_string),
    };
    let item = expect_item(field, produce(ctx, &part_request).await?)?;

    let mut patch = LessonPatch::default();
    match (field, item) {
        (ListField::Exercises, ListItem::Exercise(exercise)) => {
            let mut exercises = lesson.exercises.clone();
            exercises[index] = exercise;
            patch.exercises = Some(exercises);
        }
        (ListField::Quiz, ListItem::Question(question)) => {
            let mut quiz = lesson.quiz.clone();
            quiz[index] = question;
            patch.quiz = Some(quiz);
        }
        (field, _) => {
            return Err(GenerationError::wrong_shape(field.key(), "mismatched list item"));
        }
    }
    Ok(patch)
}

/// Generates a fresh item for the end of a list field. Append-only: the
/// caller pushes the returned item onto the list; there is no insert at
/// position.
///
/// # Errors
///
/// The categorized producer failure for the one request made.
pub async fn generate_new_item(
    ctx: &ServiceContext,
    request: &LessonRequest,
    lesson: &LessonPlan,
    field: ListField,
) -> Result<ListItem, GenerationError> {
    debug!(field = field.key(), "generating new list item");
    let part_request = PartRequest::LessonListItem {
        field,
        request: request.clone(),
        current: None,
        instructions: None,
    };
    expect_item(field, produce(ctx, &part_request).await?)
}

/// Regenerates the content of one existing environment file. The caller
/// applies the returned content with `update_file_content` at the same
/// path.
///
/// # Errors
///
/// [`GenerationError::UnknownPath`] when `path` does not resolve to an
/// existing file; otherwise the categorized producer failure.
pub async fn regenerate_file(
    ctx: &ServiceContext,
    request: &ProjectRequest,
    project: &ProjectSpec,
    path: &[String],
    instructions: Option<&str>,
) -> Result<String, GenerationError> {
    match project.environment.node(path) {
        Some(FileNode::File { .. }) => {}
        _ => return Err(GenerationError::UnknownPath(path.join("/"))),
    }
    debug!(path = %path.join("/"), "regenerating environment file");

    let part_request = PartRequest::FileContent {
        request: request.clone(),
        overview: project.overview.clone(),
        path: path.to_vec(),
        instructions: instructions.map(ToString::to_string),
    };
    match produce(ctx, &part_request).await? {
        ProducedPart::FileContent(content) => Ok(content),
        other => Err(GenerationError::wrong_shape("file content", other.variant_name())),
    }
}

async fn produce(
    ctx: &ServiceContext,
    request: &PartRequest,
) -> Result<ProducedPart, GenerationError> {
    ctx.producer.produce(request).await.map_err(|e| GenerationError::from_boundary(&*e))
}

fn expect_item(field: ListField, produced: ProducedPart) -> Result<ListItem, GenerationError> {
    let item = match produced {
        ProducedPart::Item(item) => item,
        other => return Err(GenerationError::wrong_shape(field.key(), other.variant_name())),
    };
    let matches_field = matches!(
        (field, &item),
        (ListField::Exercises, ListItem::Exercise(_)) | (ListField::Quiz, ListItem::Question(_))
    );
    if matches_field {
        Ok(item)
    } else {
        Err(GenerationError::wrong_shape(field.key(), "mismatched list item"))
    }
}

//! Content producer port: the boundary to the generative model.

use std::error::Error;
use std::future::Future;
use std::pin::Pin;

use serde::{Deserialize, Serialize};

use crate::document::{
    LessonPlan, LessonRequest, ListField, ListItem, ProjectBrief, ProjectRequest, ScalarField,
};
use crate::tree::FileTree;

/// Boxed future type alias used by [`ContentProducer`] to keep the trait
/// dyn-compatible.
pub type ProduceFuture<'a> =
    Pin<Box<dyn Future<Output = Result<ProducedPart, Box<dyn Error + Send + Sync>>> + Send + 'a>>;

/// A request for one generated part, carrying the context the producer
/// needs to build a prompt for it.
///
/// One variant per producible part kind; sessions and the dispatcher issue
/// exactly one request per stage, part, or file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum PartRequest {
    /// One scalar lesson field.
    LessonScalar {
        /// The field to produce.
        field: ScalarField,
        /// The authoring request.
        request: LessonRequest,
        /// The document so far, as context.
        draft: LessonPlan,
        /// Free-text regeneration instructions, if any.
        instructions: Option<String>,
    },
    /// A whole lesson list field.
    LessonList {
        /// The field to produce.
        field: ListField,
        /// The authoring request.
        request: LessonRequest,
        /// The document so far, as context.
        draft: LessonPlan,
    },
    /// One element of a lesson list field: a replacement when `current` is
    /// set, a fresh appendable item otherwise.
    LessonListItem {
        /// The list field the item belongs to.
        field: ListField,
        /// The authoring request.
        request: LessonRequest,
        /// The item being replaced, as context; `None` when appending.
        current: Option<ListItem>,
        /// Free-text regeneration instructions, if any.
        instructions: Option<String>,
    },
    /// The brief part of a capstone project.
    ProjectBrief {
        /// The authoring request.
        request: ProjectRequest,
    },
    /// The file/folder plan of a project environment: a tree whose files
    /// carry empty content, pending generation.
    EnvironmentPlan {
        /// The authoring request.
        request: ProjectRequest,
        /// The project brief, as context.
        brief: ProjectBrief,
    },
    /// The content of one planned environment file.
    FileContent {
        /// The authoring request.
        request: ProjectRequest,
        /// The project overview, as context.
        overview: String,
        /// Path of the file being generated.
        path: Vec<String>,
        /// Free-text regeneration instructions, if any.
        instructions: Option<String>,
    },
    /// A completion for a partially-typed prompt.
    Suggestion {
        /// The text typed so far.
        draft: String,
    },
}

/// A produced part, already shape-validated by the adapter. The variant
/// must match what the request asked for; sessions reject a mismatch as a
/// malformed response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ProducedPart {
    /// Text for a scalar field.
    Scalar(String),
    /// A full exercise list.
    Exercises(Vec<crate::document::Exercise>),
    /// A full quiz list.
    Quiz(Vec<crate::document::QuizQuestion>),
    /// A single list item.
    Item(ListItem),
    /// A project brief.
    Brief(ProjectBrief),
    /// A planned environment tree.
    Tree(FileTree),
    /// Content for one file.
    FileContent(String),
    /// A prompt completion.
    Suggestion(String),
}

impl ProducedPart {
    /// Human-readable name of this variant, used in shape-mismatch
    /// messages.
    #[must_use]
    pub fn variant_name(&self) -> &'static str {
        match self {
            ProducedPart::Scalar(_) => "scalar text",
            ProducedPart::Exercises(_) => "exercise list",
            ProducedPart::Quiz(_) => "quiz list",
            ProducedPart::Item(_) => "list item",
            ProducedPart::Brief(_) => "project brief",
            ProducedPart::Tree(_) => "environment tree",
            ProducedPart::FileContent(_) => "file content",
            ProducedPart::Suggestion(_) => "suggestion",
        }
    }
}

impl PartRequest {
    /// Stable kind key, used to pair requests with recorded exchanges on a
    /// tape.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            PartRequest::LessonScalar { .. } => "lesson_scalar",
            PartRequest::LessonList { .. } => "lesson_list",
            PartRequest::LessonListItem { .. } => "lesson_list_item",
            PartRequest::ProjectBrief { .. } => "project_brief",
            PartRequest::EnvironmentPlan { .. } => "environment_plan",
            PartRequest::FileContent { .. } => "file_content",
            PartRequest::Suggestion { .. } => "suggestion",
        }
    }
}

/// Produces structured content for document parts.
///
/// One call per stage/part/file. Implementations validate the shape of
/// what the model returned before handing it back; the core never parses
/// raw model output.
pub trait ContentProducer: Send + Sync {
    /// Produces the part described by `request`.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying call fails (network, auth,
    /// rate-limit) or the response cannot be validated against the
    /// requested shape.
    fn produce(&self, request: &PartRequest) -> ProduceFuture<'_>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_is_distinct_per_variant() {
        let request = LessonRequest { topic: "t".into(), audience: None, minutes: None };
        let scalar = PartRequest::LessonScalar {
            field: ScalarField::Objectives,
            request: request.clone(),
            draft: LessonPlan::default(),
            instructions: None,
        };
        let list = PartRequest::LessonList {
            field: ListField::Quiz,
            request,
            draft: LessonPlan::default(),
        };
        let suggestion = PartRequest::Suggestion { draft: "d".into() };

        assert_ne!(scalar.kind(), list.kind());
        assert_ne!(list.kind(), suggestion.kind());
    }
}

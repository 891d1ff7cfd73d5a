//! Composite document types for the two authorable artifacts.
//!
//! Defines the closed schemas for lesson plans and capstone projects, the
//! patch types used for partial updates, and the part-address model that
//! names one regenerable unit inside a lesson plan.

mod lesson;
mod part;
mod project;

pub use lesson::{
    Exercise, LessonPatch, LessonPlan, LessonRequest, ListItem, QuizQuestion,
};
pub use part::{LessonField, ListField, PartAddress, ScalarField};
pub use project::{Milestone, ProjectBrief, ProjectRequest, ProjectSpec};

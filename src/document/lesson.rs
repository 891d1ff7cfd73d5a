//! Lesson plan document schema.

use serde::{Deserialize, Serialize};

/// The authoring request a lesson plan is generated from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LessonRequest {
    /// Subject matter of the lesson (e.g. "binary search trees").
    pub topic: String,
    /// Intended audience (e.g. "second-year undergraduates").
    #[serde(default)]
    pub audience: Option<String>,
    /// Target lesson length in minutes.
    #[serde(default)]
    pub minutes: Option<u32>,
}

/// One hands-on exercise inside a lesson plan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Exercise {
    /// Short exercise title.
    pub title: String,
    /// What the learner is asked to do.
    pub task: String,
    /// What a correct result looks like.
    pub expected_outcome: String,
}

/// One multiple-choice question inside a lesson plan's quiz.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuizQuestion {
    /// The question text.
    pub prompt: String,
    /// Answer options, in display order.
    pub options: Vec<String>,
    /// Index into `options` of the correct answer.
    pub answer: usize,
    /// Why the correct answer is correct.
    pub explanation: String,
}

/// A generated lesson plan.
///
/// The closed field set is the address space of [`super::PartAddress`]:
/// four scalar fields and two ordered list fields. Fields start empty and
/// are filled one stage at a time by the detail session.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LessonPlan {
    /// What the learner should be able to do afterwards.
    #[serde(default)]
    pub objectives: String,
    /// Opening hook that activates prior knowledge.
    #[serde(default)]
    pub activation: String,
    /// The main instructional narrative.
    #[serde(default)]
    pub instruction: String,
    /// Wrap-up and reflection.
    #[serde(default)]
    pub closure: String,
    /// Practice exercises, in teaching order.
    #[serde(default)]
    pub exercises: Vec<Exercise>,
    /// Comprehension-check quiz, in display order.
    #[serde(default)]
    pub quiz: Vec<QuizQuestion>,
}

/// A partial lesson update.
///
/// Applying a patch overwrites exactly the fields that are `Some`, leaving
/// every other field untouched. Because the schema is closed, a scalar field
/// can never change into a list (or vice versa) across partial updates.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LessonPatch {
    /// Replacement objectives, if regenerated.
    #[serde(default)]
    pub objectives: Option<String>,
    /// Replacement activation, if regenerated.
    #[serde(default)]
    pub activation: Option<String>,
    /// Replacement instruction, if regenerated.
    #[serde(default)]
    pub instruction: Option<String>,
    /// Replacement closure, if regenerated.
    #[serde(default)]
    pub closure: Option<String>,
    /// Replacement exercise list, if regenerated.
    #[serde(default)]
    pub exercises: Option<Vec<Exercise>>,
    /// Replacement quiz list, if regenerated.
    #[serde(default)]
    pub quiz: Option<Vec<QuizQuestion>>,
}

/// One element of a lesson list field, produced by append or item
/// regeneration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ListItem {
    /// An exercise for the `exercises` field.
    Exercise(Exercise),
    /// A question for the `quiz` field.
    Question(QuizQuestion),
}

impl LessonPlan {
    /// Merges a patch into this plan, overwriting only the present fields.
    pub fn apply(&mut self, patch: LessonPatch) {
        if let Some(v) = patch.objectives {
            self.objectives = v;
        }
        if let Some(v) = patch.activation {
            self.activation = v;
        }
        if let Some(v) = patch.instruction {
            self.instruction = v;
        }
        if let Some(v) = patch.closure {
            self.closure = v;
        }
        if let Some(v) = patch.exercises {
            self.exercises = v;
        }
        if let Some(v) = patch.quiz {
            self.quiz = v;
        }
    }
}

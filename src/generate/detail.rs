//! Detail generation session: the fixed-stage walk over lesson fields.

use tracing::debug;

use crate::context::ServiceContext;
use crate::document::{
    LessonField, LessonPatch, LessonPlan, LessonRequest, ListField, ScalarField,
};
use crate::ports::{PartRequest, ProducedPart};

use super::error::GenerationError;
use super::progress::{CancelFlag, ProgressSink};

/// The fixed stage order for detail generation. Stage *k* of *n* completing
/// means progress is exactly `k/n`.
pub const DETAIL_STAGES: [LessonField; 6] = [
    LessonField::Scalar(ScalarField::Objectives),
    LessonField::Scalar(ScalarField::Activation),
    LessonField::Scalar(ScalarField::Instruction),
    LessonField::List(ListField::Exercises),
    LessonField::List(ListField::Quiz),
    LessonField::Scalar(ScalarField::Closure),
];

/// One completed detail stage: the field it filled, the patch to merge,
/// and the progress fraction after this stage.
#[derive(Debug, Clone, PartialEq)]
pub struct DetailEvent {
    /// The field this stage produced.
    pub field: LessonField,
    /// The partial update to merge into document state.
    pub patch: LessonPatch,
    /// Progress after this stage: `k/n`.
    pub fraction: f64,
}

/// Drives one lesson generation end-to-end: a finite, non-restartable
/// sequence of [`DetailEvent`]s, one per producer request, consumed by a
/// single reader that may stop early.
pub struct DetailSession<'a> {
    ctx: &'a ServiceContext,
    request: LessonRequest,
    draft: LessonPlan,
    cancel: CancelFlag,
    sink: &'a dyn ProgressSink,
    next_stage: usize,
    halted: bool,
}

impl<'a> DetailSession<'a> {
    /// Creates a session for `request`. Nothing is requested until the
    /// first [`next_event`] call.
    ///
    /// [`next_event`]: DetailSession::next_event
    #[must_use]
    pub fn new(
        ctx: &'a ServiceContext,
        request: LessonRequest,
        cancel: CancelFlag,
        sink: &'a dyn ProgressSink,
    ) -> Self {
        Self {
            ctx,
            request,
            draft: LessonPlan::default(),
            cancel,
            sink,
            next_stage: 0,
            halted: false,
        }
    }

    /// The document accumulated so far.
    #[must_use]
    pub fn draft(&self) -> &LessonPlan {
        &self.draft
    }

    /// Produces the next stage's event, or `None` when the session is
    /// finished, halted by a failure, or cancelled.
    ///
    /// The cancellation flag is checked before each producer request; on
    /// observed cancellation no further requests are issued and no error
    /// is raised.
    ///
    /// # Errors
    ///
    /// Returns the one categorized error for the failing stage; the
    /// session then stops, and events yielded before the failure remain
    /// valid.
    pub async fn next_event(&mut self) -> Result<Option<DetailEvent>, GenerationError> {
        if self.halted || self.next_stage >= DETAIL_STAGES.len() || self.cancel.is_cancelled() {
            return Ok(None);
        }

        let field = DETAIL_STAGES[self.next_stage];
        let part_request = match field {
            LessonField::Scalar(f) => PartRequest::LessonScalar {
                field: f,
                request: self.request.clone(),
                draft: self.draft.clone(),
                instructions: None,
            },
            LessonField::List(f) => PartRequest::LessonList {
                field: f,
                request: self.request.clone(),
                draft: self.draft.clone(),
            },
        };

        let produced = match self.ctx.producer.produce(&part_request).await {
            Ok(part) => part,
            Err(e) => {
                self.halted = true;
                return Err(GenerationError::from_boundary(&*e));
            }
        };
        let patch = match patch_for(field, produced) {
            Ok(patch) => patch,
            Err(e) => {
                self.halted = true;
                return Err(e);
            }
        };

        self.draft.apply(patch.clone());
        self.next_stage += 1;
        let fraction = stage_fraction(self.next_stage, DETAIL_STAGES.len());
        debug!(field = field.key(), fraction, "detail stage complete");
        self.sink.report(fraction, &format!("{} ready", field.key()));

        Ok(Some(DetailEvent { field, patch, fraction }))
    }

    /// Drains all remaining events and returns the finished (or, if
    /// cancelled, partial) document.
    ///
    /// # Errors
    ///
    /// Propagates the first stage failure.
    pub async fn run(mut self) -> Result<LessonPlan, GenerationError> {
        while self.next_event().await?.is_some() {}
        Ok(self.draft)
    }
}

#[allow(clippy::cast_precision_loss)]
fn stage_fraction(completed: usize, total: usize) -> f64 {
    completed as f64 / total as f64
}

/// Shapes a produced part into the addressed field's patch, rejecting a
/// variant mismatch as a malformed response.
fn patch_for(field: LessonField, part: ProducedPart) -> Result<LessonPatch, GenerationError> {
    let mut patch = LessonPatch::default();
    match (field, part) {
        (LessonField::Scalar(f), ProducedPart::Scalar(text)) => {
            match f {
                ScalarField::Objectives => patch.objectives = Some(text),
                ScalarField::Activation => patch.activation = Some(text),
                ScalarField::Instruction => patch.instruction = Some(text),
                ScalarField::Closure => patch.closure = Some(text),
            }
            Ok(patch)
        }
        (LessonField::List(ListField::Exercises), ProducedPart::Exercises(items)) => {
            patch.exercises = Some(items);
            Ok(patch)
        }
        (LessonField::List(ListField::Quiz), ProducedPart::Quiz(items)) => {
            patch.quiz = Some(items);
            Ok(patch)
        }
        (field, other) => Err(GenerationError::wrong_shape(field.key(), other.variant_name())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::{Exercise, QuizQuestion};
    use crate::generate::testing::{CollectingSink, ScriptedProducer};

    fn request() -> LessonRequest {
        LessonRequest { topic: "graph traversal".into(), audience: None, minutes: Some(50) }
    }

    fn full_script() -> Vec<Result<ProducedPart, String>> {
        vec![
            Ok(ProducedPart::Scalar("objectives text".into())),
            Ok(ProducedPart::Scalar("activation text".into())),
            Ok(ProducedPart::Scalar("instruction text".into())),
            Ok(ProducedPart::Exercises(vec![Exercise {
                title: "BFS by hand".into(),
                task: "Trace BFS".into(),
                expected_outcome: "Level order".into(),
            }])),
            Ok(ProducedPart::Quiz(vec![QuizQuestion {
                prompt: "Queue or stack for BFS?".into(),
                options: vec!["queue".into(), "stack".into()],
                answer: 0,
                explanation: "FIFO order".into(),
            }])),
            Ok(ProducedPart::Scalar("closure text".into())),
        ]
    }

    #[tokio::test]
    async fn yields_n_events_with_exact_fractions_in_field_order() {
        let ctx = ServiceContext::with_producer(Box::new(ScriptedProducer::new(full_script())));
        let sink = CollectingSink::default();
        let mut session = DetailSession::new(&ctx, request(), CancelFlag::new(), &sink);

        let mut events = Vec::new();
        while let Some(event) = session.next_event().await.unwrap() {
            events.push(event);
        }

        assert_eq!(events.len(), 6);
        for (k, event) in events.iter().enumerate() {
            assert_eq!(event.field, DETAIL_STAGES[k]);
            let expected = (k + 1) as f64 / 6.0;
            assert!((event.fraction - expected).abs() < f64::EPSILON);
        }
        assert_eq!(sink.reports().len(), 6);
    }

    #[tokio::test]
    async fn run_accumulates_the_full_document() {
        let ctx = ServiceContext::with_producer(Box::new(ScriptedProducer::new(full_script())));
        let sink = crate::generate::NullSink;
        let session = DetailSession::new(&ctx, request(), CancelFlag::new(), &sink);

        let plan = session.run().await.unwrap();
        assert_eq!(plan.objectives, "objectives text");
        assert_eq!(plan.closure, "closure text");
        assert_eq!(plan.exercises.len(), 1);
        assert_eq!(plan.quiz.len(), 1);
    }

    #[tokio::test]
    async fn cancelling_after_k_events_yields_exactly_k_events_and_no_error() {
        let ctx = ServiceContext::with_producer(Box::new(ScriptedProducer::new(full_script())));
        let cancel = CancelFlag::new();
        let sink = CollectingSink::default();
        let mut session = DetailSession::new(&ctx, request(), cancel.clone(), &sink);

        let mut events = Vec::new();
        events.push(session.next_event().await.unwrap().unwrap());
        events.push(session.next_event().await.unwrap().unwrap());
        cancel.cancel();

        assert_eq!(session.next_event().await.unwrap(), None);
        assert_eq!(events.len(), 2);
        // No further producer request was issued for stage 3.
        assert_eq!(sink.reports().len(), 2);
    }

    #[tokio::test]
    async fn failure_halts_the_session_and_keeps_prior_events() {
        let script = vec![
            Ok(ProducedPart::Scalar("objectives text".into())),
            Err("producer overloaded (529): busy".to_string()),
        ];
        let ctx = ServiceContext::with_producer(Box::new(ScriptedProducer::new(script)));
        let sink = CollectingSink::default();
        let mut session = DetailSession::new(&ctx, request(), CancelFlag::new(), &sink);

        let first = session.next_event().await.unwrap().unwrap();
        assert_eq!(first.patch.objectives.as_deref(), Some("objectives text"));

        let err = session.next_event().await.unwrap_err();
        assert!(matches!(err, GenerationError::Overloaded(_)));

        // Halted: no more events, no more requests.
        assert_eq!(session.next_event().await.unwrap(), None);
        assert_eq!(session.draft().objectives, "objectives text");
    }

    #[tokio::test]
    async fn variant_mismatch_is_a_malformed_response() {
        let script = vec![Ok(ProducedPart::FileContent("not a scalar".into()))];
        let ctx = ServiceContext::with_producer(Box::new(ScriptedProducer::new(script)));
        let sink = CollectingSink::default();
        let mut session = DetailSession::new(&ctx, request(), CancelFlag::new(), &sink);

        let err = session.next_event().await.unwrap_err();
        assert!(matches!(err, GenerationError::Malformed(_)));
        assert_eq!(session.next_event().await.unwrap(), None);
    }
}

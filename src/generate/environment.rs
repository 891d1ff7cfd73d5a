//! Environment generation session: plan the file tree, then fill each
//! file in path order.

use tracing::debug;

use crate::context::ServiceContext;
use crate::document::{ProjectBrief, ProjectRequest};
use crate::ports::{PartRequest, ProducedPart};
use crate::tree::{FileNode, FileTree, PROTECTED_ROOT_FILES};

use super::error::GenerationError;
use super::progress::{CancelFlag, ProgressSink};

/// Produces the brief part of a project: the one scalar/milestone request
/// made before an environment session runs.
///
/// # Errors
///
/// The categorized producer failure for the one request made.
pub async fn generate_brief(
    ctx: &ServiceContext,
    request: &ProjectRequest,
) -> Result<ProjectBrief, GenerationError> {
    let part_request = PartRequest::ProjectBrief { request: request.clone() };
    let produced = ctx
        .producer
        .produce(&part_request)
        .await
        .map_err(|e| GenerationError::from_boundary(&*e))?;
    match produced {
        ProducedPart::Brief(brief) => Ok(brief),
        other => Err(GenerationError::wrong_shape("project brief", other.variant_name())),
    }
}

/// One completed environment stage.
#[derive(Debug, Clone, PartialEq)]
pub enum EnvironmentEvent {
    /// The file/folder plan is fixed; files carry empty content pending
    /// generation. Structure does not change after this event.
    Planned {
        /// The planned tree.
        tree: FileTree,
    },
    /// One file's content was generated. Consumers apply this with
    /// `update_file_content` at exactly this path.
    FileWritten {
        /// Path of the generated file.
        path: Vec<String>,
        /// Generated content.
        content: String,
        /// Progress after this file: `i/n` for file *i* of *n*.
        fraction: f64,
    },
}

enum State {
    Planning,
    Writing { paths: Vec<Vec<String>>, next: usize },
    Done,
}

/// Drives one environment generation end-to-end: a planning request
/// followed by one content request per file, in the exact order given by
/// `list_file_paths` over the planned tree.
pub struct EnvironmentSession<'a> {
    ctx: &'a ServiceContext,
    request: ProjectRequest,
    brief: ProjectBrief,
    tree: FileTree,
    cancel: CancelFlag,
    sink: &'a dyn ProgressSink,
    state: State,
}

impl<'a> EnvironmentSession<'a> {
    /// Creates a session for `request`, with the project brief as prompt
    /// context. Nothing is requested until the first [`next_event`] call.
    ///
    /// [`next_event`]: EnvironmentSession::next_event
    #[must_use]
    pub fn new(
        ctx: &'a ServiceContext,
        request: ProjectRequest,
        brief: ProjectBrief,
        cancel: CancelFlag,
        sink: &'a dyn ProgressSink,
    ) -> Self {
        Self {
            ctx,
            request,
            brief,
            tree: FileTree::default(),
            cancel,
            sink,
            state: State::Planning,
        }
    }

    /// The tree accumulated so far: empty before planning, structurally
    /// fixed afterwards, contents filled in as file events complete.
    #[must_use]
    pub fn tree(&self) -> &FileTree {
        &self.tree
    }

    /// Produces the next event, or `None` when the session is finished,
    /// halted by a failure, or cancelled. The cancellation flag is checked
    /// before each producer request.
    ///
    /// # Errors
    ///
    /// Returns the one categorized error for the failing stage; the
    /// session then stops. Files already written remain valid.
    pub async fn next_event(&mut self) -> Result<Option<EnvironmentEvent>, GenerationError> {
        if self.cancel.is_cancelled() {
            return Ok(None);
        }
        match &self.state {
            State::Done => Ok(None),
            State::Planning => self.plan().await,
            State::Writing { paths, next } => {
                let (paths, next) = (paths.clone(), *next);
                self.write_file(paths, next).await
            }
        }
    }

    /// Drains all remaining events and returns the final tree.
    ///
    /// # Errors
    ///
    /// Propagates the first stage failure.
    pub async fn run(mut self) -> Result<FileTree, GenerationError> {
        while self.next_event().await?.is_some() {}
        Ok(self.tree)
    }

    async fn plan(&mut self) -> Result<Option<EnvironmentEvent>, GenerationError> {
        let part_request = PartRequest::EnvironmentPlan {
            request: self.request.clone(),
            brief: self.brief.clone(),
        };
        let produced = match self.ctx.producer.produce(&part_request).await {
            Ok(part) => part,
            Err(e) => {
                self.state = State::Done;
                return Err(GenerationError::from_boundary(&*e));
            }
        };
        let tree = match produced {
            ProducedPart::Tree(tree) => tree,
            other => {
                self.state = State::Done;
                return Err(GenerationError::wrong_shape("environment tree", other.variant_name()));
            }
        };

        let tree = with_protected_skeletons(&tree);
        let paths = tree.list_file_paths();
        debug!(files = paths.len(), "environment planned");
        self.sink.report(0.0, &format!("planned {} files", paths.len()));

        self.tree = tree.clone();
        self.state = State::Writing { paths, next: 0 };
        Ok(Some(EnvironmentEvent::Planned { tree }))
    }

    async fn write_file(
        &mut self,
        paths: Vec<Vec<String>>,
        next: usize,
    ) -> Result<Option<EnvironmentEvent>, GenerationError> {
        if next >= paths.len() {
            self.state = State::Done;
            return Ok(None);
        }
        let path = paths[next].clone();
        let part_request = PartRequest::FileContent {
            request: self.request.clone(),
            overview: self.brief.overview.clone(),
            path: path.clone(),
            instructions: None,
        };
        let produced = match self.ctx.producer.produce(&part_request).await {
            Ok(part) => part,
            Err(e) => {
                self.state = State::Done;
                return Err(GenerationError::from_boundary(&*e));
            }
        };
        let content = match produced {
            ProducedPart::FileContent(content) => content,
            other => {
                self.state = State::Done;
                return Err(GenerationError::wrong_shape("file content", other.variant_name()));
            }
        };

        self.tree = self.tree.update_file_content(&path, &content);
        self.state = State::Writing { paths: paths.clone(), next: next + 1 };
        let fraction = file_fraction(next + 1, paths.len());
        debug!(path = %path.join("/"), fraction, "environment file written");
        self.sink.report(fraction, &path.join("/"));

        Ok(Some(EnvironmentEvent::FileWritten { path, content, fraction }))
    }
}

#[allow(clippy::cast_precision_loss)]
fn file_fraction(completed: usize, total: usize) -> f64 {
    if total == 0 {
        return 1.0;
    }
    completed as f64 / total as f64
}

/// Guarantees the protected root files exist in a plan, inserting empty
/// skeletons when the producer omitted them.
fn with_protected_skeletons(tree: &FileTree) -> FileTree {
    let mut tree = tree.clone();
    for name in PROTECTED_ROOT_FILES {
        let present = tree.roots().iter().any(|n| n.name().eq_ignore_ascii_case(name));
        if !present {
            tree = tree.add_node(&[], FileNode::file(name, ""));
        }
    }
    tree
}

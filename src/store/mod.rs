//! Document library — persistence for lessons and projects.
//!
//! Documents are stored as YAML through the `FileSystem` port, so the
//! library works identically over the real disk and in-memory fakes.
//! Layout:
//!
//! ```text
//! <root>/
//!   ├── lessons/<id>.yaml
//!   └── projects/<id>.yaml
//! ```
//!
//! The core calls the library only at session boundaries, never
//! mid-stream.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::context::ServiceContext;
use crate::document::{LessonPlan, LessonRequest, ProjectRequest, ProjectSpec};

/// A lesson plan with its library envelope.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredLesson {
    /// Library identifier.
    pub id: String,
    /// When the document was first saved.
    pub created_at: DateTime<Utc>,
    /// The authoring request it was generated from.
    pub request: LessonRequest,
    /// The document itself.
    pub plan: LessonPlan,
}

/// A capstone project with its library envelope.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredProject {
    /// Library identifier.
    pub id: String,
    /// When the document was first saved.
    pub created_at: DateTime<Utc>,
    /// The authoring request it was generated from.
    pub request: ProjectRequest,
    /// The document itself.
    pub spec: ProjectSpec,
}

/// What kind of document a library entry is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    /// A lesson plan.
    Lesson,
    /// A capstone project.
    Project,
}

/// One row of a library listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LibraryEntry {
    /// Library identifier.
    pub id: String,
    /// Document kind.
    pub kind: DocumentKind,
}

/// Persistence layer for generated documents.
pub struct Library<'a> {
    ctx: &'a ServiceContext,
    root: PathBuf,
}

impl<'a> Library<'a> {
    /// Creates a library rooted at the given path.
    #[must_use]
    pub fn new(ctx: &'a ServiceContext, root: &Path) -> Self {
        Self { ctx, root: root.to_path_buf() }
    }

    /// Saves a lesson at `<root>/lessons/<id>.yaml`.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or the write fails.
    pub fn save_lesson(&self, lesson: &StoredLesson) -> Result<(), String> {
        let yaml = serde_yaml::to_string(lesson)
            .map_err(|e| format!("failed to serialize lesson {}: {e}", lesson.id))?;
        debug!(id = %lesson.id, "saving lesson");
        self.ctx
            .fs
            .write(&self.doc_path(DocumentKind::Lesson, &lesson.id), &yaml)
            .map_err(|e| format!("failed to write lesson {}: {e}", lesson.id))
    }

    /// Loads a lesson by id.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load_lesson(&self, id: &str) -> Result<StoredLesson, String> {
        let contents = self
            .ctx
            .fs
            .read_to_string(&self.doc_path(DocumentKind::Lesson, id))
            .map_err(|e| format!("failed to read lesson {id}: {e}"))?;
        serde_yaml::from_str(&contents).map_err(|e| format!("failed to parse lesson {id}: {e}"))
    }

    /// Saves a project at `<root>/projects/<id>.yaml`.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or the write fails.
    pub fn save_project(&self, project: &StoredProject) -> Result<(), String> {
        let yaml = serde_yaml::to_string(project)
            .map_err(|e| format!("failed to serialize project {}: {e}", project.id))?;
        debug!(id = %project.id, "saving project");
        self.ctx
            .fs
            .write(&self.doc_path(DocumentKind::Project, &project.id), &yaml)
            .map_err(|e| format!("failed to write project {}: {e}", project.id))
    }

    /// Loads a project by id.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load_project(&self, id: &str) -> Result<StoredProject, String> {
        let contents = self
            .ctx
            .fs
            .read_to_string(&self.doc_path(DocumentKind::Project, id))
            .map_err(|e| format!("failed to read project {id}: {e}"))?;
        serde_yaml::from_str(&contents).map_err(|e| format!("failed to parse project {id}: {e}"))
    }

    /// Lists every stored document.
    ///
    /// # Errors
    ///
    /// Returns an error if a directory listing fails.
    pub fn list(&self) -> Result<Vec<LibraryEntry>, String> {
        let mut entries = Vec::new();
        for kind in [DocumentKind::Lesson, DocumentKind::Project] {
            let dir = self.kind_dir(kind);
            if !self.ctx.fs.exists(&dir) {
                continue;
            }
            let names = self
                .ctx
                .fs
                .list_dir(&dir)
                .map_err(|e| format!("failed to list {}: {e}", dir.display()))?;
            entries.extend(names.into_iter().filter_map(|name| {
                name.strip_suffix(".yaml")
                    .map(|id| LibraryEntry { id: id.to_string(), kind })
            }));
        }
        Ok(entries)
    }

    /// Deletes the document with the given id, whichever kind it is.
    ///
    /// # Errors
    ///
    /// Returns an error if no document has this id or removal fails.
    pub fn delete(&self, id: &str) -> Result<(), String> {
        for kind in [DocumentKind::Lesson, DocumentKind::Project] {
            let path = self.doc_path(kind, id);
            if self.ctx.fs.exists(&path) {
                debug!(id = %id, "deleting document");
                return self
                    .ctx
                    .fs
                    .remove(&path)
                    .map_err(|e| format!("failed to delete {id}: {e}"));
            }
        }
        Err(format!("no document with id {id}"))
    }

    fn kind_dir(&self, kind: DocumentKind) -> PathBuf {
        match kind {
            DocumentKind::Lesson => self.root.join("lessons"),
            DocumentKind::Project => self.root.join("projects"),
        }
    }

    fn doc_path(&self, kind: DocumentKind, id: &str) -> PathBuf {
        self.kind_dir(kind).join(format!("{id}.yaml"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::FileSystem;
    use std::collections::HashMap;
    use std::sync::Mutex;

    /// In-memory filesystem for testing the library without touching disk.
    #[derive(Default)]
    struct MemFs {
        files: Mutex<HashMap<PathBuf, String>>,
    }

    impl FileSystem for MemFs {
        fn read_to_string(
            &self,
            path: &Path,
        ) -> Result<String, Box<dyn std::error::Error + Send + Sync>> {
            let files = self.files.lock().unwrap();
            files
                .get(path)
                .cloned()
                .ok_or_else(|| format!("file not found: {}", path.display()).into())
        }

        fn write(
            &self,
            path: &Path,
            contents: &str,
        ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
            self.files.lock().unwrap().insert(path.to_path_buf(), contents.to_string());
            Ok(())
        }

        fn exists(&self, path: &Path) -> bool {
            let files = self.files.lock().unwrap();
            files.contains_key(path) || files.keys().any(|k| k.starts_with(path) && k != path)
        }

        fn list_dir(
            &self,
            path: &Path,
        ) -> Result<Vec<String>, Box<dyn std::error::Error + Send + Sync>> {
            let files = self.files.lock().unwrap();
            let mut names: Vec<String> = files
                .keys()
                .filter_map(|k| {
                    (k.parent() == Some(path))
                        .then(|| k.file_name().map(|n| n.to_string_lossy().into_owned()))
                        .flatten()
                })
                .collect();
            names.sort();
            Ok(names)
        }

        fn remove(
            &self,
            path: &Path,
        ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
            self.files
                .lock()
                .unwrap()
                .remove(path)
                .map(|_| ())
                .ok_or_else(|| format!("file not found: {}", path.display()).into())
        }
    }

    fn test_ctx() -> ServiceContext {
        let mut ctx = ServiceContext::with_producer(Box::new(NoProducer));
        ctx.fs = Box::new(MemFs::default());
        ctx
    }

    /// Producer stub for store tests, which never generate.
    struct NoProducer;
    impl crate::ports::ContentProducer for NoProducer {
        fn produce(&self, _request: &crate::ports::PartRequest) -> crate::ports::ProduceFuture<'_> {
            Box::pin(async { Err("store tests never produce".into()) })
        }
    }

    fn sample_lesson(id: &str) -> StoredLesson {
        StoredLesson {
            id: id.into(),
            created_at: Utc::now(),
            request: LessonRequest { topic: "topic".into(), audience: None, minutes: None },
            plan: LessonPlan { objectives: "learn".into(), ..LessonPlan::default() },
        }
    }

    fn sample_project(id: &str) -> StoredProject {
        StoredProject {
            id: id.into(),
            created_at: Utc::now(),
            request: ProjectRequest { topic: "topic".into(), audience: None },
            spec: ProjectSpec::default(),
        }
    }

    #[test]
    fn save_and_load_lesson_round_trips() {
        let ctx = test_ctx();
        let library = Library::new(&ctx, Path::new("/lib"));

        let lesson = sample_lesson("L-1");
        library.save_lesson(&lesson).unwrap();
        assert_eq!(library.load_lesson("L-1").unwrap(), lesson);
    }

    #[test]
    fn save_and_load_project_round_trips() {
        let ctx = test_ctx();
        let library = Library::new(&ctx, Path::new("/lib"));

        let project = sample_project("P-1");
        library.save_project(&project).unwrap();
        assert_eq!(library.load_project("P-1").unwrap(), project);
    }

    #[test]
    fn list_returns_both_kinds() {
        let ctx = test_ctx();
        let library = Library::new(&ctx, Path::new("/lib"));

        library.save_lesson(&sample_lesson("L-1")).unwrap();
        library.save_lesson(&sample_lesson("L-2")).unwrap();
        library.save_project(&sample_project("P-1")).unwrap();

        let entries = library.list().unwrap();
        assert_eq!(entries.len(), 3);
        assert!(entries
            .contains(&LibraryEntry { id: "L-2".into(), kind: DocumentKind::Lesson }));
        assert!(entries
            .contains(&LibraryEntry { id: "P-1".into(), kind: DocumentKind::Project }));
    }

    #[test]
    fn list_on_empty_library_is_empty() {
        let ctx = test_ctx();
        let library = Library::new(&ctx, Path::new("/lib"));
        assert!(library.list().unwrap().is_empty());
    }

    #[test]
    fn delete_removes_whichever_kind_matches() {
        let ctx = test_ctx();
        let library = Library::new(&ctx, Path::new("/lib"));

        library.save_lesson(&sample_lesson("L-1")).unwrap();
        library.save_project(&sample_project("P-1")).unwrap();

        library.delete("P-1").unwrap();
        assert_eq!(library.list().unwrap().len(), 1);
        assert!(library.load_project("P-1").is_err());
    }

    #[test]
    fn delete_unknown_id_reports_an_error() {
        let ctx = test_ctx();
        let library = Library::new(&ctx, Path::new("/lib"));
        let err = library.delete("missing").unwrap_err();
        assert!(err.contains("no document with id"));
    }
}

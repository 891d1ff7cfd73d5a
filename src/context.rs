//! Service context bundling all port trait objects.

use std::path::Path;
use std::sync::{Arc, Mutex};

use crate::adapters::live::{LiveClock, LiveFileSystem, LiveIdGenerator, LiveProducer};
use crate::adapters::recording::RecordingProducer;
use crate::adapters::replaying::ReplayingProducer;
use crate::ports::{Clock, ContentProducer, FileSystem, IdGenerator};
use crate::tape::{Tape, TapePlayer, TapeRecorder};

/// Bundles all port trait objects into a single context.
///
/// Each field provides access to one external boundary. Constructors wire
/// up different adapter sets (live, recording, replaying).
pub struct ServiceContext {
    /// Clock for obtaining the current time.
    pub clock: Box<dyn Clock>,
    /// Filesystem for library I/O.
    pub fs: Box<dyn FileSystem>,
    /// ID generator for document identifiers.
    pub id_gen: Box<dyn IdGenerator>,
    /// Content producer for model-generated parts.
    pub producer: Box<dyn ContentProducer>,
    /// Optional tape recorder; written to disk on drop.
    recorder: Option<Arc<Mutex<TapeRecorder>>>,
}

impl ServiceContext {
    /// Creates a live context with real adapters for every port.
    #[must_use]
    pub fn live() -> Self {
        Self {
            clock: Box::new(LiveClock),
            fs: Box::new(LiveFileSystem),
            id_gen: Box::new(LiveIdGenerator),
            producer: Box::new(LiveProducer::new()),
            recorder: None,
        }
    }

    /// Creates a recording context: live adapters, with every producer
    /// exchange captured to a tape written at `path` when this context is
    /// dropped. This is the developer mechanism for capturing tapes via
    /// the `CURSUS_RECORD` env var.
    #[must_use]
    pub fn recording(path: &Path) -> Self {
        let recorder = Arc::new(Mutex::new(TapeRecorder::new(path, "cursus-session")));
        Self {
            clock: Box::new(LiveClock),
            fs: Box::new(LiveFileSystem),
            id_gen: Box::new(LiveIdGenerator),
            producer: Box::new(RecordingProducer::new(
                Box::new(LiveProducer::new()),
                Arc::clone(&recorder),
            )),
            recorder: Some(recorder),
        }
    }

    /// Creates a replaying context from a tape file.
    ///
    /// The producer — the only nondeterministic, billable port — is served
    /// from the tape; the remaining ports stay live. Tests needing
    /// filesystem isolation swap `fs` for an in-memory fake.
    ///
    /// # Errors
    ///
    /// Returns an error if the tape file cannot be read or parsed.
    pub fn replaying(path: &Path) -> Result<Self, String> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| format!("failed to read tape {}: {e}", path.display()))?;
        let tape: Tape = serde_yaml::from_str(&content)
            .map_err(|e| format!("failed to parse tape {}: {e}", path.display()))?;
        let player = Arc::new(Mutex::new(TapePlayer::new(&tape)));

        Ok(Self {
            clock: Box::new(LiveClock),
            fs: Box::new(LiveFileSystem),
            id_gen: Box::new(LiveIdGenerator),
            producer: Box::new(ReplayingProducer::new(player)),
            recorder: None,
        })
    }

    /// Creates a context with the given producer and live adapters for the
    /// remaining ports. Test seam for scripted producers.
    #[must_use]
    pub fn with_producer(producer: Box<dyn ContentProducer>) -> Self {
        Self {
            clock: Box::new(LiveClock),
            fs: Box::new(LiveFileSystem),
            id_gen: Box::new(LiveIdGenerator),
            producer,
            recorder: None,
        }
    }
}

impl Drop for ServiceContext {
    fn drop(&mut self) {
        if let Some(recorder) = self.recorder.take() {
            match recorder.lock() {
                Ok(mut recorder) => {
                    if let Err(e) = recorder.finish() {
                        eprintln!("warning: failed to write tape: {e}");
                    }
                }
                Err(_) => eprintln!("warning: tape recorder poisoned, nothing written"),
            }
        }
    }
}

//! Records producer exchanges into a tape file.

use std::path::PathBuf;

use chrono::Utc;

use super::{Exchange, Tape};

/// Accumulates exchanges and writes them as a YAML tape file.
#[derive(Debug)]
pub struct TapeRecorder {
    path: PathBuf,
    name: String,
    exchanges: Vec<Exchange>,
    next_seq: u64,
}

impl TapeRecorder {
    /// Creates a recorder that will write to `path` on finish.
    pub fn new(path: impl Into<PathBuf>, name: impl Into<String>) -> Self {
        Self { path: path.into(), name: name.into(), exchanges: Vec::new(), next_seq: 0 }
    }

    /// Records one exchange; the `seq` field is assigned automatically.
    pub fn record(
        &mut self,
        kind: impl Into<String>,
        input: serde_json::Value,
        output: serde_json::Value,
    ) {
        self.exchanges.push(Exchange { seq: self.next_seq, kind: kind.into(), input, output });
        self.next_seq += 1;
    }

    /// Writes the accumulated tape to disk and returns its path.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or the file write fails.
    pub fn finish(&mut self) -> Result<PathBuf, std::io::Error> {
        let tape = Tape {
            name: self.name.clone(),
            recorded_at: Utc::now(),
            exchanges: std::mem::take(&mut self.exchanges),
        };
        let yaml = serde_yaml::to_string(&tape).map_err(std::io::Error::other)?;
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&self.path, yaml)?;
        Ok(self.path.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn record_and_finish_writes_sequenced_tape() {
        let dir = std::env::temp_dir().join("cursus_tape_recorder_test");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("session.tape.yaml");

        let mut recorder = TapeRecorder::new(&path, "test-session");
        recorder.record("lesson_scalar", json!({"field": "objectives"}), json!({"ok": null}));
        recorder.record("lesson_list", json!({"field": "quiz"}), json!({"ok": null}));

        let written = recorder.finish().unwrap();
        assert_eq!(written, path);

        let content = std::fs::read_to_string(&path).unwrap();
        let tape: Tape = serde_yaml::from_str(&content).unwrap();
        assert_eq!(tape.name, "test-session");
        assert_eq!(tape.exchanges.len(), 2);
        assert_eq!(tape.exchanges[0].seq, 0);
        assert_eq!(tape.exchanges[1].seq, 1);
        assert_eq!(tape.exchanges[1].kind, "lesson_list");

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn finish_twice_writes_an_empty_second_tape() {
        let dir = std::env::temp_dir().join("cursus_tape_recorder_twice");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("twice.tape.yaml");

        let mut recorder = TapeRecorder::new(&path, "twice");
        recorder.record("suggestion", json!({}), json!({"ok": null}));
        recorder.finish().unwrap();
        recorder.finish().unwrap();

        let tape: Tape =
            serde_yaml::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert!(tape.exchanges.is_empty());

        let _ = std::fs::remove_dir_all(&dir);
    }
}

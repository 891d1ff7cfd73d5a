//! Recording adapter for the `ContentProducer` port.

use std::sync::{Arc, Mutex};

use serde_json::json;

use crate::ports::{ContentProducer, PartRequest, ProduceFuture};
use crate::tape::TapeRecorder;

/// Records producer exchanges while delegating to an inner implementation.
pub struct RecordingProducer {
    inner: Box<dyn ContentProducer>,
    recorder: Arc<Mutex<TapeRecorder>>,
}

impl RecordingProducer {
    /// Creates a recording producer wrapping the given implementation.
    pub fn new(inner: Box<dyn ContentProducer>, recorder: Arc<Mutex<TapeRecorder>>) -> Self {
        Self { inner, recorder }
    }
}

impl ContentProducer for RecordingProducer {
    fn produce(&self, request: &PartRequest) -> ProduceFuture<'_> {
        let request = request.clone();
        let recorder = Arc::clone(&self.recorder);

        Box::pin(async move {
            let result = self.inner.produce(&request).await;

            let input = serde_json::to_value(&request).unwrap_or(serde_json::Value::Null);
            let output = match &result {
                Ok(part) => json!({ "ok": part }),
                Err(e) => json!({ "err": e.to_string() }),
            };
            if let Ok(mut recorder) = recorder.lock() {
                recorder.record(request.kind(), input, output);
            }

            result
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::ProducedPart;

    /// Inner producer that always returns a fixed suggestion.
    struct FixedProducer;

    impl ContentProducer for FixedProducer {
        fn produce(&self, _request: &PartRequest) -> ProduceFuture<'_> {
            Box::pin(async { Ok(ProducedPart::Suggestion("done".into())) })
        }
    }

    #[tokio::test]
    async fn records_ok_exchange_with_kind_and_envelope() {
        let dir = std::env::temp_dir().join("cursus_recording_producer_test");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("rec.tape.yaml");

        let recorder = Arc::new(Mutex::new(TapeRecorder::new(&path, "rec")));
        let producer = RecordingProducer::new(Box::new(FixedProducer), Arc::clone(&recorder));

        let part = producer
            .produce(&PartRequest::Suggestion { draft: "write a lesson".into() })
            .await
            .unwrap();
        assert_eq!(part, ProducedPart::Suggestion("done".into()));

        recorder.lock().unwrap().finish().unwrap();
        let tape: crate::tape::Tape =
            serde_yaml::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(tape.exchanges.len(), 1);
        assert_eq!(tape.exchanges[0].kind, "suggestion");
        assert_eq!(tape.exchanges[0].output["ok"]["Suggestion"], "done");

        let _ = std::fs::remove_dir_all(&dir);
    }
}

//! Record/replay of producer exchanges.
//!
//! A tape is a YAML file holding every producer exchange of one session,
//! in order. Replaying a tape makes generation flows fully deterministic:
//! tests drive real sessions against recorded model output without network
//! access. Exchanges are served sequentially per request kind, so the
//! interleaving of different part kinds does not have to match exactly.

mod recorder;

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub use recorder::TapeRecorder;

/// A single recorded producer exchange.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Exchange {
    /// Sequence number (assigned by the recorder).
    pub seq: u64,
    /// Request kind key (see `PartRequest::kind`).
    pub kind: String,
    /// The request, serialized.
    pub input: serde_json::Value,
    /// The result envelope: `{"ok": <part>}` or `{"err": "<message>"}`.
    pub output: serde_json::Value,
}

/// An ordered recording of producer exchanges.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Tape {
    /// Human-readable name for this tape.
    pub name: String,
    /// When this tape was recorded.
    pub recorded_at: DateTime<Utc>,
    /// Ordered exchanges.
    pub exchanges: Vec<Exchange>,
}

/// Serves recorded exchanges sequentially per request kind.
pub struct TapePlayer {
    queues: HashMap<String, Vec<Exchange>>,
    cursors: HashMap<String, usize>,
}

impl TapePlayer {
    /// Creates a player over a loaded tape.
    #[must_use]
    pub fn new(tape: &Tape) -> Self {
        let mut queues: HashMap<String, Vec<Exchange>> = HashMap::new();
        for exchange in &tape.exchanges {
            queues.entry(exchange.kind.clone()).or_default().push(exchange.clone());
        }
        let cursors = queues.keys().map(|k| (k.clone(), 0)).collect();
        Self { queues, cursors }
    }

    /// Returns the next exchange recorded for `kind`.
    ///
    /// # Panics
    ///
    /// Panics with a descriptive message when the tape has no (more)
    /// exchanges for `kind` — a replayed run diverging from its recording
    /// is a test bug worth failing loudly on.
    pub fn next_exchange(&mut self, kind: &str) -> &Exchange {
        let Some(queue) = self.queues.get(kind) else {
            let recorded: Vec<&str> = self.queues.keys().map(String::as_str).collect();
            panic!(
                "tape exhausted: no exchanges recorded for kind {kind:?}; \
                 recorded kinds: [{}]",
                recorded.join(", ")
            );
        };
        let cursor = self.cursors.get_mut(kind).expect("cursor exists for every queue");
        assert!(
            *cursor < queue.len(),
            "tape exhausted: all {} exchanges for kind {kind:?} have been consumed",
            queue.len(),
        );
        let exchange = &queue[*cursor];
        *cursor += 1;
        exchange
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn make_tape(exchanges: Vec<Exchange>) -> Tape {
        Tape { name: "test".into(), recorded_at: Utc::now(), exchanges }
    }

    fn exchange(seq: u64, kind: &str, output: serde_json::Value) -> Exchange {
        Exchange { seq, kind: kind.into(), input: json!({}), output }
    }

    #[test]
    fn serves_exchanges_in_order_per_kind() {
        let tape = make_tape(vec![
            exchange(0, "lesson_scalar", json!({"ok": {"Scalar": "one"}})),
            exchange(1, "lesson_list", json!({"ok": {"Quiz": []}})),
            exchange(2, "lesson_scalar", json!({"ok": {"Scalar": "two"}})),
        ]);
        let mut player = TapePlayer::new(&tape);

        assert_eq!(player.next_exchange("lesson_scalar").seq, 0);
        assert_eq!(player.next_exchange("lesson_list").seq, 1);
        assert_eq!(player.next_exchange("lesson_scalar").seq, 2);
    }

    #[test]
    #[should_panic(expected = "tape exhausted")]
    fn exhausted_kind_panics() {
        let tape = make_tape(vec![exchange(0, "suggestion", json!({"ok": {"Suggestion": "s"}}))]);
        let mut player = TapePlayer::new(&tape);
        let _ = player.next_exchange("suggestion");
        let _ = player.next_exchange("suggestion");
    }

    #[test]
    #[should_panic(expected = "no exchanges recorded")]
    fn unknown_kind_panics() {
        let tape = make_tape(vec![]);
        let mut player = TapePlayer::new(&tape);
        let _ = player.next_exchange("file_content");
    }

    #[test]
    fn tape_yaml_round_trip() {
        let tape = make_tape(vec![exchange(
            0,
            "project_brief",
            json!({"ok": {"Brief": {"overview": "o", "learning_goals": "g", "milestones": []}}}),
        )]);
        let yaml = serde_yaml::to_string(&tape).unwrap();
        let back: Tape = serde_yaml::from_str(&yaml).unwrap();
        assert_eq!(tape, back);
    }
}

//! Replaying adapter for the `ContentProducer` port.

use std::sync::{Arc, Mutex};

use serde::Deserialize;

use crate::ports::{ContentProducer, PartRequest, ProduceFuture, ProducedPart};
use crate::tape::TapePlayer;

/// Serves recorded producer results from a tape, in recording order per
/// request kind.
pub struct ReplayingProducer {
    player: Arc<Mutex<TapePlayer>>,
}

/// The recorded result envelope: exactly one of `ok` or `err` is present.
#[derive(Deserialize)]
struct Envelope {
    #[serde(default)]
    ok: Option<ProducedPart>,
    #[serde(default)]
    err: Option<String>,
}

impl ReplayingProducer {
    /// Creates a replaying producer backed by the given player.
    #[must_use]
    pub fn new(player: Arc<Mutex<TapePlayer>>) -> Self {
        Self { player }
    }
}

impl ContentProducer for ReplayingProducer {
    fn produce(&self, request: &PartRequest) -> ProduceFuture<'_> {
        let output = {
            let mut player = self.player.lock().expect("tape player lock");
            player.next_exchange(request.kind()).output.clone()
        };

        Box::pin(async move {
            let envelope: Envelope = serde_json::from_value(output)
                .map_err(|e| format!("malformed tape exchange: {e}"))?;
            match (envelope.ok, envelope.err) {
                (Some(part), _) => Ok(part),
                (None, Some(message)) => Err(message.into()),
                (None, None) => Err("malformed tape exchange: empty envelope".into()),
            }
        })
    }
}

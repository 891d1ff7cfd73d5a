//! Test doubles shared by the generation tests: a scripted producer and a
//! collecting progress sink.

use std::collections::VecDeque;
use std::sync::Mutex;

use crate::ports::{ContentProducer, PartRequest, ProduceFuture, ProducedPart};

use super::progress::ProgressSink;

/// Serves a fixed script of results, recording every request it sees.
pub(crate) struct ScriptedProducer {
    script: Mutex<VecDeque<Result<ProducedPart, String>>>,
    requests: Mutex<Vec<PartRequest>>,
}

impl ScriptedProducer {
    pub(crate) fn new(script: Vec<Result<ProducedPart, String>>) -> Self {
        Self { script: Mutex::new(script.into()), requests: Mutex::new(Vec::new()) }
    }

    /// Every request issued so far, in order.
    pub(crate) fn requests(&self) -> Vec<PartRequest> {
        self.requests.lock().unwrap().clone()
    }
}

impl ContentProducer for ScriptedProducer {
    fn produce(&self, request: &PartRequest) -> ProduceFuture<'_> {
        self.requests.lock().unwrap().push(request.clone());
        let next = self.script.lock().unwrap().pop_front();
        Box::pin(async move {
            match next {
                Some(Ok(part)) => Ok(part),
                Some(Err(message)) => Err(message.into()),
                None => Err("scripted producer exhausted".into()),
            }
        })
    }
}

// Allows tests to keep a handle on the producer after boxing it into a
// ServiceContext.
impl ContentProducer for std::sync::Arc<ScriptedProducer> {
    fn produce(&self, request: &PartRequest) -> ProduceFuture<'_> {
        self.as_ref().produce(request)
    }
}

/// Collects progress reports for assertions.
#[derive(Default)]
pub(crate) struct CollectingSink {
    reports: Mutex<Vec<(f64, String)>>,
}

impl CollectingSink {
    pub(crate) fn reports(&self) -> Vec<(f64, String)> {
        self.reports.lock().unwrap().clone()
    }
}

impl ProgressSink for CollectingSink {
    fn report(&self, fraction: f64, message: &str) {
        self.reports.lock().unwrap().push((fraction, message.to_string()));
    }
}

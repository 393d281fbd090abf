//! Replaying adapter for the `ClassifierApi` port.

use std::sync::Mutex;

use super::{next_output, replay_result};
use crate::cassette::replayer::CassetteReplayer;
use crate::classify::model::{ContinueRequest, StartRequest};
use crate::ports::{ClassifierApi, ClassifyFuture};

/// Serves recorded classification turns.
pub struct ReplayingClassifier {
    replayer: Mutex<CassetteReplayer>,
}

impl ReplayingClassifier {
    /// Creates a classifier backed by `replayer`.
    #[must_use]
    pub fn new(replayer: CassetteReplayer) -> Self {
        Self { replayer: Mutex::new(replayer) }
    }
}

impl ClassifierApi for ReplayingClassifier {
    fn start(&self, _request: &StartRequest) -> ClassifyFuture<'_> {
        let output = next_output(&self.replayer, "classifier", "start");
        Box::pin(async move { replay_result("classifier", "start", output) })
    }

    fn resume(&self, _request: &ContinueRequest) -> ClassifyFuture<'_> {
        let output = next_output(&self.replayer, "classifier", "continue");
        Box::pin(async move { replay_result("classifier", "continue", output) })
    }
}

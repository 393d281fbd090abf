//! Replaying adapter for the `ScheduleLookup` port.

use std::sync::Mutex;

use super::{next_output, replay_result};
use crate::cassette::replayer::CassetteReplayer;
use crate::ports::{LookupFuture, ScheduleLookup};

/// Serves recorded lookups.
pub struct ReplayingScheduleLookup {
    replayer: Mutex<CassetteReplayer>,
}

impl ReplayingScheduleLookup {
    /// Creates a lookup backed by `replayer`.
    #[must_use]
    pub fn new(replayer: CassetteReplayer) -> Self {
        Self { replayer: Mutex::new(replayer) }
    }
}

impl ScheduleLookup for ReplayingScheduleLookup {
    fn find(&self, _hs_code: &str) -> LookupFuture<'_> {
        let output = next_output(&self.replayer, "schedule", "find");
        Box::pin(async move { replay_result("schedule", "find", output) })
    }
}

//! Recording adapter for the `ScheduleLookup` port.

use serde::Serialize;

use super::{record_result, SharedRecorder};
use crate::ports::{LookupFuture, ScheduleLookup};

/// Records lookups while delegating to an inner implementation.
pub struct RecordingScheduleLookup {
    inner: Box<dyn ScheduleLookup>,
    recorder: SharedRecorder,
}

impl RecordingScheduleLookup {
    /// Wraps `inner`, recording every call into `recorder`.
    pub fn new(inner: Box<dyn ScheduleLookup>, recorder: SharedRecorder) -> Self {
        Self { inner, recorder }
    }
}

#[derive(Serialize)]
struct FindInput<'a> {
    hs_code: &'a str,
}

impl ScheduleLookup for RecordingScheduleLookup {
    fn find(&self, hs_code: &str) -> LookupFuture<'_> {
        let hs_code = hs_code.to_string();
        Box::pin(async move {
            let result = self.inner.find(&hs_code).await;
            let input = FindInput { hs_code: &hs_code };
            record_result(&self.recorder, "schedule", "find", &input, &result);
            result
        })
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use super::*;
    use crate::cassette::format::Cassette;
    use crate::cassette::recorder::CassetteRecorder;
    use crate::schedule::node::{ScheduleNode, ScheduleResponse};

    struct Fixed;

    impl ScheduleLookup for Fixed {
        fn find(&self, hs_code: &str) -> LookupFuture<'_> {
            let items = vec![ScheduleNode::new(hs_code, "Coffee")];
            Box::pin(async move { Ok(ScheduleResponse { items }) })
        }
    }

    #[tokio::test]
    async fn records_find_with_code_input() {
        let dir = std::env::temp_dir().join("schedb_rec_schedule_test");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("schedule.cassette.yaml");
        let recorder = Arc::new(Mutex::new(CassetteRecorder::new(&path, "test", "abc")));

        {
            let lookup = RecordingScheduleLookup::new(Box::new(Fixed), Arc::clone(&recorder));
            let response = lookup.find("0901").await.unwrap();
            assert_eq!(response.items.len(), 1);
        }

        let recorder = Arc::try_unwrap(recorder).unwrap().into_inner().unwrap();
        recorder.finish().unwrap();

        let cassette: Cassette =
            serde_yaml::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        let interaction = &cassette.interactions[0];
        assert_eq!(interaction.port, "schedule");
        assert_eq!(interaction.input["hs_code"], "0901");
        assert_eq!(interaction.output["Ok"]["items"][0]["desc"], "Coffee");

        let _ = std::fs::remove_dir_all(&dir);
    }
}

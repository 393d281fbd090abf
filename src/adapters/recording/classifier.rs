//! Recording adapter for the `ClassifierApi` port.

use super::{record_result, SharedRecorder};
use crate::classify::model::{ContinueRequest, StartRequest};
use crate::ports::{ClassifierApi, ClassifyFuture};

/// Records classification turns while delegating to an inner client.
pub struct RecordingClassifier {
    inner: Box<dyn ClassifierApi>,
    recorder: SharedRecorder,
}

impl RecordingClassifier {
    /// Wraps `inner`, recording every call into `recorder`.
    pub fn new(inner: Box<dyn ClassifierApi>, recorder: SharedRecorder) -> Self {
        Self { inner, recorder }
    }
}

impl ClassifierApi for RecordingClassifier {
    fn start(&self, request: &StartRequest) -> ClassifyFuture<'_> {
        let request = request.clone();
        Box::pin(async move {
            let result = self.inner.start(&request).await;
            record_result(&self.recorder, "classifier", "start", &request, &result);
            result
        })
    }

    fn resume(&self, request: &ContinueRequest) -> ClassifyFuture<'_> {
        let request = request.clone();
        Box::pin(async move {
            let result = self.inner.resume(&request).await;
            record_result(&self.recorder, "classifier", "continue", &request, &result);
            result
        })
    }
}

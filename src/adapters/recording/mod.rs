//! Recording adapters that capture port traffic to cassettes.
//!
//! Each adapter wraps a live implementation, forwards the call unchanged
//! and appends `{input, output}` to its port's recorder.

pub mod classifier;
pub mod clock;
pub mod schedule;

pub use classifier::RecordingClassifier;
pub use clock::RecordingClock;
pub use schedule::RecordingScheduleLookup;

use std::sync::{Arc, Mutex};

use serde::Serialize;
use serde_json::{json, Value};
use tracing::warn;

use crate::cassette::recorder::CassetteRecorder;

/// Records a plain (non-`Result`) interaction.
///
/// Counterpart of `replaying::next_output`.
pub(crate) fn record_interaction<I, O>(
    recorder: &Mutex<CassetteRecorder>,
    port: &str,
    method: &str,
    input: &I,
    output: &O,
) where
    I: Serialize + ?Sized,
    O: Serialize + ?Sized,
{
    let (Some(input), Some(output)) = (to_json(port, method, input), to_json(port, method, output))
    else {
        return;
    };
    recorder.lock().expect("recorder lock poisoned").record(port, method, input, output);
}

/// Records a `Result` using the `{"Ok": v}` / `{"Err": e}` convention.
///
/// Counterpart of `replaying::replay_result`. Errors are stored as their
/// structured JSON form so that replay reproduces the same variant.
pub(crate) fn record_result<T, E, I>(
    recorder: &Mutex<CassetteRecorder>,
    port: &str,
    method: &str,
    input: &I,
    result: &Result<T, E>,
) where
    T: Serialize,
    E: Serialize,
    I: Serialize + ?Sized,
{
    let output = match result {
        Ok(value) => to_json(port, method, value).map(|v| json!({ "Ok": v })),
        Err(err) => to_json(port, method, err).map(|e| json!({ "Err": e })),
    };
    let (Some(input), Some(output)) = (to_json(port, method, input), output) else {
        return;
    };
    recorder.lock().expect("recorder lock poisoned").record(port, method, input, output);
}

fn to_json<V: Serialize + ?Sized>(port: &str, method: &str, value: &V) -> Option<Value> {
    serde_json::to_value(value)
        .inspect_err(|err| warn!(port, method, error = %err, "interaction not recorded"))
        .ok()
}

/// Shared handle type held by every recording adapter.
pub(crate) type SharedRecorder = Arc<Mutex<CassetteRecorder>>;

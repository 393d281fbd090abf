//! Replaying adapters that serve recorded interactions.
//!
//! A replay that asks for something the cassette does not hold is a test
//! bug, so every mismatch panics with the port and method involved.

pub mod classifier;
pub mod clock;
pub mod schedule;

pub use classifier::ReplayingClassifier;
pub use clock::ReplayingClock;
pub use schedule::ReplayingScheduleLookup;

use std::sync::Mutex;

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::cassette::replayer::CassetteReplayer;
use crate::error::ApiError;

/// Output of the next recorded `port::method` interaction.
pub(crate) fn next_output(replayer: &Mutex<CassetteReplayer>, port: &str, method: &str) -> Value {
    let mut replayer = replayer.lock().expect("replayer lock poisoned");
    replayer.next_interaction(port, method).output
}

/// Decodes an output stored as `{"Ok": v}` or `{"Err": e}`.
pub(crate) fn replay_result<T: DeserializeOwned>(
    port: &str,
    method: &str,
    output: Value,
) -> Result<T, ApiError> {
    let Value::Object(mut map) = output else {
        panic!("{port}::{method}: recorded output is not an Ok/Err object");
    };
    if let Some(ok) = map.remove("Ok") {
        let value = serde_json::from_value(ok)
            .unwrap_or_else(|e| panic!("{port}::{method}: cannot decode recorded Ok value: {e}"));
        return Ok(value);
    }
    if let Some(err) = map.remove("Err") {
        let err = serde_json::from_value(err)
            .unwrap_or_else(|e| panic!("{port}::{method}: cannot decode recorded Err value: {e}"));
        return Err(err);
    }
    panic!("{port}::{method}: recorded output has neither Ok nor Err");
}

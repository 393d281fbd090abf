//! Port implementations: live network adapters plus cassette recording
//! and replaying decorators.

pub mod live;
pub mod recording;
pub mod replaying;

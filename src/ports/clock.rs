//! Time source.

use chrono::{DateTime, Utc};

/// Supplies the current time to the vendor session store.
///
/// Cookie expiry is measured against this clock so recorded sessions and
/// tests can pin time.
pub trait Clock: Send + Sync {
    /// Current UTC time.
    fn now(&self) -> DateTime<Utc>;
}

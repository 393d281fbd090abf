//! Schedule B lookup port.

use std::future::Future;
use std::pin::Pin;

use crate::error::ApiError;
use crate::schedule::node::ScheduleResponse;

/// Boxed future type alias used by [`ScheduleLookup`].
pub type LookupFuture<'a> =
    Pin<Box<dyn Future<Output = Result<ScheduleResponse, ApiError>> + Send + 'a>>;

/// Fetches the Schedule B hierarchy rooted at an HS code.
pub trait ScheduleLookup: Send + Sync {
    /// Looks up `hs_code` (any punctuation is passed through unchanged).
    ///
    /// # Errors
    ///
    /// Returns an error for an empty code, a failed request, or a non-JSON body.
    fn find(&self, hs_code: &str) -> LookupFuture<'_>;
}

//! Host notification port for forwarding a chosen Schedule B code.

use std::future::Future;
use std::pin::Pin;

use crate::error::ApiError;
use crate::schedule::SelectedCode;

/// Boxed future type alias used by [`HostNotifier`].
pub type NotifyFuture<'a> = Pin<Box<dyn Future<Output = Result<(), ApiError>> + Send + 'a>>;

/// One-way notification to whatever application embeds the classifier.
///
/// No response contract is enforced; callers log failures and move on.
pub trait HostNotifier: Send + Sync {
    /// Forwards `selected` to the host.
    ///
    /// # Errors
    ///
    /// Returns an error if delivery fails.
    fn notify(&self, selected: &SelectedCode) -> NotifyFuture<'_>;
}

//! Classification port: the vendor's multi-turn question/answer API.

use std::future::Future;
use std::pin::Pin;

use crate::classify::model::{ClassifyResponse, ContinueRequest, StartRequest};
use crate::error::ApiError;

/// Boxed future type alias used by [`ClassifierApi`] to keep the trait dyn-compatible.
pub type ClassifyFuture<'a> =
    Pin<Box<dyn Future<Output = Result<ClassifyResponse, ApiError>> + Send + 'a>>;

/// Drives a classification transaction on the vendor side.
pub trait ClassifierApi: Send + Sync {
    /// Opens a new transaction for a product description.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the body cannot be decoded.
    fn start(&self, request: &StartRequest) -> ClassifyFuture<'_>;

    /// Answers the current question of an open transaction.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the body cannot be decoded.
    fn resume(&self, request: &ContinueRequest) -> ClassifyFuture<'_>;
}

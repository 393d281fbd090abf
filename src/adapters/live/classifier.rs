//! Live adapter for the `ClassifierApi` port over the vendor's HTTP API.

use std::sync::Arc;

use reqwest::header::{COOKIE, ORIGIN};
use reqwest::Client;
use serde::Serialize;
use tracing::debug;

use super::{capture_session_cookie, read_json};
use crate::classify::model::{ClassifyResponse, ContinueRequest, StartRequest};
use crate::config::VendorConfig;
use crate::error::ApiError;
use crate::ports::{ClassifierApi, ClassifyFuture};
use crate::session::VendorSessionStore;

/// Posts classification turns to the vendor, carrying its session cookie.
pub struct HttpClassifier {
    client: Client,
    url: String,
    origin_header: String,
    sessions: Arc<VendorSessionStore>,
    client_key: String,
}

impl HttpClassifier {
    /// Creates a classifier for one client session.
    #[must_use]
    pub fn new(
        vendor: &VendorConfig,
        sessions: Arc<VendorSessionStore>,
        client_key: impl Into<String>,
    ) -> Self {
        Self {
            client: Client::new(),
            url: vendor.classify_url.clone(),
            origin_header: vendor.origin_header.clone(),
            sessions,
            client_key: client_key.into(),
        }
    }

    async fn post<B: Serialize + Sync>(&self, body: &B) -> Result<ClassifyResponse, ApiError> {
        let mut request = self.client.post(&self.url).header(ORIGIN, &self.origin_header).json(body);
        if let Some(cookie) = self.sessions.get(&self.client_key) {
            request = request.header(COOKIE, cookie);
        }

        debug!(url = %self.url, "posting classification request");
        let response = request.send().await.map_err(ApiError::network)?;

        capture_session_cookie(response.headers(), &self.sessions, &self.client_key);

        let body = read_json(response, false).await?;
        ClassifyResponse::from_envelope(body).map_err(ApiError::malformed)
    }
}

impl ClassifierApi for HttpClassifier {
    fn start(&self, request: &StartRequest) -> ClassifyFuture<'_> {
        let request = request.clone();
        Box::pin(async move { self.post(&request).await })
    }

    fn resume(&self, request: &ContinueRequest) -> ClassifyFuture<'_> {
        let request = request.clone();
        Box::pin(async move { self.post(&request).await })
    }
}

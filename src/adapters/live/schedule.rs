//! Live adapter for the `ScheduleLookup` port.

use std::sync::Arc;

use reqwest::header::{ACCEPT, COOKIE, ORIGIN};
use reqwest::{Client, Url};
use tracing::debug;

use super::{capture_session_cookie, read_json};
use crate::config::VendorConfig;
use crate::error::ApiError;
use crate::ports::{LookupFuture, ScheduleLookup};
use crate::schedule::node::ScheduleResponse;
use crate::session::VendorSessionStore;

/// Fetches Schedule B hierarchies from the vendor's lookup endpoint.
pub struct HttpScheduleLookup {
    client: Client,
    base_url: String,
    origin_header: String,
    origin: String,
    destination: String,
    lang: String,
    sessions: Arc<VendorSessionStore>,
    client_key: String,
}

impl HttpScheduleLookup {
    /// Creates a lookup client for one client session.
    #[must_use]
    pub fn new(
        vendor: &VendorConfig,
        sessions: Arc<VendorSessionStore>,
        client_key: impl Into<String>,
    ) -> Self {
        Self {
            client: Client::new(),
            base_url: vendor.find_url.clone(),
            origin_header: vendor.origin_header.clone(),
            origin: vendor.profile.origin.clone(),
            destination: vendor.profile.destination.clone(),
            lang: vendor.lang.clone(),
            sessions,
            client_key: client_key.into(),
        }
    }

    /// `{base}/{code}/{origin}/{destination}/{LANG}`, each segment percent-encoded.
    fn url_for(&self, hs_code: &str) -> Result<Url, ApiError> {
        let mut url = Url::parse(&self.base_url).map_err(|err| ApiError::InvalidRequest {
            message: format!("invalid lookup URL {}: {err}", self.base_url),
        })?;
        url.path_segments_mut()
            .map_err(|()| ApiError::InvalidRequest {
                message: format!("lookup URL cannot carry a path: {}", self.base_url),
            })?
            .pop_if_empty()
            .push(hs_code)
            .push(&self.origin)
            .push(&self.destination)
            .push(&self.lang.to_ascii_uppercase());
        Ok(url)
    }

    async fn fetch(&self, hs_code: String) -> Result<ScheduleResponse, ApiError> {
        if hs_code.is_empty() {
            return Err(ApiError::InvalidRequest { message: "HS code is required".into() });
        }

        let url = self.url_for(&hs_code)?;
        let mut request =
            self.client.get(url.clone()).header(ORIGIN, &self.origin_header).header(ACCEPT, "application/json");
        if let Some(cookie) = self.sessions.get(&self.client_key) {
            request = request.header(COOKIE, cookie);
        }

        debug!(%url, "looking up schedule b hierarchy");
        let response = request.send().await.map_err(ApiError::network)?;
        capture_session_cookie(response.headers(), &self.sessions, &self.client_key);
        let body = read_json(response, true).await?;
        serde_json::from_value(body).map_err(ApiError::malformed)
    }
}

impl ScheduleLookup for HttpScheduleLookup {
    fn find(&self, hs_code: &str) -> LookupFuture<'_> {
        let hs_code = hs_code.trim().to_string();
        Box::pin(self.fetch(hs_code))
    }
}

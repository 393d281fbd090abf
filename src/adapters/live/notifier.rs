//! Live adapters for the `HostNotifier` port.

use reqwest::Client;
use serde::Serialize;
use tracing::info;

use crate::error::ApiError;
use crate::ports::{HostNotifier, NotifyFuture};
use crate::schedule::SelectedCode;

#[derive(Serialize)]
struct Notification<'a> {
    code: &'a str,
    description: &'a str,
}

/// Posts `{code, description}` to a webhook.
pub struct WebhookNotifier {
    client: Client,
    url: String,
}

impl WebhookNotifier {
    /// Creates a notifier posting to `url`.
    #[must_use]
    pub fn new(url: impl Into<String>) -> Self {
        Self { client: Client::new(), url: url.into() }
    }
}

impl HostNotifier for WebhookNotifier {
    fn notify(&self, selected: &SelectedCode) -> NotifyFuture<'_> {
        let selected = selected.clone();
        Box::pin(async move {
            let body = Notification { code: &selected.code, description: &selected.description };
            let response =
                self.client.post(&self.url).json(&body).send().await.map_err(ApiError::network)?;
            let status = response.status();
            if status.is_success() {
                Ok(())
            } else {
                Err(ApiError::Status {
                    status: status.as_u16(),
                    message: status.canonical_reason().unwrap_or("notification rejected").into(),
                })
            }
        })
    }
}

/// Notifier used when no webhook is configured: it only logs.
pub struct LogNotifier;

impl HostNotifier for LogNotifier {
    fn notify(&self, selected: &SelectedCode) -> NotifyFuture<'_> {
        info!(code = %selected.code, description = %selected.description, "schedule b code selected");
        Box::pin(async { Ok(()) })
    }
}

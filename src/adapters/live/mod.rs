//! Live adapters for real external interactions.

pub mod classifier;
pub mod clock;
pub mod notifier;
pub mod schedule;

pub use classifier::HttpClassifier;
pub use clock::LiveClock;
pub use notifier::{LogNotifier, WebhookNotifier};
pub use schedule::HttpScheduleLookup;

use reqwest::header::{HeaderMap, CONTENT_TYPE, SET_COOKIE};
use reqwest::{Response, StatusCode};
use serde_json::Value;
use tracing::info;

use crate::error::ApiError;
use crate::session::{extract_session_cookie, VendorSessionStore};

/// Most characters of an error body echoed back in [`ApiError::Status`].
const ERROR_BODY_LIMIT: usize = 200;

/// Reads a JSON body, turning a non-success status into [`ApiError::Status`].
///
/// With `require_json_content_type`, a response not labelled as JSON is
/// rejected before its body is parsed.
async fn read_json(response: Response, require_json_content_type: bool) -> Result<Value, ApiError> {
    let status = response.status();
    let is_json = is_json_content_type(response.headers());
    let body = response.text().await.map_err(ApiError::network)?;

    if !status.is_success() {
        return Err(status_error(status, &body));
    }
    if require_json_content_type && !is_json {
        return Err(ApiError::malformed("response is not JSON"));
    }
    serde_json::from_str(&body).map_err(ApiError::malformed)
}

fn status_error(status: StatusCode, body: &str) -> ApiError {
    let trimmed = body.trim();
    let message = if trimmed.is_empty() {
        status.canonical_reason().unwrap_or("request failed").to_string()
    } else {
        trimmed.chars().take(ERROR_BODY_LIMIT).collect()
    };
    ApiError::Status { status: status.as_u16(), message }
}

/// Stores the vendor session cookie set by a response, if any.
///
/// Returns whether a cookie was captured.
fn capture_session_cookie(
    headers: &HeaderMap,
    sessions: &VendorSessionStore,
    client_key: &str,
) -> bool {
    let cookie = extract_session_cookie(
        headers.get_all(SET_COOKIE).iter().filter_map(|value| value.to_str().ok()),
    );
    match cookie {
        Some(cookie) => {
            info!("captured vendor session cookie");
            sessions.put(client_key, cookie);
            true
        }
        None => false,
    }
}

fn is_json_content_type(headers: &HeaderMap) -> bool {
    headers
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|value| value.to_ascii_lowercase().contains("json"))
}

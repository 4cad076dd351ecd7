//! REST plumbing shared by the infrastructure adapters.
//!
//! [`send`] maps transport failures and non-2xx statuses onto
//! [`workflow::RemoteError`] the same way for every remote service, and
//! [`join_segments`] builds endpoint URLs from identifiers that did not
//! originate in this process.

use reqwest::{RequestBuilder, Response, Url};
use serde::de::DeserializeOwned;
use tracing::debug;

use workflow::RemoteError;

/// Sends `request` and returns the response when its status is 2xx.
///
/// `entity` names the addressed object in `NotFound` errors.
pub async fn send(request: RequestBuilder, entity: impl Into<String>) -> Result<Response, RemoteError> {
    let response = request
        .send()
        .await
        .map_err(|e| RemoteError::Transport(e.to_string()))?;
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    debug!(status = status.as_u16(), %body, "Remote request failed");
    Err(RemoteError::from_status(status.as_u16(), body, entity))
}

/// [`send`], then decodes the JSON body.
pub async fn send_json<T: DeserializeOwned>(
    request: RequestBuilder,
    entity: impl Into<String>,
) -> Result<T, RemoteError> {
    send(request, entity)
        .await?
        .json()
        .await
        .map_err(|e| RemoteError::Decode(e.to_string()))
}

/// Appends `segments` to the path of `base`, each as exactly one segment.
///
/// `/`, `?`, `#` and `%` inside a segment are percent-encoded. Returns `None`
/// for an empty, `.` or `..` segment, or when `base` cannot carry a path.
pub fn join_segments(base: &Url, segments: &[&str]) -> Option<Url> {
    if segments.iter().any(|s| matches!(*s, "" | "." | "..")) {
        return None;
    }
    let mut url = base.clone();
    url.path_segments_mut()
        .ok()?
        .pop_if_empty()
        .extend(segments.iter().copied());
    Some(url)
}

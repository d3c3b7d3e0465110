//! Raw byte retrieval for the pipeline's two sources.

mod basic;
mod client;

pub use basic::BasicClient;
pub use client::HttpClient;

use crate::error::PipelineError;
use tracing::debug;

/// Issues a single GET for `url`. Any transport failure or non-success status
/// is reported as [`PipelineError::DataUnavailable`].
pub async fn fetch_bytes<C: HttpClient>(client: &C, url: &str) -> Result<Vec<u8>, PipelineError> {
    let parsed = url
        .parse::<reqwest::Url>()
        .map_err(|e| PipelineError::unavailable(url, format!("invalid URL: {e}")))?;
    let req = reqwest::Request::new(reqwest::Method::GET, parsed);

    let resp = client
        .execute(req)
        .await
        .map_err(|e| PipelineError::unavailable(url, e))?;

    let status = resp.status();
    if !status.is_success() {
        return Err(PipelineError::unavailable(url, format!("HTTP status {status}")));
    }

    let bytes = resp
        .bytes()
        .await
        .map_err(|e| PipelineError::unavailable(url, e))?;
    debug!(url, bytes = bytes.len(), "Fetched source");
    Ok(bytes.to_vec())
}

/// Loads a source from a URL (anything starting with `http`) or a local path.
pub async fn fetch_source<C: HttpClient>(
    client: &C,
    location: &str,
) -> Result<Vec<u8>, PipelineError> {
    if location.starts_with("http") {
        fetch_bytes(client, location).await
    } else {
        std::fs::read(location).map_err(|e| PipelineError::unavailable(location, e))
    }
}

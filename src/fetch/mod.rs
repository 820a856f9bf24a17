//! HTTP retrieval of raw record payloads.

mod basic;
mod client;
pub mod auth;
#[cfg(test)]
pub(crate) mod recording;

pub use basic::BasicClient;
pub use client::HttpClient;

use anyhow::Result;
use tracing::debug;

/// GETs `url` through `client` and returns the body of a successful response.
///
/// # Errors
///
/// Fails on an unparseable URL, a transport error, or a non-2xx status.
pub async fn fetch_bytes<C: HttpClient + ?Sized>(client: &C, url: &str) -> Result<Vec<u8>> {
    let req = reqwest::Request::new(reqwest::Method::GET, url.parse()?);

    let resp = client.execute(req).await?.error_for_status()?;
    let bytes = resp.bytes().await?.to_vec();
    debug!(url, bytes = bytes.len(), "Fetched record payload");
    Ok(bytes)
}

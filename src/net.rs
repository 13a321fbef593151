//! HTTP transport shared by the feed and image fetch paths
//!
//! A thin wrapper around `reqwest` that performs exactly one GET per call
//! and collapses every transport-level failure into a single error type.

use bytes::Bytes;
use reqwest::{Client, IntoUrl, StatusCode};
use thiserror::Error;

/// A failed network round trip
///
/// Connection, DNS, TLS, timeout, and body-read failures all end up here;
/// callers learn only that the network layer failed.
#[derive(Debug, Error)]
#[error("network request failed: {0}")]
pub struct TransportError(#[from] reqwest::Error);

/// Client for performing single HTTP GET round trips
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
}

impl Default for HttpTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl HttpTransport {
    /// Creates a transport with a default HTTP client
    pub fn new() -> Self {
        Self {
            client: Client::new(),
        }
    }

    /// Creates a transport backed by a custom HTTP client
    #[allow(dead_code)]
    pub fn with_client(client: Client) -> Self {
        Self { client }
    }

    /// Performs one GET and returns the status plus the full response body
    ///
    /// No retries are attempted and redirects follow the client's default
    /// policy. The body is read in full even for non-200 responses so the
    /// caller can decide what a given status means.
    pub async fn fetch(&self, url: impl IntoUrl) -> Result<(StatusCode, Bytes), TransportError> {
        let response = self.client.get(url).send().await?;
        let status = response.status();
        let body = response.bytes().await?;
        Ok((status, body))
    }
}

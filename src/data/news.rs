//! News feed API client
//!
//! Fetches the latest articles from a newsapi.org-style endpoint, checks
//! the HTTP status, decodes the JSON envelope, and filters out articles
//! that are missing an author or an image URL.

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::Deserialize;
use thiserror::Error;
use tracing::{error, info};

use super::Article;
use crate::net::{HttpTransport, TransportError};

/// Default endpoint queried for articles
const NEWS_API_URL: &str = "https://newsapi.org/v2/everything";

/// Errors that can occur when fetching the latest news
#[derive(Debug, Error)]
pub enum NewsServiceError {
    /// The transport layer failed before a response was obtained
    #[error("network request failed")]
    Network(#[source] TransportError),

    /// A response was obtained but its status was not 200
    #[error("unexpected server response: {status}")]
    ServerResponse {
        /// The HTTP status code the server returned
        status: u16,
    },

    /// The response body did not decode into the expected feed schema
    #[error("failed to parse feed response")]
    ResultParsing(#[source] serde_json::Error),
}

/// Envelope returned by the news API
///
/// Decode-only: callers of the news service never see this type, only the
/// filtered article list.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct FeedResponse {
    pub(crate) status: String,
    pub(crate) total_results: u64,
    pub(crate) articles: Vec<Article>,
}

/// Decodes a raw feed body into the typed envelope
///
/// Strict on required fields, including inside each article; there is no
/// best-effort recovery of individual malformed articles. Unknown fields
/// are ignored.
pub(crate) fn decode_feed(bytes: &[u8]) -> Result<FeedResponse, serde_json::Error> {
    serde_json::from_slice(bytes)
}

/// Keeps only articles with both an author and an image URL, in order
fn filter_articles(articles: Vec<Article>) -> Vec<Article> {
    articles
        .into_iter()
        .filter(Article::is_well_formed)
        .collect()
}

/// Capability interface over a source of filtered news articles
///
/// Two implementations exist: [`NewsApiService`] for the live HTTP API and
/// [`MockNewsService`] for tests and offline runs.
#[async_trait]
pub trait NewsService: Send + Sync {
    /// Fetches the latest news, filtered to well-formed articles
    async fn latest_news(&self) -> Result<Vec<Article>, NewsServiceError>;
}

/// News service backed by the live news API
#[derive(Debug, Clone)]
pub struct NewsApiService {
    /// Transport used for the feed request
    transport: HttpTransport,
    /// Base endpoint URL (override for testing)
    endpoint: String,
    /// Search term sent as the `q` query parameter
    query: String,
    /// API key sent as the `apiKey` query parameter
    api_key: String,
}

impl NewsApiService {
    /// Creates a service against the default endpoint
    pub fn new(query: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            transport: HttpTransport::new(),
            endpoint: NEWS_API_URL.to_string(),
            query: query.into(),
            api_key: api_key.into(),
        }
    }

    /// Points the service at a custom endpoint (for testing)
    #[allow(dead_code)]
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    /// Builds the full request URL including query parameters
    fn request_url(&self) -> String {
        format!(
            "{}?q={}&apiKey={}",
            self.endpoint,
            urlencoded(&self.query),
            urlencoded(&self.api_key)
        )
    }
}

#[async_trait]
impl NewsService for NewsApiService {
    async fn latest_news(&self) -> Result<Vec<Article>, NewsServiceError> {
        let (status, body) = match self.transport.fetch(self.request_url()).await {
            Ok(pair) => pair,
            Err(err) => {
                error!("network request failed: {err}");
                return Err(NewsServiceError::Network(err));
            }
        };

        // Exactly 200 counts as success; redirects and partial content do not.
        if status != StatusCode::OK {
            error!("server response: {}", status.as_u16());
            return Err(NewsServiceError::ServerResponse {
                status: status.as_u16(),
            });
        }

        let feed = match decode_feed(&body) {
            Ok(feed) => feed,
            Err(err) => {
                error!("feed parsing failed: {err}");
                return Err(NewsServiceError::ResultParsing(err));
            }
        };

        info!("response status: {}", feed.status);
        info!("total results: {}", feed.total_results);

        Ok(filter_articles(feed.articles))
    }
}

/// Deterministic news service that performs no I/O and never fails
///
/// Always returns the same single, well-formed article regardless of how
/// many times it is called.
#[derive(Debug, Clone, Copy, Default)]
pub struct MockNewsService;

#[async_trait]
impl NewsService for MockNewsService {
    async fn latest_news(&self) -> Result<Vec<Article>, NewsServiceError> {
        Ok(vec![Article {
            title: "Lorem Ipsum".to_string(),
            url: "https://example.com/lorem".parse().ok(),
            author: Some("Author".to_string()),
            description: "Lorem ipsum dolor sit amet, consectetur adipiscing elit, \
                          sed do eiusmod tempor incididunt ut labore et dolore magna \
                          aliqua. Ut enim ad minim veniam..."
                .to_string(),
            image_url: Some("https://picsum.photos/300".to_string()),
        }])
    }
}

/// URL-encodes a string for use in query parameters
fn urlencoded(s: &str) -> String {
    s.replace('%', "%25")
        .replace(' ', "%20")
        .replace('&', "%26")
        .replace('#', "%23")
}

//! Core data models for Newsdesk
//!
//! This module contains the article type produced by the feed decoder and
//! the news service implementations that fetch and filter it.

pub mod news;

pub use news::{MockNewsService, NewsApiService, NewsService, NewsServiceError};

use serde::{Deserialize, Serialize};
use url::Url;

/// One normalized news item from the feed
///
/// Articles are immutable once decoded; a new fetch produces an entirely
/// new list rather than updating an old one. Only articles carrying both
/// an author and an image URL survive the news service's filter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Article {
    /// Headline; doubles as the cache key and filename stem for the image
    pub title: String,
    /// Canonical link to the article
    pub url: Option<Url>,
    /// Byline, if the feed provided one
    pub author: Option<String>,
    /// Short summary of the article body
    pub description: String,
    /// Image referenced by the article, as the feed reported it
    #[serde(rename = "urlToImage")]
    pub image_url: Option<String>,
}

impl Article {
    /// Whether this article survives the news service's filter
    pub fn is_well_formed(&self) -> bool {
        self.author.is_some() && self.image_url.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_article_deserializes_wire_field_names() {
        let json = r#"{
            "title": "Orchard yields up",
            "url": "https://example.com/orchard",
            "author": "A. Writer",
            "description": "Growers report a strong season.",
            "urlToImage": "https://example.com/orchard.jpg"
        }"#;

        let article: Article = serde_json::from_str(json).expect("Failed to parse article");

        assert_eq!(article.title, "Orchard yields up");
        assert_eq!(
            article.url.as_ref().map(Url::as_str),
            Some("https://example.com/orchard")
        );
        assert_eq!(article.author.as_deref(), Some("A. Writer"));
        assert_eq!(
            article.image_url.as_deref(),
            Some("https://example.com/orchard.jpg")
        );
    }

    #[test]
    fn test_article_optional_fields_absent() {
        let json = r#"{
            "title": "Untitled wire story",
            "description": "No byline, no artwork."
        }"#;

        let article: Article = serde_json::from_str(json).expect("Failed to parse article");

        assert!(article.url.is_none());
        assert!(article.author.is_none());
        assert!(article.image_url.is_none());
        assert!(!article.is_well_formed());
    }

    #[test]
    fn test_article_null_optional_fields() {
        let json = r#"{
            "title": "Null byline",
            "url": null,
            "author": null,
            "description": "Author explicitly null.",
            "urlToImage": null
        }"#;

        let article: Article = serde_json::from_str(json).expect("Failed to parse article");

        assert!(article.author.is_none());
        assert!(article.image_url.is_none());
    }

    #[test]
    fn test_article_missing_title_fails() {
        let json = r#"{
            "description": "A title is required."
        }"#;

        let result: Result<Article, _> = serde_json::from_str(json);
        assert!(result.is_err(), "Missing title should fail the decode");
    }

    #[test]
    fn test_article_invalid_url_fails() {
        let json = r#"{
            "title": "Bad link",
            "url": "not a url",
            "description": "The url field must parse."
        }"#;

        let result: Result<Article, _> = serde_json::from_str(json);
        assert!(result.is_err(), "Unparseable url should fail the decode");
    }

    #[test]
    fn test_article_serialization_roundtrip() {
        let article = Article {
            title: "Roundtrip".to_string(),
            url: "https://example.com/a".parse().ok(),
            author: Some("Reporter".to_string()),
            description: "Survives a trip through JSON.".to_string(),
            image_url: Some("https://example.com/a.png".to_string()),
        };

        let json = serde_json::to_string(&article).expect("Failed to serialize article");
        assert!(json.contains("urlToImage"), "Wire name should be preserved");

        let back: Article = serde_json::from_str(&json).expect("Failed to deserialize article");
        assert_eq!(back, article);
    }

    #[test]
    fn test_is_well_formed_requires_both_fields() {
        let base = Article {
            title: "t".to_string(),
            url: None,
            author: Some("a".to_string()),
            description: String::new(),
            image_url: Some("https://example.com/i.png".to_string()),
        };
        assert!(base.is_well_formed());

        let no_author = Article {
            author: None,
            ..base.clone()
        };
        assert!(!no_author.is_well_formed());

        let no_image = Article {
            image_url: None,
            ..base
        };
        assert!(!no_image.is_well_formed());
    }
}

//! RSS-to-JSON source adapter.
//!
//! News provider. Each adapter instance wraps one publication's RSS feed,
//! fetched through an rss2json-shaped relay that converts XML to JSON.
//! A chain of these, one per publication, gives the news module the same
//! fallback behavior as the quote modules.

use std::time::Duration;

use async_trait::async_trait;
use chrono::{NaiveDateTime, TimeZone, Utc};
use log::debug;
use reqwest::Client;
use serde::Deserialize;

use crate::errors::FetchError;
use crate::models::{NewsFeed, NewsItem};
use crate::provider::SourceAdapter;

const API_URL: &str = "https://api.rss2json.com/v1/api.json";
const TIMEOUT: Duration = Duration::from_secs(10);

/// Headlines kept per feed; upstream feeds carry dozens.
const MAX_ITEMS: usize = 12;

/// Response from the rss2json relay.
#[derive(Debug, Deserialize)]
struct FeedResponse {
    status: String,
    #[serde(default)]
    items: Vec<FeedItem>,
}

#[derive(Debug, Deserialize)]
struct FeedItem {
    title: String,
    link: String,
    #[serde(rename = "pubDate")]
    pub_date: Option<String>,
}

/// One publication's feed.
pub struct RssProvider {
    client: Client,
    label: &'static str,
    feed_url: String,
}

impl RssProvider {
    /// Create an adapter for one feed.
    pub fn new(label: &'static str, feed_url: impl Into<String>) -> Self {
        let client = Client::builder()
            .timeout(TIMEOUT)
            .build()
            .unwrap_or_else(|_| Client::new());

        Self {
            client,
            label,
            feed_url: feed_url.into(),
        }
    }

    fn parse_pub_date(raw: &str) -> Option<chrono::DateTime<Utc>> {
        // rss2json normalizes dates to "YYYY-MM-DD HH:MM:SS"
        NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S")
            .ok()
            .map(|naive| Utc.from_utc_datetime(&naive))
    }
}

#[async_trait]
impl SourceAdapter<NewsFeed> for RssProvider {
    fn id(&self) -> &'static str {
        self.label
    }

    fn timeout(&self) -> Duration {
        TIMEOUT
    }

    async fn fetch(&self) -> Result<NewsFeed, FetchError> {
        debug!("News request for feed '{}'", self.label);

        let response = self
            .client
            .get(API_URL)
            .query(&[("rss_url", self.feed_url.as_str())])
            .send()
            .await
            .map_err(|e| FetchError::from_reqwest(self.label, e))?;

        let status = response.status();
        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(FetchError::RateLimited {
                provider: self.label.to_string(),
            });
        }
        if !status.is_success() {
            return Err(FetchError::Network {
                provider: self.label.to_string(),
                message: format!("HTTP {}", status),
            });
        }

        let body: FeedResponse = response
            .json()
            .await
            .map_err(|e| FetchError::shape(self.label, format!("invalid JSON body: {}", e)))?;

        if body.status != "ok" {
            return Err(FetchError::shape(
                self.label,
                format!("relay status '{}'", body.status),
            ));
        }
        if body.items.is_empty() {
            return Err(FetchError::shape(self.label, "feed has no items"));
        }

        let items = body
            .items
            .into_iter()
            .take(MAX_ITEMS)
            .map(|item| NewsItem {
                title: item.title,
                link: item.link,
                source: self.label.to_string(),
                published_at: item.pub_date.as_deref().and_then(Self::parse_pub_date),
            })
            .collect();

        Ok(NewsFeed::new(self.label, items))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_feed_response_parsing() {
        let json = r#"{
            "status": "ok",
            "feed": {"title": "Ámbito - Economía"},
            "items": [
                {
                    "title": "El dólar blue cerró estable",
                    "link": "https://example.com/nota-1",
                    "pubDate": "2025-08-07 12:30:00",
                    "description": "..."
                },
                {
                    "title": "El MERVAL subió 1,2%",
                    "link": "https://example.com/nota-2",
                    "pubDate": "2025-08-07 11:05:00"
                }
            ]
        }"#;

        let body: FeedResponse = serde_json::from_str(json).unwrap();
        assert_eq!(body.status, "ok");
        assert_eq!(body.items.len(), 2);
        assert_eq!(body.items[0].title, "El dólar blue cerró estable");
    }

    #[test]
    fn test_error_status_parsing() {
        let json = r#"{"status": "error", "message": "rss_url is required"}"#;

        let body: FeedResponse = serde_json::from_str(json).unwrap();
        assert_eq!(body.status, "error");
        assert!(body.items.is_empty());
    }

    #[test]
    fn test_parse_pub_date() {
        let parsed = RssProvider::parse_pub_date("2025-08-07 12:30:00").unwrap();
        assert_eq!(parsed.to_rfc3339(), "2025-08-07T12:30:00+00:00");

        assert!(RssProvider::parse_pub_date("ayer a la tarde").is_none());
    }
}

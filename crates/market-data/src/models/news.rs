use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One headline from an upstream feed.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct NewsItem {
    /// Headline text
    pub title: String,

    /// Link to the article
    pub link: String,

    /// Publication the item came from
    pub source: String,

    /// Publication time, when the feed supplied a parseable one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub published_at: Option<DateTime<Utc>>,
}

/// The news instantiation of the pipeline's normalized record.
///
/// A feed is resolved through the same fallback chain as quotes are; the
/// `source` label distinguishes live, cached, and fallback headlines.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct NewsFeed {
    /// Label of the adapter that produced the feed
    pub source: String,

    /// Headlines, newest first as published by the feed
    pub items: Vec<NewsItem>,
}

impl NewsFeed {
    /// Create a feed from already-normalized items.
    pub fn new(source: impl Into<String>, items: Vec<NewsItem>) -> Self {
        Self {
            source: source.into(),
            items,
        }
    }
}

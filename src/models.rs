//! Data models for feed items, aggregated articles and the written briefing.
//!
//! - [`RawFeedItem`] / [`Feed`]: a parsed feed, every field optional
//! - [`ArticleRecord`]: one cleaned, canonicalized news item
//! - [`CategoryArticles`] / [`AggregationResult`]: output of one aggregation run
//! - [`Briefing`]: what gets serialized to disk

use serde::{Deserialize, Serialize};

/// One `<item>` of a feed, exactly as the publisher supplied it.
///
/// Feeds are inconsistent about which fields they fill in, so nothing here
/// is guaranteed to be present.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawFeedItem {
    pub title: Option<String>,
    pub link: Option<String>,
    pub pub_date: Option<String>,
    /// Outlet name from the item's `<source>` element.
    pub source_name: Option<String>,
    /// Outlet homepage from the `url` attribute of `<source>`.
    pub source_url: Option<String>,
    /// Item description; may contain HTML.
    pub description: Option<String>,
}

/// A parsed feed: items in publisher order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Feed {
    pub items: Vec<RawFeedItem>,
}

/// A single aggregated news item.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ArticleRecord {
    /// Headline with the trailing `" - Outlet"` suffix removed.
    pub title: String,
    /// Canonical article URL; also the exact-duplicate key.
    pub link: String,
    /// Publish timestamp as the feed reported it. Display only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub published_at: Option<String>,
    /// Outlet name, or empty when neither the feed nor the title named one.
    pub source: String,
    /// Plain-text excerpt. Display only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub snippet: Option<String>,
    /// Key of the category this record was fetched for.
    pub category: String,
}

/// Records fetched for one category, capped at its limit.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct CategoryArticles {
    pub key: String,
    pub name: String,
    pub articles: Vec<ArticleRecord>,
}

/// Result of one aggregation run.
///
/// `by_category` keeps every category in configured order, including empty
/// ones, and is not affected by cross-category deduplication. `merged` is the
/// deduplicated union in first-seen order.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct AggregationResult {
    pub by_category: Vec<CategoryArticles>,
    pub merged: Vec<ArticleRecord>,
}

impl AggregationResult {
    /// Look up a category's records by key.
    pub fn category(&self, key: &str) -> Option<&[ArticleRecord]> {
        self.by_category
            .iter()
            .find(|c| c.key == key)
            .map(|c| c.articles.as_slice())
    }

    /// Merged records that came from the given category, in merged order.
    pub fn merged_in<'a>(&'a self, key: &'a str) -> impl Iterator<Item = &'a ArticleRecord> + 'a {
        self.merged.iter().filter(move |a| a.category == key)
    }

    pub fn is_empty(&self) -> bool {
        self.merged.is_empty()
    }
}

/// The news section of a morning briefing as written to disk.
#[derive(Debug, Deserialize, Serialize)]
pub struct Briefing {
    /// Local date in `YYYY-MM-DD` format.
    pub local_date: String,
    /// Local time of generation in `HH:MM:SS` format.
    pub local_time: String,
    /// Language model summary, if one could be produced.
    pub summary: Option<String>,
    pub news: AggregationResult,
}

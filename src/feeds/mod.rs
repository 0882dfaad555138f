//! Feed retrieval.
//!
//! The aggregator only needs something that turns a URL into a parsed
//! [`Feed`]; that contract is the [`FeedFetcher`] trait. The production
//! implementation is [`http::HttpFeedFetcher`], which downloads with
//! `reqwest` and parses RSS 2.0 with [`rss::parse_feed`].
//!
//! # Endpoint
//!
//! Search feeds are addressed through a [`FeedEndpoint`]: a base URL plus the
//! locale parameters Google-News-style endpoints expect (`hl`, `gl`, `ceid`).

pub mod http;
pub mod rss;

use crate::models::Feed;
use serde::{Deserialize, Serialize};
use std::error::Error;

/// Error type crossing the fetch boundary.
pub type FetchError = Box<dyn Error + Send + Sync>;

/// Turns a feed URL into a parsed feed.
pub trait FeedFetcher {
    /// Download and parse the feed at `url`.
    async fn fetch(&self, url: &str) -> Result<Feed, FetchError>;
}

/// A search-feed endpoint scoped to one locale and region.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct FeedEndpoint {
    pub base_url: String,
    /// Interface language (`hl`).
    pub language: String,
    /// Region (`gl`).
    pub region: String,
    /// Edition identifier (`ceid`), e.g. `KR:ko`.
    pub edition: String,
}

impl Default for FeedEndpoint {
    fn default() -> Self {
        Self {
            base_url: "https://news.google.com/rss/search".to_string(),
            language: "ko".to_string(),
            region: "KR".to_string(),
            edition: "KR:ko".to_string(),
        }
    }
}

impl FeedEndpoint {
    /// Build the feed URL for a search expression.
    ///
    /// # Examples
    ///
    /// ```ignore
    /// let url = FeedEndpoint::default().search_url("AI 반도체");
    /// assert!(url.starts_with("https://news.google.com/rss/search?q=AI%20%EB%B0%98"));
    /// ```
    pub fn search_url(&self, query: &str) -> String {
        format!(
            "{}?q={}&hl={}&gl={}&ceid={}",
            self.base_url,
            urlencoding::encode(query),
            urlencoding::encode(&self.language),
            urlencoding::encode(&self.region),
            urlencoding::encode(&self.edition),
        )
    }
}

//! Multi-source news aggregation.
//!
//! [`NewsAggregator::aggregate`] fans out one feed request per
//! [`SourceQuery`], waits for every request to settle, turns the surviving
//! feeds into [`ArticleRecord`]s and merges them into one deduplicated list.
//!
//! # Pipeline
//!
//! 1. **Validate** the query list; this is the only way `aggregate` fails
//! 2. **Fetch** every category concurrently, each bounded by a timeout
//! 3. **Extract** up to `limit` records per feed, in feed order
//! 4. **Dedupe** across categories: exact link match, then near-duplicate title
//!
//! A source that errors or times out contributes an empty list and is logged.
//! Nothing is retried.

use crate::config::{ConfigError, NewsConfig, SourceQuery, validate_queries};
use crate::feeds::{FeedEndpoint, FeedFetcher};
use crate::models::{AggregationResult, ArticleRecord, CategoryArticles, Feed, RawFeedItem};
use crate::normalize::{
    canonicalize_link, clean_title, is_similar_title, normalize_title, plain_text_snippet,
    source_from_title,
};
use futures::future::join_all;
use std::collections::HashSet;
use std::time::Duration;
use tokio::time::timeout;
use tracing::{debug, error, info, instrument, warn};

/// Collects categorized headlines from a set of search feeds.
#[derive(Debug)]
pub struct NewsAggregator<F> {
    fetcher: F,
    endpoint: FeedEndpoint,
    fetch_timeout: Duration,
    redirector_hosts: Vec<String>,
}

impl<F: FeedFetcher> NewsAggregator<F> {
    pub fn new(
        fetcher: F,
        endpoint: FeedEndpoint,
        fetch_timeout: Duration,
        redirector_hosts: Vec<String>,
    ) -> Self {
        Self {
            fetcher,
            endpoint,
            fetch_timeout,
            redirector_hosts,
        }
    }

    pub fn from_config(fetcher: F, config: &NewsConfig) -> Self {
        Self::new(
            fetcher,
            config.endpoint.clone(),
            Duration::from_secs(config.timeout_secs),
            config.redirector_hosts.clone(),
        )
    }

    /// Fetch every query's feed concurrently and merge the results.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the query list is invalid. No fetch is
    /// issued in that case. Source failures never surface here.
    #[instrument(level = "info", skip_all, fields(sources = queries.len()))]
    pub async fn aggregate(
        &self,
        queries: &[SourceQuery],
    ) -> Result<AggregationResult, ConfigError> {
        validate_queries(queries)?;
        info!("Collecting news from all sources");

        let by_category: Vec<CategoryArticles> =
            join_all(queries.iter().map(|q| self.collect_category(q))).await;

        for category in &by_category {
            info!(
                category = %category.key,
                name = %category.name,
                count = category.articles.len(),
                "Category collected"
            );
        }

        let merged = dedupe(
            by_category
                .iter()
                .flat_map(|c| c.articles.iter().cloned()),
        );

        let fetched: usize = by_category.iter().map(|c| c.articles.len()).sum();
        info!(
            fetched,
            merged = merged.len(),
            dropped = fetched - merged.len(),
            "News collection complete"
        );

        Ok(AggregationResult {
            by_category,
            merged,
        })
    }

    #[instrument(level = "debug", skip_all, fields(category = %query.key))]
    async fn collect_category(&self, query: &SourceQuery) -> CategoryArticles {
        let url = self.endpoint.search_url(&query.query);
        debug!(%url, "Fetching feed");

        let articles = match timeout(self.fetch_timeout, self.fetcher.fetch(&url)).await {
            Ok(Ok(feed)) => extract_records(feed, query, &self.redirector_hosts),
            Ok(Err(e)) => {
                error!(category = %query.key, %url, error = %e, "Feed fetch failed; category left empty");
                Vec::new()
            }
            Err(_) => {
                error!(
                    category = %query.key,
                    %url,
                    timeout_ms = self.fetch_timeout.as_millis() as u64,
                    "Feed fetch timed out; category left empty"
                );
                Vec::new()
            }
        };

        CategoryArticles {
            key: query.key.clone(),
            name: query.name.clone(),
            articles,
        }
    }
}

/// Take the first `query.limit` items of a feed and convert them.
///
/// Items without a link still use up a slot.
pub fn extract_records(
    feed: Feed,
    query: &SourceQuery,
    redirector_hosts: &[String],
) -> Vec<ArticleRecord> {
    let available = feed.items.len();
    let records: Vec<ArticleRecord> = feed
        .items
        .into_iter()
        .take(query.limit)
        .filter_map(|item| to_record(item, &query.key, redirector_hosts))
        .collect();

    if available > 0 && records.is_empty() {
        warn!(category = %query.key, available, "Feed had items but none were usable");
    }
    records
}

/// Convert one raw feed item into an [`ArticleRecord`].
///
/// Returns `None` for items without a link, since the link is the
/// deduplication key.
pub fn to_record(
    item: RawFeedItem,
    category: &str,
    redirector_hosts: &[String],
) -> Option<ArticleRecord> {
    let Some(raw_link) = item.link else {
        debug!(%category, title = ?item.title, "Skipping feed item without link");
        return None;
    };

    let raw_title = item.title.unwrap_or_default();
    let source = item
        .source_name
        .or_else(|| source_from_title(&raw_title))
        .unwrap_or_default();

    Some(ArticleRecord {
        title: clean_title(&raw_title),
        link: canonicalize_link(&raw_link, redirector_hosts),
        published_at: item.pub_date,
        source,
        snippet: item.description.as_deref().and_then(plain_text_snippet),
        category: category.to_string(),
    })
}

/// Remove exact and near-duplicate records, keeping the first of each.
///
/// A record is dropped when its link equals an accepted record's link, or
/// when its normalized title is similar (see [`is_similar_title`]) to any
/// accepted title. Accepted titles are checked in insertion order and the
/// first match wins.
pub fn dedupe(records: impl IntoIterator<Item = ArticleRecord>) -> Vec<ArticleRecord> {
    let mut seen_links: HashSet<String> = HashSet::new();
    let mut accepted_titles: Vec<String> = Vec::new();
    let mut unique = Vec::new();

    for record in records {
        if seen_links.contains(&record.link) {
            debug!(link = %record.link, "Dropping exact duplicate");
            continue;
        }

        let normalized = normalize_title(&record.title);
        if let Some(existing) = accepted_titles
            .iter()
            .find(|t| is_similar_title(&normalized, t))
        {
            debug!(title = %record.title, similar_to = %existing, "Dropping near duplicate");
            continue;
        }

        seen_links.insert(record.link.clone());
        accepted_titles.push(normalized);
        unique.push(record);
    }

    unique
}

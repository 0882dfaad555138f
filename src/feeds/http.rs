//! HTTP feed fetcher backed by `reqwest`.

use super::rss::parse_feed;
use super::{FeedFetcher, FetchError};
use crate::models::Feed;
use reqwest::Client;
use std::time::Duration;
use tracing::{debug, instrument};

/// Downloads feeds over HTTP and parses them as RSS 2.0.
///
/// Owns its `reqwest::Client`; construct one per run and pass it to the
/// aggregator. Every request is bounded by the timeout given at construction.
#[derive(Debug, Clone)]
pub struct HttpFeedFetcher {
    client: Client,
}

impl HttpFeedFetcher {
    pub fn new(timeout: Duration, user_agent: &str) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(user_agent)
            .build()?;
        Ok(Self { client })
    }
}

impl FeedFetcher for HttpFeedFetcher {
    #[instrument(level = "debug", skip(self))]
    async fn fetch(&self, url: &str) -> Result<Feed, FetchError> {
        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(format!("feed request returned HTTP {status}").into());
        }

        let body = response.text().await?;
        debug!(bytes = body.len(), "Downloaded feed");
        Ok(parse_feed(&body)?)
    }
}

//! Source query configuration.
//!
//! The set of categories to collect is static for a run. It comes either from
//! a YAML file passed with `--config` or from [`NewsConfig::default`], which
//! carries the stock Korean-market briefing categories.
//!
//! ```yaml
//! timeout_secs: 10
//! endpoint:
//!   base_url: https://news.google.com/rss/search
//!   language: en
//!   region: US
//!   edition: "US:en"
//! redirector_hosts: [news.google.com]
//! categories:
//!   - key: economy
//!     name: Economy
//!     query: rates inflation stocks
//!     limit: 5
//! ```

use crate::feeds::FeedEndpoint;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::error::Error;
use std::fmt;
use tokio::fs;
use tracing::{info, instrument};

/// A named category with its search expression and item cap.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct SourceQuery {
    /// Stable identifier, e.g. `"economy"`.
    pub key: String,
    /// Display name, e.g. `"경제"`.
    pub name: String,
    /// Search expression sent to the feed endpoint.
    pub query: String,
    /// Maximum number of items taken from this source, in feed order.
    pub limit: usize,
}

impl SourceQuery {
    pub fn new(
        key: impl Into<String>,
        name: impl Into<String>,
        query: impl Into<String>,
        limit: usize,
    ) -> Self {
        Self {
            key: key.into(),
            name: name.into(),
            query: query.into(),
            limit,
        }
    }
}

/// Everything the news collector needs to know before it starts fetching.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct NewsConfig {
    pub endpoint: FeedEndpoint,
    /// Per-feed fetch timeout.
    pub timeout_secs: u64,
    pub user_agent: String,
    /// Hosts whose links wrap the real article URL in a query parameter.
    pub redirector_hosts: Vec<String>,
    pub categories: Vec<SourceQuery>,
}

impl Default for NewsConfig {
    fn default() -> Self {
        Self {
            endpoint: FeedEndpoint::default(),
            timeout_secs: 10,
            user_agent: "Mozilla/5.0 (compatible; MorningBriefBot/1.0)".to_string(),
            redirector_hosts: vec!["news.google.com".to_string()],
            categories: vec![
                SourceQuery::new("domestic", "국내정책", "site:kr 정책 OR 정부 OR 국회", 5),
                SourceQuery::new("economy", "경제", "경제 금리 물가 환율 증시", 5),
                SourceQuery::new("tech", "테크", "AI 반도체 빅테크 스타트업", 5),
                SourceQuery::new("global", "글로벌", "미국 중국 연준 ECB 지정학", 5),
            ],
        }
    }
}

impl NewsConfig {
    /// Load and validate a YAML configuration file.
    ///
    /// Fields missing from the file fall back to [`NewsConfig::default`].
    #[instrument(level = "info", skip_all, fields(%path))]
    pub async fn load(path: &str) -> Result<Self, Box<dyn Error>> {
        let text = fs::read_to_string(path).await?;
        let config = Self::from_yaml(&text)?;
        info!(categories = config.categories.len(), "Loaded news configuration");
        Ok(config)
    }

    pub fn from_yaml(text: &str) -> Result<Self, Box<dyn Error>> {
        let config: NewsConfig = serde_yaml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.timeout_secs == 0 {
            return Err(ConfigError::ZeroTimeout);
        }
        validate_queries(&self.categories)
    }
}

/// Reasons a set of source queries cannot be run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    NoQueries,
    BlankKey { index: usize },
    BlankQuery { key: String },
    ZeroLimit { key: String },
    DuplicateKey { key: String },
    ZeroTimeout,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::NoQueries => write!(f, "no source queries configured"),
            ConfigError::BlankKey { index } => {
                write!(f, "source query #{index} has an empty key")
            }
            ConfigError::BlankQuery { key } => {
                write!(f, "source query '{key}' has an empty search expression")
            }
            ConfigError::ZeroLimit { key } => {
                write!(f, "source query '{key}' must have a limit of at least 1")
            }
            ConfigError::DuplicateKey { key } => {
                write!(f, "source query key '{key}' is used more than once")
            }
            ConfigError::ZeroTimeout => write!(f, "timeout_secs must be at least 1"),
        }
    }
}

impl Error for ConfigError {}

/// Check a query list before any fetch is issued.
pub fn validate_queries(queries: &[SourceQuery]) -> Result<(), ConfigError> {
    if queries.is_empty() {
        return Err(ConfigError::NoQueries);
    }

    let mut seen = HashSet::new();
    for (index, q) in queries.iter().enumerate() {
        if q.key.trim().is_empty() {
            return Err(ConfigError::BlankKey { index });
        }
        if q.query.trim().is_empty() {
            return Err(ConfigError::BlankQuery { key: q.key.clone() });
        }
        if q.limit == 0 {
            return Err(ConfigError::ZeroLimit { key: q.key.clone() });
        }
        if !seen.insert(q.key.as_str()) {
            return Err(ConfigError::DuplicateKey { key: q.key.clone() });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = NewsConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.categories.len(), 4);
        assert_eq!(config.categories[0].key, "domestic");
        assert!(config.categories.iter().all(|c| c.limit == 5));
    }

    #[test]
    fn test_from_yaml_with_partial_fields() {
        let yaml = r#"
timeout_secs: 3
categories:
  - key: economy
    name: Economy
    query: rates inflation
    limit: 7
"#;
        let config = NewsConfig::from_yaml(yaml).unwrap();
        assert_eq!(config.timeout_secs, 3);
        assert_eq!(config.categories, vec![SourceQuery::new("economy", "Economy", "rates inflation", 7)]);
        // untouched sections keep their defaults
        assert_eq!(config.endpoint, FeedEndpoint::default());
        assert_eq!(config.redirector_hosts, vec!["news.google.com".to_string()]);
    }

    #[test]
    fn test_from_yaml_partial_endpoint() {
        let yaml = r#"
endpoint:
  language: en
  region: US
  edition: "US:en"
"#;
        let config = NewsConfig::from_yaml(yaml).unwrap();
        assert_eq!(config.endpoint.base_url, "https://news.google.com/rss/search");
        assert!(config.endpoint.search_url("fed").ends_with("&hl=en&gl=US&ceid=US%3Aen"));
        assert_eq!(config.categories.len(), 4);
    }

    #[test]
    fn test_from_yaml_rejects_invalid_categories() {
        let yaml = r#"
categories:
  - key: economy
    name: Economy
    query: rates
    limit: 0
"#;
        assert!(NewsConfig::from_yaml(yaml).is_err());
    }

    #[test]
    fn test_validate_queries_errors() {
        assert_eq!(validate_queries(&[]), Err(ConfigError::NoQueries));
        assert_eq!(
            validate_queries(&[SourceQuery::new(" ", "x", "q", 1)]),
            Err(ConfigError::BlankKey { index: 0 })
        );
        assert_eq!(
            validate_queries(&[SourceQuery::new("a", "A", "  ", 1)]),
            Err(ConfigError::BlankQuery { key: "a".to_string() })
        );
        assert_eq!(
            validate_queries(&[SourceQuery::new("a", "A", "q", 0)]),
            Err(ConfigError::ZeroLimit { key: "a".to_string() })
        );
        assert_eq!(
            validate_queries(&[
                SourceQuery::new("a", "A", "q", 1),
                SourceQuery::new("a", "A2", "q2", 1),
            ]),
            Err(ConfigError::DuplicateKey { key: "a".to_string() })
        );
    }

    #[test]
    fn test_zero_timeout_rejected() {
        let config = NewsConfig {
            timeout_secs: 0,
            ..NewsConfig::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::ZeroTimeout));
    }
}

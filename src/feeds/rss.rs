//! RSS 2.0 parsing.
//!
//! Only the handful of item fields the aggregator reads are mapped; all other
//! elements are ignored. Google News items carry the outlet in a
//! `<source url="...">Outlet</source>` element, which is picked up as
//! [`RawFeedItem::source_name`] and [`RawFeedItem::source_url`].

use crate::models::{Feed, RawFeedItem};
use quick_xml::de::from_str;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
struct Rss {
    channel: Channel,
}

#[derive(Debug, Deserialize)]
struct Channel {
    #[serde(rename = "item", default)]
    items: Vec<Item>,
}

#[derive(Debug, Deserialize)]
struct Item {
    title: Option<String>,
    link: Option<String>,
    #[serde(rename = "pubDate")]
    pub_date: Option<String>,
    source: Option<SourceTag>,
    description: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SourceTag {
    #[serde(rename = "$text", default)]
    name: Option<String>,
    #[serde(rename = "@url", default)]
    url: Option<String>,
}

/// Parse an RSS 2.0 document into a [`Feed`].
///
/// A channel with no `<item>` elements yields an empty feed. Blank fields are
/// reported as absent.
pub fn parse_feed(xml: &str) -> Result<Feed, quick_xml::DeError> {
    let rss: Rss = from_str(xml)?;
    let items = rss
        .channel
        .items
        .into_iter()
        .map(|it| {
            let (source_name, source_url) = it.source.map_or((None, None), |s| (s.name, s.url));
            RawFeedItem {
                title: non_blank(it.title),
                link: non_blank(it.link),
                pub_date: non_blank(it.pub_date),
                source_name: non_blank(source_name),
                source_url: non_blank(source_url),
                description: non_blank(it.description),
            }
        })
        .collect();
    Ok(Feed { items })
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    const GOOGLE_NEWS_FIXTURE: &str = r##"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<rss xmlns:media="http://search.yahoo.com/mrss/" version="2.0">
  <channel>
    <generator>NFE/5.0</generator>
    <title>"경제 금리" - Google 뉴스</title>
    <link>https://news.google.com/search?q=%EA%B2%BD%EC%A0%9C&amp;hl=ko&amp;gl=KR&amp;ceid=KR:ko</link>
    <language>ko</language>
    <item>
      <title>한은, 기준금리 동결 - 연합뉴스</title>
      <link>https://news.google.com/rss/articles/CBMiAAA?oc=5</link>
      <guid isPermaLink="false">CBMiAAA</guid>
      <pubDate>Tue, 06 May 2025 21:00:00 GMT</pubDate>
      <description>&lt;a href="https://news.google.com/rss/articles/CBMiAAA?oc=5" target="_blank"&gt;한은, 기준금리 동결&lt;/a&gt;&amp;nbsp;&amp;nbsp;&lt;font color="#6f6f6f"&gt;연합뉴스&lt;/font&gt;</description>
      <source url="https://www.yna.co.kr">연합뉴스</source>
    </item>
    <item>
      <title>Fed holds rates steady - Reuters</title>
      <link>https://www.reuters.com/markets/fed-holds</link>
      <pubDate>Tue, 06 May 2025 20:00:00 GMT</pubDate>
      <description><![CDATA[<p>The Federal Reserve kept rates unchanged.</p>]]></description>
    </item>
    <item>
      <title>   </title>
    </item>
  </channel>
</rss>"##;

    #[test]
    fn test_parse_google_news_fixture() {
        let feed = parse_feed(GOOGLE_NEWS_FIXTURE).unwrap();
        assert_eq!(feed.items.len(), 3);

        let first = &feed.items[0];
        assert_eq!(first.title.as_deref(), Some("한은, 기준금리 동결 - 연합뉴스"));
        assert_eq!(
            first.link.as_deref(),
            Some("https://news.google.com/rss/articles/CBMiAAA?oc=5")
        );
        assert_eq!(first.pub_date.as_deref(), Some("Tue, 06 May 2025 21:00:00 GMT"));
        assert_eq!(first.source_name.as_deref(), Some("연합뉴스"));
        assert_eq!(first.source_url.as_deref(), Some("https://www.yna.co.kr"));
        assert!(first.description.as_deref().unwrap().starts_with("<a href="));

        let second = &feed.items[1];
        assert_eq!(second.source_name, None);
        assert_eq!(second.source_url, None);
        assert_eq!(
            second.description.as_deref(),
            Some("<p>The Federal Reserve kept rates unchanged.</p>")
        );

        assert_eq!(feed.items[2], RawFeedItem::default());
    }

    #[test]
    fn test_parse_empty_channel() {
        let xml = r#"<rss version="2.0"><channel><title>nothing</title></channel></rss>"#;
        let feed = parse_feed(xml).unwrap();
        assert!(feed.items.is_empty());
    }

    #[test]
    fn test_parse_malformed_feed_fails() {
        let xml = "<rss><channel><item><title>broken</item></channel></rss>";
        assert!(parse_feed(xml).is_err());
    }
}

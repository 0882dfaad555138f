//! Markdown digest of the collected news.
//!
//! The digest shows, per category, how many records were fetched and how many
//! survived deduplication, followed by a few sample headlines.

use crate::models::{ArticleRecord, Briefing};
use chrono::DateTime;
use itertools::Itertools;
use std::error::Error;
use std::fmt::Write;
use tokio::fs;
use tracing::{info, instrument};

/// Sample headlines shown per category.
const SAMPLES_PER_CATEGORY: usize = 3;

/// Render a [`Briefing`] as Markdown.
pub fn briefing_to_markdown(briefing: &Briefing) -> String {
    let news = &briefing.news;
    let mut md = String::new();

    writeln!(md, "# Morning News: {}\n", briefing.local_date).unwrap();
    writeln!(md, "_Generated at {}_\n", briefing.local_time).unwrap();

    writeln!(md, "## Summary\n").unwrap();
    match &briefing.summary {
        Some(summary) => writeln!(md, "{}\n", summary.trim()).unwrap(),
        None => writeln!(md, "No summary available.\n").unwrap(),
    }

    writeln!(md, "## Categories\n").unwrap();
    writeln!(md, "| Category | Fetched | Kept |").unwrap();
    writeln!(md, "|---|---:|---:|").unwrap();
    for category in &news.by_category {
        writeln!(
            md,
            "| {} | {} | {} |",
            escape_table_cell(&category.name),
            category.articles.len(),
            news.merged_in(&category.key).count()
        )
        .unwrap();
    }
    let fetched: usize = news.by_category.iter().map(|c| c.articles.len()).sum();
    writeln!(md, "| **Total** | {} | {} |\n", fetched, news.merged.len()).unwrap();

    if news.is_empty() {
        writeln!(md, "No news was collected today.").unwrap();
        return md;
    }

    writeln!(md, "## Headlines").unwrap();
    for category in &news.by_category {
        let samples: Vec<&ArticleRecord> = news
            .merged_in(&category.key)
            .take(SAMPLES_PER_CATEGORY)
            .collect();
        if samples.is_empty() {
            continue;
        }

        writeln!(md, "\n### {}\n", category.name).unwrap();
        for article in samples {
            writeln!(md, "- {}", headline_line(article)).unwrap();
        }
    }

    md
}

fn headline_line(article: &ArticleRecord) -> String {
    let link = format!("[{}]({})", escape_link_text(&article.title), article.link);
    let source = Some(article.source.as_str()).filter(|s| !s.is_empty()).map(str::to_string);
    let published = article.published_at.as_deref().map(display_time);

    std::iter::once(link)
        .chain(source)
        .chain(published)
        .join(" · ")
}

fn escape_link_text(text: &str) -> String {
    text.replace('[', "\\[").replace(']', "\\]")
}

fn escape_table_cell(text: &str) -> String {
    text.replace('|', "\\|")
}

/// Show RFC 2822 feed dates as `YYYY-MM-DD HH:MM`; anything else verbatim.
fn display_time(raw: &str) -> String {
    DateTime::parse_from_rfc2822(raw)
        .map(|dt| dt.format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_else(|_| raw.to_string())
}

/// Write the digest to `{markdown_output_dir}/{local_date}.md`.
#[instrument(level = "info", skip_all, fields(%markdown_output_dir))]
pub async fn write_digest(
    briefing: &Briefing,
    markdown_output_dir: &str,
) -> Result<String, Box<dyn Error>> {
    let path = format!(
        "{}/{}.md",
        markdown_output_dir.trim_end_matches('/'),
        briefing.local_date
    );
    fs::write(&path, briefing_to_markdown(briefing)).await?;
    info!(%path, "Wrote Markdown digest");
    Ok(path)
}

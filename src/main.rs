//! # Morning News
//!
//! Collects the news section of a daily morning briefing: headline lists are
//! pulled from several RSS search feeds at once, cleaned, merged, and
//! deduplicated across categories, then optionally summarized by an LLM and
//! written out as JSON and a Markdown digest.
//!
//! ## Usage
//!
//! ```sh
//! morning_news -j ./json -m ./markdown
//! ```
//!
//! ## Architecture
//!
//! 1. **Configuration**: categories come from `--config` or the built-in defaults
//! 2. **Aggregation**: one feed per category, fetched concurrently; failed
//!    sources contribute nothing
//! 3. **Deduplication**: exact link match, then near-duplicate titles
//! 4. **Summary**: merged headlines sent to an OpenAI-compatible endpoint
//! 5. **Output**: JSON file and Markdown digest

use chrono::Local;
use clap::Parser;
use std::error::Error;
use std::time::Duration as StdDuration;
use tracing::{debug, error, info, instrument, warn};
use tracing_subscriber::{EnvFilter, fmt as tfmt};

mod aggregator;
mod cli;
mod config;
mod feeds;
mod models;
mod normalize;
mod outputs;
mod summarizer;
mod utils;

use aggregator::NewsAggregator;
use cli::Cli;
use config::NewsConfig;
use feeds::http::HttpFeedFetcher;
use models::Briefing;
use outputs::{json, markdown};
use summarizer::{ChatCompletionClient, RetryAsk, SummarizerConfig};
use utils::ensure_writable_dir;

const NO_NEWS_NOTE: &str = "No news was collected today.";

#[tokio::main]
#[instrument]
async fn main() -> Result<(), Box<dyn Error>> {
    // --- Tracing init ---
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();

    let start_time = std::time::Instant::now();
    info!("morning_news starting up");

    let args = Cli::parse();
    debug!(?args.json_output_dir, ?args.markdown_output_dir, ?args.config, "Parsed CLI arguments");

    // ---- Configuration ----
    let mut config = match &args.config {
        Some(path) => NewsConfig::load(path).await?,
        None => {
            info!("No config file given; using built-in categories");
            NewsConfig::default()
        }
    };
    if let Some(secs) = args.timeout_secs {
        config.timeout_secs = secs;
    }
    config.validate()?;

    for dir in [&args.json_output_dir, &args.markdown_output_dir] {
        if let Err(e) = ensure_writable_dir(dir).await {
            error!(
                path = %dir,
                error = %e,
                "Output directory is not writable (fix perms or choose a different path)"
            );
            return Err(e);
        }
    }

    // ---- Collect news ----
    let fetcher = HttpFeedFetcher::new(
        StdDuration::from_secs(config.timeout_secs),
        &config.user_agent,
    )?;
    let aggregator = NewsAggregator::from_config(fetcher, &config);
    let news = aggregator.aggregate(&config.categories).await?;

    if news.is_empty() {
        warn!("No articles collected from any source");
    }

    // ---- Summary ----
    let summary = if news.is_empty() {
        Some(NO_NEWS_NOTE.to_string())
    } else if args.no_summary {
        info!("Summary disabled with --no-summary");
        None
    } else {
        match &args.openai_api_key {
            Some(key) if !key.trim().is_empty() => {
                let summarizer_config = SummarizerConfig {
                    base_url: args.openai_base_url.clone(),
                    model: args.model.clone(),
                    ..SummarizerConfig::new(key.trim())
                };
                let client = RetryAsk::new(
                    ChatCompletionClient::new(summarizer_config)?,
                    3,
                    StdDuration::from_secs(1),
                );
                let text = summarizer::format_news_for_summary(&news);
                summarizer::summarize_news(&client, &text).await
            }
            _ => {
                warn!("OPENAI_API_KEY not set; skipping summary");
                None
            }
        }
    };

    // ---- Output ----
    let now = Local::now();
    let briefing = Briefing {
        local_date: now.date_naive().to_string(),
        local_time: now.time().format("%H:%M:%S").to_string(),
        summary,
        news,
    };

    if let Err(e) = json::write_briefing(&briefing, &args.json_output_dir).await {
        error!(error = %e, "Failed to write JSON output");
    }
    if let Err(e) = markdown::write_digest(&briefing, &args.markdown_output_dir).await {
        error!(error = %e, "Failed to write Markdown digest");
    }

    let elapsed = start_time.elapsed();
    info!(
        ?elapsed,
        articles = briefing.news.merged.len(),
        summarized = briefing.summary.is_some(),
        "Execution complete"
    );

    Ok(())
}

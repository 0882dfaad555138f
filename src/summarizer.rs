//! Language model summary of the collected headlines.
//!
//! The merged headline list is rendered to plain text with
//! [`format_news_for_summary`] and sent to an OpenAI-compatible chat
//! completion endpoint.
//!
//! # Architecture
//!
//! - [`AskAsync`]: core trait for "send text, get a response"
//! - [`ChatCompletionClient`]: `/chat/completions` over `reqwest`
//! - [`RetryAsk`]: decorator adding exponential backoff to any [`AskAsync`]
//!
//! A failed summary is never fatal: [`summarize_news`] returns `None` and the
//! briefing is written without one.
//!
//! # Retry Strategy
//!
//! - Exponential backoff from `base_delay`, doubling per attempt
//! - Delay capped at 30 seconds
//! - Random jitter (0-250ms) added to every delay

use crate::models::AggregationResult;
use crate::utils::{truncate_chars, truncate_for_log};
use rand::{Rng, rng};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt;
use std::fmt::Write;
use std::time::{Duration as StdDuration, Instant};
use tokio::time::sleep;
use tracing::{error, info, instrument, warn};

/// Maximum characters of a snippet included in the summary input.
const SNIPPET_CHARS: usize = 200;

const SYSTEM_PROMPT: &str =
    "You are a professional financial and investment analyst who summarizes the news from an investor's point of view.";

/// Trait for async LLM interaction.
///
/// Implementors send text to a model and return its response. Decorators
/// such as [`RetryAsk`] wrap another implementor.
pub trait AskAsync {
    /// The type of response returned by the model.
    type Response;

    /// Send `text` to the model and wait for the response.
    async fn ask(&self, text: &str) -> Result<Self::Response, Box<dyn Error>>;
}

/// Wrapper that adds exponential backoff retry logic to any [`AskAsync`] implementation.
///
/// ```text
/// delay = min(base_delay * 2^(attempt-1), max_delay) + random_jitter(0..250ms)
/// ```
pub struct RetryAsk<T> {
    inner: T,
    /// Retries after the first attempt before giving up.
    max_retries: usize,
    base_delay: StdDuration,
    max_delay: StdDuration,
}

impl<T> RetryAsk<T>
where
    T: AskAsync,
{
    pub fn new(inner: T, max_retries: usize, base_delay: StdDuration) -> Self {
        Self {
            inner,
            max_retries,
            base_delay,
            max_delay: StdDuration::from_secs(30),
        }
    }
}

impl<T> fmt::Debug for RetryAsk<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RetryAsk")
            .field("max_retries", &self.max_retries)
            .field("base_delay", &self.base_delay)
            .field("max_delay", &self.max_delay)
            .finish()
    }
}

impl<T> AskAsync for RetryAsk<T>
where
    T: AskAsync,
{
    type Response = T::Response;

    #[instrument(level = "info", skip_all)]
    async fn ask(&self, text: &str) -> Result<Self::Response, Box<dyn Error>> {
        let total_t0 = Instant::now();
        let mut attempt = 0usize;

        loop {
            let attempt_t0 = Instant::now();
            match self.inner.ask(text).await {
                Ok(resp) => return Ok(resp),
                Err(e) => {
                    attempt += 1;
                    let attempt_dt = attempt_t0.elapsed();
                    let total_dt = total_t0.elapsed();

                    if attempt > self.max_retries {
                        error!(
                            attempt,
                            max = self.max_retries,
                            elapsed_ms_attempt = attempt_dt.as_millis() as u64,
                            elapsed_ms_total = total_dt.as_millis() as u64,
                            error = %e,
                            "ask() exhausted retries"
                        );
                        return Err(e);
                    }

                    let delay = self
                        .base_delay
                        .saturating_mul(1 << (attempt - 1).min(16))
                        .min(self.max_delay);
                    let jitter_ms: u64 = rng().random_range(0..=250);
                    let delay = delay + StdDuration::from_millis(jitter_ms);

                    warn!(
                        attempt,
                        max = self.max_retries,
                        elapsed_ms_attempt = attempt_dt.as_millis() as u64,
                        ?delay,
                        error = %e,
                        "ask() attempt failed; backing off"
                    );
                    sleep(delay).await;
                }
            }
        }
    }
}

/// Connection settings for an OpenAI-compatible endpoint.
#[derive(Clone)]
pub struct SummarizerConfig {
    pub api_key: String,
    /// Base URL without the trailing `/chat/completions`.
    pub base_url: String,
    pub model: String,
    pub temperature: f32,
    pub max_tokens: u32,
    pub timeout: StdDuration,
}

impl SummarizerConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: "https://api.openai.com/v1".to_string(),
            model: "gpt-4o-mini".to_string(),
            temperature: 0.7,
            max_tokens: 2500,
            timeout: StdDuration::from_secs(120),
        }
    }
}

impl fmt::Debug for SummarizerConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SummarizerConfig")
            .field("api_key", &"<redacted>")
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .field("temperature", &self.temperature)
            .field("max_tokens", &self.max_tokens)
            .field("timeout", &self.timeout)
            .finish()
    }
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatResponseMessage,
}

#[derive(Deserialize)]
struct ChatResponseMessage {
    content: Option<String>,
}

/// Client for `POST {base_url}/chat/completions`.
#[derive(Debug)]
pub struct ChatCompletionClient {
    client: reqwest::Client,
    config: SummarizerConfig,
}

impl ChatCompletionClient {
    pub fn new(config: SummarizerConfig) -> Result<Self, Box<dyn Error>> {
        let client = reqwest::Client::builder().timeout(config.timeout).build()?;
        Ok(Self { client, config })
    }
}

impl AskAsync for ChatCompletionClient {
    type Response = String;

    #[instrument(level = "info", skip_all, fields(model = %self.config.model))]
    async fn ask(&self, text: &str) -> Result<Self::Response, Box<dyn Error>> {
        let t0 = Instant::now();
        let url = format!("{}/chat/completions", self.config.base_url.trim_end_matches('/'));
        let body = ChatRequest {
            model: &self.config.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: SYSTEM_PROMPT,
                },
                ChatMessage {
                    role: "user",
                    content: text,
                },
            ],
            temperature: self.config.temperature,
            max_tokens: self.config.max_tokens,
        };

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.config.api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            warn!(
                %status,
                elapsed_ms = t0.elapsed().as_millis() as u64,
                body = %truncate_for_log(&detail, 300),
                "Chat completion request failed"
            );
            return Err(format!("chat completion returned HTTP {status}").into());
        }

        let parsed: ChatResponse = response.json().await?;
        parsed
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or_else(|| "chat completion response had no content".into())
    }
}

/// Render the merged headlines as plain text for the summary prompt.
///
/// Records are grouped by category in configured order; categories with no
/// surviving records are left out.
pub fn format_news_for_summary(result: &AggregationResult) -> String {
    let mut text = String::from("Below are today's top news headlines:\n\n");

    for category in &result.by_category {
        let articles: Vec<_> = result.merged_in(&category.key).collect();
        if articles.is_empty() {
            continue;
        }

        writeln!(text, "[{}]", category.name).unwrap();
        for (idx, article) in articles.iter().enumerate() {
            writeln!(text, "{}. {}", idx + 1, article.title).unwrap();
            writeln!(text, "   Source: {}", article.source).unwrap();
            writeln!(text, "   Link: {}", article.link).unwrap();
            if let Some(snippet) = &article.snippet {
                writeln!(text, "   Content: {}...", truncate_chars(snippet, SNIPPET_CHARS)).unwrap();
            }
            text.push('\n');
        }
        text.push('\n');
    }

    text
}

/// Build the user prompt around the formatted headlines.
pub fn build_news_prompt(news_text: &str) -> String {
    format!(
        "Analyze the news headlines below and summarize them from an investor's point of view.\n\n\
{news_text}\n\
Follow this structure exactly:\n\n\
A) Macro Dashboard (3-5 lines)\n\
Risk-on/off mood; rates, dollar, oil and key indicators; policy events.\n\n\
B) Top Drivers (5 items)\n\
For each: the headline, a two-sentence core summary, the market impact \
(equities/bonds/FX/commodities as relevant), and the article link.\n\n\
C) One line per category\n\
One line with the key point for each category above.\n\n\
D) Today's checkpoints (3 items)\n\
For each event to monitor: scenario A and scenario B, briefly.\n\n\
Rules:\n\
- Write in the language of the headlines\n\
- Group duplicate issues together\n\
- Keep it practical for an investor\n\
- Follow the structure exactly"
    )
}

/// Ask the model for a news summary.
///
/// Returns `None` (after logging) if the call fails or the model returns only
/// whitespace.
#[instrument(level = "info", skip_all, fields(input_chars = news_text.chars().count()))]
pub async fn summarize_news<A>(asker: &A, news_text: &str) -> Option<String>
where
    A: AskAsync<Response = String>,
{
    let t0 = Instant::now();
    let prompt = build_news_prompt(news_text);

    match asker.ask(&prompt).await {
        Ok(summary) => {
            let summary = summary.trim().to_string();
            if summary.is_empty() {
                warn!("Model returned an empty summary");
                return None;
            }
            info!(
                output_chars = summary.chars().count(),
                elapsed_ms = t0.elapsed().as_millis() as u64,
                "News summary generated"
            );
            Some(summary)
        }
        Err(e) => {
            error!(error = %e, elapsed_ms = t0.elapsed().as_millis() as u64, "News summary failed");
            None
        }
    }
}

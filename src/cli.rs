//! Command-line interface definitions for Morning News.
//!
//! All options can be given as flags; API settings also fall back to
//! environment variables.

use clap::Parser;

/// Command-line arguments for the Morning News collector.
///
/// # Examples
///
/// ```sh
/// # Stock categories, summary via OPENAI_API_KEY from the environment
/// morning_news -j ./json -m ./markdown
///
/// # Custom categories, no summary
/// morning_news -j ./json -m ./markdown -c news.yaml --no-summary
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Output directory for the JSON file
    #[arg(short, long)]
    pub json_output_dir: String,

    /// Output directory for the Markdown digest
    #[arg(short, long)]
    pub markdown_output_dir: String,

    /// Optional path to a YAML news configuration file
    #[arg(short, long)]
    pub config: Option<String>,

    /// Override the per-feed fetch timeout, in seconds
    #[arg(long)]
    pub timeout_secs: Option<u64>,

    /// Skip the language model summary
    #[arg(long)]
    pub no_summary: bool,

    /// API key for the OpenAI-compatible summary endpoint
    #[arg(long, env = "OPENAI_API_KEY", hide_env_values = true)]
    pub openai_api_key: Option<String>,

    /// Base URL of the OpenAI-compatible API
    #[arg(long, env = "OPENAI_BASE_URL", default_value = "https://api.openai.com/v1")]
    pub openai_base_url: String,

    /// Chat model used for the summary
    #[arg(long, env = "OPENAI_MODEL", default_value = "gpt-4o-mini")]
    pub model: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parsing() {
        let cli = Cli::parse_from([
            "morning_news",
            "--json-output-dir",
            "./json",
            "--markdown-output-dir",
            "./markdown",
            "--timeout-secs",
            "4",
            "--no-summary",
        ]);

        assert_eq!(cli.json_output_dir, "./json");
        assert_eq!(cli.markdown_output_dir, "./markdown");
        assert_eq!(cli.timeout_secs, Some(4));
        assert!(cli.no_summary);
        assert!(cli.config.is_none());
    }

    #[test]
    fn test_cli_short_flags() {
        let cli = Cli::parse_from([
            "morning_news",
            "-j",
            "/tmp/json",
            "-m",
            "/tmp/markdown",
            "-c",
            "news.yaml",
            "--model",
            "gpt-4.1-mini",
        ]);

        assert_eq!(cli.json_output_dir, "/tmp/json");
        assert_eq!(cli.markdown_output_dir, "/tmp/markdown");
        assert_eq!(cli.config.as_deref(), Some("news.yaml"));
        assert_eq!(cli.model, "gpt-4.1-mini");
        assert!(!cli.no_summary);
    }
}

//! JSON output of the collected news.
//!
//! One file per day, overwritten if the tool runs again on the same date:
//! `{json_output_dir}/{local_date}/news.json`.

use crate::models::Briefing;
use std::error::Error;
use tokio::fs;
use tracing::{error, info, instrument};

/// Write a [`Briefing`] as pretty-printed JSON.
///
/// Creates the dated directory if needed.
///
/// # Returns
///
/// The path of the written file.
#[instrument(level = "info", skip_all, fields(json_output_dir = %json_output_dir))]
pub async fn write_briefing(
    briefing: &Briefing,
    json_output_dir: &str,
) -> Result<String, Box<dyn Error>> {
    let json = serde_json::to_string_pretty(briefing)?;

    let full_json_dir = format!(
        "{}/{}",
        json_output_dir.trim_end_matches('/'),
        briefing.local_date
    );
    if let Err(e) = fs::create_dir_all(&full_json_dir).await {
        error!(%full_json_dir, error = %e, "Failed to create JSON dir");
        return Err(e.into());
    }

    let output_json_filename = format!("{}/news.json", full_json_dir);
    fs::write(&output_json_filename, json).await?;
    info!(
        path = %output_json_filename,
        articles = briefing.news.merged.len(),
        "Wrote news JSON"
    );

    Ok(output_json_filename)
}

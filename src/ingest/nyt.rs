/// Per-state daily case feed client
///
/// Retrieves the cumulative per-state case counts published by the New York
/// Times. The feed is a single CSV with one row per state per day:
///
/// ```text
/// date,state,fips,cases,deaths
/// 2020-01-21,Washington,53,1,0
/// ```
///
/// Repository: https://github.com/nytimes/covid-19-data

use std::time::Duration;

use chrono::NaiveDate;
use serde::Deserialize;

use crate::logging::{self, DataSource};
use crate::model::PipelineError;

// ============================================================================
// Feed Row
// ============================================================================

/// One raw row of the case feed, with `cases` renamed to `positive_tests`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CaseFeedRow {
    pub date: NaiveDate,
    pub state: String,
    #[serde(default)]
    pub fips: String,
    #[serde(rename = "cases")]
    pub positive_tests: i64,
    #[serde(default)]
    pub deaths: i64,
}

// ============================================================================
// Client Functions
// ============================================================================

/// Build the blocking HTTP client used for the feed.
pub fn build_client(timeout_secs: u64) -> Result<reqwest::blocking::Client, PipelineError> {
    Ok(reqwest::blocking::Client::builder()
        .timeout(Duration::from_secs(timeout_secs))
        .build()?)
}

/// Download the feed body.
pub fn fetch_feed_text(
    client: &reqwest::blocking::Client,
    url: &str,
) -> Result<String, PipelineError> {
    let response = client.get(url).header("Accept", "text/csv").send()?;

    if !response.status().is_success() {
        return Err(PipelineError::HttpError(response.status().as_u16()));
    }

    Ok(response.text()?)
}

/// Parse feed CSV text.
///
/// A row with an unparseable date or count fails the whole parse.
pub fn parse_case_feed(text: &str) -> Result<Vec<CaseFeedRow>, PipelineError> {
    let mut reader = csv::Reader::from_reader(text.as_bytes());
    let mut rows = Vec::new();
    for row in reader.deserialize::<CaseFeedRow>() {
        let mut row = row?;
        row.state = row.state.trim().to_string();
        rows.push(row);
    }
    Ok(rows)
}

/// Load the feed from an HTTP(S) URL or, for offline runs, a local path.
pub fn load_case_feed(source: &str, timeout_secs: u64) -> Result<Vec<CaseFeedRow>, PipelineError> {
    let text = if source.starts_with("http://") || source.starts_with("https://") {
        let client = build_client(timeout_secs)?;
        fetch_feed_text(&client, source).inspect_err(|e| {
            logging::log_source_failure(DataSource::CaseFeed, source, "fetch", e);
        })?
    } else {
        std::fs::read_to_string(source).map_err(|e| PipelineError::from_read(source, e))?
    };

    let rows = parse_case_feed(&text)?;
    logging::info(
        DataSource::CaseFeed,
        None,
        &format!("{} rows read from {}", rows.len(), source),
    );
    Ok(rows)
}

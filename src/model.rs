/// Core data types for the state case-curve service.
///
/// This module defines the shared domain model imported by all other modules.
/// It contains no logic beyond small accessors, no I/O, and no external
/// dependencies besides `chrono` and `serde` for dates and serialization.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Normalization
// ---------------------------------------------------------------------------

/// Denominator unit for per-capita metrics.
pub const PER_CAPITA_UNIT: f64 = 100_000.0;

/// Bed count used upstream to mean "unknown".
pub const BEDS_SENTINEL: i64 = -999;

/// County identifier used upstream to mean "unknown".
pub const FIPS_NOT_AVAILABLE: &str = "NOT AVAILABLE";

/// Computes `count / (population / 100_000)`.
///
/// Returns `None` when either side is missing or the population is zero, so
/// a missing join never turns into a division fault or an infinity.
pub fn per_100k(count: Option<i64>, population: Option<i64>) -> Option<f64> {
    match (count, population) {
        (Some(count), Some(pop)) if pop != 0 => {
            Some(count as f64 / (pop as f64 / PER_CAPITA_UNIT))
        }
        _ => None,
    }
}

// ---------------------------------------------------------------------------
// Reference tables
// ---------------------------------------------------------------------------

/// Total population for one state or territory.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PopulationRecord {
    pub state: String,
    pub population: i64,
}

/// Total licensed hospital beds for one state, keyed by full state name.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HospitalBedRecord {
    pub state: String,
    pub beds: i64,
}

// ---------------------------------------------------------------------------
// Fact table
// ---------------------------------------------------------------------------

/// One state on one day, joined with reference data.
///
/// `population` and `beds` are `None` when the state had no match in the
/// corresponding reference table; the derived rates follow.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StateDayRecord {
    pub state: String,
    pub date: NaiveDate,
    pub fips: String,
    pub positive_tests: i64,
    pub deaths: i64,
    pub population: Option<i64>,
    pub beds: Option<i64>,
    pub positive_tests_per_100k: Option<f64>,
    pub beds_per_100k: Option<f64>,
}

/// Row of the most-recent-day display table (date and fips dropped).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LatestRow {
    pub state: String,
    pub positive_tests: i64,
    pub deaths: i64,
    pub population: Option<i64>,
    pub beds: Option<i64>,
    pub positive_tests_per_100k: Option<f64>,
    pub beds_per_100k: Option<f64>,
}

impl From<&StateDayRecord> for LatestRow {
    fn from(r: &StateDayRecord) -> Self {
        LatestRow {
            state: r.state.clone(),
            positive_tests: r.positive_tests,
            deaths: r.deaths,
            population: r.population,
            beds: r.beds,
            positive_tests_per_100k: r.positive_tests_per_100k,
            beds_per_100k: r.beds_per_100k,
        }
    }
}

// ---------------------------------------------------------------------------
// Chart selection
// ---------------------------------------------------------------------------

/// Metric plotted on the y axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChartType {
    #[default]
    Cumulative,
    #[serde(alias = "per_100k")]
    Per100k,
    DailyIncrease,
}

impl ChartType {
    pub fn page_title(&self) -> &'static str {
        match self {
            ChartType::Cumulative => "COVID-19 Positive Tests per State",
            ChartType::Per100k => "COVID-19 Positive Tests per 100,000",
            ChartType::DailyIncrease => "COVID-19 Daily Increase in Positive Tests",
        }
    }
}

/// How the renderer should draw the visible series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DisplayPolicy {
    /// One line per state.
    MultiLine,
    /// A single category; used when at most one state is visible.
    Bar,
}

impl DisplayPolicy {
    pub fn for_visible_count(visible: usize) -> Self {
        if visible <= 1 {
            DisplayPolicy::Bar
        } else {
            DisplayPolicy::MultiLine
        }
    }
}

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Errors that abort a pipeline run.
#[derive(Debug, PartialEq)]
pub enum PipelineError {
    /// A file could not be read or a request could not be sent.
    SourceUnavailable { source: String, detail: String },
    /// Non-2xx HTTP response from the case feed.
    HttpError(u16),
    /// A row or field could not be parsed.
    ParseError(String),
    /// The configuration file is invalid.
    ConfigError(String),
    /// A table that must have rows was empty.
    EmptyData(String),
    /// A caller-supplied view parameter is out of range.
    InvalidParameter(String),
}

impl std::fmt::Display for PipelineError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PipelineError::SourceUnavailable { source, detail } => {
                write!(f, "Source unavailable: {}: {}", source, detail)
            }
            PipelineError::HttpError(code) => write!(f, "HTTP error: {}", code),
            PipelineError::ParseError(msg) => write!(f, "Parse error: {}", msg),
            PipelineError::ConfigError(msg) => write!(f, "Config error: {}", msg),
            PipelineError::EmptyData(what) => write!(f, "No data: {}", what),
            PipelineError::InvalidParameter(msg) => write!(f, "Invalid parameter: {}", msg),
        }
    }
}

impl std::error::Error for PipelineError {}

impl PipelineError {
    /// Classify a failed read of `source`. Bytes that are not valid text are
    /// malformed input; anything else means the source could not be read.
    pub fn from_read(source: &str, e: std::io::Error) -> Self {
        if e.kind() == std::io::ErrorKind::InvalidData {
            PipelineError::ParseError(format!("{}: {}", source, e))
        } else {
            PipelineError::SourceUnavailable {
                source: source.to_string(),
                detail: e.to_string(),
            }
        }
    }
}

impl From<std::io::Error> for PipelineError {
    fn from(e: std::io::Error) -> Self {
        PipelineError::SourceUnavailable {
            source: "io".to_string(),
            detail: e.to_string(),
        }
    }
}

impl From<reqwest::Error> for PipelineError {
    fn from(e: reqwest::Error) -> Self {
        match e.status() {
            Some(status) => PipelineError::HttpError(status.as_u16()),
            None => PipelineError::SourceUnavailable {
                source: e.url().map(|u| u.to_string()).unwrap_or_else(|| "http".to_string()),
                detail: e.to_string(),
            },
        }
    }
}

impl From<csv::Error> for PipelineError {
    fn from(e: csv::Error) -> Self {
        PipelineError::ParseError(e.to_string())
    }
}

impl From<chrono::ParseError> for PipelineError {
    fn from(e: chrono::ParseError) -> Self {
        PipelineError::ParseError(format!("date: {}", e))
    }
}

impl From<toml::de::Error> for PipelineError {
    fn from(e: toml::de::Error) -> Self {
        PipelineError::ConfigError(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_per_100k_matches_formula() {
        let rate = per_100k(Some(100), Some(39_500_000)).unwrap();
        assert!((rate - 0.253).abs() < 0.001, "got {}", rate);
    }

    #[test]
    fn test_per_100k_is_none_without_population() {
        assert_eq!(per_100k(Some(100), None), None);
        assert_eq!(per_100k(Some(100), Some(0)), None);
        assert_eq!(per_100k(None, Some(1_000)), None);
    }

    #[test]
    fn test_display_policy_switches_to_bar_for_single_state() {
        assert_eq!(DisplayPolicy::for_visible_count(0), DisplayPolicy::Bar);
        assert_eq!(DisplayPolicy::for_visible_count(1), DisplayPolicy::Bar);
        assert_eq!(DisplayPolicy::for_visible_count(2), DisplayPolicy::MultiLine);
    }

    #[test]
    fn test_invalid_data_read_is_a_parse_error() {
        let bad = std::io::Error::new(std::io::ErrorKind::InvalidData, "stream did not contain valid UTF-8");
        assert!(matches!(PipelineError::from_read("feed.csv", bad), PipelineError::ParseError(_)));
        let missing = std::io::Error::new(std::io::ErrorKind::NotFound, "no such file");
        assert!(matches!(
            PipelineError::from_read("feed.csv", missing),
            PipelineError::SourceUnavailable { .. }
        ));
    }

    #[test]
    fn test_error_display_is_prefixed_for_classification() {
        assert_eq!(PipelineError::HttpError(503).to_string(), "HTTP error: 503");
        assert!(PipelineError::ParseError("bad".into()).to_string().starts_with("Parse error"));
    }
}

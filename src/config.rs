//! Service configuration.
//!
//! Settings live in a TOML file (`curve.toml` by default). Every section and
//! field is optional; anything missing falls back to the built-in defaults,
//! so a run with no file at all reads the standard inputs from the working
//! directory and the public case feed.
//!
//! The path can be overridden with `CURVE_CONFIG`, which is also picked up
//! from a `.env` file.

use std::env;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use serde::Deserialize;

use crate::logging::LogLevel;
use crate::model::{ChartType, PipelineError};

/// Environment variable naming the configuration file.
pub const CONFIG_ENV_VAR: &str = "CURVE_CONFIG";

/// Configuration file used when `CURVE_CONFIG` is unset.
pub const DEFAULT_CONFIG_PATH: &str = "./curve.toml";

/// Per-state daily case feed published by the New York Times.
pub const DEFAULT_CASE_FEED_URL: &str =
    "https://raw.githubusercontent.com/nytimes/covid-19-data/master/us-states.csv";

// ---------------------------------------------------------------------------
// Sections
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CurveConfig {
    pub sources: SourcesConfig,
    pub pipeline: PipelineConfig,
    /// Rows appended to the population table for names it does not contain.
    pub supplemental_population: Vec<SupplementalPopulation>,
    pub logging: LoggingConfig,
    pub view: ViewConfig,
}

impl Default for CurveConfig {
    fn default() -> Self {
        CurveConfig {
            sources: SourcesConfig::default(),
            pipeline: PipelineConfig::default(),
            supplemental_population: default_supplemental_population(),
            logging: LoggingConfig::default(),
            view: ViewConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SourcesConfig {
    /// Regional population table (latin-1).
    pub population_csv: PathBuf,
    /// Hospital facility table.
    pub hospitals_csv: PathBuf,
    /// HTTP(S) URL or local path of the per-state case feed.
    pub case_feed_url: String,
    pub http_timeout_secs: u64,
}

impl Default for SourcesConfig {
    fn default() -> Self {
        SourcesConfig {
            population_csv: PathBuf::from("PEP_2018_PEPANNRES_with_ann.csv"),
            hospitals_csv: PathBuf::from("us-hospitals.csv"),
            case_feed_url: DEFAULT_CASE_FEED_URL.to_string(),
            http_timeout_secs: 30,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Rows on or before this date are dropped.
    pub cutoff_date: NaiveDate,
    pub default_group_size: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        PipelineConfig {
            cutoff_date: default_cutoff_date(),
            default_group_size: 10,
        }
    }
}

/// Early-March start of sustained reporting in the case feed.
pub fn default_cutoff_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2020, 3, 4).unwrap_or(NaiveDate::MIN)
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SupplementalPopulation {
    pub name: String,
    pub population: i64,
}

/// Territories the 2018 county estimates leave out.
pub fn default_supplemental_population() -> Vec<SupplementalPopulation> {
    [
        ("Puerto Rico", 3_195_153),
        ("Guam", 165_718),
        ("Virgin Islands", 104_914),
        ("Northern Mariana Islands", 56_882),
    ]
    .into_iter()
    .map(|(name, population)| SupplementalPopulation {
        name: name.to_string(),
        population,
    })
    .collect()
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: LogLevel,
    pub file: Option<String>,
    pub timestamps: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        LoggingConfig {
            level: LogLevel::Info,
            file: None,
            timestamps: false,
        }
    }
}

/// View parameters for headless runs. A UI layer supplies its own instead.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct ViewConfig {
    /// Falls back to `pipeline.default_group_size` when unset.
    pub group_size: Option<usize>,
    pub page_index: usize,
    pub chart_type: ChartType,
    pub hidden_states: Vec<String>,
}

// ---------------------------------------------------------------------------
// Loading
// ---------------------------------------------------------------------------

/// Resolve the configuration path from the environment (and `.env`).
pub fn config_path() -> PathBuf {
    dotenv::dotenv().ok();
    env::var(CONFIG_ENV_VAR)
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from(DEFAULT_CONFIG_PATH))
}

/// Parse configuration text.
pub fn parse_config(text: &str) -> Result<CurveConfig, PipelineError> {
    let config: CurveConfig = toml::from_str(text)?;
    if config.pipeline.default_group_size == 0 {
        return Err(PipelineError::ConfigError(
            "pipeline.default_group_size must be at least 1".to_string(),
        ));
    }
    Ok(config)
}

/// Load configuration from `path`. A missing file yields the defaults.
pub fn load_config(path: &Path) -> Result<CurveConfig, PipelineError> {
    if !path.exists() {
        return Ok(CurveConfig::default());
    }
    let text = std::fs::read_to_string(path)
        .map_err(|e| PipelineError::from_read(&path.display().to_string(), e))?;
    parse_config(&text)
}

//! Reference-data load and time-series join.
//!
//! `load_reference_data` reads the population and hospital tables,
//! `build_timeseries` joins them onto the case feed and derives the
//! per-100k rates. Both are plain functions of their inputs; the caller
//! owns every table and nothing is kept between runs.

use std::collections::{HashMap, HashSet};

use chrono::NaiveDate;

use crate::analysis::daily_increase::DailyIncreaseMatrix;
use crate::config::CurveConfig;
use crate::ingest::nyt::CaseFeedRow;
use crate::ingest::{hospitals, nyt, population};
use crate::logging::{self, DataSource};
use crate::model::{
    HospitalBedRecord, PipelineError, PopulationRecord, StateDayRecord, per_100k,
};
use crate::verify::{CoverageSummary, coverage_report};
use crate::view::{DashboardView, ViewParams, recompute};

/// The two reference tables joined onto the case feed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReferenceData {
    pub population: Vec<PopulationRecord>,
    pub beds: Vec<HospitalBedRecord>,
}

/// Read the population and hospital tables named in `config`.
pub fn load_reference_data(config: &CurveConfig) -> Result<ReferenceData, PipelineError> {
    let population = population::load_population(
        &config.sources.population_csv,
        &config.supplemental_population,
    )?;
    let beds = hospitals::load_beds_per_state(&config.sources.hospitals_csv)?;
    Ok(ReferenceData { population, beds })
}

/// Join case rows with the reference tables.
///
/// Rows dated on or before `cutoff` are dropped. States with no population
/// or bed match keep `None` there and in the derived rate. Feed order is
/// preserved. A repeated (state, date) pair is a parse error.
pub fn build_timeseries(
    cases: Vec<CaseFeedRow>,
    reference: &ReferenceData,
    cutoff: NaiveDate,
) -> Result<Vec<StateDayRecord>, PipelineError> {
    let population: HashMap<&str, i64> = reference
        .population
        .iter()
        .map(|r| (r.state.as_str(), r.population))
        .collect();
    let beds: HashMap<&str, i64> = reference
        .beds
        .iter()
        .map(|r| (r.state.as_str(), r.beds))
        .collect();

    let mut seen: HashSet<(String, NaiveDate)> = HashSet::new();
    let mut records = Vec::new();

    for row in cases.into_iter().filter(|r| r.date > cutoff) {
        if !seen.insert((row.state.clone(), row.date)) {
            return Err(PipelineError::ParseError(format!(
                "duplicate row for {} on {}",
                row.state, row.date
            )));
        }

        let pop = population.get(row.state.as_str()).copied();
        let bed_count = beds.get(row.state.as_str()).copied();

        records.push(StateDayRecord {
            positive_tests_per_100k: per_100k(Some(row.positive_tests), pop),
            beds_per_100k: per_100k(bed_count, pop),
            state: row.state,
            date: row.date,
            fips: row.fips,
            positive_tests: row.positive_tests,
            deaths: row.deaths,
            population: pop,
            beds: bed_count,
        });
    }

    if records.is_empty() {
        return Err(PipelineError::EmptyData(format!(
            "no case rows after {}",
            cutoff
        )));
    }

    Ok(records)
}

/// Most recent date present in the table.
pub fn latest_date(records: &[StateDayRecord]) -> Option<NaiveDate> {
    records.iter().map(|r| r.date).max()
}

/// Rows for `date`, highest `positive_tests` first (state name breaks ties).
pub fn rows_on(records: &[StateDayRecord], date: NaiveDate) -> Vec<&StateDayRecord> {
    let mut rows: Vec<&StateDayRecord> = records.iter().filter(|r| r.date == date).collect();
    rows.sort_by(|a, b| {
        b.positive_tests
            .cmp(&a.positive_tests)
            .then_with(|| a.state.cmp(&b.state))
    });
    rows
}

/// Everything one render needs: the joined table and the full-range pivot.
#[derive(Debug, Clone)]
pub struct PipelineOutput {
    pub records: Vec<StateDayRecord>,
    pub daily_increase: DailyIncreaseMatrix,
    /// How many feed states joined to the reference tables.
    pub coverage: CoverageSummary,
}

/// Load every source and build the joined table.
pub fn run_pipeline(config: &CurveConfig) -> Result<PipelineOutput, PipelineError> {
    let reference = load_reference_data(config)?;
    let cases = nyt::load_case_feed(
        &config.sources.case_feed_url,
        config.sources.http_timeout_secs,
    )?;
    let records = build_timeseries(cases, &reference, config.pipeline.cutoff_date)?;
    let daily_increase = DailyIncreaseMatrix::from_records(&records);

    logging::info(
        DataSource::Pipeline,
        None,
        &format!(
            "{} state-day rows, {} states, {} dates",
            records.len(),
            daily_increase.states().len(),
            daily_increase.dates().len()
        ),
    );
    let coverage = coverage_report(&records, &reference).summary;
    logging::debug(
        DataSource::Pipeline,
        None,
        &format!(
            "join coverage: {}/{} complete, {} partial, {} unmatched",
            coverage.complete, coverage.total, coverage.partial, coverage.unmatched
        ),
    );

    Ok(PipelineOutput {
        records,
        daily_increase,
        coverage,
    })
}

/// Full re-run from raw sources for one set of view parameters.
pub fn render(config: &CurveConfig, params: &ViewParams) -> Result<DashboardView, PipelineError> {
    let output = run_pipeline(config)?;
    recompute(&output.records, &output.daily_increase, params)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn row(d: &str, state: &str, cases: i64) -> CaseFeedRow {
        CaseFeedRow {
            date: date(d),
            state: state.to_string(),
            fips: String::new(),
            positive_tests: cases,
            deaths: 0,
        }
    }

    fn reference() -> ReferenceData {
        ReferenceData {
            population: vec![
                PopulationRecord { state: "California".into(), population: 39_500_000 },
                PopulationRecord { state: "Nowhere".into(), population: 0 },
            ],
            beds: vec![HospitalBedRecord { state: "California".into(), beds: 79_000 }],
        }
    }

    #[test]
    fn test_rows_on_or_before_cutoff_are_dropped() {
        let cases = vec![
            row("2020-03-04", "California", 53),
            row("2020-03-05", "California", 60),
        ];
        let records = build_timeseries(cases, &reference(), date("2020-03-04")).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].date, date("2020-03-05"));
    }

    #[test]
    fn test_join_computes_per_100k_rates() {
        let cases = vec![row("2020-03-10", "California", 100)];
        let records = build_timeseries(cases, &reference(), date("2020-03-04")).unwrap();
        let ca = &records[0];
        assert_eq!(ca.population, Some(39_500_000));
        assert_eq!(ca.beds, Some(79_000));
        assert!((ca.positive_tests_per_100k.unwrap() - 0.253).abs() < 0.001);
        assert!((ca.beds_per_100k.unwrap() - 200.0).abs() < 1e-9);
    }

    #[test]
    fn test_unmatched_and_zero_population_give_null_rates() {
        let cases = vec![
            row("2020-03-10", "Guam", 5),
            row("2020-03-10", "Nowhere", 5),
        ];
        let records = build_timeseries(cases, &reference(), date("2020-03-04")).unwrap();
        assert_eq!(records[0].population, None);
        assert_eq!(records[0].beds, None);
        assert_eq!(records[0].positive_tests_per_100k, None);
        assert_eq!(records[1].population, Some(0));
        assert_eq!(records[1].positive_tests_per_100k, None);
        assert_eq!(records[1].beds_per_100k, None);
    }

    #[test]
    fn test_duplicate_state_day_is_rejected() {
        let cases = vec![
            row("2020-03-10", "California", 5),
            row("2020-03-10", "California", 6),
        ];
        let err = build_timeseries(cases, &reference(), date("2020-03-04")).unwrap_err();
        assert!(matches!(err, PipelineError::ParseError(_)));
    }

    #[test]
    fn test_nothing_after_cutoff_is_empty_data() {
        let cases = vec![row("2020-03-01", "California", 5)];
        let err = build_timeseries(cases, &reference(), date("2020-03-04")).unwrap_err();
        assert!(matches!(err, PipelineError::EmptyData(_)));
    }

    #[test]
    fn test_rows_on_latest_date_are_ranked() {
        let cases = vec![
            row("2020-03-10", "Ohio", 5),
            row("2020-03-11", "Ohio", 8),
            row("2020-03-11", "Texas", 20),
            row("2020-03-11", "Iowa", 8),
        ];
        let records = build_timeseries(cases, &reference(), date("2020-03-04")).unwrap();
        let latest = latest_date(&records).unwrap();
        assert_eq!(latest, date("2020-03-11"));
        let names: Vec<_> = rows_on(&records, latest).iter().map(|r| r.state.as_str()).collect();
        assert_eq!(names, vec!["Texas", "Iowa", "Ohio"]);
    }
}

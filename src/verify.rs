//! Join Coverage Verification
//!
//! Reports how well the reference tables cover the states in the case feed:
//! which states joined to both tables, which are missing population (and so
//! have no per-100k rate), which are missing beds, and which reference rows
//! never matched a feed state.
//!
//! Missing joins are not errors in the pipeline; this report is how they get
//! noticed. `pipeline::run_pipeline` logs the summary of every run at debug
//! level and returns it with its output.

use std::collections::BTreeSet;

use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::model::StateDayRecord;
use crate::pipeline::ReferenceData;

// ============================================================================
// Verification Results
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CoverageReport {
    pub timestamp: String,
    pub latest_date: Option<NaiveDate>,
    pub states: Vec<StateCoverage>,
    /// Population rows whose name never appears in the feed.
    pub unused_population: Vec<String>,
    /// Bed rows whose name never appears in the feed.
    pub unused_beds: Vec<String>,
    pub summary: CoverageSummary,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CoverageSummary {
    pub total: usize,
    pub complete: usize,
    pub partial: usize,
    pub unmatched: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StateCoverage {
    pub state: String,
    pub status: CoverageStatus,
    pub has_population: bool,
    pub has_beds: bool,
    pub days: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum CoverageStatus {
    /// Joined to both reference tables.
    Complete,
    /// Joined to exactly one.
    Partial,
    /// Joined to neither.
    Unmatched,
}

// ============================================================================
// Coverage
// ============================================================================

pub fn coverage_report(records: &[StateDayRecord], reference: &ReferenceData) -> CoverageReport {
    let feed_states: BTreeSet<&str> = records.iter().map(|r| r.state.as_str()).collect();

    let mut summary = CoverageSummary {
        total: feed_states.len(),
        complete: 0,
        partial: 0,
        unmatched: 0,
    };

    let states: Vec<StateCoverage> = feed_states
        .iter()
        .map(|state| {
            let rows: Vec<&StateDayRecord> =
                records.iter().filter(|r| r.state == *state).collect();
            let has_population = rows.iter().any(|r| r.population.is_some());
            let has_beds = rows.iter().any(|r| r.beds.is_some());
            let status = match (has_population, has_beds) {
                (true, true) => {
                    summary.complete += 1;
                    CoverageStatus::Complete
                }
                (false, false) => {
                    summary.unmatched += 1;
                    CoverageStatus::Unmatched
                }
                _ => {
                    summary.partial += 1;
                    CoverageStatus::Partial
                }
            };
            StateCoverage {
                state: state.to_string(),
                status,
                has_population,
                has_beds,
                days: rows.len(),
            }
        })
        .collect();

    let unused_population = reference
        .population
        .iter()
        .filter(|r| !feed_states.contains(r.state.as_str()))
        .map(|r| r.state.clone())
        .collect();
    let unused_beds = reference
        .beds
        .iter()
        .filter(|r| !feed_states.contains(r.state.as_str()))
        .map(|r| r.state.clone())
        .collect();

    CoverageReport {
        timestamp: Utc::now().to_rfc3339(),
        latest_date: records.iter().map(|r| r.date).max(),
        states,
        unused_population,
        unused_beds,
        summary,
    }
}

pub fn print_summary(report: &CoverageReport) {
    println!("\n═══════════════════════════════════════════════════════════");
    println!("📊 JOIN COVERAGE SUMMARY");
    println!("═══════════════════════════════════════════════════════════");
    println!();
    println!("States in feed:     {}", report.summary.total);
    println!("Fully joined:       {}", report.summary.complete);
    println!("Partially joined:   {}", report.summary.partial);
    println!("Unmatched:          {}", report.summary.unmatched);
    if !report.unused_population.is_empty() {
        println!("Unused population rows: {}", report.unused_population.join(", "));
    }
    if !report.unused_beds.is_empty() {
        println!("Unused bed rows:        {}", report.unused_beds.join(", "));
    }
    println!("═══════════════════════════════════════════════════════════");
}

pub fn generate_markdown_report(report: &CoverageReport) -> String {
    let mut md = String::new();
    md.push_str("# Join Coverage Report\n\n");
    md.push_str(&format!("**Generated:** {}\n\n", report.timestamp));
    if let Some(date) = report.latest_date {
        md.push_str(&format!("**Latest feed date:** {}\n\n", date));
    }

    md.push_str("## Summary\n\n");
    md.push_str(&format!(
        "- **Complete:** {}/{}\n- **Partial:** {}\n- **Unmatched:** {}\n\n",
        report.summary.complete, report.summary.total, report.summary.partial, report.summary.unmatched
    ));

    md.push_str("## States\n\n");
    md.push_str("| State | Status | Population | Beds | Days |\n");
    md.push_str("|-------|--------|------------|------|------|\n");
    for s in &report.states {
        let status_icon = match s.status {
            CoverageStatus::Complete => "✅",
            CoverageStatus::Partial => "⚠️",
            CoverageStatus::Unmatched => "❌",
        };
        md.push_str(&format!(
            "| {} | {} | {} | {} | {} |\n",
            s.state,
            status_icon,
            if s.has_population { "yes" } else { "no" },
            if s.has_beds { "yes" } else { "no" },
            s.days
        ));
    }
    md
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{HospitalBedRecord, PopulationRecord};

    fn rec(state: &str, population: Option<i64>, beds: Option<i64>) -> StateDayRecord {
        StateDayRecord {
            state: state.to_string(),
            date: NaiveDate::from_ymd_opt(2020, 3, 10).unwrap(),
            fips: String::new(),
            positive_tests: 1,
            deaths: 0,
            population,
            beds,
            positive_tests_per_100k: None,
            beds_per_100k: None,
        }
    }

    #[test]
    fn test_coverage_classifies_each_state() {
        let records = vec![
            rec("Ohio", Some(11_000_000), Some(30_000)),
            rec("Guam", Some(165_000), None),
            rec("Northern Mariana Islands", None, None),
        ];
        let reference = ReferenceData {
            population: vec![
                PopulationRecord { state: "Ohio".into(), population: 11_000_000 },
                PopulationRecord { state: "Guam".into(), population: 165_000 },
                PopulationRecord { state: "Atlantis".into(), population: 1 },
            ],
            beds: vec![HospitalBedRecord { state: "Ohio".into(), beds: 30_000 }],
        };

        let report = coverage_report(&records, &reference);
        assert_eq!(report.summary.total, 3);
        assert_eq!(report.summary.complete, 1);
        assert_eq!(report.summary.partial, 1);
        assert_eq!(report.summary.unmatched, 1);
        assert_eq!(report.unused_population, vec!["Atlantis".to_string()]);
        assert!(report.unused_beds.is_empty());

        let md = generate_markdown_report(&report);
        assert!(md.contains("| Guam | ⚠️ | yes | no | 1 |"));
    }
}

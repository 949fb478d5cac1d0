/// Hospital facility table loader
///
/// Aggregates licensed beds per state from the HIFLD hospital table.
/// Upstream marks unknown values with sentinels: `BEDS == -999` and
/// `COUNTYFIPS == "NOT AVAILABLE"`. Rows carrying either are dropped before
/// aggregation. Postal codes are expanded to full names through
/// `states::UsState`; codes without a name are excluded so that no row with
/// a missing state reaches the join.

use std::collections::HashMap;
use std::path::Path;

use serde::Deserialize;

use crate::logging::{self, DataSource};
use crate::model::{BEDS_SENTINEL, FIPS_NOT_AVAILABLE, HospitalBedRecord, PipelineError};
use crate::states::UsState;

#[derive(Debug, Deserialize)]
struct HospitalRow {
    #[serde(rename = "COUNTYFIPS")]
    county_fips: String,
    #[serde(rename = "STATE")]
    state: String,
    #[serde(rename = "BEDS")]
    beds: i64,
}

/// Outcome of aggregating the hospital table.
#[derive(Debug, Clone, PartialEq)]
pub struct BedsPerState {
    /// One row per mapped state, highest bed count first.
    pub records: Vec<HospitalBedRecord>,
    /// Facility rows dropped for a sentinel value.
    pub sentinel_rows: usize,
    /// Postal codes with beds but no full state name.
    pub unmapped_codes: Vec<String>,
}

/// Parse hospital CSV text and aggregate beds per state.
///
/// A county identifier that is neither the sentinel nor an integer fails the
/// whole load.
pub fn parse_hospitals_csv(text: &str) -> Result<BedsPerState, PipelineError> {
    let mut reader = csv::Reader::from_reader(text.as_bytes());
    let mut totals: HashMap<String, i64> = HashMap::new();
    let mut sentinel_rows = 0;

    for (i, row) in reader.deserialize::<HospitalRow>().enumerate() {
        let row = row?;
        let fips = row.county_fips.trim();
        if row.beds == BEDS_SENTINEL || fips == FIPS_NOT_AVAILABLE {
            sentinel_rows += 1;
            continue;
        }
        fips.parse::<i64>().map_err(|_| {
            PipelineError::ParseError(format!("row {}: COUNTYFIPS '{}' is not an integer", i + 1, fips))
        })?;
        *totals.entry(row.state.trim().to_string()).or_insert(0) += row.beds;
    }

    let mut by_code: Vec<(String, i64)> = totals.into_iter().collect();
    // Descending by beds; code breaks ties so output is stable
    by_code.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));

    let mut records = Vec::with_capacity(by_code.len());
    let mut unmapped_codes = Vec::new();
    for (code, beds) in by_code {
        match UsState::from_code(&code) {
            Some(state) => records.push(HospitalBedRecord {
                state: state.name().to_string(),
                beds,
            }),
            None => unmapped_codes.push(code),
        }
    }

    Ok(BedsPerState {
        records,
        sentinel_rows,
        unmapped_codes,
    })
}

/// Load and aggregate the hospital table from disk.
pub fn load_beds_per_state(path: &Path) -> Result<Vec<HospitalBedRecord>, PipelineError> {
    let text = std::fs::read_to_string(path)
        .map_err(|e| PipelineError::from_read(&path.display().to_string(), e))?;

    let beds = parse_hospitals_csv(&text)?;
    for code in &beds.unmapped_codes {
        logging::warn(
            DataSource::Hospitals,
            Some(code),
            "unknown postal code, excluded from joins",
        );
    }
    logging::log_load_summary(
        DataSource::Hospitals,
        beds.records.len(),
        beds.unmapped_codes.len(),
    );
    logging::debug(
        DataSource::Hospitals,
        None,
        &format!("{} facility rows dropped for sentinel values", beds.sentinel_rows),
    );
    Ok(beds.records)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "\
OBJECTID,NAME,STATE,COUNTYFIPS,BEDS
1,General,CA,06037,500
2,County,CA,06059,250
3,Unknown Beds,CA,06001,-999
4,Unknown County,TX,NOT AVAILABLE,900
5,Memorial,TX,48201,600
6,Island,GU,66010,150
7,Capital,DC,11001,100
";

    #[test]
    fn test_beds_are_summed_and_sorted_descending() {
        let beds = parse_hospitals_csv(SAMPLE).unwrap();
        assert_eq!(
            beds.records,
            vec![
                HospitalBedRecord { state: "California".into(), beds: 750 },
                HospitalBedRecord { state: "Texas".into(), beds: 600 },
                HospitalBedRecord { state: "District of Columbia".into(), beds: 100 },
            ]
        );
    }

    #[test]
    fn test_sentinel_rows_never_contribute() {
        let beds = parse_hospitals_csv(SAMPLE).unwrap();
        assert_eq!(beds.sentinel_rows, 2);
        assert!(beds.records.iter().all(|r| r.beds >= 0));
        let texas = beds.records.iter().find(|r| r.state == "Texas").unwrap();
        assert_eq!(texas.beds, 600, "NOT AVAILABLE county must be excluded");
    }

    #[test]
    fn test_unknown_postal_codes_are_excluded() {
        let beds = parse_hospitals_csv(SAMPLE).unwrap();
        assert_eq!(beds.unmapped_codes, vec!["GU".to_string()]);
        assert!(beds.records.iter().all(|r| !r.state.is_empty()));
    }

    #[test]
    fn test_non_numeric_county_fips_fails_the_load() {
        let text = "STATE,COUNTYFIPS,BEDS\nCA,abc,10\n";
        let err = parse_hospitals_csv(text).unwrap_err();
        assert!(matches!(err, PipelineError::ParseError(_)));
    }

    #[test]
    fn test_non_utf8_file_is_a_parse_error() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("hospitals.csv");
        std::fs::write(&path, b"STATE,COUNTYFIPS,BEDS\nPR,72\xff01,10\n").unwrap();
        let err = load_beds_per_state(&path).unwrap_err();
        assert!(matches!(err, PipelineError::ParseError(_)), "got {:?}", err);
    }

    #[test]
    fn test_missing_file_is_source_unavailable() {
        let err = load_beds_per_state(Path::new("/nonexistent/us-hospitals.csv")).unwrap_err();
        assert!(matches!(err, PipelineError::SourceUnavailable { .. }));
    }

    #[test]
    fn test_non_numeric_beds_fails_the_load() {
        let text = "STATE,COUNTYFIPS,BEDS\nCA,06037,many\n";
        assert!(parse_hospitals_csv(text).is_err());
    }
}

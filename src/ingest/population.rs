/// Population table loader
///
/// Reads the Census county-level population estimates and sums them per
/// state. The file is latin-1 encoded (county names carry accents), so the
/// raw bytes are decoded before CSV parsing.
///
/// Columns used: `State`, `Population`. Any other columns are ignored.

use std::collections::BTreeMap;
use std::path::Path;

use serde::Deserialize;

use crate::config::SupplementalPopulation;
use crate::logging::{self, DataSource};
use crate::model::{PipelineError, PopulationRecord};

#[derive(Debug, Deserialize)]
struct PopulationRow {
    #[serde(rename = "State")]
    state: String,
    #[serde(rename = "Population")]
    population: i64,
}

/// Decode latin-1 bytes. Every byte maps to the code point of the same value.
pub fn decode_latin1(bytes: &[u8]) -> String {
    bytes.iter().map(|&b| b as char).collect()
}

/// Parse population CSV text into one record per state, ordered by name.
///
/// State names are trimmed before grouping so padded and unpadded spellings
/// of the same state fold into one row.
pub fn parse_population_csv(text: &str) -> Result<Vec<PopulationRecord>, PipelineError> {
    let mut reader = csv::Reader::from_reader(text.as_bytes());
    let mut totals: BTreeMap<String, i64> = BTreeMap::new();

    for row in reader.deserialize::<PopulationRow>() {
        let row = row?;
        *totals.entry(row.state.trim().to_string()).or_insert(0) += row.population;
    }

    Ok(totals
        .into_iter()
        .map(|(state, population)| PopulationRecord { state, population })
        .collect())
}

/// Append supplemental rows for states the table does not already contain.
///
/// Returns the number of rows added.
pub fn apply_supplemental(
    records: &mut Vec<PopulationRecord>,
    supplemental: &[SupplementalPopulation],
) -> usize {
    let mut added = 0;
    for extra in supplemental {
        let name = extra.name.trim();
        if records.iter().any(|r| r.state == name) {
            continue;
        }
        logging::debug(
            DataSource::Population,
            Some(name),
            &format!("adding supplemental population {}", extra.population),
        );
        records.push(PopulationRecord {
            state: name.to_string(),
            population: extra.population,
        });
        added += 1;
    }
    added
}

/// Load the population table from disk and apply the supplemental rows.
pub fn load_population(
    path: &Path,
    supplemental: &[SupplementalPopulation],
) -> Result<Vec<PopulationRecord>, PipelineError> {
    let bytes = std::fs::read(path)
        .map_err(|e| PipelineError::from_read(&path.display().to_string(), e))?;

    let mut records = parse_population_csv(&decode_latin1(&bytes))?;
    let from_file = records.len();
    let added = apply_supplemental(&mut records, supplemental);

    logging::info(
        DataSource::Population,
        None,
        &format!("{} states from file, {} supplemental", from_file, added),
    );
    logging::log_load_summary(DataSource::Population, records.len(), 0);
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "\
County,State,Population
Autauga County,Alabama,55601
Baldwin County,Alabama,218022
Adams County, Colorado ,517421
Alamosa County,Colorado,16233
Doña Ana County,New Mexico,217522
";

    #[test]
    fn test_population_is_summed_per_trimmed_state() {
        let records = parse_population_csv(SAMPLE).unwrap();
        assert_eq!(
            records,
            vec![
                PopulationRecord { state: "Alabama".into(), population: 273_623 },
                PopulationRecord { state: "Colorado".into(), population: 533_654 },
                PopulationRecord { state: "New Mexico".into(), population: 217_522 },
            ]
        );
    }

    #[test]
    fn test_latin1_bytes_decode_to_unicode() {
        let bytes = b"Do\xf1a Ana";
        assert_eq!(decode_latin1(bytes), "Doña Ana");
    }

    #[test]
    fn test_non_numeric_population_fails_the_load() {
        let text = "State,Population\nAlabama,lots\n";
        let err = parse_population_csv(text).unwrap_err();
        assert!(matches!(err, PipelineError::ParseError(_)));
    }

    #[test]
    fn test_supplemental_rows_only_fill_gaps() {
        let mut records = vec![PopulationRecord { state: "Guam".into(), population: 1 }];
        let supplemental = vec![
            SupplementalPopulation { name: "Guam".into(), population: 165_718 },
            SupplementalPopulation { name: "Puerto Rico".into(), population: 3_195_153 },
        ];
        let added = apply_supplemental(&mut records, &supplemental);
        assert_eq!(added, 1);
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].population, 1, "existing row must not be overwritten");
        assert_eq!(records[1].state, "Puerto Rico");
    }

    #[test]
    fn test_missing_file_is_source_unavailable() {
        let err = load_population(Path::new("/nonexistent/pop.csv"), &[]).unwrap_err();
        assert!(matches!(err, PipelineError::SourceUnavailable { .. }));
    }
}

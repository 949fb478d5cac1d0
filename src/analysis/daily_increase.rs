/// Daily-increase pivot.
///
/// Pivots cumulative `positive_tests` into a state × date grid over the full
/// date range of the table, filling absent (state, date) cells with 0, then
/// first-differences each row along the date axis. The first column keeps
/// its cumulative value. Negative values (downward corrections upstream)
/// are kept as-is.

use std::collections::{BTreeMap, BTreeSet};

use chrono::NaiveDate;

use crate::model::StateDayRecord;

#[derive(Debug, Clone, PartialEq)]
pub struct DailyIncreaseMatrix {
    /// Row labels, ascending by name.
    states: Vec<String>,
    /// Column labels, ascending.
    dates: Vec<NaiveDate>,
    /// `values[row][col]`.
    values: Vec<Vec<i64>>,
}

impl DailyIncreaseMatrix {
    pub fn from_records(records: &[StateDayRecord]) -> Self {
        let states: Vec<String> = records
            .iter()
            .map(|r| r.state.clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();
        let dates: Vec<NaiveDate> = records
            .iter()
            .map(|r| r.date)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();

        let row_of: BTreeMap<&str, usize> =
            states.iter().enumerate().map(|(i, s)| (s.as_str(), i)).collect();
        let col_of: BTreeMap<NaiveDate, usize> =
            dates.iter().enumerate().map(|(i, d)| (*d, i)).collect();

        let mut values = vec![vec![0i64; dates.len()]; states.len()];
        for r in records {
            values[row_of[r.state.as_str()]][col_of[&r.date]] = r.positive_tests;
        }

        for row in &mut values {
            first_difference(row);
        }

        DailyIncreaseMatrix {
            states,
            dates,
            values,
        }
    }

    pub fn states(&self) -> &[String] {
        &self.states
    }

    pub fn dates(&self) -> &[NaiveDate] {
        &self.dates
    }

    /// Daily increases for `state`, aligned with `dates()`.
    pub fn row(&self, state: &str) -> Option<&[i64]> {
        self.states
            .binary_search_by(|s| s.as_str().cmp(state))
            .ok()
            .map(|i| self.values[i].as_slice())
    }
}

/// In-place first difference; walks from the last column down so every
/// subtraction sees the original cumulative neighbour.
pub fn first_difference(row: &mut [i64]) {
    for k in (1..row.len()).rev() {
        row[k] -= row[k - 1];
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rec(d: &str, state: &str, cases: i64) -> StateDayRecord {
        StateDayRecord {
            state: state.to_string(),
            date: NaiveDate::parse_from_str(d, "%Y-%m-%d").unwrap(),
            fips: String::new(),
            positive_tests: cases,
            deaths: 0,
            population: None,
            beds: None,
            positive_tests_per_100k: None,
            beds_per_100k: None,
        }
    }

    #[test]
    fn test_first_difference_of_cumulative_series() {
        let mut row = [10, 15, 15, 30];
        first_difference(&mut row);
        assert_eq!(row, [10, 5, 0, 15]);
    }

    #[test]
    fn test_first_difference_keeps_negative_corrections() {
        let mut row = [10, 8, 12];
        first_difference(&mut row);
        assert_eq!(row, [10, -2, 4]);
    }

    #[test]
    fn test_first_difference_handles_short_rows() {
        let mut empty: [i64; 0] = [];
        first_difference(&mut empty);
        let mut one = [7];
        first_difference(&mut one);
        assert_eq!(one, [7]);
    }

    #[test]
    fn test_missing_cells_are_filled_with_zero_before_differencing() {
        let records = vec![
            rec("2020-03-05", "Ohio", 10),
            rec("2020-03-06", "Ohio", 12),
            rec("2020-03-07", "Ohio", 20),
            // Utah starts reporting a day late
            rec("2020-03-06", "Utah", 3),
            rec("2020-03-07", "Utah", 4),
        ];
        let matrix = DailyIncreaseMatrix::from_records(&records);
        assert_eq!(matrix.states(), &["Ohio".to_string(), "Utah".to_string()]);
        assert_eq!(matrix.dates().len(), 3);
        assert_eq!(matrix.row("Ohio").unwrap(), &[10, 2, 8]);
        assert_eq!(matrix.row("Utah").unwrap(), &[0, 3, 1]);
        assert!(matrix.row("Iowa").is_none());
    }

    #[test]
    fn test_prefix_sums_reproduce_cumulative_values() {
        let cumulative = [3i64, 3, 9, 14, 14, 40, 41];
        let records: Vec<_> = cumulative
            .iter()
            .enumerate()
            .map(|(i, c)| rec(&format!("2020-04-{:02}", i + 1), "Maine", *c))
            .collect();
        let matrix = DailyIncreaseMatrix::from_records(&records);
        let row = matrix.row("Maine").unwrap();
        let mut running = 0;
        for (k, v) in row.iter().enumerate() {
            running += v;
            assert_eq!(running, cumulative[k], "prefix sum mismatch at column {}", k);
        }
    }
}

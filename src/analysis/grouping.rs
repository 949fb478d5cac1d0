/// State ranking and pagination.
///
/// The canonical order of states is the most recent day's `positive_tests`,
/// highest first. That order is cut into contiguous groups of a fixed size
/// for display, one group per page. Page indices are 0-based here; the view
/// layer adds 1 for anything a user reads.

use std::collections::HashMap;

use chrono::NaiveDate;
use serde::Serialize;

use crate::model::{PipelineError, StateDayRecord};
use crate::pipeline::{latest_date, rows_on};

/// One entry of the ranked state list.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedState {
    pub state: String,
    pub positive_tests: i64,
}

/// States on the most recent date, in ranking order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StateRanking {
    pub latest_date: NaiveDate,
    pub states: Vec<RankedState>,
}

impl StateRanking {
    /// Rank states by their positive tests on the latest date in `records`.
    pub fn from_records(records: &[StateDayRecord]) -> Result<Self, PipelineError> {
        let latest_date = latest_date(records)
            .ok_or_else(|| PipelineError::EmptyData("time series has no rows".to_string()))?;
        let states = rows_on(records, latest_date)
            .into_iter()
            .map(|r| RankedState {
                state: r.state.clone(),
                positive_tests: r.positive_tests,
            })
            .collect();
        Ok(StateRanking {
            latest_date,
            states,
        })
    }

    pub fn names(&self) -> Vec<String> {
        self.states.iter().map(|s| s.state.clone()).collect()
    }

    /// Map from state name to 0-based rank.
    pub fn positions(&self) -> HashMap<&str, usize> {
        self.states
            .iter()
            .enumerate()
            .map(|(i, s)| (s.state.as_str(), i))
            .collect()
    }
}

/// A ranked state list cut into fixed-size pages.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StateGroups {
    pub group_size: usize,
    pub groups: Vec<Vec<String>>,
}

impl StateGroups {
    /// Partition `ranked` into groups of `group_size`; the last may be shorter.
    ///
    /// A size of 0 is rejected. A size above the number of states is lowered
    /// to it, giving a single group.
    pub fn partition(ranked: &[String], group_size: usize) -> Result<Self, PipelineError> {
        if group_size == 0 {
            return Err(PipelineError::InvalidParameter(
                "group size must be at least 1".to_string(),
            ));
        }
        if ranked.is_empty() {
            return Err(PipelineError::EmptyData("no states to group".to_string()));
        }
        let group_size = group_size.min(ranked.len());
        let groups = ranked.chunks(group_size).map(|c| c.to_vec()).collect();
        Ok(StateGroups { group_size, groups })
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Clamp a requested page index into `[0, len - 1]`.
    pub fn clamp_page(&self, requested: usize) -> usize {
        requested.min(self.len().saturating_sub(1))
    }

    /// Page controls are only needed with more than one group.
    pub fn needs_page_control(&self) -> bool {
        self.len() > 1
    }

    /// States on page `index` (clamped).
    pub fn group(&self, index: usize) -> &[String] {
        &self.groups[self.clamp_page(index)]
    }

    /// 1-based rank of the first state on page `index` (clamped).
    pub fn first_rank(&self, index: usize) -> usize {
        self.clamp_page(index) * self.group_size + 1
    }
}

/// Rows of `records` whose state is in `group`, ordered by the state's rank
/// (not by each row's own count) and then by date.
pub fn group_subset(
    records: &[StateDayRecord],
    group: &[String],
    ranking: &StateRanking,
) -> Vec<StateDayRecord> {
    let positions = ranking.positions();
    let mut subset: Vec<StateDayRecord> = records
        .iter()
        .filter(|r| group.contains(&r.state))
        .cloned()
        .collect();
    subset.sort_by_key(|r| {
        (
            positions.get(r.state.as_str()).copied().unwrap_or(usize::MAX),
            r.date,
        )
    });
    subset
}

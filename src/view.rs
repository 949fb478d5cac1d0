//! Chart view assembly.
//!
//! `recompute` turns the joined table plus one set of UI parameters into
//! everything a renderer draws: the plotted series, titles, sidebar labels
//! and the latest-day table. It has no state of its own; the UI layer calls
//! it again whenever a control changes.

use std::collections::HashSet;

use chrono::NaiveDate;
use serde::Serialize;

use crate::analysis::daily_increase::DailyIncreaseMatrix;
use crate::analysis::grouping::{StateGroups, StateRanking, group_subset};
use crate::model::{ChartType, DisplayPolicy, LatestRow, PipelineError, StateDayRecord};
use crate::pipeline::rows_on;

/// Parameters supplied by the UI layer.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewParams {
    pub group_size: usize,
    /// 0-based; clamped to the last page.
    pub page_index: usize,
    pub chart_type: ChartType,
    /// States left out of the plotted series only.
    pub hidden_states: HashSet<String>,
}

impl Default for ViewParams {
    fn default() -> Self {
        ViewParams {
            group_size: 10,
            page_index: 0,
            chart_type: ChartType::Cumulative,
            hidden_states: HashSet::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeriesPoint {
    pub date: NaiveDate,
    /// `None` where the metric is undefined (per-100k without population).
    pub value: Option<f64>,
}

/// One plotted line, keyed by state.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Series {
    pub state: String,
    pub points: Vec<SeriesPoint>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SidebarEntry {
    /// 1-based position in the full ranking.
    pub rank: usize,
    pub state: String,
    pub positive_tests: i64,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardView {
    pub latest_date: NaiveDate,
    pub chart_type: ChartType,
    pub page_title: String,
    pub heading: String,
    pub chart_title: String,
    pub display_policy: DisplayPolicy,
    /// 0-based active page after clamping.
    pub page_index: usize,
    pub num_groups: usize,
    pub group_size: usize,
    pub show_page_control: bool,
    pub sidebar_heading: String,
    pub sidebar: Vec<SidebarEntry>,
    /// Every page of the ranking, for navigation.
    pub groups: Vec<Vec<String>>,
    pub series: Vec<Series>,
    /// Latest-day rows for all states, ranked.
    pub latest_table: Vec<LatestRow>,
}

/// `Mar 9, 2020` style date used in headings.
pub fn format_heading_date(date: NaiveDate) -> String {
    date.format("%b %-d, %Y").to_string()
}

/// Build the view for one set of parameters.
///
/// `daily_increase` must have been built from the same `records`; it spans
/// every state and date, and only the active group's rows are read from it.
pub fn recompute(
    records: &[StateDayRecord],
    daily_increase: &DailyIncreaseMatrix,
    params: &ViewParams,
) -> Result<DashboardView, PipelineError> {
    let ranking = StateRanking::from_records(records)?;
    let groups = StateGroups::partition(&ranking.names(), params.group_size)?;
    let page_index = groups.clamp_page(params.page_index);
    let group = groups.group(page_index);
    let first_rank = groups.first_rank(page_index);

    let subset = group_subset(records, group, &ranking);

    let series: Vec<Series> = group
        .iter()
        .filter(|state| !params.hidden_states.contains(state.as_str()))
        .map(|state| match params.chart_type {
            ChartType::Cumulative => Series {
                state: state.clone(),
                points: subset
                    .iter()
                    .filter(|r| &r.state == state)
                    .map(|r| SeriesPoint {
                        date: r.date,
                        value: Some(r.positive_tests as f64),
                    })
                    .collect(),
            },
            ChartType::Per100k => Series {
                state: state.clone(),
                points: subset
                    .iter()
                    .filter(|r| &r.state == state)
                    .map(|r| SeriesPoint {
                        date: r.date,
                        value: r.positive_tests_per_100k,
                    })
                    .collect(),
            },
            ChartType::DailyIncrease => Series {
                state: state.clone(),
                points: daily_increase
                    .row(state)
                    .map(|row| {
                        daily_increase
                            .dates()
                            .iter()
                            .zip(row)
                            .map(|(date, v)| SeriesPoint {
                                date: *date,
                                value: Some(*v as f64),
                            })
                            .collect()
                    })
                    .unwrap_or_default(),
            },
        })
        .collect();

    let sidebar = ranking
        .states
        .iter()
        .filter(|s| group.contains(&s.state))
        .enumerate()
        .map(|(j, s)| {
            let rank = first_rank + j;
            SidebarEntry {
                rank,
                state: s.state.clone(),
                positive_tests: s.positive_tests,
                label: format!("{} - {} - {} positive_tests", rank, s.state, s.positive_tests),
            }
        })
        .collect();

    let latest_table = rows_on(records, ranking.latest_date)
        .into_iter()
        .map(LatestRow::from)
        .collect();

    let page_title = params.chart_type.page_title().to_string();

    Ok(DashboardView {
        latest_date: ranking.latest_date,
        chart_type: params.chart_type,
        heading: format!("{} as of {}", page_title, format_heading_date(ranking.latest_date)),
        page_title,
        chart_title: format!(
            "States #{}-{} by total number of positive test results",
            first_rank,
            first_rank + group.len() - 1
        ),
        display_policy: DisplayPolicy::for_visible_count(series.len()),
        page_index,
        num_groups: groups.len(),
        group_size: groups.group_size,
        show_page_control: groups.needs_page_control(),
        sidebar_heading: format!(
            "Positive tests per state, Page {} of {}",
            page_index + 1,
            groups.len()
        ),
        sidebar,
        groups: groups.groups.clone(),
        series,
        latest_table,
    })
}

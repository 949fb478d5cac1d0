//! State-by-state COVID-19 case curves.
//!
//! Loads the population, hospital and case-feed tables, joins them into one
//! row per state per day, and assembles the per-page chart data a dashboard
//! renders. Every call recomputes from its inputs; nothing is global except
//! the logger.
//!
//! Data flow:
//!
//! ```text
//! config ─▶ ingest::{population, hospitals} ─▶ pipeline::load_reference_data
//!           ingest::nyt ──────────────────────▶ pipeline::build_timeseries
//!                                                   │
//!                      analysis::daily_increase ◀───┤
//!                      analysis::grouping ◀─────────┤
//!                                                   ▼
//!                                            view::recompute
//! ```

pub mod analysis;
pub mod config;
pub mod ingest;
pub mod logging;
pub mod model;
pub mod pipeline;
pub mod states;
pub mod verify;
pub mod view;
